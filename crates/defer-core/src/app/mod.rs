//! App - アプリケーション層
//!
//! ports を組み合わせて deferral のロジックを実装します。
//!
//! # 主要コンポーネント
//! - **DeferBuilder**: Enqueuer の構築とワイヤリング
//! - **Enqueuer**: payload + resolved options を JobStore に書き込む
//! - **Resolver**: priority / run_at を確定
//! - **Interceptor**: 宣言済みメソッドの呼び出しを Job に変換
//! - **Delay**: 宣言なしの 1 回きりの遅延呼び出し
//! - **Worker**: due な Job を実行

pub mod builder;
pub mod delay;
pub mod enqueuer;
pub mod interceptor;
pub mod resolver;
pub mod worker;

pub use self::builder::DeferBuilder;
pub use self::delay::Delay;
pub use self::enqueuer::{Enqueuer, Invocation};
pub use self::interceptor::Interceptor;
pub use self::resolver::{ResolvedOptions, Resolver};
pub use self::worker::{WorkReport, Worker};
