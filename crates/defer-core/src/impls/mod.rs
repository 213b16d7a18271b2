//! Impls - 開発・テスト用の実装

pub mod memory_store;

pub use self::memory_store::InMemoryJobStore;
