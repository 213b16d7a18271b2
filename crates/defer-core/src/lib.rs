//! defer-core
//!
//! Deferred execution of method calls: a call is captured as a
//! `PerformableMethod`, its `priority` / `run_at` are resolved at call time,
//! and the result is written to a `JobStore` for a worker to run later.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, target, method alias, payload, job, options, errors）
//! - **ports**: 抽象化レイヤー（JobStore, ObjectLookup, Clock, IdGenerator）
//! - **typed**: receiver の型付き API（Performable, Class, ObjectRegistry）
//! - **app**: アプリケーションロジック（Interceptor, Delay, Resolver, Worker）
//! - **impls**: 実装（InMemoryJobStore など開発用）
//! - **config**: DeferConfig / DeferSettings

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;

pub use app::{DeferBuilder, Delay, Enqueuer, Interceptor, Invocation, Worker};
pub use config::{DeferConfig, DeferSettings};
pub use domain::{DeferError, EnqueueOptions, Job, MethodError, PerformableMethod, TargetRef};
pub use typed::{Class, ObjectRegistry, Performable};
