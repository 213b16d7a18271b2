//! Resolver - enqueue options を具体的な Job 属性に確定する
//!
//! - 未指定: priority は `DeferConfig::default_priority()`、run_at は「今」
//! - Literal: そのまま
//! - Computed: 呼び出し時に 1 回だけ評価

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::DeferConfig;
use crate::domain::EnqueueOptions;
use crate::ports::Clock;

/// Fully resolved scheduling attributes for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub priority: i32,
    pub run_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Resolver {
    config: Arc<DeferConfig>,
    clock: Arc<dyn Clock>,
}

impl Resolver {
    pub fn new(config: Arc<DeferConfig>, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Resolve `options` for a call on `receiver` with `args`.
    pub fn resolve<C: ?Sized>(
        &self,
        options: &EnqueueOptions<C>,
        receiver: &C,
        args: &[Value],
    ) -> ResolvedOptions {
        let priority = match options.priority_option() {
            Some(value) => value.resolve(receiver, args),
            None => self.config.default_priority(),
        };
        let run_at = match options.run_at_option() {
            Some(value) => value.resolve(receiver, args),
            None => self.clock.now(),
        };
        ResolvedOptions { priority, run_at }
    }
}
