//! DeferBuilder - Enqueuer の構築とワイヤリング
//!
//! 未指定の部品はデフォルトで埋める:
//! - config: `DeferConfig::new()`（delay_jobs = true, default_priority = 0）
//! - clock: `SystemClock`
//! - store: 同じ clock を使う `InMemoryJobStore`

use std::sync::Arc;

use super::enqueuer::Enqueuer;
use crate::config::{DeferConfig, DeferSettings};
use crate::impls::InMemoryJobStore;
use crate::ports::{Clock, JobStore, SystemClock};

/// # 使用例
/// ```ignore
/// let enqueuer = DeferBuilder::new()
///     .settings(&settings)
///     .store(Arc::new(my_store))
///     .build();
/// ```
#[derive(Default)]
pub struct DeferBuilder {
    config: Option<Arc<DeferConfig>>,
    clock: Option<Arc<dyn Clock>>,
    store: Option<Arc<dyn JobStore>>,
}

impl DeferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: Arc<DeferConfig>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn settings(self, settings: &DeferSettings) -> Self {
        self.config(Arc::new(DeferConfig::from_settings(settings)))
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn store(mut self, store: Arc<dyn JobStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Enqueuer {
        let config = self.config.unwrap_or_default();
        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let store: Arc<dyn JobStore> = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryJobStore::new(Arc::clone(&clock))));
        Enqueuer::new(config, store, clock)
    }
}
