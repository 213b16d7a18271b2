//! Deferral configuration.
//!
//! `DeferConfig` is shared (`Arc`) by the interceptor, the delay facade and the
//! resolver, and is read on every call. Tests build a fresh one each.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::DeferError;

/// Plain settings, e.g. loaded from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferSettings {
    /// When false, every deferred call runs synchronously instead.
    #[serde(default = "default_true")]
    pub delay_jobs: bool,

    /// Priority used when neither the call nor the declaration sets one.
    #[serde(default)]
    pub default_priority: i32,
}

fn default_true() -> bool {
    true
}

impl Default for DeferSettings {
    fn default() -> Self {
        Self {
            delay_jobs: true,
            default_priority: 0,
        }
    }
}

impl DeferSettings {
    pub fn from_json_str(s: &str) -> Result<Self, DeferError> {
        serde_json::from_str(s).map_err(|e| DeferError::Settings(e.to_string()))
    }
}

/// Runtime switches for deferral.
///
/// No synchronization beyond atomic loads/stores: callers that flip these
/// while other calls are in flight get whichever value each call reads.
#[derive(Debug)]
pub struct DeferConfig {
    delay_jobs: AtomicBool,
    default_priority: AtomicI32,
}

impl DeferConfig {
    pub fn new() -> Self {
        Self::from_settings(&DeferSettings::default())
    }

    pub fn from_settings(settings: &DeferSettings) -> Self {
        Self {
            delay_jobs: AtomicBool::new(settings.delay_jobs),
            default_priority: AtomicI32::new(settings.default_priority),
        }
    }

    pub fn delay_jobs(&self) -> bool {
        self.delay_jobs.load(Ordering::Relaxed)
    }

    pub fn set_delay_jobs(&self, enabled: bool) {
        self.delay_jobs.store(enabled, Ordering::Relaxed);
    }

    pub fn default_priority(&self) -> i32 {
        self.default_priority.load(Ordering::Relaxed)
    }

    pub fn set_default_priority(&self, priority: i32) {
        self.default_priority.store(priority, Ordering::Relaxed);
    }

    pub fn settings(&self) -> DeferSettings {
        DeferSettings {
            delay_jobs: self.delay_jobs(),
            default_priority: self.default_priority(),
        }
    }
}

impl Default for DeferConfig {
    fn default() -> Self {
        Self::new()
    }
}
