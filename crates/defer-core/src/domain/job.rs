//! Job record: a payload plus its resolved scheduling attributes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::DeferError;
use super::ids::JobId;
use super::payload::PerformableMethod;
use crate::ports::ObjectLookup;

/// A row to be written by a `JobStore`.
///
/// Priority and run_at are already resolved; nothing in here is evaluated
/// again after the row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub payload: PerformableMethod,
    pub priority: i32,
    pub run_at: DateTime<Utc>,
}

/// A persisted job. The job exclusively owns its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub payload: PerformableMethod,

    /// Opaque ordering key; the worker runs lower values first.
    pub priority: i32,

    /// Earliest time the job may run.
    pub run_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, new_job: NewJob, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            payload: new_job.payload,
            priority: new_job.priority,
            run_at: new_job.run_at,
            created_at,
        }
    }

    pub fn payload_object(&self) -> &PerformableMethod {
        &self.payload
    }

    pub fn name(&self) -> String {
        self.payload.display_name()
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.run_at <= now
    }

    pub fn invoke_job(&self, lookup: &dyn ObjectLookup) -> Result<Value, DeferError> {
        self.payload.invoke(lookup)
    }
}
