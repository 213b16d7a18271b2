//! Worker - due な Job を取り出して payload を invoke する
//!
//! リトライ・ロック・失敗時の記録はここでは扱わない。
//! 失敗した Job はログを出して store に残す。

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::{DeferError, Job};
use crate::ports::{Clock, JobStore, ObjectLookup};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl WorkReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub struct Worker {
    store: Arc<dyn JobStore>,
    lookup: Arc<dyn ObjectLookup>,
    clock: Arc<dyn Clock>,
}

impl Worker {
    pub fn new(
        store: Arc<dyn JobStore>,
        lookup: Arc<dyn ObjectLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            lookup,
            clock,
        }
    }

    /// Invoke one job; delete it when it succeeds.
    pub async fn run(&self, job: &Job) -> Result<Value, DeferError> {
        let value = job.invoke_job(self.lookup.as_ref())?;
        self.store.delete(job.id).await?;
        Ok(value)
    }

    /// Run up to `limit` due jobs, in store order.
    ///
    /// Store errors abort the batch; job errors are counted and logged.
    pub async fn work_off(&self, limit: usize) -> Result<WorkReport, DeferError> {
        let now = self.clock.now();
        let jobs = self.store.due(now, limit).await?;

        let mut report = WorkReport::default();
        for job in &jobs {
            match self.run(job).await {
                Ok(_) => {
                    info!(job_id = %job.id, name = %job.name(), "job completed");
                    report.succeeded += 1;
                }
                Err(DeferError::Store(e)) => return Err(DeferError::Store(e)),
                Err(e) => {
                    warn!(job_id = %job.id, name = %job.name(), error = %e, "job failed");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}
