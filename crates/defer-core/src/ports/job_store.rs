//! JobStore port - Job の永続化先
//!
//! 実装:
//! - `impls::InMemoryJobStore`（開発・テスト用）

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DeferError, Job, JobId, NewJob};

/// Durable table of jobs.
///
/// The core only writes rows (`create`); workers read due rows and delete the
/// ones they finished. Locking and retry bookkeeping live outside this trait.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a new job and return it with its id and creation time.
    async fn create(&self, new_job: NewJob) -> Result<Job, DeferError>;

    async fn count(&self) -> Result<usize, DeferError>;

    async fn find(&self, id: JobId) -> Result<Option<Job>, DeferError>;

    /// Returns true when a row was removed.
    async fn delete(&self, id: JobId) -> Result<bool, DeferError>;

    /// Jobs with `run_at <= now`, lowest priority first, then earliest
    /// `run_at`, then creation order.
    async fn due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Job>, DeferError>;
}
