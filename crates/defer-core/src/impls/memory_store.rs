//! In-memory job store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::{DeferError, Job, JobId, NewJob};
use crate::ports::{Clock, IdGenerator, JobStore, SystemClock, UlidGenerator};

/// A stored job plus its insertion sequence (tie-breaker for ordering).
#[derive(Debug, Clone)]
struct StoredJob {
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct InMemoryStoreState {
    /// All job rows (single source of truth).
    jobs: HashMap<JobId, StoredJob>,

    /// Next insertion sequence.
    next_seq: u64,
}

/// In-memory `JobStore`, for development and tests.
pub struct InMemoryJobStore {
    state: Mutex<InMemoryStoreState>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryJobStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let ids = Arc::new(UlidGenerator::new(Arc::clone(&clock)));
        Self::with_ids(ids, clock)
    }

    pub fn with_ids(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(InMemoryStoreState::default()),
            ids,
            clock,
        }
    }

    /// All jobs in creation order.
    pub async fn jobs(&self) -> Vec<Job> {
        let state = self.state.lock().await;
        let mut stored: Vec<&StoredJob> = state.jobs.values().collect();
        stored.sort_by_key(|s| s.seq);
        stored.into_iter().map(|s| s.job.clone()).collect()
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn create(&self, new_job: NewJob) -> Result<Job, DeferError> {
        let id = self.ids.generate_job_id();
        let job = Job::new(id, new_job, self.clock.now());

        let mut state = self.state.lock().await;
        if state.jobs.contains_key(&id) {
            return Err(DeferError::Store(format!("duplicate job id {id}")));
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.jobs.insert(
            id,
            StoredJob {
                seq,
                job: job.clone(),
            },
        );
        Ok(job)
    }

    async fn count(&self) -> Result<usize, DeferError> {
        let state = self.state.lock().await;
        Ok(state.jobs.len())
    }

    async fn find(&self, id: JobId) -> Result<Option<Job>, DeferError> {
        let state = self.state.lock().await;
        Ok(state.jobs.get(&id).map(|s| s.job.clone()))
    }

    async fn delete(&self, id: JobId) -> Result<bool, DeferError> {
        let mut state = self.state.lock().await;
        Ok(state.jobs.remove(&id).is_some())
    }

    async fn due(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<Job>, DeferError> {
        let state = self.state.lock().await;
        let mut due: Vec<&StoredJob> = state
            .jobs
            .values()
            .filter(|s| s.job.is_due(now))
            .collect();
        due.sort_by_key(|s| (s.job.priority, s.job.run_at, s.seq));
        Ok(due
            .into_iter()
            .take(limit)
            .map(|s| s.job.clone())
            .collect())
    }
}
