//! Enqueuer - payload + resolved options を JobStore に書き込む
//!
//! Interceptor と Delay が共有する「キュー書き込み側」。

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::delay::Delay;
use super::resolver::{ResolvedOptions, Resolver};
use crate::config::DeferConfig;
use crate::domain::{DeferError, EnqueueOptions, Job, NewJob, PerformableMethod};
use crate::ports::{Clock, JobStore};
use crate::typed::{Class, ClassRef, Performable};

/// Result of a call routed through the interceptor or the delay facade.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Deferral was disabled; the method ran and this is what it returned.
    Direct(Value),

    /// A job was written; nothing ran yet.
    Deferred(Job),
}

impl Invocation {
    pub fn job(&self) -> Option<&Job> {
        match self {
            Self::Deferred(job) => Some(job),
            Self::Direct(_) => None,
        }
    }

    pub fn into_job(self) -> Option<Job> {
        match self {
            Self::Deferred(job) => Some(job),
            Self::Direct(_) => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Direct(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

/// Shared handle to the config, the resolver and the job store.
#[derive(Clone)]
pub struct Enqueuer {
    config: Arc<DeferConfig>,
    resolver: Resolver,
    store: Arc<dyn JobStore>,
}

impl Enqueuer {
    pub fn new(config: Arc<DeferConfig>, store: Arc<dyn JobStore>, clock: Arc<dyn Clock>) -> Self {
        let resolver = Resolver::new(Arc::clone(&config), clock);
        Self {
            config,
            resolver,
            store,
        }
    }

    pub fn config(&self) -> &DeferConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Start an ad-hoc deferred call on `receiver`.
    pub fn delay<'a, P: Performable>(&self, receiver: &'a mut P) -> Delay<'a, P> {
        Delay::new(self.clone(), receiver)
    }

    /// Start an ad-hoc deferred class-level call.
    pub fn delay_class<C: Class>(&self) -> Delay<'static, ClassRef<C>> {
        Delay::owned(self.clone(), ClassRef::new())
    }

    /// Resolve options against `receiver` and the payload's args, write the job.
    pub(crate) async fn enqueue<P: Performable>(
        &self,
        receiver: &P,
        payload: PerformableMethod,
        options: &EnqueueOptions<P>,
    ) -> Result<Job, DeferError> {
        let resolved = self.resolver.resolve(options, receiver, payload.args());
        self.write(payload, resolved).await
    }

    pub async fn write(
        &self,
        payload: PerformableMethod,
        resolved: ResolvedOptions,
    ) -> Result<Job, DeferError> {
        let new_job = NewJob {
            payload,
            priority: resolved.priority,
            run_at: resolved.run_at,
        };
        let job = self.store.create(new_job).await?;
        debug!(
            job_id = %job.id,
            name = %job.name(),
            priority = job.priority,
            run_at = %job.run_at,
            "enqueued"
        );
        Ok(job)
    }
}
