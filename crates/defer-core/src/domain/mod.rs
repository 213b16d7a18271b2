//! Domain model (ids, targets, payloads, jobs, options, errors).

pub mod errors;
pub mod ids;
pub mod job;
pub mod method;
pub mod options;
pub mod payload;
pub mod target;

pub use errors::{DeferError, MethodError};
pub use ids::JobId;
pub use job::{Job, NewJob};
pub use method::{MethodAlias, Variant};
pub use options::{Computed, EnqueueOptions, OptionValue};
pub use payload::PerformableMethod;
pub use target::TargetRef;
