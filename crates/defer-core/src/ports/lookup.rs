//! ObjectLookup port - payload の target を生きた receiver に戻す

use crate::domain::{DeferError, TargetRef};
use crate::typed::Performable;

/// Rebuilds the receiver a payload was captured on.
///
/// Fails with `DeferError::TargetNotFound` when the reference no longer
/// denotes a live object. No retry happens here.
pub trait ObjectLookup: Send + Sync {
    fn resolve(&self, target: &TargetRef) -> Result<Box<dyn Performable>, DeferError>;
}
