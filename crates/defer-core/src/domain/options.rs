//! Enqueue options: `priority` and `run_at`, literal or computed.
//!
//! A computed option has one of three shapes, fixed when it is built:
//! - `Nullary`: takes nothing (reads shared state)
//! - `Receiver`: takes the receiver of the call
//! - `Arguments`: takes the call's own arguments
//!
//! Computed options run once, when the job is enqueued.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::errors::DeferError;

pub const PRIORITY: &str = "priority";
pub const RUN_AT: &str = "run_at";

pub enum Computed<T, C: ?Sized> {
    Nullary(Arc<dyn Fn() -> T + Send + Sync>),
    Receiver(Arc<dyn Fn(&C) -> T + Send + Sync>),
    Arguments(Arc<dyn Fn(&[Value]) -> T + Send + Sync>),
}

impl<T, C: ?Sized> Computed<T, C> {
    pub fn evaluate(&self, receiver: &C, args: &[Value]) -> T {
        match self {
            Self::Nullary(f) => f(),
            Self::Receiver(f) => f(receiver),
            Self::Arguments(f) => f(args),
        }
    }

    /// Number of parameters the callable was declared with.
    pub fn arity(&self) -> usize {
        match self {
            Self::Nullary(_) => 0,
            Self::Receiver(_) | Self::Arguments(_) => 1,
        }
    }
}

impl<T, C: ?Sized> Clone for Computed<T, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Nullary(f) => Self::Nullary(Arc::clone(f)),
            Self::Receiver(f) => Self::Receiver(Arc::clone(f)),
            Self::Arguments(f) => Self::Arguments(Arc::clone(f)),
        }
    }
}

impl<T, C: ?Sized> fmt::Debug for Computed<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Nullary(_) => "Nullary",
            Self::Receiver(_) => "Receiver",
            Self::Arguments(_) => "Arguments",
        };
        write!(f, "Computed::{shape}(..)")
    }
}

/// An option value: used verbatim, or computed at enqueue time.
pub enum OptionValue<T, C: ?Sized> {
    Literal(T),
    Computed(Computed<T, C>),
}

impl<T: Clone, C: ?Sized> OptionValue<T, C> {
    pub fn resolve(&self, receiver: &C, args: &[Value]) -> T {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Computed(computed) => computed.evaluate(receiver, args),
        }
    }
}

impl<T: Clone, C: ?Sized> Clone for OptionValue<T, C> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Computed(computed) => Self::Computed(computed.clone()),
        }
    }
}

impl<T: fmt::Debug, C: ?Sized> fmt::Debug for OptionValue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Computed(computed) => computed.fmt(f),
        }
    }
}

/// Options attached to an interception declaration or to a `delay` call.
///
/// `C` is the receiver type handed to `Receiver`-shaped callables.
pub struct EnqueueOptions<C: ?Sized> {
    priority: Option<OptionValue<i32, C>>,
    run_at: Option<OptionValue<DateTime<Utc>, C>>,
}

impl<C: ?Sized> EnqueueOptions<C> {
    pub fn new() -> Self {
        Self {
            priority: None,
            run_at: None,
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(OptionValue::Literal(priority));
        self
    }

    pub fn priority_fn(mut self, f: impl Fn() -> i32 + Send + Sync + 'static) -> Self {
        self.priority = Some(OptionValue::Computed(Computed::Nullary(Arc::new(f))));
        self
    }

    pub fn priority_with(mut self, f: impl Fn(&C) -> i32 + Send + Sync + 'static) -> Self {
        self.priority = Some(OptionValue::Computed(Computed::Receiver(Arc::new(f))));
        self
    }

    pub fn priority_from_args(
        mut self,
        f: impl Fn(&[Value]) -> i32 + Send + Sync + 'static,
    ) -> Self {
        self.priority = Some(OptionValue::Computed(Computed::Arguments(Arc::new(f))));
        self
    }

    pub fn run_at(mut self, run_at: DateTime<Utc>) -> Self {
        self.run_at = Some(OptionValue::Literal(run_at));
        self
    }

    pub fn run_at_fn(mut self, f: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.run_at = Some(OptionValue::Computed(Computed::Nullary(Arc::new(f))));
        self
    }

    pub fn run_at_with(
        mut self,
        f: impl Fn(&C) -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.run_at = Some(OptionValue::Computed(Computed::Receiver(Arc::new(f))));
        self
    }

    pub fn run_at_from_args(
        mut self,
        f: impl Fn(&[Value]) -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.run_at = Some(OptionValue::Computed(Computed::Arguments(Arc::new(f))));
        self
    }

    pub fn priority_option(&self) -> Option<&OptionValue<i32, C>> {
        self.priority.as_ref()
    }

    pub fn run_at_option(&self) -> Option<&OptionValue<DateTime<Utc>, C>> {
        self.run_at.as_ref()
    }

    /// Parse a literal options mapping such as
    /// `{"priority": 20, "run_at": "2010-05-03T00:55:00Z"}`.
    pub fn from_json(options: &Value) -> Result<Self, DeferError> {
        let map = options.as_object().ok_or_else(|| DeferError::InvalidOption {
            key: "options".to_string(),
            reason: format!("expected an object, got {options}"),
        })?;

        let mut parsed = Self::new();
        for (key, value) in map {
            match key.as_str() {
                PRIORITY => parsed = parsed.priority(parse_priority(value)?),
                RUN_AT => parsed = parsed.run_at(parse_run_at(value)?),
                other => return Err(DeferError::UnknownOption(other.to_string())),
            }
        }
        Ok(parsed)
    }
}

fn parse_priority(value: &Value) -> Result<i32, DeferError> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| DeferError::InvalidOption {
            key: PRIORITY.to_string(),
            reason: format!("expected a 32-bit integer, got {value}"),
        })
}

fn parse_run_at(value: &Value) -> Result<DateTime<Utc>, DeferError> {
    let invalid = |reason: String| DeferError::InvalidOption {
        key: RUN_AT.to_string(),
        reason,
    };
    let s = value
        .as_str()
        .ok_or_else(|| invalid(format!("expected an RFC 3339 string, got {value}")))?;
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| invalid(e.to_string()))
}

impl<C: ?Sized> Default for EnqueueOptions<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for EnqueueOptions<C> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority.clone(),
            run_at: self.run_at.clone(),
        }
    }
}

impl<C: ?Sized> fmt::Debug for EnqueueOptions<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnqueueOptions")
            .field("priority", &self.priority)
            .field("run_at", &self.run_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    struct Yarn {
        importance: i32,
    }

    #[test]
    fn literal_values_are_used_verbatim() {
        let opts = EnqueueOptions::<Yarn>::new().priority(20);
        let yarn = Yarn { importance: 1 };

        let priority = opts.priority_option().unwrap().resolve(&yarn, &[]);
        assert_eq!(priority, 20);
    }

    #[test]
    fn each_shape_gets_its_own_context() {
        let yarn = Yarn { importance: 10 };
        let args = [json!(3)];

        let nullary = EnqueueOptions::<Yarn>::new().priority_fn(|| 7);
        let receiver = EnqueueOptions::<Yarn>::new().priority_with(|y| y.importance);
        let arguments = EnqueueOptions::<Yarn>::new()
            .priority_from_args(|args| args[0].as_i64().unwrap_or_default() as i32 * 2);

        assert_eq!(nullary.priority_option().unwrap().resolve(&yarn, &args), 7);
        assert_eq!(receiver.priority_option().unwrap().resolve(&yarn, &args), 10);
        assert_eq!(arguments.priority_option().unwrap().resolve(&yarn, &args), 6);
    }

    #[test]
    fn run_at_shapes_resolve_like_priority() {
        let base = Utc.with_ymd_and_hms(2010, 5, 3, 0, 55, 0).unwrap();
        let yarn = Yarn { importance: 2 };

        let nullary = EnqueueOptions::<Yarn>::new().run_at_fn(move || base);
        let receiver = EnqueueOptions::<Yarn>::new()
            .run_at_with(move |y| base + chrono::Duration::hours(y.importance as i64));

        assert_eq!(nullary.run_at_option().unwrap().resolve(&yarn, &[]), base);
        assert_eq!(
            receiver.run_at_option().unwrap().resolve(&yarn, &[]),
            base + chrono::Duration::hours(2)
        );
        assert!(nullary.priority_option().is_none());
    }

    #[test]
    fn computed_arity_follows_the_shape() {
        let nullary: Computed<i32, Yarn> = Computed::Nullary(Arc::new(|| 0));
        let receiver: Computed<i32, Yarn> = Computed::Receiver(Arc::new(|y: &Yarn| y.importance));

        assert_eq!(nullary.arity(), 0);
        assert_eq!(receiver.arity(), 1);
    }

    #[test]
    fn from_json_accepts_known_keys() {
        let opts = EnqueueOptions::<Yarn>::from_json(&json!({
            "priority": 20,
            "run_at": "2010-05-03T00:55:00Z",
        }))
        .unwrap();

        let yarn = Yarn { importance: 0 };
        let expected = Utc.with_ymd_and_hms(2010, 5, 3, 0, 55, 0).unwrap();
        assert_eq!(opts.priority_option().unwrap().resolve(&yarn, &[]), 20);
        assert_eq!(opts.run_at_option().unwrap().resolve(&yarn, &[]), expected);
    }

    #[test]
    fn from_json_rejects_unknown_keys() {
        let err = EnqueueOptions::<Yarn>::from_json(&json!({ "queue": "mail" })).unwrap_err();
        assert!(matches!(err, DeferError::UnknownOption(ref key) if key == "queue"));
    }

    #[test]
    fn from_json_rejects_malformed_values() {
        let err = EnqueueOptions::<Yarn>::from_json(&json!({ "priority": "high" })).unwrap_err();
        assert!(matches!(err, DeferError::InvalidOption { ref key, .. } if key == "priority"));

        let err = EnqueueOptions::<Yarn>::from_json(&json!({ "run_at": "tomorrow" })).unwrap_err();
        assert!(matches!(err, DeferError::InvalidOption { ref key, .. } if key == "run_at"));
    }
}
