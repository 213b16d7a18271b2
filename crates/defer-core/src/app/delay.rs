//! Delay - 宣言なしで 1 回の呼び出しを遅延実行する
//!
//! ```ignore
//! let job = enqueuer.delay(&mut hello).call("count", vec![json!("l")]).await?;
//! let job = enqueuer.delay_class::<FairyTail>().priority(20).call("to_s", vec![]).await?;
//! ```

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::enqueuer::{Enqueuer, Invocation};
use crate::domain::{DeferError, EnqueueOptions, PerformableMethod};
use crate::typed::Performable;

enum Slot<'a, P> {
    Borrowed(&'a mut P),
    Owned(P),
}

impl<P> Slot<'_, P> {
    fn get(&self) -> &P {
        match self {
            Self::Borrowed(p) => p,
            Self::Owned(p) => p,
        }
    }

    fn get_mut(&mut self) -> &mut P {
        match self {
            Self::Borrowed(p) => p,
            Self::Owned(p) => p,
        }
    }
}

/// A delayed proxy bound to one receiver and one set of options.
///
/// Each `call` either runs the method right away (deferral disabled) or
/// records it as a job. The method itself is the "without delay" entry point;
/// nothing is renamed.
pub struct Delay<'a, P: Performable> {
    enqueuer: Enqueuer,
    receiver: Slot<'a, P>,
    options: EnqueueOptions<P>,
}

impl<'a, P: Performable> Delay<'a, P> {
    pub(crate) fn new(enqueuer: Enqueuer, receiver: &'a mut P) -> Self {
        Self {
            enqueuer,
            receiver: Slot::Borrowed(receiver),
            options: EnqueueOptions::new(),
        }
    }

    pub(crate) fn owned(enqueuer: Enqueuer, receiver: P) -> Self {
        Self {
            enqueuer,
            receiver: Slot::Owned(receiver),
            options: EnqueueOptions::new(),
        }
    }

    pub fn options(mut self, options: EnqueueOptions<P>) -> Self {
        self.options = options;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.options = self.options.priority(priority);
        self
    }

    pub fn priority_with(mut self, f: impl Fn(&P) -> i32 + Send + Sync + 'static) -> Self {
        self.options = self.options.priority_with(f);
        self
    }

    pub fn priority_from_args(
        mut self,
        f: impl Fn(&[Value]) -> i32 + Send + Sync + 'static,
    ) -> Self {
        self.options = self.options.priority_from_args(f);
        self
    }

    pub fn run_at(mut self, run_at: DateTime<Utc>) -> Self {
        self.options = self.options.run_at(run_at);
        self
    }

    pub fn run_at_with(
        mut self,
        f: impl Fn(&P) -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.options = self.options.run_at_with(f);
        self
    }

    pub fn run_at_from_args(
        mut self,
        f: impl Fn(&[Value]) -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.options = self.options.run_at_from_args(f);
        self
    }

    pub fn receiver(&self) -> &P {
        self.receiver.get()
    }

    /// Send `method(args)` through the proxy.
    ///
    /// With deferral disabled, the method's own errors come back as
    /// `DeferError::Method`. Otherwise an unknown method fails with
    /// `DeferError::NoSuchMethod` before anything is written.
    pub async fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Invocation, DeferError> {
        if !self.enqueuer.config().delay_jobs() {
            let receiver = self.receiver.get_mut();
            debug!(target_ref = %receiver.target(), method, "delay_jobs disabled, running directly");
            let value = receiver.perform(method, &args)?;
            return Ok(Invocation::Direct(value));
        }

        let receiver = self.receiver.get();
        let payload = PerformableMethod::new(receiver, method, args)?;
        let job = self
            .enqueuer
            .enqueue(receiver, payload, &self.options)
            .await?;
        Ok(Invocation::Deferred(job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DeferBuilder;
    use crate::domain::{MethodError, TargetRef};
    use crate::ports::JobStore;
    use crate::ports::FixedClock;
    use crate::typed::Class;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct FairyTail {
        happy_ending: Option<bool>,
    }

    impl Performable for FairyTail {
        fn target(&self) -> TargetRef {
            TargetRef::value(Self::NAME, json!({ "happy_ending": self.happy_ending }))
        }

        fn responds_to(&self, method: &str) -> bool {
            Self::has_method(method)
        }

        fn perform(&mut self, method: &str, args: &[Value]) -> Result<Value, MethodError> {
            match method {
                "tell" => {
                    MethodError::check_arity(method, 0, args.len())?;
                    self.happy_ending = Some(true);
                    Ok(json!(true))
                }
                _ => Err(MethodError::no_method(Self::NAME, method)),
            }
        }
    }

    impl Class for FairyTail {
        const NAME: &'static str = "FairyTail";
        const METHODS: &'static [&'static str] = &["tell"];
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2010, 5, 3, 0, 55, 0).unwrap()
    }

    fn enqueuer() -> Enqueuer {
        DeferBuilder::new()
            .clock(Arc::new(FixedClock::new(now())))
            .build()
    }

    #[tokio::test]
    async fn deferred_call_does_not_touch_the_receiver() {
        let enqueuer = enqueuer();
        let mut tale = FairyTail::default();

        let invocation = enqueuer.delay(&mut tale).call("tell", vec![]).await.unwrap();

        assert!(invocation.is_deferred());
        assert_eq!(tale.happy_ending, None);
        assert_eq!(enqueuer.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn disabled_deferral_runs_the_method_immediately() {
        let enqueuer = enqueuer();
        enqueuer.config().set_delay_jobs(false);
        let mut tale = FairyTail::default();

        let invocation = enqueuer.delay(&mut tale).call("tell", vec![]).await.unwrap();

        assert_eq!(invocation, Invocation::Direct(json!(true)));
        assert_eq!(tale.happy_ending, Some(true));
        assert_eq!(enqueuer.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn one_proxy_can_send_several_calls() {
        let enqueuer = enqueuer();
        let mut hello = String::from("hello");
        let mut proxy = enqueuer.delay(&mut hello).priority(3);

        proxy.call("upcase", vec![]).await.unwrap();
        proxy.call("count", vec![json!("l")]).await.unwrap();

        assert_eq!(enqueuer.store().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_method_creates_no_job() {
        let enqueuer = enqueuer();
        let mut tale = FairyTail::default();

        let err = enqueuer
            .delay(&mut tale)
            .call("vanish", vec![])
            .await
            .unwrap_err();

        assert!(matches!(err, DeferError::NoSuchMethod { .. }));
        assert_eq!(enqueuer.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn alias_lookalike_names_fail_the_same_either_way() {
        let enqueuer = enqueuer();
        let mut hello = String::from("hello");

        let err = enqueuer
            .delay(&mut hello)
            .call("upcase_without_delay", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, DeferError::NoSuchMethod { ref method, .. } if method == "upcase_without_delay"));
        assert_eq!(enqueuer.store().count().await.unwrap(), 0);

        enqueuer.config().set_delay_jobs(false);
        let err = enqueuer
            .delay(&mut hello)
            .call("upcase_without_delay", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, DeferError::Method(MethodError::NoMethod { .. })));
        assert_eq!(hello, "hello");
    }

    #[tokio::test]
    async fn run_at_can_follow_the_receiver() {
        let enqueuer = enqueuer();
        let mut tale = FairyTail::default();

        let job = enqueuer
            .delay(&mut tale)
            .run_at_with(|t| match t.happy_ending {
                Some(_) => now(),
                None => now() + chrono::Duration::days(1),
            })
            .call("tell", vec![])
            .await
            .unwrap()
            .into_job()
            .unwrap();

        assert_eq!(job.run_at, now() + chrono::Duration::days(1));
    }
}
