//! Interceptor - `handle_asynchronously` 相当
//!
//! 宣言したメソッドには 2 つの入口ができる:
//! - `tell!` / `tell_with_delay!`: payload を作って enqueue する wrapper
//! - `tell_without_delay!`: 元の本体を同期実行
//!
//! 実行時にメソッドを差し替える代わりに、`call` が名前を見て振り分ける。

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::enqueuer::{Enqueuer, Invocation};
use crate::domain::method::{self, MethodAlias, Variant};
use crate::domain::{DeferError, EnqueueOptions, PerformableMethod};
use crate::typed::Class;

/// Per-class set of methods whose calls are turned into jobs.
///
/// Declarations are made once, during initialization, then the interceptor is
/// used read-only.
pub struct Interceptor<C: Class> {
    enqueuer: Enqueuer,
    declarations: HashMap<String, EnqueueOptions<C>>,
}

impl<C: Class> Interceptor<C> {
    pub fn new(enqueuer: Enqueuer) -> Self {
        Self {
            enqueuer,
            declarations: HashMap::new(),
        }
    }

    /// Declare that calls to `method` should be deferred.
    ///
    /// Fails with `NoSuchMethod` when `C` has no such instance method, and
    /// with `AlreadyDeclared` when the method was declared before.
    pub fn handle_asynchronously(
        &mut self,
        method: &str,
        options: EnqueueOptions<C>,
    ) -> Result<&mut Self, DeferError> {
        if !C::has_method(method) {
            return Err(DeferError::NoSuchMethod {
                class: C::NAME.to_string(),
                method: method.to_string(),
            });
        }
        if self.declarations.contains_key(method) {
            return Err(DeferError::AlreadyDeclared {
                class: C::NAME.to_string(),
                method: method.to_string(),
            });
        }
        debug!(class = C::NAME, method, "handle asynchronously");
        self.declarations.insert(method.to_string(), options);
        Ok(self)
    }

    /// Same as `handle_asynchronously`, with literal options given as a JSON
    /// object. Unrecognized keys fail with `UnknownOption`.
    pub fn handle_asynchronously_json(
        &mut self,
        method: &str,
        options: &Value,
    ) -> Result<&mut Self, DeferError> {
        let options = EnqueueOptions::from_json(options)?;
        self.handle_asynchronously(method, options)
    }

    pub fn is_declared(&self, method: &str) -> bool {
        self.declarations.contains_key(method)
    }

    /// Whether `name` is a valid entry point, aliases included.
    pub fn responds_to(&self, name: &str) -> bool {
        if C::has_method(name) {
            return true;
        }
        let alias = MethodAlias::parse(name);
        alias.variant() != Variant::Plain && self.is_declared(alias.base())
    }

    /// Call `name` on `receiver`, routing declared methods through deferral.
    ///
    /// A declared name is matched exactly first; alias suffixes are only
    /// interpreted for names that are not themselves declared. Undeclared
    /// methods and `*_without_delay` names run synchronously.
    pub async fn call(
        &self,
        receiver: &mut C,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Invocation, DeferError> {
        if let Some(options) = self.declarations.get(name) {
            return self.defer(receiver, name, args, options).await;
        }
        let alias = MethodAlias::parse(name);
        match (self.declarations.get(alias.base()), alias.variant()) {
            (Some(options), Variant::Plain | Variant::WithDelay) => {
                self.defer(receiver, alias.base(), args, options).await
            }
            (Some(_), Variant::WithoutDelay) => {
                let value = self.call_without_delay(receiver, alias.base(), &args)?;
                Ok(Invocation::Direct(value))
            }
            (None, _) => Ok(Invocation::Direct(receiver.perform(name, &args)?)),
        }
    }

    /// The wrapper installed for a declared method.
    pub async fn call_with_delay(
        &self,
        receiver: &mut C,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Invocation, DeferError> {
        let options = self
            .declarations
            .get(method)
            .ok_or_else(|| DeferError::NoSuchMethod {
                class: C::NAME.to_string(),
                method: method::with_delay(method),
            })?;
        self.defer(receiver, method, args, options).await
    }

    /// The original body of `method`, always synchronous.
    pub fn call_without_delay(
        &self,
        receiver: &mut C,
        method: &str,
        args: &[Value],
    ) -> Result<Value, DeferError> {
        Ok(receiver.perform(method, args)?)
    }

    async fn defer(
        &self,
        receiver: &mut C,
        method: &str,
        args: Vec<Value>,
        options: &EnqueueOptions<C>,
    ) -> Result<Invocation, DeferError> {
        if !self.enqueuer.config().delay_jobs() {
            debug!(class = C::NAME, method, "delay_jobs disabled, running directly");
            let value = self.call_without_delay(receiver, method, &args)?;
            return Ok(Invocation::Direct(value));
        }

        let payload = PerformableMethod::aliased(&*receiver, method, args)?;
        let job = self.enqueuer.enqueue(&*receiver, payload, options).await?;
        Ok(Invocation::Deferred(job))
    }
}
