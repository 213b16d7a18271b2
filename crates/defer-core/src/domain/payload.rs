//! PerformableMethod: a captured `(target, method, args)` call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::DeferError;
use super::method;
use super::target::TargetRef;
use crate::ports::ObjectLookup;
use crate::typed::Performable;

/// An immutable capture of a method call, re-invoked later by a worker.
///
/// Equality compares target, method name, body and arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformableMethod {
    target: TargetRef,
    method_name: String,
    /// Method actually run on invoke, when it differs from `method_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<String>,
    args: Vec<Value>,
}

impl PerformableMethod {
    /// Capture a call on `receiver`.
    ///
    /// Only the method name is validated here; argument count and types are
    /// checked by the method body when the payload is invoked.
    pub fn new(
        receiver: &dyn Performable,
        method_name: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<Self, DeferError> {
        let method_name = method_name.into();
        let target = checked_target(receiver, &method_name)?;
        Ok(Self {
            target,
            method_name,
            body: None,
            args,
        })
    }

    /// Capture a call to a declared method under its `_without_delay` alias.
    ///
    /// `method_name` records the alias (`tell_without_delay!`); invoking runs
    /// `body` (`tell!`) on the receiver.
    pub fn aliased(
        receiver: &dyn Performable,
        body: impl Into<String>,
        args: Vec<Value>,
    ) -> Result<Self, DeferError> {
        let body = body.into();
        let target = checked_target(receiver, &body)?;
        Ok(Self {
            target,
            method_name: method::without_delay(&body),
            body: Some(body),
            args,
        })
    }

    /// Rebuild a payload read back from a store.
    pub fn from_parts(target: TargetRef, method_name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            target,
            method_name: method_name.into(),
            body: None,
            args,
        }
    }

    /// Name of the method run on invoke.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or(&self.method_name)
    }

    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// `Story#tell_without_delay!` for instances, `FairyTail.to_s` for classes.
    pub fn display_name(&self) -> String {
        let class = self.target.class_name();
        if self.target.is_class() {
            format!("{class}.{}", self.method_name)
        } else {
            format!("{class}#{}", self.method_name)
        }
    }

    /// Resolve the target again and run the captured call against it.
    ///
    /// Lookup failures surface as `TargetNotFound`; errors from the method
    /// body come back as `DeferError::Method` without modification.
    pub fn invoke(&self, lookup: &dyn ObjectLookup) -> Result<Value, DeferError> {
        let mut receiver = lookup.resolve(&self.target)?;
        Ok(receiver.perform(self.body(), &self.args)?)
    }
}

fn checked_target(receiver: &dyn Performable, method: &str) -> Result<TargetRef, DeferError> {
    let target = receiver.target();
    if !receiver.responds_to(method) {
        return Err(DeferError::NoSuchMethod {
            class: target.class_name().to_string(),
            method: method.to_string(),
        });
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MethodError;
    use crate::typed::ObjectRegistry;
    use serde_json::json;

    #[test]
    fn captures_target_method_and_args() {
        let receiver = String::from("hello");
        let payload = PerformableMethod::new(&receiver, "count", vec![json!("l")]).unwrap();

        assert_eq!(payload.target(), &TargetRef::value("String", json!("hello")));
        assert_eq!(payload.method_name(), "count");
        assert_eq!(payload.args(), &[json!("l")]);
        assert_eq!(payload.display_name(), "String#count");
    }

    #[test]
    fn unknown_method_is_rejected_at_construction() {
        let receiver = String::from("hello");
        let err = PerformableMethod::new(&receiver, "explode", vec![]).unwrap_err();

        assert!(matches!(
            err,
            DeferError::NoSuchMethod { ref class, ref method } if class == "String" && method == "explode"
        ));
    }

    #[test]
    fn arity_is_only_checked_on_invoke() {
        let receiver = String::from("hello");
        let payload = PerformableMethod::new(&receiver, "upcase", vec![json!(1)]).unwrap();

        let registry = ObjectRegistry::with_builtins();
        let err = payload.invoke(&registry).unwrap_err();
        assert!(matches!(err, DeferError::Method(MethodError::Arity { .. })));
    }

    #[test]
    fn invoke_resolves_the_target_and_returns_the_result() {
        let receiver = String::from("hello");
        let payload = PerformableMethod::new(&receiver, "count", vec![json!("l")]).unwrap();

        let registry = ObjectRegistry::with_builtins();
        assert_eq!(payload.invoke(&registry).unwrap(), json!(2));
    }

    #[test]
    fn invoke_fails_when_the_target_cannot_be_resolved() {
        let payload = PerformableMethod::from_parts(TargetRef::record("Ghost", "1"), "haunt", vec![]);

        let registry = ObjectRegistry::new();
        let err = payload.invoke(&registry).unwrap_err();
        assert!(matches!(err, DeferError::TargetNotFound(_)));
    }

    #[test]
    fn alias_lookalike_names_are_taken_literally() {
        let receiver = String::from("hello");
        let err = PerformableMethod::new(&receiver, "upcase_without_delay", vec![]).unwrap_err();

        assert!(matches!(
            err,
            DeferError::NoSuchMethod { ref method, .. } if method == "upcase_without_delay"
        ));
    }

    #[test]
    fn aliased_payload_records_the_alias_and_runs_the_body() {
        let receiver = String::from("hello");
        let payload = PerformableMethod::aliased(&receiver, "upcase", vec![]).unwrap();

        assert_eq!(payload.method_name(), "upcase_without_delay");
        assert_eq!(payload.body(), "upcase");
        assert_eq!(payload.display_name(), "String#upcase_without_delay");

        let registry = ObjectRegistry::with_builtins();
        assert_eq!(payload.invoke(&registry).unwrap(), json!("HELLO"));
    }

    #[test]
    fn body_survives_a_json_round_trip() {
        let receiver = String::from("hello");
        let payload = PerformableMethod::aliased(&receiver, "reverse", vec![]).unwrap();

        let stored = serde_json::to_value(&payload).unwrap();
        assert_eq!(stored["body"], json!("reverse"));

        let plain = PerformableMethod::new(&receiver, "reverse", vec![]).unwrap();
        assert!(serde_json::to_value(&plain).unwrap().get("body").is_none());

        let loaded: PerformableMethod = serde_json::from_value(stored).unwrap();
        assert_eq!(loaded, payload);
    }

    #[test]
    fn equality_is_structural() {
        let a = PerformableMethod::from_parts(TargetRef::class("FairyTail"), "to_s", vec![]);
        let b = PerformableMethod::from_parts(TargetRef::class("FairyTail"), "to_s", vec![]);
        let c = PerformableMethod::from_parts(TargetRef::class("FairyTail"), "name", vec![]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
