//! Built-in receivers.

use std::collections::HashSet;

use serde_json::Value;

use super::performable::{Class, Performable};
use crate::domain::{MethodError, TargetRef};

impl Performable for String {
    fn target(&self) -> TargetRef {
        TargetRef::value(Self::NAME, Value::String(self.clone()))
    }

    fn responds_to(&self, method: &str) -> bool {
        Self::has_method(method)
    }

    fn perform(&mut self, method: &str, args: &[Value]) -> Result<Value, MethodError> {
        match method {
            "count" => count(self, args),
            "length" => {
                MethodError::check_arity(method, 0, args.len())?;
                Ok(Value::from(self.chars().count()))
            }
            "upcase" => {
                MethodError::check_arity(method, 0, args.len())?;
                Ok(Value::String(self.to_uppercase()))
            }
            "reverse" => {
                MethodError::check_arity(method, 0, args.len())?;
                Ok(Value::String(self.chars().rev().collect()))
            }
            "to_s" => {
                MethodError::check_arity(method, 0, args.len())?;
                Ok(Value::String(self.clone()))
            }
            _ => Err(MethodError::no_method(Self::NAME, method)),
        }
    }
}

impl Class for String {
    const NAME: &'static str = "String";
    const METHODS: &'static [&'static str] = &["count", "length", "upcase", "reverse", "to_s"];
}

/// Counts characters that appear in every one of the given character sets.
fn count(s: &str, args: &[Value]) -> Result<Value, MethodError> {
    if args.is_empty() {
        return Err(MethodError::Arity {
            method: "count".to_string(),
            expected: 1,
            given: 0,
        });
    }

    let mut sets = Vec::with_capacity(args.len());
    for arg in args {
        let chars = arg.as_str().ok_or_else(|| MethodError::Argument {
            method: "count".to_string(),
            reason: format!("expected a string, got {arg}"),
        })?;
        sets.push(chars.chars().collect::<HashSet<char>>());
    }

    let n = s
        .chars()
        .filter(|c| sets.iter().all(|set| set.contains(c)))
        .count();
    Ok(Value::from(n))
}
