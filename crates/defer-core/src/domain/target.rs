//! Target references: how a payload finds its receiver again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A serializable reference to the receiver of a deferred call.
///
/// The payload never holds the live receiver. At invoke time the reference is
/// handed to an `ObjectLookup`, which rebuilds (or reloads) the object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetRef {
    /// The class itself (class-level call, no instance state).
    Class { class: String },

    /// A persisted entity, reloaded by id.
    Record { class: String, id: String },

    /// A self-contained object whose whole state travels with the job.
    Value {
        class: String,
        value: serde_json::Value,
    },
}

impl TargetRef {
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class { class: name.into() }
    }

    pub fn record(class: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Record {
            class: class.into(),
            id: id.into(),
        }
    }

    pub fn value(class: impl Into<String>, value: serde_json::Value) -> Self {
        Self::Value {
            class: class.into(),
            value,
        }
    }

    pub fn class_name(&self) -> &str {
        match self {
            Self::Class { class } | Self::Record { class, .. } | Self::Value { class, .. } => class,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Self::Class { .. })
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class { class } => write!(f, "{class}"),
            Self::Record { class, id } => write!(f, "{class}[{id}]"),
            Self::Value { class, value } => write!(f, "{class}({value})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_names_the_class() {
        assert_eq!(TargetRef::class("FairyTail").to_string(), "FairyTail");
        assert_eq!(TargetRef::record("Story", "42").to_string(), "Story[42]");
        assert_eq!(
            TargetRef::value("String", json!("hello")).to_string(),
            "String(\"hello\")"
        );
    }

    #[test]
    fn serialized_form_is_tagged() {
        let target = TargetRef::record("Story", "42");
        let v = serde_json::to_value(&target).expect("serialize");
        assert_eq!(v, json!({ "kind": "record", "class": "Story", "id": "42" }));
    }
}
