//! Errors - エラー型と分類
//!
//! - `MethodError`: receiver のメソッド本体が返すエラー
//! - `DeferError`: 宣言・enqueue・invoke の各段階で呼び出し元に返すエラー

use thiserror::Error;

use super::target::TargetRef;

/// Error raised by a receiver's method body.
///
/// The core never wraps or retries these; they reach whoever triggered the
/// call (the direct caller, or the worker through `invoke`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MethodError {
    #[error("undefined method `{method}` for {class}")]
    NoMethod { class: String, method: String },

    #[error("wrong number of arguments for `{method}` (given {given}, expected {expected})")]
    Arity {
        method: String,
        expected: usize,
        given: usize,
    },

    #[error("invalid argument for `{method}`: {reason}")]
    Argument { method: String, reason: String },

    #[error("{0}")]
    Failed(String),
}

impl MethodError {
    pub fn no_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::NoMethod {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Checks the argument count before a method body touches `args`.
    pub fn check_arity(method: &str, expected: usize, given: usize) -> Result<(), Self> {
        if expected == given {
            return Ok(());
        }
        Err(Self::Arity {
            method: method.to_string(),
            expected,
            given,
        })
    }
}

#[derive(Debug, Error)]
pub enum DeferError {
    #[error("no such method `{method}` on {class}")]
    NoSuchMethod { class: String, method: String },

    #[error("unknown option `{0}` (expected `priority` or `run_at`)")]
    UnknownOption(String),

    #[error("invalid value for option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("`{class}#{method}` is already handled asynchronously")]
    AlreadyDeclared { class: String, method: String },

    #[error("target not found: {0}")]
    TargetNotFound(TargetRef),

    #[error(transparent)]
    Method(#[from] MethodError),

    #[error("job store: {0}")]
    Store(String),

    #[error("invalid settings: {0}")]
    Settings(String),
}
