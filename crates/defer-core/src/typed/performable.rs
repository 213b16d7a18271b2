//! Performable / Class - receiver の抽象化
//!
//! # 二層構造
//! - **Performable**: object-safe。payload の invoke と delay で使う
//! - **Class**: 型ごとの静的情報（クラス名、メソッド一覧、クラスメソッド）
//!
//! 実行時にメソッドを差し替える代わりに、`perform(method, args)` という
//! 1 つの入口でメソッド本体へ dispatch する。

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::domain::{MethodError, TargetRef};

/// Something a call can be captured on and later performed against.
pub trait Performable: Send + Sync {
    /// How to find this receiver again at invoke time.
    fn target(&self) -> TargetRef;

    fn responds_to(&self, method: &str) -> bool;

    /// Run the method body named `method`.
    fn perform(&mut self, method: &str, args: &[Value]) -> Result<Value, MethodError>;
}

/// Static description of a receiver type.
///
/// # 使用例
/// ```ignore
/// impl Class for Story {
///     const NAME: &'static str = "Story";
///     const METHODS: &'static [&'static str] = &["tell!"];
/// }
/// ```
pub trait Class: Performable + Sized + 'static {
    const NAME: &'static str;

    /// Instance methods, as accepted by `Performable::perform`.
    const METHODS: &'static [&'static str];

    const CLASS_METHODS: &'static [&'static str] = &[];

    fn perform_class(method: &str, _args: &[Value]) -> Result<Value, MethodError> {
        Err(MethodError::no_method(Self::NAME, method))
    }

    fn has_method(method: &str) -> bool {
        Self::METHODS.contains(&method)
    }
}

/// Methods every class reference answers.
const BUILTIN_CLASS_METHODS: &[&str] = &["to_s", "name"];

/// A class used as a receiver (class-level calls carry no instance state).
pub struct ClassRef<C: Class> {
    _marker: PhantomData<fn() -> C>,
}

impl<C: Class> ClassRef<C> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<C: Class> Default for ClassRef<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Class> Clone for ClassRef<C> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<C: Class> fmt::Debug for ClassRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", C::NAME)
    }
}

impl<C: Class> Performable for ClassRef<C> {
    fn target(&self) -> TargetRef {
        TargetRef::class(C::NAME)
    }

    fn responds_to(&self, method: &str) -> bool {
        BUILTIN_CLASS_METHODS.contains(&method) || C::CLASS_METHODS.contains(&method)
    }

    fn perform(&mut self, method: &str, args: &[Value]) -> Result<Value, MethodError> {
        if C::CLASS_METHODS.contains(&method) {
            return C::perform_class(method, args);
        }
        match method {
            "to_s" | "name" => {
                MethodError::check_arity(method, 0, args.len())?;
                Ok(Value::String(C::NAME.to_string()))
            }
            _ => Err(MethodError::no_method(C::NAME, method)),
        }
    }
}
