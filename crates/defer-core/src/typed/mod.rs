//! Typed - receiver 側の型付き API
//!
//! - **Performable**: object-safe な receiver（payload の invoke 先）
//! - **Class**: 型ごとの静的情報（NAME, METHODS）
//! - **ObjectRegistry**: TargetRef から receiver を復元する ObjectLookup 実装

mod builtin;
pub mod performable;
pub mod registry;

pub use self::performable::{Class, ClassRef, Performable};
pub use self::registry::ObjectRegistry;
