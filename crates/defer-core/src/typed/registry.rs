//! ObjectRegistry - TargetRef から receiver を復元する
//!
//! クラスごとに復元方法を登録する:
//! - `register`: クラス参照だけ（クラスメソッド用）
//! - `register_value`: serde で状態ごと復元
//! - `register_finder`: 永続化されたレコードを id で再読込

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::performable::{Class, ClassRef, Performable};
use crate::domain::{DeferError, TargetRef};
use crate::ports::ObjectLookup;

type ValueLoader = Arc<dyn Fn(&Value) -> Option<Box<dyn Performable>> + Send + Sync>;
type RecordFinder = Arc<dyn Fn(&str) -> Option<Box<dyn Performable>> + Send + Sync>;

struct ClassEntry {
    class_ref: fn() -> Box<dyn Performable>,
    from_value: Option<ValueLoader>,
    finder: Option<RecordFinder>,
}

fn class_ref<C: Class>() -> Box<dyn Performable> {
    Box::new(ClassRef::<C>::new())
}

/// Registry of receiver classes, used as the `ObjectLookup` for payloads.
///
/// Built during initialization, then shared read-only with workers.
#[derive(Default)]
pub struct ObjectRegistry {
    classes: HashMap<String, ClassEntry>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    /// A registry that already knows the built-in receivers (`String`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_value::<String>();
        registry
    }

    pub fn register<C: Class>(&mut self) -> &mut Self {
        self.entry::<C>();
        self
    }

    /// Rebuild `TargetRef::Value` targets of this class by deserializing them.
    pub fn register_value<C: Class + DeserializeOwned>(&mut self) -> &mut Self {
        let loader: ValueLoader = Arc::new(|value: &Value| {
            serde_json::from_value::<C>(value.clone())
                .ok()
                .map(|object| Box::new(object) as Box<dyn Performable>)
        });
        self.entry::<C>().from_value = Some(loader);
        self
    }

    /// Reload `TargetRef::Record` targets of this class through `finder`.
    pub fn register_finder<C: Class>(
        &mut self,
        finder: impl Fn(&str) -> Option<C> + Send + Sync + 'static,
    ) -> &mut Self {
        let finder: RecordFinder = Arc::new(move |id: &str| {
            finder(id).map(|object| Box::new(object) as Box<dyn Performable>)
        });
        self.entry::<C>().finder = Some(finder);
        self
    }

    pub fn registered_classes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.keys().cloned().collect();
        names.sort();
        names
    }

    fn entry<C: Class>(&mut self) -> &mut ClassEntry {
        self.classes
            .entry(C::NAME.to_string())
            .or_insert_with(|| ClassEntry {
                class_ref: class_ref::<C>,
                from_value: None,
                finder: None,
            })
    }
}

impl ObjectLookup for ObjectRegistry {
    fn resolve(&self, target: &TargetRef) -> Result<Box<dyn Performable>, DeferError> {
        let not_found = || DeferError::TargetNotFound(target.clone());
        let entry = self.classes.get(target.class_name()).ok_or_else(not_found)?;

        let resolved = match target {
            TargetRef::Class { .. } => Some((entry.class_ref)()),
            TargetRef::Value { value, .. } => entry.from_value.as_ref().and_then(|load| load(value)),
            TargetRef::Record { id, .. } => entry.finder.as_ref().and_then(|find| find(id)),
        };
        resolved.ok_or_else(not_found)
    }
}
