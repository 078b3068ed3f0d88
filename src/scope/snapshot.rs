//! Point-in-time copy of both scopes.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StateError};
use crate::value::Value;

// == Scope Snapshot ==
/// Owned copy of the `{global, local}` state.
///
/// Produced by `ScopeStore::export_snapshot` and consumed by
/// `ScopeStore::import_snapshot`. The template resolver also works against a
/// snapshot so concurrent writers never block a resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeSnapshot {
    #[serde(default)]
    pub global: HashMap<String, Value>,
    #[serde(default)]
    pub local: HashMap<String, Value>,
}

impl ScopeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local binding first, then global.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.local.get(key).or_else(|| self.global.get(key))
    }

    /// Sorted union of keys from both scopes.
    pub fn keys(&self) -> Vec<String> {
        self.global
            .keys()
            .chain(self.local.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.local.is_empty()
    }

    /// Converts to a JSON value of the form `{"global": {..}, "local": {..}}`.
    pub fn to_value(&self) -> Value {
        // HashMap<String, Value> always serializes
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Parses a JSON value of the form `{"global": {..}, "local": {..}}`.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(StateError::InvalidSnapshot(format!(
                "expected an object with 'global' and 'local' maps, got {}",
                value
            )));
        }
        serde_json::from_value(value).map_err(|e| StateError::InvalidSnapshot(e.to_string()))
    }
}
