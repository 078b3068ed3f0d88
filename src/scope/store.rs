//! Scope Store Module
//!
//! Shared handle over the global and local variable maps.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{Scope, ScopeSnapshot};
use crate::value::Value;

// == Scope Store ==
/// Thread-safe two-scope variable store.
///
/// Cloning is cheap and every clone shares the same state. All writes go
/// through a single mutex; reads copy what they need and release it.
#[derive(Debug, Clone, Default)]
pub struct ScopeStore {
    inner: Arc<Mutex<ScopeSnapshot>>,
}

impl ScopeStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Writes ==
    pub fn set_global(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.set(Scope::Global, key, value);
    }

    pub fn set_local(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.set(Scope::Local, key, value);
    }

    /// Writes into `scope`, silently overwriting any previous binding.
    pub fn set(&self, scope: Scope, key: impl Into<String>, value: impl Into<Value>) {
        let mut guard = self.inner.lock();
        scope_map(&mut guard, scope).insert(key.into(), value.into());
    }

    pub fn set_global_batch<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.set_batch(Scope::Global, entries);
    }

    pub fn set_local_batch<I, K, V>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.set_batch(Scope::Local, entries);
    }

    /// Writes every pair under one lock acquisition.
    pub fn set_batch<I, K, V>(&self, scope: Scope, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut guard = self.inner.lock();
        let map = scope_map(&mut guard, scope);
        for (key, value) in entries {
            map.insert(key.into(), value.into());
        }
    }

    /// Removes a binding from one scope, returning its value.
    pub fn remove(&self, scope: Scope, key: &str) -> Option<Value> {
        scope_map(&mut self.inner.lock(), scope).remove(key)
    }

    pub fn remove_global(&self, key: &str) -> Option<Value> {
        self.remove(Scope::Global, key)
    }

    pub fn remove_local(&self, key: &str) -> Option<Value> {
        self.remove(Scope::Local, key)
    }

    // == Reads ==
    /// Looks up `key` in the local scope, then the global scope.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up `key` in one scope only, ignoring shadowing.
    pub fn get_in(&self, scope: Scope, key: &str) -> Option<Value> {
        let guard = self.inner.lock();
        match scope {
            Scope::Global => guard.global.get(key).cloned(),
            Scope::Local => guard.local.get(key).cloned(),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.inner.lock().get(key).is_some()
    }

    /// Copy of the global bindings. Mutating it does not touch the store.
    pub fn get_all_global(&self) -> HashMap<String, Value> {
        self.inner.lock().global.clone()
    }

    /// Copy of the local bindings. Mutating it does not touch the store.
    pub fn get_all_local(&self) -> HashMap<String, Value> {
        self.inner.lock().local.clone()
    }

    /// Sorted union of keys across both scopes.
    pub fn get_keys(&self) -> Vec<String> {
        self.inner.lock().keys()
    }

    /// Number of distinct visible keys.
    pub fn len(&self) -> usize {
        self.get_keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    // == Clearing ==
    pub fn clear_global(&self) {
        let mut guard = self.inner.lock();
        debug!(count = guard.global.len(), "Clearing global scope");
        guard.global.clear();
    }

    pub fn clear_local(&self) {
        let mut guard = self.inner.lock();
        debug!(count = guard.local.len(), "Clearing local scope");
        guard.local.clear();
    }

    pub fn clear_all(&self) {
        let mut guard = self.inner.lock();
        debug!(
            global = guard.global.len(),
            local = guard.local.len(),
            "Clearing all scopes"
        );
        guard.global.clear();
        guard.local.clear();
    }

    // == Snapshots ==
    /// Full copy of both scopes.
    pub fn export_snapshot(&self) -> ScopeSnapshot {
        self.inner.lock().clone()
    }

    /// Replaces the whole state with `snapshot`. Nothing is merged.
    pub fn import_snapshot(&self, snapshot: ScopeSnapshot) {
        debug!(
            global = snapshot.global.len(),
            local = snapshot.local.len(),
            "Importing scope snapshot"
        );
        *self.inner.lock() = snapshot;
    }

    /// Like [`import_snapshot`](Self::import_snapshot), from an untyped JSON value.
    pub fn import_snapshot_value(&self, value: Value) -> crate::Result<()> {
        let snapshot = ScopeSnapshot::from_value(value)?;
        self.import_snapshot(snapshot);
        Ok(())
    }
}

fn scope_map(state: &mut ScopeSnapshot, scope: Scope) -> &mut HashMap<String, Value> {
    match scope {
        Scope::Global => &mut state.global,
        Scope::Local => &mut state.local,
    }
}
