//! Builtin Function Module
//!
//! Pluggable `$namespace.path(args)` functions usable inside placeholders.
//!
//! # Default namespaces
//! - `$random` - UUIDs, random strings, integers and picks
//! - `$date` - current time in several formats, with offsets
//! - `$math` - arithmetic and random numbers
//! - `$string` - casing and encoding helpers
//! - `$env` - process environment variables
//! - `$faker` - fake personal and company data

mod args;
mod clock;
mod env;
mod faker;
mod math;
mod random;
mod string;

pub use args::{parse_call, split_args};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StateError};

// == Builtin Function Trait ==
/// A handler for one namespace.
///
/// `path` is everything between the namespace and the argument list, so
/// `{{$random.int(1, 6)}}` calls the `random` handler with path `int` and
/// arguments `["1", "6"]`.
pub trait BuiltinFunction: Send + Sync {
    fn call(&self, path: &str, args: &[String]) -> Result<String>;
}

impl<F> BuiltinFunction for F
where
    F: Fn(&str, &[String]) -> Result<String> + Send + Sync,
{
    fn call(&self, path: &str, args: &[String]) -> Result<String> {
        self(path, args)
    }
}

// == Builtin Registry ==
/// Table of namespace handlers.
#[derive(Clone, Default)]
pub struct BuiltinRegistry {
    handlers: HashMap<String, Arc<dyn BuiltinFunction>>,
}

impl BuiltinRegistry {
    /// Creates a registry with no namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every default namespace registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(random::NAMESPACE, random::call);
        registry.register(clock::NAMESPACE, clock::call);
        registry.register(math::NAMESPACE, math::call);
        registry.register(string::NAMESPACE, string::call);
        registry.register(env::NAMESPACE, env::call);
        registry.register(faker::NAMESPACE, faker::call);
        registry
    }

    /// Adds or replaces the handler for `namespace`.
    pub fn register(
        &mut self,
        namespace: impl Into<String>,
        handler: impl BuiltinFunction + 'static,
    ) {
        self.handlers.insert(namespace.into(), Arc::new(handler));
    }

    /// Removes a namespace, returning whether it was registered.
    pub fn unregister(&mut self, namespace: &str) -> bool {
        self.handlers.remove(namespace).is_some()
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.handlers.contains_key(namespace)
    }

    /// Registered namespace names, sorted.
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Dispatches a call to the handler registered for `namespace`.
    pub fn resolve(&self, namespace: &str, path: &str, args: &[String]) -> Result<String> {
        let handler = self
            .handlers
            .get(namespace)
            .ok_or_else(|| StateError::UnknownNamespace {
                namespace: namespace.to_string(),
                available: self.namespaces(),
            })?;
        handler.call(path, args)
    }
}

impl fmt::Debug for BuiltinRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinRegistry")
            .field("namespaces", &self.namespaces())
            .finish()
    }
}

/// Error for a path a namespace does not implement.
pub(crate) fn unknown_function(namespace: &str, path: &str) -> StateError {
    StateError::invalid_argument(
        namespace,
        path,
        format!("no function '{}' in ${}", path, namespace),
    )
}
