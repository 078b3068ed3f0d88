//! Runtime State
//!
//! The scope store, resolver and response cache, constructed once and handed
//! to every consumer by reference or clone.

use tracing::{debug, info};

use crate::builtins::BuiltinRegistry;
use crate::cache::{cache_key, ResponseCache, ResponsePayload};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::scope::{Scope, ScopeStore};
use crate::template::TemplateResolver;
use crate::value::Value;

/// Shared runtime state for request chains.
///
/// Clones share the same stores.
#[derive(Debug, Clone)]
pub struct RuntimeState {
    /// Global and local variable bindings
    pub scopes: ScopeStore,
    /// Placeholder resolver reading `scopes`
    pub resolver: TemplateResolver,
    /// Executed responses
    pub cache: ResponseCache<ResponsePayload>,
}

impl RuntimeState {
    /// Creates state with an empty scope store, default builtins and a cache
    /// built from `config`.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_builtins(config, BuiltinRegistry::with_defaults())
    }

    pub fn with_builtins(config: CacheConfig, builtins: BuiltinRegistry) -> Result<Self> {
        let scopes = ScopeStore::new();
        let resolver = TemplateResolver::with_builtins(scopes.clone(), builtins);
        let cache = ResponseCache::new(config)?;
        Ok(Self {
            scopes,
            resolver,
            cache,
        })
    }

    /// Creates state with cache options loaded from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(CacheConfig::from_env()?)
    }

    pub fn resolve(&self, input: &str) -> Result<String> {
        self.resolver.resolve(input)
    }

    pub fn resolve_object(&self, value: &Value) -> Result<Value> {
        self.resolver.resolve_object(value)
    }

    /// Caches `response` under the key derived from its method and URL and
    /// returns that key.
    pub fn record_response(&self, response: ResponsePayload, ttl_override_ms: Option<u64>) -> String {
        let key = cache_key(&response.method, &response.url, None);
        self.cache.store(key.clone(), response, ttl_override_ms);
        key
    }

    /// Copies a value out of a cached response into a variable.
    ///
    /// `path` follows [`ResponsePayload::extract`]. Returns the captured
    /// value, or None if the response is gone or the path matches nothing.
    pub fn capture(&self, scope: Scope, variable: &str, key: &str, path: &str) -> Option<Value> {
        let value = self.cache.get(key)?.extract(path)?;
        debug!(variable, %scope, path, "Captured response value");
        self.scopes.set(scope, variable, value.clone());
        Some(value)
    }

    /// Ends a request chain: local bindings are dropped, globals and cached
    /// responses stay.
    pub fn reset_chain(&self) {
        self.scopes.clear_local();
    }

    /// Drops all bindings and cached responses.
    pub fn reset_all(&self) {
        self.scopes.clear_all();
        self.cache.clear();
        info!("Runtime state reset");
    }

    /// Stops background work. Call during shutdown.
    pub fn close(&self) {
        self.cache.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use serde_json::json;

    fn state() -> RuntimeState {
        RuntimeState::new(CacheConfig::default()).unwrap()
    }

    #[test]
    fn test_resolver_sees_scope_writes() {
        let state = state();
        state.scopes.set_global("baseUrl", "https://api.test");
        state.scopes.set_local("id", 7);

        assert_eq!(state.resolve("{{baseUrl}}/users/{{id}}").unwrap(), "https://api.test/users/7");
    }

    #[test]
    fn test_clones_share_stores() {
        let state = state();
        let other = state.clone();
        other.scopes.set_global("token", "abc");
        assert_eq!(state.resolve("{{token}}").unwrap(), "abc");
    }

    #[test]
    fn test_record_and_capture() {
        let state = state();
        let response = ResponsePayload::new("post", "https://api.test/login", 200)
            .with_header("X-Request-Id", "req-1")
            .with_body(json!({"token": "secret", "user": {"id": 42}}));

        let key = state.record_response(response, None);
        assert_eq!(key, cache_key("POST", "https://api.test/login", None));

        assert_eq!(state.capture(Scope::Global, "token", &key, "$.token"), Some(json!("secret")));
        assert_eq!(state.capture(Scope::Local, "userId", &key, "body.user.id"), Some(json!(42)));
        assert_eq!(state.capture(Scope::Local, "reqId", &key, "headers.x-request-id"), Some(json!("req-1")));

        assert_eq!(
            state.resolve("Bearer {{token}} / {{userId}} / {{reqId}}").unwrap(),
            "Bearer secret / 42 / req-1"
        );
    }

    #[test]
    fn test_capture_misses() {
        let state = state();
        assert_eq!(state.capture(Scope::Local, "x", "missing", "status"), None);

        let key = state.record_response(ResponsePayload::new("GET", "https://api.test", 204), None);
        assert_eq!(state.capture(Scope::Local, "x", &key, "$.nothing"), None);
        assert!(!state.scopes.has("x"));
    }

    #[test]
    fn test_reset_chain_keeps_globals() {
        let state = state();
        state.scopes.set_global("env", "staging");
        state.scopes.set_local("env", "override");
        state.record_response(ResponsePayload::new("GET", "https://api.test", 200), None);

        assert_eq!(state.resolve("{{env}}").unwrap(), "override");
        state.reset_chain();
        assert_eq!(state.resolve("{{env}}").unwrap(), "staging");
        assert_eq!(state.cache.len(), 1);
    }

    #[test]
    fn test_reset_all() {
        let state = state();
        state.scopes.set_global("env", "staging");
        state.record_response(ResponsePayload::new("GET", "https://api.test", 200), None);

        state.reset_all();

        assert!(state.scopes.is_empty());
        assert!(state.cache.is_empty());
        assert!(matches!(
            state.resolve("{{env}}"),
            Err(StateError::UnresolvedVariable { .. })
        ));
    }

    #[test]
    fn test_invalid_config() {
        let result = RuntimeState::new(CacheConfig::default().with_max_size(0));
        assert!(matches!(result, Err(StateError::InvalidConfiguration(_))));
    }
}
