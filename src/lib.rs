//! API State - runtime state for API test chains
//!
//! A two-scope variable store with `{{...}}` template resolution and builtin
//! value generators, paired with a bounded response cache supporting TTL
//! expiry, FIFO eviction and ad-hoc queries.
//!
//! # Example
//! ```
//! use api_state::{CacheConfig, ResponsePayload, RuntimeState, Scope};
//! use serde_json::json;
//!
//! let state = RuntimeState::new(CacheConfig::default()).unwrap();
//! state.scopes.set_global("baseUrl", "https://api.test");
//!
//! let login = ResponsePayload::new("POST", "https://api.test/login", 200)
//!     .with_body(json!({"token": "abc"}));
//! let key = state.record_response(login, None);
//! state.capture(Scope::Local, "token", &key, "$.token");
//!
//! assert_eq!(
//!     state.resolve("{{baseUrl}}/me?token={{token}}").unwrap(),
//!     "https://api.test/me?token=abc"
//! );
//! ```

pub mod builtins;
pub mod cache;
pub mod config;
pub mod error;
pub mod scope;
pub mod state;
pub mod tasks;
pub mod template;
pub mod value;

pub use builtins::{BuiltinFunction, BuiltinRegistry};
pub use cache::{
    cache_key, CacheEntry, CacheStats, CacheStore, CachedResponse, ResponseCache,
    ResponsePayload, UrlMatcher,
};
pub use config::CacheConfig;
pub use error::{Result, StateError};
pub use scope::{Scope, ScopeSnapshot, ScopeStore};
pub use state::RuntimeState;
pub use tasks::spawn_cleanup_task;
pub use template::TemplateResolver;
pub use value::Value;
