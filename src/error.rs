//! Error types for the runtime state core
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == State Error Enum ==
/// Unified error type for scopes, templates, builtins and the response cache.
///
/// Cache misses are not errors: lookups return `None` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// A `{{name}}` placeholder has no binding in either scope
    #[error("Unresolved variable '{name}'. Known variables: [{}]", .known_keys.join(", "))]
    UnresolvedVariable {
        name: String,
        known_keys: Vec<String>,
    },

    /// A `{{$ns.fn}}` placeholder names a namespace nobody registered
    #[error("Unknown builtin namespace '${namespace}'. Available: [{}]", .available.join(", "))]
    UnknownNamespace {
        namespace: String,
        available: Vec<String>,
    },

    /// A builtin handler rejected its path or arguments
    #[error("Invalid call to ${namespace}.{path}: {message}")]
    InvalidArgument {
        namespace: String,
        path: String,
        message: String,
    },

    /// Placeholder text could not be parsed
    #[error("Invalid placeholder: {0}")]
    InvalidPlaceholder(String),

    /// URL pattern for a cache query is not a valid regular expression
    #[error("Invalid URL pattern: {0}")]
    InvalidPattern(String),

    /// Construction-time option is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Snapshot value does not have the `{global, local}` shape
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl StateError {
    /// Shorthand used by builtin handlers.
    pub fn invalid_argument(
        namespace: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StateError::InvalidArgument {
            namespace: namespace.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the state core.
pub type Result<T> = std::result::Result<T, StateError>;
