//! Scope Module
//!
//! Two-namespace variable storage (global and local) with local-over-global shadowing.

mod snapshot;
mod store;

pub use snapshot::ScopeSnapshot;
pub use store::ScopeStore;

use std::fmt;

// == Scope ==
/// Namespace a variable lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Survives between request chains; cleared only by a full reset
    Global,
    /// Cleared between independent request chains
    Local,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Local => write!(f, "local"),
        }
    }
}
