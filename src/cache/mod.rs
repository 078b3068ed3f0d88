//! Cache Module
//!
//! Bounded response cache with TTL expiration, FIFO eviction and a small
//! query engine over live entries.

mod entry;
mod fifo;
mod key;
mod payload;
mod query;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use fifo::FifoTracker;
pub use key::cache_key;
pub use payload::{CachedResponse, ResponsePayload};
pub use query::UrlMatcher;
pub use shared::ResponseCache;
pub use stats::CacheStats;
pub use store::CacheStore;
