//! Cache Statistics Module
//!
//! Size and memory figures for the live entries, plus hit/miss/eviction counters.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of live entries
    pub size: usize,
    /// Capacity bound
    pub max_size: usize,
    /// Sum of the live entries' size estimates, in bytes
    pub memory_usage_estimate: usize,
    /// Insertion time of the oldest live entry (Unix milliseconds)
    pub oldest_entry_timestamp: Option<u64>,
    /// Insertion time of the newest live entry (Unix milliseconds)
    pub newest_entry_timestamp: Option<u64>,
    /// Number of `get` calls that returned a payload
    pub hits: u64,
    /// Number of `get` calls that found nothing live
    pub misses: u64,
    /// Number of entries dropped to make room
    pub evictions: u64,
    /// Number of entries purged because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }
}
