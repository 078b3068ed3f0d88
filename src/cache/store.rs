//! Cache Store Module
//!
//! Cache engine combining HashMap storage with insertion-order tracking and
//! TTL expiration. Every time-dependent method takes `now` in Unix
//! milliseconds; the shared handle in `shared.rs` supplies the wall clock.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, CachedResponse, FifoTracker};
use crate::config::CacheConfig;

// == Cache Store ==
/// Cache storage with FIFO eviction and TTL support.
///
/// Not synchronized; wrap it in a lock to share it.
#[derive(Debug)]
pub struct CacheStore<P> {
    /// Key -> entry storage
    entries: HashMap<String, CacheEntry<P>>,
    /// Insertion-order index
    order: FifoTracker,
    /// Hit/miss/eviction counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL for entries stored without an override, None = never expire
    default_ttl_ms: Option<u64>,
}

impl<P> CacheStore<P> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries the cache can hold
    /// * `default_ttl_ms` - TTL for entries stored without an explicit one
    pub fn new(max_size: usize, default_ttl_ms: Option<u64>) -> Self {
        Self {
            entries: HashMap::new(),
            order: FifoTracker::new(),
            stats: CacheStats::new(),
            max_size,
            default_ttl_ms,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, config.default_ttl_ms)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl_ms(&self) -> Option<u64> {
        self.default_ttl_ms
    }

    // == Get Entry ==
    /// Returns the live entry for `key`.
    ///
    /// An expired entry is purged on the spot and reported as absent.
    pub fn get_entry(&mut self, key: &str, now: u64) -> Option<&CacheEntry<P>> {
        if self.entries.get(key)?.is_expired_at(now) {
            self.purge(key);
            self.stats.record_expirations(1);
            debug!("Cache entry '{}' expired on access", key);
            return None;
        }
        self.entries.get(key)
    }

    // == Contains ==
    /// Liveness check with the same expiry semantics as `get`, without
    /// touching hit/miss counters.
    pub fn contains(&mut self, key: &str, now: u64) -> bool {
        self.get_entry(key, now).is_some()
    }

    // == Get ==
    /// Retrieves a payload by key.
    ///
    /// Returns the payload if found and not expired. Expired entries are
    /// removed and counted as misses.
    pub fn get(&mut self, key: &str, now: u64) -> Option<&P> {
        if self.contains(key, now) {
            self.stats.record_hit();
            self.entries.get(key).map(|entry| &entry.payload)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Remove ==
    /// Removes an entry by key.
    ///
    /// Returns true only when a live entry was removed; an expired one is
    /// purged but reported as absent.
    pub fn remove(&mut self, key: &str, now: u64) -> bool {
        match self.purge(key) {
            Some(entry) if entry.is_expired_at(now) => {
                self.stats.record_expirations(1);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.order.clear();
        debug!("Cache cleared ({} entries)", count);
    }

    // == Prune Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn prune_expired(&mut self, now: u64) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.purge(&key);
        }

        if count > 0 {
            self.stats.record_expirations(count);
            debug!("Pruned {} expired cache entries", count);
        }
        count
    }

    // == Keys ==
    /// Live keys, oldest insertion first.
    pub fn keys(&mut self, now: u64) -> Vec<String> {
        self.prune_expired(now);
        self.order.iter().cloned().collect()
    }

    // == Time To Live ==
    /// Remaining TTL of a live entry in milliseconds.
    ///
    /// Returns None when the key is absent or the entry never expires.
    pub fn ttl_remaining(&mut self, key: &str, now: u64) -> Option<u64> {
        self.get_entry(key, now)?.ttl_remaining_ms(now)
    }

    // == Stats ==
    /// Returns current cache statistics, computed over live entries.
    pub fn stats(&mut self, now: u64) -> CacheStats {
        self.prune_expired(now);

        let mut stats = self.stats.clone();
        stats.size = self.entries.len();
        stats.max_size = self.max_size;
        stats.memory_usage_estimate = self.entries.values().map(|e| e.size_bytes).sum();
        stats.oldest_entry_timestamp = self.entries.values().map(|e| e.inserted_at).min();
        stats.newest_entry_timestamp = self.entries.values().map(|e| e.inserted_at).max();
        stats
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn purge(&mut self, key: &str) -> Option<CacheEntry<P>> {
        let entry = self.entries.remove(key)?;
        self.order.remove(entry.sequence);
        Some(entry)
    }

    /// Drops the oldest entry.
    fn evict_oldest(&mut self) -> Option<String> {
        let key = self.order.pop_oldest()?;
        self.entries.remove(&key);
        self.stats.record_eviction();
        debug!("Evicted oldest cache entry '{}'", key);
        Some(key)
    }
}

impl<P: CachedResponse> CacheStore<P> {
    // == Insert ==
    /// Stores a payload with an optional TTL override in milliseconds.
    ///
    /// If the key already exists, the payload is replaced, the TTL is reset
    /// and the key becomes the newest insertion. If a new key arrives at
    /// capacity, expired entries are pruned first and, if that frees nothing,
    /// exactly one entry (the oldest insertion) is evicted.
    ///
    /// Returns the evicted key, if any.
    pub fn insert(
        &mut self,
        key: String,
        payload: P,
        ttl_override_ms: Option<u64>,
        now: u64,
    ) -> Option<String> {
        let mut evicted = None;

        if self.purge(&key).is_none() && self.entries.len() >= self.max_size {
            self.prune_expired(now);
            if self.entries.len() >= self.max_size {
                evicted = self.evict_oldest();
            }
        }

        let ttl = ttl_override_ms.or(self.default_ttl_ms);
        let size_bytes = payload.size_estimate();
        let mut entry = CacheEntry::new(payload, size_bytes, ttl, now);
        entry.sequence = self.order.push(&key);
        self.entries.insert(key, entry);

        evicted
    }
}

impl<P: Clone> CacheStore<P> {
    // == Live Entries ==
    /// Copies of every live entry, oldest insertion first.
    pub fn live_entries(&mut self, now: u64) -> Vec<(String, CacheEntry<P>)> {
        self.prune_expired(now);
        self.order
            .iter()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .map(|entry| (key.clone(), entry.clone()))
            })
            .collect()
    }
}
