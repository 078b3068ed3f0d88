//! Shared Response Cache
//!
//! Thread-safe handle over a `CacheStore`. All mutations are serialized under
//! one mutex per cache; queries copy the live entries under the lock and
//! filter after releasing it, so a predicate may call back into the cache.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{
    current_timestamp_ms, CacheEntry, CacheStats, CacheStore, CachedResponse, ResponsePayload,
    UrlMatcher,
};
use crate::config::CacheConfig;
use crate::error::{Result, StateError};
use crate::tasks::spawn_cleanup_task;

/// Owns the background sweep. Dropping it (with the last cache handle) stops the task.
#[derive(Debug, Default)]
struct CleanupGuard {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CleanupGuard {
    fn stop(&self) -> bool {
        match self.handle.lock().take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        self.stop();
    }
}

// == Response Cache ==
/// Bounded, TTL-aware cache of executed responses.
///
/// Cloning yields another handle to the same cache.
///
/// # Example
/// ```
/// use api_state::{CacheConfig, ResponseCache, ResponsePayload};
///
/// let cache: ResponseCache = ResponseCache::new(CacheConfig::default().with_max_size(2)).unwrap();
/// cache.store("k1", ResponsePayload::new("GET", "https://api.test/a", 200), None);
/// cache.store("k2", ResponsePayload::new("GET", "https://api.test/b", 404), None);
/// cache.store("k3", ResponsePayload::new("GET", "https://api.test/c", 200), None);
///
/// assert_eq!(cache.keys(), vec!["k2", "k3"]);
/// assert_eq!(cache.find_by_status(200).len(), 1);
/// ```
#[derive(Debug)]
pub struct ResponseCache<P = ResponsePayload> {
    store: Arc<Mutex<CacheStore<P>>>,
    cleanup: Arc<CleanupGuard>,
    config: CacheConfig,
}

impl<P> Clone for ResponseCache<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cleanup: Arc::clone(&self.cleanup),
            config: self.config.clone(),
        }
    }
}

impl<P> ResponseCache<P>
where
    P: CachedResponse + Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache from validated configuration.
    ///
    /// With cleanup enabled this must be called inside a tokio runtime; the
    /// sweep is spawned on it immediately.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(Mutex::new(CacheStore::from_config(&config)));
        let cleanup = Arc::new(CleanupGuard::default());

        if config.enable_cleanup {
            if tokio::runtime::Handle::try_current().is_err() {
                return Err(StateError::InvalidConfiguration(
                    "cache cleanup requires a running tokio runtime".to_string(),
                ));
            }
            let handle = spawn_cleanup_task(Arc::downgrade(&store), config.cleanup_interval());
            *cleanup.handle.lock() = Some(handle);
        }

        Ok(Self {
            store,
            cleanup,
            config,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Store ==
    /// Stores `payload` under `key`, replacing any previous entry.
    ///
    /// `ttl_override_ms` takes precedence over the configured default TTL.
    pub fn store(&self, key: impl Into<String>, payload: P, ttl_override_ms: Option<u64>) {
        self.store
            .lock()
            .insert(key.into(), payload, ttl_override_ms, current_timestamp_ms());
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<P> {
        self.store.lock().get(key, current_timestamp_ms()).cloned()
    }

    pub fn has(&self, key: &str) -> bool {
        self.store.lock().contains(key, current_timestamp_ms())
    }

    pub fn remove(&self, key: &str) -> bool {
        self.store.lock().remove(key, current_timestamp_ms())
    }

    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Live keys, oldest insertion first.
    pub fn keys(&self) -> Vec<String> {
        self.store.lock().keys(current_timestamp_ms())
    }

    /// Remaining TTL of a live entry in milliseconds; None if absent or never expiring.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        self.store.lock().ttl_remaining(key, current_timestamp_ms())
    }

    /// Purges expired entries now and returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        self.store.lock().prune_expired(current_timestamp_ms())
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats(current_timestamp_ms())
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Queries ==
    /// Point-in-time copy of every live entry, oldest insertion first.
    pub fn entries(&self) -> Vec<(String, CacheEntry<P>)> {
        self.store.lock().live_entries(current_timestamp_ms())
    }

    /// Live entries accepted by `predicate`.
    ///
    /// The predicate runs after the lock is released.
    pub fn find<F>(&self, mut predicate: F) -> Vec<(String, P)>
    where
        F: FnMut(&str, &P) -> bool,
    {
        self.entries()
            .into_iter()
            .filter(|(key, entry)| predicate(key, &entry.payload))
            .map(|(key, entry)| (key, entry.payload))
            .collect()
    }

    pub fn find_by_status(&self, status: u16) -> Vec<(String, P)> {
        self.find(|_, payload| payload.status() == status)
    }

    /// Plain strings match by substring, `Regex` values and
    /// `UrlMatcher::pattern` by regular expression.
    pub fn find_by_url(&self, matcher: impl Into<UrlMatcher>) -> Vec<(String, P)> {
        let matcher = matcher.into();
        self.find(|_, payload| matcher.matches(payload.url()))
    }

    /// Entries inserted within `[start_ms, end_ms]`, inclusive on both ends.
    pub fn find_by_time_range(&self, start_ms: u64, end_ms: u64) -> Vec<(String, P)> {
        self.entries()
            .into_iter()
            .filter(|(_, entry)| (start_ms..=end_ms).contains(&entry.inserted_at))
            .map(|(key, entry)| (key, entry.payload))
            .collect()
    }
}

impl<P> ResponseCache<P> {
    // == Close ==
    /// Stops the background sweep. Idempotent; the cache stays usable and
    /// expiry falls back to lazy purging.
    pub fn close(&self) {
        if self.cleanup.stop() {
            info!("Response cache cleanup task stopped");
        }
    }

    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup.is_running()
    }
}
