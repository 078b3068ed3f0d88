//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{current_timestamp_ms, CacheStore};

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task sleeps for `interval` between sweeps and holds the store lock
/// only while pruning. It holds a weak reference, so it exits on its own
/// once every owner of the store is gone; otherwise abort the returned
/// handle to stop it.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::<ResponsePayload>::new(1000, Some(30_000))));
/// let cleanup_handle = spawn_cleanup_task(Arc::downgrade(&store), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<P>(store: Weak<Mutex<CacheStore<P>>>, interval: Duration) -> JoinHandle<()>
where
    P: Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} ms",
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                info!("Cache dropped, stopping TTL cleanup task");
                break;
            };

            let removed = store.lock().prune_expired(current_timestamp_ms());

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
