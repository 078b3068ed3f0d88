//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A stored response with insertion and expiry metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<P> {
    /// The stored response
    pub payload: P,
    /// Insertion timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    /// Serialized size approximation, computed once at store time
    pub size_bytes: usize,
    /// Position in the insertion-order index
    pub(crate) sequence: u64,
}

impl<P> CacheEntry<P> {
    // == Constructor ==
    /// Creates a new entry inserted at `now` with an optional TTL in milliseconds.
    pub fn new(payload: P, size_bytes: usize, ttl_ms: Option<u64>, now: u64) -> Self {
        Self {
            payload,
            inserted_at: now,
            expires_at: ttl_ms.map(|ttl| now.saturating_add(ttl)),
            size_bytes,
            sequence: 0,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is live only while `now` is strictly before its expiry, so it
    /// is gone the moment its TTL has fully elapsed.
    pub fn is_expired_at(&self, now: u64) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds at `now`, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired (TTL elapsed)
    /// - `Some(remaining_ms)` if the entry has TTL and hasn't expired
    /// - `None` if the entry has no TTL (never expires)
    pub fn ttl_remaining_ms(&self, now: u64) -> Option<u64> {
        self.expires_at.map(|expires| expires.saturating_sub(now))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
