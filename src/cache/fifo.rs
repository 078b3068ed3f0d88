//! FIFO Tracker Module
//!
//! Insertion-order index used to pick eviction victims.

use std::collections::BTreeMap;

// == FIFO Tracker ==
/// Tracks insertion order for FIFO eviction.
///
/// Every insertion gets a fresh, strictly increasing sequence number, so
/// re-inserting a key moves it to the newest position. The smallest sequence
/// is always the oldest key.
#[derive(Debug, Default)]
pub struct FifoTracker {
    /// Sequence number -> key, oldest first
    order: BTreeMap<u64, String>,
    next_sequence: u64,
}

impl FifoTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Records `key` as the newest insertion and returns its sequence number.
    ///
    /// Callers re-inserting a key must `remove` its previous sequence first.
    pub fn push(&mut self, key: &str) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.order.insert(sequence, key.to_string());
        sequence
    }

    // == Remove ==
    /// Forgets the insertion with `sequence`.
    pub fn remove(&mut self, sequence: u64) -> Option<String> {
        self.order.remove(&sequence)
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    /// Keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.values()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
