//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check capacity, ordering, expiry and statistics
//! properties over random operation sequences.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cache::{CacheStore, ResponseCache, ResponsePayload};
use crate::config::CacheConfig;

// == Test Configuration ==
const TEST_MAX_SIZE: usize = 100;

// == Strategies ==
/// Generates cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

/// Generates response payloads with a random URL path and status code
fn payload_strategy() -> impl Strategy<Value = ResponsePayload> {
    ("[a-z]{1,12}", prop::sample::select(vec![200u16, 201, 204, 400, 404, 500]))
        .prop_map(|(path, status)| {
            ResponsePayload::new("GET", format!("https://api.test/{}", path), status)
        })
}

/// Unique keys in generation order
fn unique_keys(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Store { key: String, payload: ResponsePayload },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), payload_strategy())
            .prop_map(|(key, payload)| CacheOp::Store { key, payload }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // **Property: Statistics Accuracy**
    // *For any* sequence of operations, hits and misses match the lookups that
    // found or missed an entry, and the reported size equals the live key count.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, None);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Store { key, payload } => {
                    store.insert(key, payload, None, 0);
                }
                CacheOp::Get { key } => match store.get(&key, 0) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Remove { key } => {
                    store.remove(&key, 0);
                }
            }
        }

        let stats = store.stats(0);
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, store.keys(0).len(), "Size mismatch");
        if stats.size > 0 {
            prop_assert!(stats.memory_usage_estimate > 0);
        } else {
            prop_assert_eq!(stats.memory_usage_estimate, 0);
        }
    }

    // **Property: Round-trip Storage Consistency**
    // *For any* key and payload, storing then retrieving before expiry returns
    // a payload equal to the stored one.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), payload in payload_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, None);

        store.insert(key.clone(), payload.clone(), None, 0);

        prop_assert_eq!(store.get(&key, 0), Some(&payload), "Round-trip payload mismatch");
    }

    // **Property: Remove Deletes Entry**
    // *For any* stored key, removing it reports true once and the key is absent afterwards.
    #[test]
    fn prop_remove_deletes_entry(key in key_strategy(), payload in payload_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, None);

        store.insert(key.clone(), payload, None, 0);
        prop_assert!(store.contains(&key, 0), "Key should exist before remove");

        prop_assert!(store.remove(&key, 0));
        prop_assert!(!store.remove(&key, 0), "Second remove finds nothing");
        prop_assert!(store.get(&key, 0).is_none(), "Key should not exist after remove");
    }

    // **Property: Overwrite Semantics**
    // *For any* key, storing P1 then P2 leaves exactly one entry holding P2.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        first in payload_strategy(),
        second in payload_strategy()
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, None);

        store.insert(key.clone(), first, None, 0);
        store.insert(key.clone(), second.clone(), None, 1);

        prop_assert_eq!(store.get(&key, 1), Some(&second));
        prop_assert_eq!(store.len(), 1);
    }

    // **Property: Capacity Enforcement**
    // *For any* number of insertions, the live entry count never exceeds max_size.
    #[test]
    fn prop_capacity_enforcement(
        max_size in 1usize..20,
        entries in prop::collection::vec((key_strategy(), payload_strategy()), 1..100)
    ) {
        let mut store = CacheStore::new(max_size, None);

        for (key, payload) in entries {
            store.insert(key, payload, None, 0);
            prop_assert!(
                store.len() <= max_size,
                "Cache size {} exceeds max {}",
                store.len(),
                max_size
            );
        }
    }

    // **Property: FIFO Eviction Order**
    // *For any* full cache, inserting a new key evicts exactly the oldest insertion,
    // no matter which keys were read in between.
    #[test]
    fn prop_fifo_eviction_order(
        keys in prop::collection::vec(key_strategy(), 2..10),
        reads in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
        new_key in key_strategy(),
        new_payload in payload_strategy()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 2);
        prop_assume!(!keys.contains(&new_key));

        let capacity = keys.len();
        let mut store = CacheStore::new(capacity, None);
        for (i, key) in keys.iter().enumerate() {
            store.insert(key.clone(), ResponsePayload::new("GET", format!("/{}", i), 200), None, 0);
        }

        // reads never refresh eviction order
        for index in reads {
            store.get(index.get::<String>(&keys), 0);
        }

        let evicted = store.insert(new_key.clone(), new_payload, None, 0);

        prop_assert_eq!(evicted.as_ref(), Some(&keys[0]));
        prop_assert_eq!(store.len(), capacity);
        prop_assert!(!store.contains(&keys[0], 0), "Oldest key should be evicted");
        prop_assert!(store.contains(&new_key, 0), "New key should exist");
        for key in keys.iter().skip(1) {
            prop_assert!(store.contains(key, 0), "Key '{}' should still exist", key);
        }
    }

    // **Property: Re-store Moves Key To Newest**
    // *For any* full cache, re-storing the oldest key makes the second-oldest
    // the next eviction victim.
    #[test]
    fn prop_restore_moves_to_newest(
        keys in prop::collection::vec(key_strategy(), 3..8),
        new_key in key_strategy()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 3);
        prop_assume!(!keys.contains(&new_key));

        let mut store = CacheStore::new(keys.len(), None);
        for key in &keys {
            store.insert(key.clone(), ResponsePayload::new("GET", "/", 200), None, 0);
        }

        store.insert(keys[0].clone(), ResponsePayload::new("GET", "/again", 200), None, 1);
        let evicted = store.insert(new_key.clone(), ResponsePayload::new("GET", "/new", 200), None, 2);

        prop_assert_eq!(evicted.as_ref(), Some(&keys[1]));
        prop_assert!(store.contains(&keys[0], 2));
        let mut expected: Vec<String> = keys[2..].to_vec();
        expected.push(keys[0].clone());
        expected.push(new_key);
        prop_assert_eq!(store.keys(2), expected);
    }

    // **Property: TTL Expiration Behavior**
    // *For any* entry stored with a TTL, it is live strictly before
    // `inserted_at + ttl` and absent from that moment on, without explicit removal.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in key_strategy(),
        payload in payload_strategy(),
        start in 0u64..1_000_000,
        ttl in 1u64..10_000,
        default_ttl in proptest::option::of(1u64..10_000)
    ) {
        let mut store = CacheStore::new(TEST_MAX_SIZE, default_ttl);

        store.insert(key.clone(), payload, Some(ttl), start);

        prop_assert!(store.contains(&key, start));
        prop_assert!(store.contains(&key, start + ttl - 1));
        prop_assert!(store.get(&key, start + ttl).is_none());
        prop_assert!(store.is_empty(), "Expired entry is purged on access");
    }

    // **Property: Time Range Query Bounds**
    // *For any* insertion times, entries inside [start, end] are exactly those
    // whose insertion time lies within the inclusive range.
    #[test]
    fn prop_time_range_inclusive(
        times in prop::collection::vec(0u64..100, 1..20),
        start in 0u64..100,
        span in 0u64..50
    ) {
        let end = start + span;
        let mut store = CacheStore::new(TEST_MAX_SIZE, None);
        for (i, at) in times.iter().enumerate() {
            store.insert(format!("k{}", i), ResponsePayload::new("GET", "/", 200), None, *at);
        }

        let found = store
            .live_entries(100)
            .into_iter()
            .filter(|(_, e)| (start..=end).contains(&e.inserted_at))
            .count();
        let expected = times.iter().filter(|t| **t >= start && **t <= end).count();
        prop_assert_eq!(found, expected);
    }
}

// Separate proptest block with fewer cases for wall-clock TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // **Property: TTL Expiry On The Shared Handle**
    // *For any* entry stored with a 50ms TTL, it is present immediately and
    // absent after 75ms with no explicit removal.
    #[test]
    fn prop_shared_ttl_expiry(key in key_strategy(), payload in payload_strategy()) {
        let cache: ResponseCache = ResponseCache::new(CacheConfig::default()).unwrap();

        cache.store(key.clone(), payload.clone(), Some(50));
        prop_assert_eq!(cache.get(&key), Some(payload));

        thread::sleep(Duration::from_millis(75));

        prop_assert!(cache.get(&key).is_none());
        prop_assert!(!cache.has(&key));
        prop_assert!(cache.keys().is_empty());
    }
}

// == Property Test for Concurrent Operation Correctness ==
// Exercises thread-safe access through cloned `ResponseCache` handles.

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // **Property: Concurrent Operation Correctness**
    // *For any* set of concurrent operations, every read returns a payload that
    // some writer stored under that key, and capacity holds afterwards.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..50),
        max_size in 1usize..16
    ) {
        let cache: ResponseCache = ResponseCache::new(CacheConfig::default().with_max_size(max_size)).unwrap();

        // Every payload that may legitimately be observed per key
        let mut written: HashMap<String, Vec<ResponsePayload>> = HashMap::new();
        for op in &operations {
            if let CacheOp::Store { key, payload } = op {
                written.entry(key.clone()).or_default().push(payload.clone());
            }
        }
        let written = Arc::new(written);

        let handles: Vec<_> = operations
            .into_iter()
            .map(|op| {
                let cache = cache.clone();
                let written = Arc::clone(&written);
                thread::spawn(move || match op {
                    CacheOp::Store { key, payload } => {
                        cache.store(key, payload, None);
                        Ok(())
                    }
                    CacheOp::Get { key } => match cache.get(&key) {
                        Some(payload) => {
                            let known = written.get(&key).map(|v| v.contains(&payload)).unwrap_or(false);
                            if known {
                                Ok(())
                            } else {
                                Err(format!("Unexpected payload for key '{}'", key))
                            }
                        }
                        None => Ok(()),
                    },
                    CacheOp::Remove { key } => {
                        cache.remove(&key);
                        Ok(())
                    }
                })
            })
            .collect();

        for handle in handles {
            let result = handle.join().expect("worker panicked");
            prop_assert!(result.is_ok(), "{:?}", result);
        }

        let stats = cache.stats();
        prop_assert!(stats.size <= max_size);
        prop_assert_eq!(stats.size, cache.keys().len());
    }
}
