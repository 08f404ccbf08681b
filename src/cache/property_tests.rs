//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache invariants: round trips, capacity,
//! insertion-order eviction, expiry and counter accuracy.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::thread::sleep;
use std::time::Duration;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_MAX_KEYS: usize = 100;
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates request-like cache keys
fn key_strategy() -> impl Strategy<Value = String> {
    "/[a-z]{1,12}(/[a-z0-9-]{1,12})?\\{\\}".prop_map(|s| s)
}

/// Generates small JSON payloads
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,64}".prop_map(Value::from),
        ("[a-zA-Z ]{1,32}", any::<u16>())
            .prop_map(|(title, eps)| json!({"success": true, "data": {"title": title, "episodes": eps}})),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Delete { key: String },
    Has { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
        key_strategy().prop_map(|key| CacheOp::Has { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Counters reflect exactly the operations that were performed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(TEST_MAX_KEYS, TEST_DEFAULT_TTL);
        let (mut hits, mut misses, mut sets, mut deletes) = (0u64, 0u64, 0u64, 0u64);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    if store.set(key, value, None) {
                        sets += 1;
                    }
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => hits += 1,
                    None => misses += 1,
                },
                CacheOp::Delete { key } => {
                    if store.delete(&key) {
                        deletes += 1;
                    }
                }
                CacheOp::Has { key } => {
                    let _ = store.has(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
        prop_assert_eq!(stats.sets, sets);
        prop_assert_eq!(stats.deletes, deletes);
        prop_assert_eq!(stats.size, store.len());
        if hits + misses > 0 {
            prop_assert!((stats.hit_rate() - hits as f64 / (hits + misses) as f64).abs() < 1e-12);
        } else {
            prop_assert_eq!(stats.hit_rate(), 0.0);
        }
    }

    // set followed by get returns the same payload.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_KEYS, TEST_DEFAULT_TTL);

        prop_assert!(store.set(key.clone(), value.clone(), None));
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // The store never holds more than max_keys entries.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let max_keys = 20;
        let mut store = CacheStore::new(max_keys, TEST_DEFAULT_TTL);

        for (key, value) in entries {
            store.set(key, value, None);
            prop_assert!(store.len() <= max_keys, "size {} exceeds {}", store.len(), max_keys);
        }
    }

    // The surviving keys are exactly the most recent insertions, regardless
    // of any reads in between.
    #[test]
    fn prop_insertion_order_eviction(
        keys in prop::collection::vec(key_strategy(), 1..80),
        reads in prop::collection::vec(key_strategy(), 0..40)
    ) {
        let max_keys = 10;
        let mut store = CacheStore::new(max_keys, TEST_DEFAULT_TTL);
        let mut model: VecDeque<String> = VecDeque::new();

        for (i, key) in keys.iter().enumerate() {
            store.set(key.clone(), json!(i), None);

            model.retain(|k| k != key);
            if model.len() >= max_keys {
                model.pop_front();
            }
            model.push_back(key.clone());

            if let Some(read) = reads.get(i) {
                store.get(read);
            }
        }

        let live: HashSet<String> = store.keys().into_iter().collect();
        let expected: HashSet<String> = model.into_iter().collect();
        prop_assert_eq!(live, expected);
    }

    // flush empties the store and zeroes every counter.
    #[test]
    fn prop_flush_resets(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let mut store = CacheStore::new(TEST_MAX_KEYS, TEST_DEFAULT_TTL);
        let mut seen = Vec::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    seen.push(key.clone());
                    store.set(key, value, None);
                }
                CacheOp::Get { key } => {
                    store.get(&key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
                CacheOp::Has { .. } => {}
            }
        }

        store.flush();
        prop_assert!(store.is_empty());
        let stats = store.stats();
        prop_assert_eq!((stats.hits, stats.misses, stats.sets, stats.deletes), (0, 0, 0, 0));

        for key in seen {
            prop_assert_eq!(store.get(&key), None);
        }
    }
}

// Fewer cases for the tests that sleep
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // No value is returned once its TTL has passed, with or without a sweep.
    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let mut store = CacheStore::new(TEST_MAX_KEYS, TEST_DEFAULT_TTL);

        store.set(key.clone(), value.clone(), Some(Duration::from_millis(40)));
        prop_assert_eq!(store.get(&key), Some(value));

        sleep(Duration::from_millis(70));

        prop_assert!(!store.has(&key));
        prop_assert!(!store.keys().contains(&key));
        prop_assert_eq!(store.get(&key), None);
    }

    // Concurrent access through the shared handle keeps the store consistent.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let max_keys = 8;
            let store = CacheStore::new(max_keys, TEST_DEFAULT_TTL).into_shared();
            let mut handles = vec![];

            for op in operations {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            store.write().await.set(key, value, None);
                        }
                        CacheOp::Get { key } => {
                            store.read().await.get(&key);
                        }
                        CacheOp::Delete { key } => {
                            store.write().await.delete(&key);
                        }
                        CacheOp::Has { key } => {
                            store.read().await.has(&key);
                        }
                    }
                }));
            }

            for handle in handles {
                prop_assert!(handle.await.is_ok(), "task panicked");
            }

            let cache = store.read().await;
            let stats = cache.stats();
            prop_assert!(stats.size <= max_keys);
            let hit_rate = stats.hit_rate();
            prop_assert!((0.0..=1.0).contains(&hit_rate));
            Ok(())
        })?;
    }
}
