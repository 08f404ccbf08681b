//! Cache Store Module
//!
//! Bounded key-value store of JSON payloads with TTL expiry and
//! insertion-order eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder, StatsCounters};

/// Handle to the process-wide cache, shared by the fetcher, the HTTP
/// handlers and the background tasks.
pub type SharedCache = Arc<RwLock<CacheStore>>;

// == Cache Store ==
/// In-memory response cache.
///
/// When a new key arrives at capacity, the entry inserted earliest is
/// evicted. Reads do not affect eviction order.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, oldest first
    order: InsertionOrder,
    /// Counters since startup or the last flush
    stats: StatsCounters,
    /// Maximum number of entries allowed
    max_keys: usize,
    /// TTL used when `set` is called without one
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_keys` entries.
    pub fn new(max_keys: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: StatsCounters::new(),
            max_keys,
            default_ttl,
        }
    }

    /// Wraps the store into a [`SharedCache`].
    pub fn into_shared(self) -> SharedCache {
        Arc::new(RwLock::new(self))
    }

    // == Get ==
    /// Returns the value for `key` if present and unexpired.
    ///
    /// Records a hit or a miss, so it only needs a shared borrow. An
    /// expired entry counts as a miss whether or not the sweep has run; it
    /// stays stored until the sweep or an overwrite replaces it.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// Uses `ttl` when given, the default TTL otherwise. Returns `false` only
    /// when the store cannot hold any entry at all.
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<Duration>) -> bool {
        if self.max_keys == 0 {
            return false;
        }

        let key = key.into();
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_keys {
            if let Some(evicted) = self.order.pop_oldest() {
                self.entries.remove(&evicted);
                debug!(key = %evicted, "evicted oldest cache entry");
            }
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.clone(), entry);
        self.order.record(&key);

        self.stats.record_set();
        true
    }

    // == Delete ==
    /// Removes `key`, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.remove_entry(key) {
            self.stats.record_delete();
            true
        } else {
            false
        }
    }

    // == Has ==
    /// Checks for a live entry without touching the hit/miss counters.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Keys ==
    /// Returns all live keys. Expired entries awaiting the sweep are skipped.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Multi Get ==
    /// Returns the live values among `keys`. Counters are left unchanged.
    pub fn mget<S: AsRef<str>>(&self, keys: &[S]) -> HashMap<String, Value> {
        keys.iter()
            .filter_map(|key| {
                let key = key.as_ref();
                self.entries
                    .get(key)
                    .filter(|entry| !entry.is_expired())
                    .map(|entry| (key.to_string(), entry.value.clone()))
            })
            .collect()
    }

    // == Stats ==
    /// Returns a snapshot of the counters and current size.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Flush ==
    /// Drops every entry and zeroes the counters.
    pub fn flush(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.stats.reset();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        expired_keys.len()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }
}
