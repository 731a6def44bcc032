//! Cache Store Module
//!
//! Bounded cache combining HashMap storage with LRU tracking and TTL expiration,
//! synchronized internally so it can be shared between request handlers.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache State ==
/// Everything guarded by the cache lock.
#[derive(Debug)]
struct CacheState<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker<K>,
    /// Usage counters
    stats: CacheStats,
}

impl<K: Clone + Eq + Hash, V: Clone> CacheState<K, V> {
    fn get(&mut self, key: &K, ttl: Duration) -> Option<V> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if !entry.is_expired(ttl) {
            let value = entry.value().clone();
            self.stats.record_hit();
            self.lru.touch(key);
            return Some(value);
        }

        // Observed expired: purge it now
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.record_miss();
        self.stats.record_expirations(1);
        None
    }

    fn put(&mut self, key: K, value: V, max_entries: usize) {
        let is_overwrite = self.entries.contains_key(&key);

        // Make room before inserting so the bound holds at every point
        if !is_overwrite && self.entries.len() >= max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, CacheEntry::new(value));
    }

    fn remove(&mut self, key: &K) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    fn cleanup_expired(&mut self, ttl: Duration) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }
}

// == LRU Cache ==
/// Fixed-capacity key/value cache with LRU eviction and a single TTL.
///
/// All operations take one exclusive lock for O(1) amortized work, so the
/// cache can sit behind an `Arc` and be called from any thread or task. The
/// lock is never held across an `.await`.
///
/// Expired entries are only removed when a `get` observes them or when
/// [`LruCache::cleanup_expired`] is called; until then they still count
/// towards [`LruCache::size`] and occupy capacity.
#[derive(Debug)]
pub struct LruCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum age of a servable entry
    ttl: Duration,
}

impl<K: Clone + Eq + Hash, V: Clone> LruCache<K, V> {
    // == Constructor ==
    /// Creates a cache holding at most `max_entries` values for up to `ttl`.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(max_entries),
                lru: LruTracker::new(),
                stats: CacheStats::new(),
            }),
            max_entries,
            ttl,
        }
    }

    // == Get ==
    /// Returns a copy of the value for `key` if present and not expired.
    ///
    /// A hit marks the key as most recently used. An expired entry is purged
    /// and reported as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        self.state.lock().get(key, self.ttl)
    }

    // == Put ==
    /// Inserts or overwrites the value for `key` with a fresh timestamp.
    ///
    /// Overwriting restarts the entry's TTL and marks it most recently used.
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry within the same critical section.
    pub fn put(&self, key: K, value: V) {
        self.state.lock().put(key, value, self.max_entries);
    }

    // == Remove ==
    /// Removes `key`, returning whether it was present.
    pub fn remove(&self, key: &K) -> bool {
        self.state.lock().remove(key)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        self.state.lock().cleanup_expired(self.ttl)
    }

    // == Size ==
    /// Current number of entries, expired-but-unobserved ones included.
    pub fn size(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Stats ==
    /// Returns a snapshot of the usage counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        state.stats.snapshot(state.entries.len())
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
