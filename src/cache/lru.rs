//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Stale queue slots tolerated before a compaction pass.
const COMPACTION_SLACK: usize = 16;

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch appends `(key, stamp)` to the back of a queue and records the
/// stamp as the key's current one. Older slots for the same key become stale
/// and are skipped when popping from the front, which keeps `touch`, `remove`
/// and `evict_oldest` amortized O(1):
/// - Front = Least recently used
/// - Back = Most recently used
#[derive(Debug)]
pub struct LruTracker<K> {
    /// Access queue, possibly holding stale slots
    order: VecDeque<(K, u64)>,
    /// Current stamp of every live key
    stamps: HashMap<K, u64>,
    /// Next stamp to hand out
    next_stamp: u64,
}

impl<K> Default for LruTracker<K> {
    fn default() -> Self {
        Self {
            order: VecDeque::new(),
            stamps: HashMap::new(),
            next_stamp: 0,
        }
    }
}

impl<K: Clone + Eq + Hash> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// New keys are appended; existing keys move to the back.
    pub fn touch(&mut self, key: &K) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        self.stamps.insert(key.clone(), stamp);
        self.order.push_back((key.clone(), stamp));
        self.maybe_compact();
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &K) {
        if self.stamps.remove(key).is_some() {
            self.maybe_compact();
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<K> {
        while let Some((key, stamp)) = self.order.pop_front() {
            if self.stamps.get(&key) == Some(&stamp) {
                self.stamps.remove(&key);
                return Some(key);
            }
        }
        None
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order
            .iter()
            .find(|(key, stamp)| self.is_live(key, *stamp))
            .map(|(key, _)| key)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    // == Is Empty ==
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[cfg(test)]
    pub fn contains(&self, key: &K) -> bool {
        self.stamps.contains_key(key)
    }

    #[cfg(test)]
    fn is_live(&self, key: &K, stamp: u64) -> bool {
        self.stamps.get(key) == Some(&stamp)
    }

    /// Rebuilds the queue once stale slots outnumber live keys.
    fn maybe_compact(&mut self) {
        if self.order.len() <= self.stamps.len() * 2 + COMPACTION_SLACK {
            return;
        }
        let stamps = &self.stamps;
        self.order
            .retain(|(key, stamp)| stamps.get(key) == Some(stamp));
    }

    #[cfg(test)]
    fn queue_len(&self) -> usize {
        self.order.len()
    }
}
