//! Cache Entry Module
//!
//! Defines the record stored for each cached key: the value plus the instant
//! it was inserted.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A cached value paired with its creation instant.
///
/// The creation instant is taken from a monotonic clock when the entry is
/// built and never changes afterwards, reads included.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: V) -> Self {
        Self::with_created_at(value, Instant::now())
    }

    /// Creates an entry with an explicit creation instant.
    pub(crate) fn with_created_at(value: V, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    /// Returns the stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry and returns the stored value.
    #[cfg(test)]
    pub fn into_value(self) -> V {
        self.value
    }

    /// Returns the instant the entry was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    // == Age ==
    /// Time elapsed since the entry was created.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl`.
    ///
    /// An entry is expired only once its age is strictly greater than the
    /// TTL, so an entry exactly `ttl` old is still served.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}
