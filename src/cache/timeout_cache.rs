//! Timeout Cache Module
//!
//! Thread-safe facade over [`CacheStore`]. Both indexes and the statistics
//! sit behind one `parking_lot::Mutex`, held for the whole of every call.
//! There is no read/write split because reads can evict.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::entry::{current_timestamp_ms, deadline_after};
use crate::cache::store::{CacheStore, Lookup};
use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::error::Result;

// == Timeout Cache ==
/// Bounded cache with per-entry deadlines, shareable across threads via `Arc`.
///
/// Deadlines are absolute Unix timestamps in milliseconds; `0`
/// ([`NEVER_EXPIRE`](crate::cache::NEVER_EXPIRE)) means the entry never
/// expires. Expired entries are dropped lazily when read. When a new key
/// arrives at capacity, the entry with the soonest deadline is evicted.
///
/// # Example
/// ```
/// use deadline_cache::TimeoutCache;
/// use std::time::Duration;
///
/// let cache: TimeoutCache<&str, u32> = TimeoutCache::new(2).unwrap();
/// cache.set_with_ttl("answer", 42, Duration::from_secs(60));
/// assert_eq!(cache.get(&"answer"), Some(42));
/// ```
#[derive(Debug)]
pub struct TimeoutCache<K, V> {
    inner: Mutex<CacheStore<K, V>>,
}

impl<K, V> TimeoutCache<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`](crate::CacheError::InvalidConfig)
    /// when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::default().with_capacity(capacity))
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let store = CacheStore::from_config(config)?;
        debug!(capacity = config.capacity, "Timeout cache initialized");
        Ok(Self {
            inner: Mutex::new(store),
        })
    }

    // == Set ==
    /// Stores `value` under `key` until the absolute `deadline` (Unix ms).
    ///
    /// Returns the entry evicted to make room, if any. Updating an existing
    /// key never evicts.
    pub fn set(&self, key: K, value: V, deadline: u64) -> Option<(K, V)> {
        let evicted = self.inner.lock().set(key, value, deadline);
        if let Some((evicted_key, _)) = &evicted {
            debug!(key = ?evicted_key, "Evicted soonest-deadline entry at capacity");
        }
        evicted
    }

    /// Stores `value` under `key` for `ttl` from now.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) -> Option<(K, V)> {
        self.set(key, value, deadline_after(ttl))
    }

    // == Get ==
    /// Returns the value for `key`, or `None` if absent or expired.
    ///
    /// An expired entry is removed from the cache by this call.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = current_timestamp_ms();
        let lookup = self.inner.lock().lookup(key, now);
        if let Lookup::Expired = lookup {
            trace!(key = ?key, "Expired entry removed on read");
        }
        lookup.into_option()
    }

    /// Checks for a live entry without removing it or recording stats.
    pub fn contains_key(&self, key: &K) -> bool {
        let now = current_timestamp_ms();
        self.inner.lock().contains_key(key, now)
    }

    // == Remove ==
    /// Removes `key`, returning its value even if it had expired.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    // == Purge Expired ==
    /// Removes every entry whose deadline has passed.
    ///
    /// Nothing calls this automatically; it is for callers that want to
    /// reclaim memory held by expired entries nobody reads.
    pub fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let removed = self.inner.lock().purge_expired(now);
        if removed > 0 {
            debug!(removed, "Purged expired entries");
        }
        removed
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Runs `f` against the locked store.
    #[cfg(test)]
    pub(crate) fn with_store<R>(&self, f: impl FnOnce(&CacheStore<K, V>) -> R) -> R {
        f(&self.inner.lock())
    }
}
