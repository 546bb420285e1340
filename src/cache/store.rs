//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with a deadline heap.
//! The store is not synchronized; [`TimeoutCache`](crate::TimeoutCache) wraps
//! it in a single lock. Every time-dependent operation takes `now` in Unix
//! milliseconds so the store itself never reads a clock.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::entry::is_past;
use crate::cache::{CacheStats, DeadlineHeap, Entry};
use crate::config::CacheConfig;
use crate::error::Result;

// == Lookup Result ==
/// Outcome of a read. `Expired` entries have already been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Hit(V),
    Expired,
    Missing,
}

impl<V> Lookup<V> {
    /// Collapses the outcome to the value, if any.
    pub fn into_option(self) -> Option<V> {
        match self {
            Lookup::Hit(value) => Some(value),
            Lookup::Expired | Lookup::Missing => None,
        }
    }
}

// == Cache Store ==
/// Bounded key/value storage with per-entry deadlines.
///
/// Invariants kept by every method:
/// - `entries` and `heap` hold the same key set
/// - each entry's `heap_pos` is the index of its node in `heap`
/// - `entries.len() <= capacity`
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key index, also the owner of every record
    entries: HashMap<K, Entry<V>>,
    /// Deadline index
    heap: DeadlineHeap<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`](crate::CacheError::InvalidConfig)
    /// when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::from_config(&CacheConfig::default().with_capacity(capacity))
    }

    /// Creates an empty store from a validated configuration.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: HashMap::with_capacity(config.capacity),
            heap: DeadlineHeap::with_capacity(config.capacity),
            stats: CacheStats::new(),
            capacity: config.capacity,
        })
    }

    // == Set ==
    /// Stores `value` under `key` until `deadline` (Unix ms, `0` = never).
    ///
    /// An existing key is updated in place and re-positioned in the heap;
    /// this never evicts anything. A new key arriving at capacity first
    /// evicts the entry with the soonest deadline, whether or not that
    /// deadline has passed, and the evicted pair is returned.
    pub fn set(&mut self, key: K, value: V, deadline: u64) -> Option<(K, V)> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.deadline = deadline;
            let pos = entry.heap_pos;
            self.heap.remove_at(pos, &mut self.entries);
            self.heap.push(key, deadline, &mut self.entries);
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_soonest()
        } else {
            None
        };

        self.entries.insert(key.clone(), Entry::new(value, deadline));
        self.heap.push(key, deadline, &mut self.entries);
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Lookup ==
    /// Reads `key` at time `now`, removing it if its deadline has passed.
    ///
    /// A live hit does not change the entry's heap position.
    pub fn lookup(&mut self, key: &K, now: u64) -> Lookup<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Lookup::Hit(value);
            }
            Some(_) => true,
            None => false,
        };

        self.stats.record_miss();
        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            Lookup::Expired
        } else {
            Lookup::Missing
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired at `now`.
    pub fn get(&mut self, key: &K, now: u64) -> Option<V> {
        self.lookup(key, now).into_option()
    }

    // == Contains Key ==
    /// Checks for a live entry without removing anything or touching stats.
    pub fn contains_key(&self, key: &K, now: u64) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    // == Remove ==
    /// Removes `key` from both indexes, returning its value.
    ///
    /// Expired-but-unread entries are returned too.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|entry| entry.value)
    }

    // == Purge Expired ==
    /// Removes every entry whose deadline is before `now`.
    ///
    /// Walks the heap from its minimum, so only expired entries are visited.
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let mut removed = 0;
        while let Some(node) = self.heap.peek_min() {
            if !is_past(node.deadline, now) {
                break;
            }
            if let Some(node) = self.heap.pop_min(&mut self.entries) {
                self.entries.remove(&node.key);
                removed += 1;
            }
        }

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Drops every entry. Statistics counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.heap.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the deadline currently stored for `key`.
    pub fn deadline(&self, key: &K) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.deadline)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internals ==
    fn evict_soonest(&mut self) -> Option<(K, V)> {
        let node = self.heap.pop_min(&mut self.entries)?;
        let entry = self.entries.remove(&node.key)?;
        self.stats.record_eviction();
        Some((node.key, entry.value))
    }

    fn remove_entry(&mut self, key: &K) -> Option<Entry<V>> {
        let pos = self.entries.get(key)?.heap_pos;
        self.heap.remove_at(pos, &mut self.entries);
        let entry = self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
        entry
    }

    /// Panics if the two indexes disagree in any way.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.entries.len(), self.heap.len(), "index sizes differ");
        assert!(self.entries.len() <= self.capacity, "over capacity");
        assert!(self.heap.is_heap_ordered(), "heap order violated");
        for pos in 0..self.heap.len() {
            let node = self.heap.get(pos).expect("position in range");
            let entry = self.entries.get(&node.key).expect("heap key missing from map");
            assert_eq!(entry.heap_pos, pos, "stale heap position");
            assert_eq!(entry.deadline, node.deadline, "deadline copy out of sync");
        }
    }
}
