//! Cache Entry Module
//!
//! Defines the record stored for each key: its value, its absolute deadline
//! and its current slot in the deadline heap.

use std::time::Duration;

// == Constants ==
/// Deadline sentinel meaning "never expires".
pub const NEVER_EXPIRE: u64 = 0;

// == Cache Entry ==
/// A single cache record.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value
    pub value: V,
    /// Expiration timestamp (Unix milliseconds), `NEVER_EXPIRE` = no expiration
    pub deadline: u64,
    /// Index of this entry's node in the deadline heap
    pub(crate) heap_pos: usize,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a new entry. The heap position is assigned on push.
    pub fn new(value: V, deadline: u64) -> Self {
        Self {
            value,
            deadline,
            heap_pos: 0,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired only when its deadline is
    /// strictly before `now`. An entry whose deadline equals `now` is still
    /// live. `NEVER_EXPIRE` entries are never expired.
    pub fn is_expired_at(&self, now: u64) -> bool {
        is_past(self.deadline, now)
    }

    /// Returns the slot this entry occupies in the deadline heap.
    pub fn heap_pos(&self) -> usize {
        self.heap_pos
    }
}

// == Utility Functions ==
/// Maps a deadline to its ordering key: `NEVER_EXPIRE` sorts after every
/// real deadline.
#[inline]
pub fn effective_deadline(deadline: u64) -> u64 {
    if deadline == NEVER_EXPIRE {
        u64::MAX
    } else {
        deadline
    }
}

/// True when `deadline` is a real deadline strictly before `now`.
#[inline]
pub fn is_past(deadline: u64, now: u64) -> bool {
    deadline != NEVER_EXPIRE && deadline < now
}

/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Returns the absolute deadline `ttl` from now, in the cache's clock domain.
pub fn deadline_after(ttl: Duration) -> u64 {
    let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    // A real deadline must never equal the sentinel.
    current_timestamp_ms().saturating_add(ttl_ms).max(1)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_never_expires() {
        let entry = Entry::new("value", NEVER_EXPIRE);
        assert!(!entry.is_expired_at(0));
        assert!(!entry.is_expired_at(u64::MAX));
    }

    #[test]
    fn test_entry_expiration_boundary_condition() {
        let entry = Entry::new("value", 1_000);

        assert!(!entry.is_expired_at(999));
        // Deadline equal to now is still live
        assert!(!entry.is_expired_at(1_000));
        assert!(entry.is_expired_at(1_001));
    }

    #[test]
    fn test_effective_deadline_orders_sentinel_last() {
        assert_eq!(effective_deadline(NEVER_EXPIRE), u64::MAX);
        assert_eq!(effective_deadline(42), 42);
        assert!(effective_deadline(u64::MAX - 1) < effective_deadline(NEVER_EXPIRE));
    }

    #[test]
    fn test_deadline_after_is_in_the_future() {
        let before = current_timestamp_ms();
        let deadline = deadline_after(Duration::from_secs(10));
        assert!(deadline >= before + 10_000);
        assert!(deadline <= current_timestamp_ms() + 10_000);
    }

    #[test]
    fn test_deadline_after_zero_is_not_sentinel() {
        assert_ne!(deadline_after(Duration::ZERO), NEVER_EXPIRE);
    }

    #[test]
    fn test_deadline_after_saturates() {
        assert_eq!(deadline_after(Duration::MAX), u64::MAX);
    }
}
