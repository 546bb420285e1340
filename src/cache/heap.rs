//! Deadline Heap Module
//!
//! Binary min-heap ordering cache keys by deadline, used to find the
//! soonest-expiring entry and to drop arbitrary entries in O(log n).
//!
//! Layout of the backing vector:
//! - left child of `i` = `2 * i + 1`
//! - right child of `i` = `2 * i + 2`
//! - parent of `i` = `(i - 1) / 2`
//!
//! The heap does not own the cache records. Every time a node moves, its new
//! index is written back through a [`PositionTracker`] so the record can find
//! its node again.

use std::collections::HashMap;
use std::hash::Hash;

use crate::cache::entry::{effective_deadline, Entry};

// == Position Tracker ==
/// Receives the new heap index of a key whenever its node moves.
pub trait PositionTracker<K> {
    /// Records that `key` now lives at `pos`.
    fn set_position(&mut self, key: &K, pos: usize);
}

impl<K: Hash + Eq, V> PositionTracker<K> for HashMap<K, Entry<V>> {
    fn set_position(&mut self, key: &K, pos: usize) {
        if let Some(entry) = self.get_mut(key) {
            entry.heap_pos = pos;
        }
    }
}

// == Heap Node ==
/// A key and a copy of its deadline, so comparisons never hit the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapNode<K> {
    pub key: K,
    pub deadline: u64,
}

impl<K> HeapNode<K> {
    #[inline]
    fn rank(&self) -> u64 {
        effective_deadline(self.deadline)
    }
}

// == Deadline Heap ==
/// Min-heap of keys ordered by effective deadline.
#[derive(Debug)]
pub struct DeadlineHeap<K> {
    nodes: Vec<HeapNode<K>>,
}

impl<K> Default for DeadlineHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> DeadlineHeap<K> {
    // == Constructor ==
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates an empty heap with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    // == Push ==
    /// Appends a node and sifts it up into place. O(log n).
    pub fn push<P: PositionTracker<K>>(&mut self, key: K, deadline: u64, positions: &mut P) {
        let pos = self.nodes.len();
        positions.set_position(&key, pos);
        self.nodes.push(HeapNode { key, deadline });
        self.sift_up(pos, positions);
    }

    // == Remove At ==
    /// Removes the node at `pos`, restoring heap order. O(log n).
    ///
    /// The last node is moved into the hole. It may belong either below or
    /// above that slot, so a sift-down is tried first and a sift-up follows
    /// when nothing moved.
    ///
    /// Returns `None` if `pos` is out of range.
    pub fn remove_at<P: PositionTracker<K>>(
        &mut self,
        pos: usize,
        positions: &mut P,
    ) -> Option<HeapNode<K>> {
        if pos >= self.nodes.len() {
            return None;
        }

        let last = self.nodes.len() - 1;
        if pos != last {
            self.swap(pos, last, positions);
        }
        let removed = self.nodes.pop();

        if pos < self.nodes.len() && !self.sift_down(pos, positions) {
            self.sift_up(pos, positions);
        }

        removed
    }

    // == Pop Min ==
    /// Removes and returns the node with the smallest effective deadline.
    pub fn pop_min<P: PositionTracker<K>>(&mut self, positions: &mut P) -> Option<HeapNode<K>> {
        self.remove_at(0, positions)
    }

    // == Peek Min ==
    /// Returns the node with the smallest effective deadline.
    pub fn peek_min(&self) -> Option<&HeapNode<K>> {
        self.nodes.first()
    }

    /// Returns the node at `pos`.
    pub fn get(&self, pos: usize) -> Option<&HeapNode<K>> {
        self.nodes.get(pos)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drops every node. Positions are not reported.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    // == Internals ==
    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.nodes[i].rank() < self.nodes[j].rank()
    }

    fn swap<P: PositionTracker<K>>(&mut self, i: usize, j: usize, positions: &mut P) {
        self.nodes.swap(i, j);
        positions.set_position(&self.nodes[i].key, i);
        positions.set_position(&self.nodes[j].key, j);
    }

    /// Returns true if the node moved.
    fn sift_up<P: PositionTracker<K>>(&mut self, mut pos: usize, positions: &mut P) -> bool {
        let mut moved = false;
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.less(pos, parent) {
                break;
            }
            self.swap(pos, parent, positions);
            pos = parent;
            moved = true;
        }
        moved
    }

    /// Returns true if the node moved. Ties between children go left.
    fn sift_down<P: PositionTracker<K>>(&mut self, mut pos: usize, positions: &mut P) -> bool {
        let len = self.nodes.len();
        let mut moved = false;
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smallest = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(smallest, pos) {
                break;
            }
            self.swap(pos, smallest, positions);
            pos = smallest;
            moved = true;
        }
        moved
    }

    /// Checks the min-heap property over every parent/child pair.
    #[cfg(test)]
    pub(crate) fn is_heap_ordered(&self) -> bool {
        (1..self.nodes.len()).all(|i| !self.less(i, (i - 1) / 2))
    }
}
