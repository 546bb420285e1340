//! Cache Module
//!
//! Bounded in-memory caching with per-entry deadlines, lazy expiration and
//! soonest-deadline eviction.

mod entry;
mod heap;
mod stats;
mod store;
mod timeout_cache;


// Re-export public types
pub use entry::{current_timestamp_ms, deadline_after, Entry, NEVER_EXPIRE};
pub use heap::{DeadlineHeap, HeapNode, PositionTracker};
pub use stats::CacheStats;
pub use store::{CacheStore, Lookup};
pub use timeout_cache::TimeoutCache;
