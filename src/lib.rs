//! Deadline Cache - a bounded in-memory cache with per-entry deadlines
//!
//! Entries carry an absolute expiration deadline and are dropped lazily on
//! read. When full, the entry with the soonest deadline makes room for a new
//! key.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheStats, TimeoutCache, NEVER_EXPIRE};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
