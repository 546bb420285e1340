//! Error types for the deadline cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the deadline cache.
///
/// Lookups never produce an error: a missing or expired key is reported as
/// `None`. Only construction can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Rejected configuration value (e.g. zero capacity)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the deadline cache.
pub type Result<T> = std::result::Result<T, CacheError>;
