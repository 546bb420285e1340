//! Configuration Module
//!
//! Holds the construction parameters of a [`TimeoutCache`](crate::TimeoutCache).
//! The struct derives serde traits so a host application can embed it in its
//! own configuration file.

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Default maximum number of resident entries.
pub const DEFAULT_CAPACITY: usize = 1024;

/// Cache configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
}

impl CacheConfig {
    /// Sets the maximum number of entries.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] when `capacity` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_with_capacity() {
        let config = CacheConfig::default().with_capacity(8);
        assert_eq!(config.capacity, 8);
    }

    #[test]
    fn test_config_zero_capacity_rejected() {
        let config = CacheConfig::default().with_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_deserialize() {
        let config: CacheConfig = serde_json::from_str(r#"{"capacity": 64}"#).unwrap();
        assert_eq!(config.capacity, 64);
    }

    #[test]
    fn test_config_deserialize_missing_field_uses_default() {
        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CacheConfig::default());
    }
}
