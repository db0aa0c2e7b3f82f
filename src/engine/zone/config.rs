//! Zone configuration.
//!
//! `ZoneConfig` describes a single [`Zone`](crate::zone::Zone) before it is
//! built: its registry key, display name, capacity, and optionally a fixed
//! initial free-slot count. When `initial_free` is left unset the zone starts
//! with a random occupancy (up to two thirds of the slots taken), like a lot
//! that has already seen some morning traffic.
//!
//! # Examples
//!
//! ```rust
//! use unipark_engine::zone::ZoneConfig;
//!
//! let cfg = ZoneConfig::new("n", "North Lot", 20).with_initial_free(20);
//! assert_eq!(cfg.capacity, 20);
//! assert!(cfg.validate().is_ok());
//!
//! // A zone without slots is rejected at validation time.
//! assert!(ZoneConfig::new("x", "Broken", 0).validate().is_err());
//! ```
//!
//! Validation runs again as part of [`EngineConfig`](crate::EngineConfig)
//! validation, so configs assembled by hand go through the same checks as
//! built ones.

use crate::engine::config::ConfigError;
use crate::engine::zone::ZoneKey;

/// Settings for one parking zone.
#[derive(Debug, Clone)]
pub struct ZoneConfig {
    /// Registry key, normalized to lowercase
    pub key: ZoneKey,
    /// Human-readable name shown by renderers
    pub name: String,
    /// Total number of slots; must be at least 1
    pub capacity: u32,
    /// Fixed initial free-slot count, clamped into `[0, capacity]` at build
    /// time. `None` means a random draw from `[capacity / 3, capacity]`.
    pub initial_free: Option<i64>,
}

impl ZoneConfig {
    pub fn new<K: Into<ZoneKey>>(key: K, name: &str, capacity: u32) -> Self {
        Self {
            key: key.into(),
            name: name.to_string(),
            capacity,
            initial_free: None,
        }
    }

    /// Start the zone with a fixed number of free slots instead of a random
    /// occupancy.
    pub fn with_initial_free(mut self, free_slots: i64) -> Self {
        self.initial_free = Some(free_slots);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key.as_str().is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity { key: self.key.to_string() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_passes_validation() {
        let cfg = ZoneConfig::new("a", "Area A", 25);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.key.as_str(), "a");
        assert!(cfg.initial_free.is_none());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let cfg = ZoneConfig::new("a", "Area A", 0);
        match cfg.validate() {
            Err(ConfigError::ZeroCapacity { key }) => assert_eq!(key, "a"),
            other => panic!("expected ZeroCapacity, got {:?}", other),
        }
    }

    #[test]
    fn empty_key_is_rejected() {
        let cfg = ZoneConfig::new("  ", "Area A", 10);
        match cfg.validate() {
            Err(ConfigError::EmptyKey) => {}
            other => panic!("expected EmptyKey, got {:?}", other),
        }
    }

    #[test]
    fn key_is_normalized_like_any_other() {
        let cfg = ZoneConfig::new("B", "Area B", 10);
        assert_eq!(cfg.key.as_str(), "b");
    }
}
