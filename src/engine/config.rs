//! Engine configuration.
//!
//! `EngineConfig` describes the whole simulated system: the set of parking
//! zones and the traffic pattern applied to each of them. The [`Default`]
//! layout reproduces the reference campus (three zones keyed `a`, `b`, `c`);
//! anything else is built through [`EngineConfig::builder()`] with
//! validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use unipark_engine::EngineConfig;
//! let cfg = EngineConfig::default();
//! assert_eq!(cfg.zones.len(), 3);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use std::time::Duration;
//! use unipark_engine::zone::ZoneConfig;
//! use unipark_engine::EngineConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EngineConfig::builder()
//!     .zones(vec![
//!         ZoneConfig::new("n", "North Lot", 20),
//!         ZoneConfig::new("s", "South Lot", 35).with_initial_free(35),
//!     ])
//!     .min_delay(Duration::from_secs(1))
//!     .max_delay(Duration::from_secs(3))
//!     .build()?; // returns Result<EngineConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] when values are invalid: no
//! zones at all, an empty or duplicate zone key, a zero capacity, an inverted
//! traffic delay range, or thresholds out of order.

use std::collections::HashSet;
use std::time::Duration;

use crate::engine::traffic::TrafficConfig;
use crate::engine::zone::ZoneConfig;

/// Main engine configuration: the zones to simulate and the traffic profile.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Zones to create at startup, in display order
    pub zones: Vec<ZoneConfig>,
    /// Traffic pattern applied to every zone
    pub traffic: TrafficConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            zones: vec![
                ZoneConfig::new("a", "Viale A. Doria", 60),
                ZoneConfig::new("b", "DMI", 45),
                ZoneConfig::new("c", "Via S. Sofia", 80),
            ],
            traffic: TrafficConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

/// Builder for [`EngineConfig`], mirroring the zone config style.
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    inner: EngineConfig,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self { inner: EngineConfig::default() }
    }
}

impl EngineConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EngineConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    /// Add one zone to the current set.
    pub fn zone(self, zone: ZoneConfig) -> Self { self.map(|c| c.zones.push(zone)) }
    /// Replace the whole zone set.
    pub fn zones(self, zones: Vec<ZoneConfig>) -> Self { self.map(|c| c.zones = zones) }
    /// Replace the traffic profile.
    pub fn traffic(self, traffic: TrafficConfig) -> Self { self.map(|c| c.traffic = traffic) }
    pub fn min_delay(self, d: Duration) -> Self { self.map(|c| c.traffic.min_delay = d) }
    pub fn max_delay(self, d: Duration) -> Self { self.map(|c| c.traffic.max_delay = d) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut EngineConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("no zones configured")]
    NoZones,

    #[error("zone key must not be empty")]
    EmptyKey,

    #[error("duplicate zone key '{0}'")]
    DuplicateKey(String),

    #[error("zone '{key}' capacity must be at least 1")]
    ZeroCapacity { key: String },

    #[error("traffic delay range is inverted ({min:?} > {max:?})")]
    DelayRange { min: Duration, max: Duration },

    #[error("traffic thresholds invalid (admit {admit}, release {release}; need admit <= release <= 100)")]
    Thresholds { admit: u8, release: u8 },
}

fn validate(c: &EngineConfig) -> Result<(), ConfigError> {
    if c.zones.is_empty() {
        return Err(ConfigError::NoZones);
    }

    let mut seen = HashSet::new();
    for zone in &c.zones {
        zone.validate()?;
        if !seen.insert(zone.key.clone()) {
            return Err(ConfigError::DuplicateKey(zone.key.to_string()));
        }
    }

    c.traffic.validate()
}
