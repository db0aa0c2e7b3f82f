// src/engine/zone.rs
//! Zone system: [`Zone`], [`ZoneKey`], [`ZoneRegistry`] and snapshots.

mod config;
mod registry;
mod snapshot;
mod zone;

pub use config::ZoneConfig;
pub use registry::ZoneRegistry;
pub use snapshot::{SystemTotals, ZoneSnapshot};
pub use zone::{Zone, ZoneKey};
