//! Immutable zone registry: built once at startup, lookups forever after.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::zone::snapshot::{SystemTotals, ZoneSnapshot};
use crate::engine::zone::{Zone, ZoneConfig, ZoneKey};

/// Fixed mapping from [`ZoneKey`] to its [`Zone`].
///
/// The registry never changes after construction, so reads take no lock; the
/// zones themselves carry all the synchronization. Iteration order matches
/// configuration order, which is what renderers display.
#[derive(Debug)]
pub struct ZoneRegistry {
    order: Vec<Arc<Zone>>,
    by_key: HashMap<ZoneKey, Arc<Zone>>,
}

impl ZoneRegistry {
    /// Builds the registry from zone configs. Keys are assumed distinct;
    /// `EngineConfig` validation rejects duplicates before this runs.
    pub fn new(zones: &[ZoneConfig]) -> Self {
        let mut order = Vec::with_capacity(zones.len());
        let mut by_key = HashMap::with_capacity(zones.len());

        for config in zones {
            let zone = Arc::new(Zone::from_config(config));
            by_key.insert(zone.key().clone(), zone.clone());
            order.push(zone);
        }

        Self { order, by_key }
    }

    /// Exact lookup by an already-normalized key.
    pub fn get(&self, key: &ZoneKey) -> Option<Arc<Zone>> {
        self.by_key.get(key).cloned()
    }

    /// Lookup from a raw string; normalization makes it case-insensitive
    /// ("A" resolves the zone keyed "a").
    pub fn lookup(&self, key: &str) -> Option<Arc<Zone>> {
        self.get(&ZoneKey::new(key))
    }

    /// All zones, in configuration order.
    pub fn all(&self) -> &[Arc<Zone>] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Snapshot every zone, in configuration order. Each snapshot is taken
    /// under its own zone's lock, one after the other.
    pub fn snapshot_all(&self) -> Vec<ZoneSnapshot> {
        self.order.iter().map(|zone| zone.snapshot()).collect()
    }

    /// Sum of the current per-zone snapshots.
    pub fn totals(&self) -> SystemTotals {
        SystemTotals::from_snapshots(&self.snapshot_all())
    }
}
