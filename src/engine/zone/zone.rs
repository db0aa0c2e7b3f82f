// src/engine/zone/zone.rs
//! Zone state: [`Zone`], [`ZoneKey`], and the admit/release protocol.
use std::fmt::Display;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::engine::zone::snapshot::ZoneSnapshot;
use crate::engine::zone::ZoneConfig;
use rand::Rng;

/// Registry key for a zone, normalized to lowercase on construction so that
/// lookups are case-insensitive ("A" and "a" name the same zone).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneKey(String);

impl ZoneKey {
    pub fn new(key: &str) -> Self {
        Self(key.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ZoneKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Display for ZoneKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// A zone is an independent parking area: a fixed number of slots, a count of
// how many are currently free, and a queue of vehicles waiting for one. Zones
// share nothing with each other; every read and write of the counters goes
// through the single mutex below, so concurrent traffic and user commands can
// hit the same zone without coordination anywhere else.
#[derive(Debug)]
pub struct Zone {
    /// Registry key of the zone (short, lowercase)
    key: ZoneKey,
    /// Display name of the zone (ie: "Viale A. Doria")
    name: String,
    /// Total number of slots in the zone
    capacity: u32,

    /// Mutable counters, guarded as one unit so snapshots are never torn
    state: Mutex<ZoneState>,
}

#[derive(Debug)]
struct ZoneState {
    free_slots: u32,
    waiting: u32,
}

impl Zone {
    /// Creates a new zone. `initial_free` is clamped into `[0, capacity]`:
    /// out-of-range startup data (negative, or more free slots than exist) is
    /// brought back into range rather than rejected.
    pub fn new<K: Into<ZoneKey>>(key: K, name: &str, capacity: u32, initial_free: i64) -> Self {
        let free_slots = initial_free.clamp(0, capacity as i64) as u32;

        Self {
            key: key.into(),
            name: name.to_string(),
            capacity,
            state: Mutex::new(ZoneState { free_slots, waiting: 0 }),
        }
    }

    /// Builds a zone from its configuration. A fixed initial free count is
    /// clamped like any other; when unset, the initial occupancy is drawn
    /// uniformly from `[capacity / 3, capacity]` free slots.
    pub fn from_config(config: &ZoneConfig) -> Self {
        let initial_free = config.initial_free.unwrap_or_else(|| {
            let mut rng = rand::rng();
            rng.random_range((config.capacity / 3) as i64..=config.capacity as i64)
        });

        Zone::new(config.key.clone(), &config.name, config.capacity, initial_free)
    }

    pub fn key(&self) -> &ZoneKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn state(&self) -> MutexGuard<'_, ZoneState> {
        self.state.lock().expect("zone state lock poisoned")
    }

    /// Try to admit one vehicle. Takes a free slot when one is available and
    /// returns `true`; otherwise the vehicle joins the waiting queue and the
    /// call returns `false`. Exactly one of the two counters changes, inside
    /// one critical section.
    pub fn admit(&self) -> bool {
        let mut state = self.state();

        if state.free_slots > 0 {
            state.free_slots -= 1;
            true
        } else {
            state.waiting += 1;
            false
        }
    }

    /// Release one vehicle. The queue is served first: when vehicles are
    /// waiting, the head of the queue takes over the vacated slot and the
    /// free count does not change. With an empty queue the slot is freed,
    /// unless the zone is already fully empty (then nothing happens and the
    /// call returns `false`).
    pub fn release(&self) -> bool {
        let mut state = self.state();

        if state.waiting > 0 {
            state.waiting -= 1;
            true
        } else if state.free_slots < self.capacity {
            state.free_slots += 1;
            true
        } else {
            false
        }
    }

    /// A consistent momentary view of the zone, taken under the same lock as
    /// the mutators. Never observes a half-applied operation.
    pub fn snapshot(&self) -> ZoneSnapshot {
        let state = self.state();
        ZoneSnapshot::new(&self.name, self.capacity, state.free_slots, state.waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn counters(zone: &Zone) -> (u32, u32) {
        let snap = zone.snapshot();
        (snap.free_slots, snap.waiting)
    }

    #[test]
    fn key_is_normalized_to_lowercase() {
        assert_eq!(ZoneKey::new(" A ").as_str(), "a");
        assert_eq!(ZoneKey::from("Sofia").to_string(), "sofia");
        assert_eq!(ZoneKey::new("A"), ZoneKey::new("a"));
    }

    #[test]
    fn new_clamps_initial_free_to_capacity() {
        let zone = Zone::new("a", "Test", 10, 20);
        assert_eq!(counters(&zone), (10, 0));
    }

    #[test]
    fn new_clamps_negative_initial_free_to_zero() {
        let zone = Zone::new("a", "Test", 10, -5);
        assert_eq!(counters(&zone), (0, 0));
    }

    #[test]
    fn admit_takes_the_last_slot_then_queues() {
        let zone = Zone::new("a", "Test", 5, 1);

        assert!(zone.admit());
        assert_eq!(counters(&zone), (0, 0));

        assert!(!zone.admit());
        assert_eq!(counters(&zone), (0, 1));
    }

    #[test]
    fn release_serves_the_queue_before_freeing_a_slot() {
        let zone = Zone::new("a", "Test", 10, 0);
        for _ in 0..5 {
            assert!(!zone.admit());
        }
        assert_eq!(counters(&zone), (0, 5));

        // The vacated slot goes straight to the queue head, not the pool.
        assert!(zone.release());
        assert_eq!(counters(&zone), (0, 4));
    }

    #[test]
    fn release_frees_a_slot_when_nobody_waits() {
        let zone = Zone::new("a", "Test", 10, 0);

        assert!(zone.release());
        assert_eq!(counters(&zone), (1, 0));
    }

    #[test]
    fn release_on_a_fully_empty_zone_is_a_noop() {
        let zone = Zone::new("a", "Test", 10, 10);

        assert!(!zone.release());
        assert_eq!(counters(&zone), (10, 0));
    }

    #[test]
    fn counters_stay_in_range_across_mixed_sequences() {
        let zone = Zone::new("a", "Test", 7, 3);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..1000 {
            if rng.random_range(0..2) == 0 {
                zone.admit();
            } else {
                zone.release();
            }

            let snap = zone.snapshot();
            assert!(snap.free_slots <= zone.capacity());
            assert_eq!(snap.occupied, zone.capacity() - snap.free_slots);
        }
    }

    #[test]
    fn concurrent_admits_fill_the_zone_exactly() {
        let zone = Arc::new(Zone::new("a", "Test", 100, 100));
        let barrier = Arc::new(Barrier::new(100));
        let admitted = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..100 {
            let zone = zone.clone();
            let barrier = barrier.clone();
            let admitted = admitted.clone();
            handles.push(thread::spawn(move || {
                barrier.wait();
                if zone.admit() {
                    admitted.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // No lost updates, no double admissions.
        assert_eq!(admitted.load(Ordering::SeqCst), 100);
        assert_eq!(counters(&zone), (0, 0));
    }

    #[test]
    fn concurrent_mixed_traffic_keeps_counters_in_range() {
        let zone = Arc::new(Zone::new("a", "Test", 16, 8));

        let mut handles = Vec::new();
        for worker in 0..8 {
            let zone = zone.clone();
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    if (worker + i) % 2 == 0 {
                        zone.admit();
                    } else {
                        zone.release();
                    }
                    assert!(zone.snapshot().free_slots <= 16);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snap = zone.snapshot();
        assert!(snap.free_slots <= zone.capacity());
        assert_eq!(snap.occupied + snap.free_slots, zone.capacity());
    }
}
