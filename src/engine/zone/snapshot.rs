//! Point-in-time views: [`ZoneSnapshot`] per zone, [`SystemTotals`] across zones.

use serde::{Deserialize, Serialize};

/// A consistent momentary view of a single zone, taken under the zone's own
/// lock. The serialized field names are the wire shape renderers consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSnapshot {
    /// Display name of the zone
    pub name: String,
    /// Total number of slots
    pub capacity: u32,
    /// Slots currently free
    pub free_slots: u32,
    /// Slots currently taken
    pub occupied: u32,
    /// Vehicles queued for admission
    pub waiting: u32,
    /// Occupancy percentage, `0.0..=100.0`
    pub rate: f64,
}

impl ZoneSnapshot {
    pub(crate) fn new(name: &str, capacity: u32, free_slots: u32, waiting: u32) -> Self {
        let occupied = capacity - free_slots;
        let rate = if capacity > 0 {
            occupied as f64 / capacity as f64 * 100.0
        } else {
            0.0
        };

        Self {
            name: name.to_string(),
            capacity,
            free_slots,
            occupied,
            waiting,
            rate,
        }
    }
}

/// Totals summed over a set of per-zone snapshots.
///
/// Each snapshot is taken under its own zone's lock, one after the other, so
/// the sum is a good display figure but not a single atomic view of the whole
/// system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemTotals {
    pub capacity: u32,
    pub free_slots: u32,
    pub occupied: u32,
    pub waiting: u32,
}

impl SystemTotals {
    pub fn from_snapshots<'a, I>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = &'a ZoneSnapshot>,
    {
        let mut totals = Self::default();
        for snap in snapshots {
            totals.capacity += snap.capacity;
            totals.free_slots += snap.free_slots;
            totals.occupied += snap.occupied;
            totals.waiting += snap.waiting;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_the_occupied_percentage() {
        let snap = ZoneSnapshot::new("Test", 100, 50, 0);
        assert_eq!(snap.occupied, 50);
        assert_eq!(snap.rate, 50.0);

        let snap = ZoneSnapshot::new("Test", 60, 60, 0);
        assert_eq!(snap.occupied, 0);
        assert_eq!(snap.rate, 0.0);
    }

    #[test]
    fn zero_capacity_rate_is_zero_not_nan() {
        let snap = ZoneSnapshot::new("Test", 0, 0, 0);
        assert_eq!(snap.rate, 0.0);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let snap = ZoneSnapshot::new("Viale A. Doria", 60, 45, 2);
        let value = serde_json::to_value(&snap).unwrap();

        assert_eq!(value["name"], "Viale A. Doria");
        assert_eq!(value["capacity"], 60);
        assert_eq!(value["freeSlots"], 45);
        assert_eq!(value["occupied"], 15);
        assert_eq!(value["waiting"], 2);
        assert_eq!(value["rate"], 25.0);
    }

    #[test]
    fn totals_sum_over_snapshots() {
        let snaps = vec![
            ZoneSnapshot::new("A", 60, 40, 1),
            ZoneSnapshot::new("B", 45, 5, 3),
            ZoneSnapshot::new("C", 80, 80, 0),
        ];

        let totals = SystemTotals::from_snapshots(&snaps);
        assert_eq!(totals.capacity, 185);
        assert_eq!(totals.free_slots, 125);
        assert_eq!(totals.occupied, 60);
        assert_eq!(totals.waiting, 4);
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        let empty: Vec<ZoneSnapshot> = Vec::new();
        assert_eq!(SystemTotals::from_snapshots(&empty), SystemTotals::default());
    }
}
