//! Engine event types.
//!
//! Events published on the engine's broadcast bus: lifecycle transitions plus
//! one [`EngineEvent::ZoneActivity`] per performed parking action, whether it
//! came from the simulated traffic or from a user command. Renderers and log
//! feeds subscribe through `UniparkEngine::subscribe_events`.

use std::fmt::Display;

use crate::engine::zone::{ZoneKey, ZoneSnapshot};

/// Where a parking action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    /// Issued by a zone's background traffic generator
    Traffic,
    /// Issued by a user command
    Manual,
}

impl Display for ActionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionSource::Traffic => write!(f, "traffic"),
            ActionSource::Manual => write!(f, "manual"),
        }
    }
}

/// Outcome of a single admit/release call on a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneOutcome {
    /// A free slot was taken
    Admitted,
    /// No slot free; the vehicle joined the waiting queue
    Queued,
    /// A vehicle left; its slot went to the queue head or back to the pool
    Released,
    /// Nothing to release, the zone was already fully empty
    AlreadyEmpty,
}

impl ZoneOutcome {
    /// Outcome of an admit call, from its boolean result.
    pub fn from_admit(admitted: bool) -> Self {
        if admitted {
            ZoneOutcome::Admitted
        } else {
            ZoneOutcome::Queued
        }
    }

    /// Outcome of a release call, from its boolean result.
    pub fn from_release(released: bool) -> Self {
        if released {
            ZoneOutcome::Released
        } else {
            ZoneOutcome::AlreadyEmpty
        }
    }
}

impl Display for ZoneOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneOutcome::Admitted => write!(f, "admitted"),
            ZoneOutcome::Queued => write!(f, "queued"),
            ZoneOutcome::Released => write!(f, "released"),
            ZoneOutcome::AlreadyEmpty => write!(f, "already empty"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum EngineEvent {
    // ****************************************
    // ** Engine lifecycle
    /// Engine has started; traffic generators are being spawned
    EngineStarted,
    /// Engine is shutting down
    EngineShutdown { reason: String },

    // ****************************************
    // ** Zone activity
    /// One admit/release call was performed on a zone
    ZoneActivity {
        zone: ZoneKey,
        source: ActionSource,
        outcome: ZoneOutcome,
        snapshot: ZoneSnapshot,
    },
}
