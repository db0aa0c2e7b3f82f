//! Background traffic: one [`TrafficGenerator`] task per zone.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::engine::config::ConfigError;
use crate::engine::events::{ActionSource, EngineEvent, ZoneOutcome};
use crate::engine::zone::Zone;

/// Traffic pattern for a zone's generator.
///
/// Every cycle sleeps a uniform random duration in `[min_delay, max_delay]`,
/// then draws a roll in `[0, 100)`: below `admit_threshold` a vehicle
/// arrives, below `release_threshold` one leaves, and the rest of the band is
/// idle.
#[derive(Debug, Clone)]
pub struct TrafficConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub admit_threshold: u8,
    pub release_threshold: u8,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(5),
            admit_threshold: 40,
            release_threshold: 80,
        }
    }
}

impl TrafficConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay > self.max_delay {
            return Err(ConfigError::DelayRange { min: self.min_delay, max: self.max_delay });
        }
        if self.admit_threshold > self.release_threshold || self.release_threshold > 100 {
            return Err(ConfigError::Thresholds {
                admit: self.admit_threshold,
                release: self.release_threshold,
            });
        }
        Ok(())
    }
}

/// The per-zone background worker. Owns its RNG and its end of the event
/// bus; shares nothing with other generators beyond the zone itself.
pub struct TrafficGenerator {
    zone: Arc<Zone>,
    config: TrafficConfig,
    event_tx: broadcast::Sender<EngineEvent>,
    cancel: CancellationToken,
    rng: StdRng,
}

impl TrafficGenerator {
    pub fn new(
        zone: Arc<Zone>,
        config: TrafficConfig,
        event_tx: broadcast::Sender<EngineEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            zone,
            config,
            event_tx,
            cancel,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Same generator with a fixed RNG seed, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Run until cancelled. The sleep is raced against cancellation, so a
    /// shutdown never waits out a full traffic delay; a mid-flight action is
    /// always finished before the loop exits.
    pub async fn run(mut self) {
        log::debug!("traffic generator for zone '{}' started", self.zone.key());

        loop {
            let delay = self.rng.random_range(self.config.min_delay..=self.config.max_delay);

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }

            let roll: u8 = self.rng.random_range(0..100);
            if let Some(outcome) = self.step(roll) {
                let snapshot = self.zone.snapshot();
                log::debug!(
                    "zone '{}': traffic roll {} -> {} (free {}/{}, waiting {})",
                    self.zone.key(),
                    roll,
                    outcome,
                    snapshot.free_slots,
                    snapshot.capacity,
                    snapshot.waiting
                );

                let _ = self.event_tx.send(EngineEvent::ZoneActivity {
                    zone: self.zone.key().clone(),
                    source: ActionSource::Traffic,
                    outcome,
                    snapshot,
                });
            }
        }

        log::debug!("traffic generator for zone '{}' stopped", self.zone.key());
    }

    /// Applies one roll against the zone. `None` means the idle band was hit
    /// and nothing was called.
    fn step(&self, roll: u8) -> Option<ZoneOutcome> {
        if roll < self.config.admit_threshold {
            Some(ZoneOutcome::from_admit(self.zone.admit()))
        } else if roll < self.config.release_threshold {
            Some(ZoneOutcome::from_release(self.zone.release()))
        } else {
            None
        }
    }
}
