use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::engine::command::CommandProcessor;
use crate::engine::config::EngineConfig;
use crate::engine::errors::EngineError;
use crate::engine::events::EngineEvent;
use crate::engine::traffic::TrafficGenerator;
use crate::engine::zone::ZoneRegistry;
use crate::engine::DEFAULT_CHANNEL_CAPACITY;

/// The simulator supervisor: owns the zone registry, the event bus and the
/// traffic workers.
#[derive(Debug)]
pub struct UniparkEngine {
    /// Configuration for the whole engine.
    config: Arc<EngineConfig>,
    /// Zones managed by this engine, fixed at construction.
    registry: Arc<ZoneRegistry>,
    /// Event sender (cloned into workers and processors).
    event_tx: broadcast::Sender<EngineEvent>,
    /// Root cancellation token; each worker runs on a child token.
    cancel: CancellationToken,
    /// Join handles of the spawned traffic workers.
    workers: Vec<JoinHandle<()>>,
    /// Is the engine running?
    running: bool,
}

impl UniparkEngine {
    /// Create a new engine.
    ///
    /// If `config` is `None`, [`EngineConfig::default`] is used. The
    /// configuration is validated here as well, so hand-assembled configs go
    /// through the same checks as built ones.
    pub fn new(config: Option<EngineConfig>) -> Result<Self, EngineError> {
        let resolved_config = config.unwrap_or_else(EngineConfig::default);
        resolved_config.validate()?;

        // Broadcast event bus. Subscribe to receive engine events
        // (lifecycle and per-action zone activity).
        let (event_tx, _first_rx) = broadcast::channel::<EngineEvent>(DEFAULT_CHANNEL_CAPACITY);

        let registry = Arc::new(ZoneRegistry::new(&resolved_config.zones));

        Ok(Self {
            config: Arc::new(resolved_config),
            registry,
            event_tx,
            cancel: CancellationToken::new(),
            workers: Vec::new(),
            running: false,
        })
    }

    /// Spawn one traffic generator per zone onto the ambient tokio runtime.
    ///
    /// Must be called from within a runtime. A second call returns
    /// [`EngineError::AlreadyRunning`].
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.running {
            return Err(EngineError::AlreadyRunning);
        }
        self.running = true;

        // Subscribers see the start marker before any traffic activity.
        let _ = self.event_tx.send(EngineEvent::EngineStarted);

        for zone in self.registry.all() {
            let generator = TrafficGenerator::new(
                zone.clone(),
                self.config.traffic.clone(),
                self.event_tx.clone(),
                self.cancel.child_token(),
            );
            self.workers.push(tokio::spawn(generator.run()));
        }

        log::info!(
            "engine started: {} zones under simulated traffic",
            self.registry.len()
        );
        Ok(())
    }

    /// Cancel all traffic workers and wait for them to wind down. Workers
    /// race their sleep against cancellation, so this returns promptly.
    /// Safe to call more than once.
    pub async fn shutdown(&mut self) -> Result<(), EngineError> {
        if !self.running {
            return Ok(());
        }
        self.running = false;

        let _ = self.event_tx.send(EngineEvent::EngineShutdown {
            reason: "host requested shutdown".to_string(),
        });
        self.cancel.cancel();

        for worker in self.workers.drain(..) {
            if let Err(e) = worker.await {
                log::warn!("traffic worker ended abnormally: {e}");
            }
        }

        log::info!("engine stopped");
        Ok(())
    }

    /// The zone registry backing this engine.
    pub fn registry(&self) -> Arc<ZoneRegistry> {
        self.registry.clone()
    }

    /// Subscribe to engine events. Only events sent from this point on are
    /// received.
    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// A command processor wired to this engine's registry and event bus.
    pub fn command_processor(&self) -> CommandProcessor {
        CommandProcessor::new(self.registry.clone(), self.event_tx.clone())
    }
}
