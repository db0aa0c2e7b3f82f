// src/engine.rs
//! Parking simulator core: [`UniparkEngine`], zones, traffic and commands.

mod command;
mod config;
mod engine;
mod errors;
mod events;
mod traffic;

pub mod zone;

pub use command::Command;
pub use command::CommandError;
pub use command::CommandOutcome;
pub use command::CommandProcessor;

pub use config::ConfigError;
pub use config::EngineConfig;
pub use config::EngineConfigBuilder;

pub use engine::UniparkEngine;
pub use errors::EngineError;

pub use events::ActionSource;
pub use events::EngineEvent;
pub use events::ZoneOutcome;

pub use traffic::TrafficConfig;
pub use traffic::TrafficGenerator;

/// Default capacity for the engine's broadcast event bus.
pub(crate) const DEFAULT_CHANNEL_CAPACITY: usize = 256;
