//! Textual command handling: parse, validate, dispatch.
//!
//! Instructions are two-token lines, `park <zone>` or `unpark <zone>`, plus a
//! bare `exit`/`quit`. Parsing and dispatch are synchronous, and malformed
//! input is a value the host can show the user, never a processor failure.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::engine::events::{ActionSource, EngineEvent, ZoneOutcome};
use crate::engine::zone::{ZoneKey, ZoneRegistry, ZoneSnapshot};

/// A parsed, validated instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Admit one vehicle into the zone
    Park(ZoneKey),
    /// Release one vehicle from the zone
    Unpark(ZoneKey),
    /// Stop the program
    Exit,
}

impl Command {
    /// Parse a raw input line. `Ok(None)` is a blank line: nothing to do and
    /// nothing to report. The zone key is normalized but not resolved here;
    /// that happens at dispatch.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [] => Ok(None),
            [single] if single.eq_ignore_ascii_case("exit") || single.eq_ignore_ascii_case("quit") => {
                Ok(Some(Command::Exit))
            }
            [action, key] => match action.to_lowercase().as_str() {
                "park" => Ok(Some(Command::Park(ZoneKey::new(key)))),
                "unpark" => Ok(Some(Command::Unpark(ZoneKey::new(key)))),
                other => Err(CommandError::UnknownAction(other.to_string())),
            },
            _ => Err(CommandError::Format),
        }
    }
}

/// What a processed line amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// An admit/release was performed; the snapshot is the state right after
    Zone {
        zone: ZoneKey,
        outcome: ZoneOutcome,
        snapshot: ZoneSnapshot,
    },
    /// The caller asked to stop
    Exit,
    /// Blank input; nothing happened
    Noop,
}

/// Why a line was rejected. All of these are user-input errors; the processor
/// itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("expected: <park|unpark> <zone>")]
    Format,

    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("unknown zone '{0}'")]
    UnknownZone(String),
}

/// Parses instruction lines and dispatches them against the registry.
///
/// One of these sits in front of every input surface; each processed action
/// is also published on the event bus with [`ActionSource::Manual`] so it
/// shows up in activity feeds next to the simulated traffic.
#[derive(Clone)]
pub struct CommandProcessor {
    registry: Arc<ZoneRegistry>,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl CommandProcessor {
    pub fn new(registry: Arc<ZoneRegistry>, event_tx: broadcast::Sender<EngineEvent>) -> Self {
        Self { registry, event_tx }
    }

    /// Process one raw input line end-to-end: parse, resolve, dispatch.
    pub fn process(&self, line: &str) -> Result<CommandOutcome, CommandError> {
        match Command::parse(line)? {
            None => Ok(CommandOutcome::Noop),
            Some(Command::Exit) => Ok(CommandOutcome::Exit),
            Some(Command::Park(key)) => self.dispatch(key, true),
            Some(Command::Unpark(key)) => self.dispatch(key, false),
        }
    }

    fn dispatch(&self, key: ZoneKey, admit: bool) -> Result<CommandOutcome, CommandError> {
        let Some(zone) = self.registry.get(&key) else {
            return Err(CommandError::UnknownZone(key.to_string()));
        };

        let outcome = if admit {
            ZoneOutcome::from_admit(zone.admit())
        } else {
            ZoneOutcome::from_release(zone.release())
        };
        let snapshot = zone.snapshot();

        log::debug!(
            "manual {} on zone '{}': {}",
            if admit { "park" } else { "unpark" },
            key,
            outcome
        );

        let _ = self.event_tx.send(EngineEvent::ZoneActivity {
            zone: key.clone(),
            source: ActionSource::Manual,
            outcome,
            snapshot: snapshot.clone(),
        });

        Ok(CommandOutcome::Zone { zone: key, outcome, snapshot })
    }
}
