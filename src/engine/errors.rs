use crate::engine::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Engine is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
