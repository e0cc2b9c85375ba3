use logger::LoggerError;
use thiserror::Error;

/// Represents errors that can occur while loading or replaying missions.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid input. Please check your input and try again.")]
    InvalidInput,
    #[error("Parse error in {path}: {reason}")]
    ParseError { path: String, reason: String },
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),
    #[error("Invalid mission '{name}': {reason}")]
    InvalidMission { name: String, reason: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Mission not found: index {0}")]
    MissionNotFound(usize),
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
    #[error("Timer lock error: {0}")]
    TimerLockError(String),
    #[error("Timer start error: {0}")]
    TimerStartError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Logger error: {0}")]
    Logger(#[from] LoggerError),
}

impl SimError {
    pub(crate) fn invalid_mission(name: &str, reason: impl Into<String>) -> Self {
        SimError::InvalidMission {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
