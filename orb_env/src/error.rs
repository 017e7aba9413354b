//! Error types for the Orb environment.

use thiserror::Error;

/// Errors that can occur while configuring or driving a stage.
///
/// None of these arise from the round logic itself: missing entries and
/// unknown senders are skipped, never reported.
#[derive(Debug, Error)]
pub enum OrbError {
    /// A meter of zero was requested (meters must be positive)
    #[error("Invalid meter for {performer}: {value}")]
    InvalidMeter { performer: String, value: u64 },

    /// The roster names the same performer twice
    #[error("Duplicate performer: {0}")]
    DuplicatePerformer(String),

    /// Roster file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Scenario name did not match any built-in roster
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// A concurrent speak task panicked or was cancelled
    #[error("Performer task failed: {0}")]
    TaskFailed(String),

    /// File read/write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrbError {
    /// Creates a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invalid meter error.
    pub fn invalid_meter(performer: impl std::fmt::Display, value: u64) -> Self {
        Self::InvalidMeter {
            performer: performer.to_string(),
            value,
        }
    }

    /// Creates a task failure error.
    pub fn task_failed(reason: impl std::fmt::Display) -> Self {
        Self::TaskFailed(reason.to_string())
    }
}

impl From<serde_json::Error> for OrbError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
