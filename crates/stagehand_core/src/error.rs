//! Stage error types

use std::fmt;
use thiserror::Error;

/// Lifecycle phase a participant was running when it failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Update,
    Reset,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Update => f.write_str("update"),
            Phase::Reset => f.write_str("reset"),
        }
    }
}

/// Errors surfaced by the frame loop and its participants
#[derive(Error, Debug)]
pub enum StageError {
    /// A participant failed; the rest of the tick was abandoned
    #[error("participant `{participant}` failed during {phase}: {source}")]
    Participant {
        participant: String,
        phase: Phase,
        #[source]
        source: Box<StageError>,
    },

    /// Participant-specific failure reported from inside `update()` / `reset()`
    #[error("{0}")]
    Failed(String),
}

impl StageError {
    /// Convenience constructor for participant failures
    pub fn failed(message: impl Into<String>) -> Self {
        StageError::Failed(message.into())
    }

    /// Name of the participant that aborted the tick, if any
    pub fn participant(&self) -> Option<&str> {
        match self {
            StageError::Participant { participant, .. } => Some(participant),
            _ => None,
        }
    }
}

/// Result type for stage operations
pub type Result<T> = std::result::Result<T, StageError>;
