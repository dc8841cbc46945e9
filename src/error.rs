//! Error types for races, configuration and command-line horse entries.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for race operations.
pub type Result<T, E = RaceError> = std::result::Result<T, E>;

/// Errors raised by [`Race`](crate::race::Race).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RaceError {
    /// A horse was offered to a lane outside `1..=3`.
    #[error("Cannot add horse to lane {lane} because there is no such lane")]
    NoSuchLane {
        /// The rejected lane number.
        lane: usize,
    },

    /// A lane that must be occupied before the start is empty.
    #[error("lane {lane} has no horse; lanes 1 and 2 must be filled before the race starts")]
    MissingLane {
        /// The empty lane.
        lane: usize,
    },

    /// The race has already left the idle state.
    #[error("the race has already started")]
    NotIdle,

    /// A race track must be at least one unit long.
    #[error("race length must be positive, got {length}")]
    InvalidLength {
        /// The rejected length.
        length: u32,
    },
}

/// Errors raised while loading or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`Config`](crate::config::Config).
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is outside its permitted range.
    #[error("invalid config: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Errors raised when parsing a `NAME,SYMBOL,CONFIDENCE` horse entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HorseSpecError {
    /// Wrong number of comma separated fields.
    #[error("expected NAME,SYMBOL,CONFIDENCE, got {0:?}")]
    Shape(String),

    /// The name field is blank.
    #[error("horse name must not be empty")]
    EmptyName,

    /// The symbol field is not exactly one character.
    #[error("symbol must be a single character, got {0:?}")]
    Symbol(String),

    /// The confidence field is not a number.
    #[error("confidence must be a number between 0 and 1, got {0:?}")]
    Confidence(String),
}
