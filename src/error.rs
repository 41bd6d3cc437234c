//! Error handling for ranking operations.
//!
//! Provides error types with context for persistence, observation parsing,
//! manual input and configuration failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to access {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed ranking file {path} at line {line_number}: {reason}")]
    MalformedRanking {
        path: PathBuf,
        line_number: usize,
        reason: String,
    },

    #[error("Station name {name:?} cannot be stored in the ranking file")]
    InvalidStationName { name: String },

    #[error("Failed to read observation data from {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed observation data at line {line_number}: {reason}")]
    SourceFormat { line_number: usize, reason: String },

    #[error("Score of {station} would overflow")]
    ScoreOverflow { station: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid date '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to parse configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Notification delivery failed: {message}")]
    Notification { message: String },
}

impl RankingError {
    /// Create a persistence error for a file path
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Create an error for an observation file that could not be read
    pub fn source_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceRead {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed ranking line error
    pub fn malformed_ranking(
        path: impl Into<PathBuf>,
        line_number: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedRanking {
            path: path.into(),
            line_number,
            reason: reason.into(),
        }
    }

    /// Create a source format error
    pub fn source_format(line_number: usize, reason: impl Into<String>) -> Self {
        Self::SourceFormat {
            line_number,
            reason: reason.into(),
        }
    }

    /// Create an input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Whether the error was caused by user input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::InvalidDate { .. }
                | Self::SourceFormat { .. }
                | Self::SourceRead { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RankingError>;
