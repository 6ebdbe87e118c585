//! Core error types for triage-core.
//!
//! This module defines the error hierarchy using thiserror. Validation
//! failures are reported at the add-task boundary; the engine itself has no
//! failure modes beyond them.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for triage-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Urgency or importance outside the accepted [1, 10] range
    #[error("Invalid value for '{field}': {value} is outside the accepted range 1-10")]
    InvalidRange { field: &'static str, value: i64 },

    /// Due date failed to parse as a YYYY-MM-DD calendar date
    #[error("Invalid due date '{input}': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Task description was empty after trimming
    #[error("Task description must not be empty")]
    EmptyDescription,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file
    #[error("Failed to read configuration from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
