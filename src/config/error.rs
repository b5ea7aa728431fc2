//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Default budget must be between 1 and 240 minutes")]
    InvalidBudget,

    #[error("Warning lead must be shorter than the default budget")]
    InvalidWarningLead,

    #[error("Sweep interval must be at least one second")]
    InvalidSweepInterval,

    #[error("Analyzer windows must be at least one turn")]
    InvalidWindow,

    #[error("Transcript directory cannot be empty")]
    EmptyTranscriptDir,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
