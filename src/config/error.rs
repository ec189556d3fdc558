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
    #[error("Schema version must look like major.minor.patch, got '{0}'")]
    InvalidSchemaVersion(String),

    #[error("Value tree title must not be empty")]
    EmptyValueTreeTitle,

    #[error("Unknown log level '{0}'")]
    InvalidLogLevel(String),
}
