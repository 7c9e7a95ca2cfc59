//! Error types for CLI operations.

use contracts::ContractError;
use sink_factory::SinkFactoryError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration parsing error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    /// Sink registry bootstrap error
    #[error("Sink registry bootstrap failed: {0}")]
    Bootstrap(#[from] SinkFactoryError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }
}

impl From<ContractError> for CliError {
    fn from(e: ContractError) -> Self {
        match e {
            ContractError::ConfigValidation { .. } => Self::config_validation(e.to_string()),
            other => Self::config_parse(other.to_string()),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
