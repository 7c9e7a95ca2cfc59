//! Sink Factory error types

use thiserror::Error;

/// Sink Factory specific error
#[derive(Debug, Error)]
pub enum SinkFactoryError {
    /// Descriptor kind has no builder
    #[error("sink not recognized: {key}")]
    UnrecognizedKind { key: String },

    /// Sinks were requested but none could be built
    ///
    /// This is the only fatal bootstrap outcome.
    #[error("no available sink to use: none of the {requested} requested sinks could be built")]
    NoSinksAvailable { requested: usize },
}

impl SinkFactoryError {
    /// Create unrecognized kind error
    pub fn unrecognized(key: impl Into<String>) -> Self {
        Self::UnrecognizedKind { key: key.into() }
    }

    /// Whether the process should not continue past this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NoSinksAvailable { .. })
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SinkFactoryError>;
