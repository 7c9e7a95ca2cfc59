//! Closed set of sink kinds known to the factory

use config_loader::SinkUri;
use metric_sink::MetricSinkConfig;

use crate::error::{Result, SinkFactoryError};

/// A recognized sink kind with its construction parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    /// In-memory metric retention
    Metric(MetricSinkConfig),
}

impl SinkKind {
    /// Descriptor key of the in-memory metric sink
    pub const METRIC_KEY: &'static str = "metric";

    /// Resolve a descriptor to its kind
    ///
    /// # Errors
    /// `UnrecognizedKind` when the key is not a known kind.
    pub fn from_uri(uri: &SinkUri) -> Result<Self> {
        match uri.key() {
            Self::METRIC_KEY => Ok(Self::Metric(MetricSinkConfig::default())),
            other => Err(SinkFactoryError::unrecognized(other)),
        }
    }

    /// Descriptor key of this kind
    pub fn key(&self) -> &'static str {
        match self {
            Self::Metric(_) => Self::METRIC_KEY,
        }
    }

    /// Whether sinks of this kind expose historical query access
    pub fn supports_historical(&self) -> bool {
        match self {
            Self::Metric(_) => false,
        }
    }

    /// Canonical descriptor used when the default metric sink is synthesized
    pub fn default_metric_uri() -> SinkUri {
        SinkUri::new(Self::METRIC_KEY)
    }
}
