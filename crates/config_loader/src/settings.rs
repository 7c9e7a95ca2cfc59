//! SinkSettings - file-level sink configuration

use contracts::ContractError;
use serde::{Deserialize, Serialize};

use crate::uri::{SinkUri, SinkUris};

/// Sink configuration as written in a config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkSettings {
    /// Sink descriptors, in order (`KEY[:VALUE]`)
    #[serde(default)]
    pub sinks: Vec<String>,

    /// Descriptor of the sink serving historical queries (empty = disabled)
    #[serde(default)]
    pub historical_source: String,
}

impl SinkSettings {
    /// Parse every descriptor, keeping order
    pub fn uris(&self) -> Result<SinkUris, ContractError> {
        self.sinks.iter().map(|s| SinkUri::parse(s)).collect()
    }

    /// Whether historical access was requested
    pub fn has_historical_source(&self) -> bool {
        !self.historical_source.is_empty()
    }
}
