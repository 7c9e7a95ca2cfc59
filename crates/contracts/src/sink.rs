//! DataSink trait - metrics pipeline output interface
//!
//! Sinks are built once at bootstrap and shared for the process lifetime,
//! so the trait takes `&self` and must stay object safe.

use crate::{ContractError, DataBatch};

/// Data output trait
///
/// All sink implementations must implement this trait.
pub trait DataSink: Send + Sync {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Export one batch
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn export_data(&self, batch: &DataBatch) -> Result<(), ContractError>;

    /// Stop the sink, releasing whatever it holds
    fn stop(&self);
}
