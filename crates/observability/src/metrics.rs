//! Sink registry metrics
//!
//! Counters and gauges emitted while building and feeding sinks, plus an
//! in-memory summary of a bootstrap pass.

use metrics::{counter, gauge};
use serde::Serialize;

/// Record a successfully built sink
pub fn record_sink_built(kind: &str) {
    counter!(
        "sink_registry_sinks_built_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record a sink that could not be built
pub fn record_sink_build_failed(kind: &str) {
    counter!(
        "sink_registry_sink_build_failures_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record a batch accepted by a sink
pub fn record_batch_exported(sink_name: &str, metric_sets: usize) {
    counter!(
        "sink_registry_batches_exported_total",
        "sink" => sink_name.to_string()
    )
    .increment(1);

    gauge!(
        "sink_registry_metric_sets",
        "sink" => sink_name.to_string()
    )
    .set(metric_sets as f64);
}

/// Outcome of one bootstrap pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapSummary {
    /// Descriptors requested
    pub requested: usize,

    /// Descriptors that failed to build
    pub failed: usize,

    /// Names of the built sinks, in registry order
    pub sinks: Vec<String>,

    /// Whether the default metric sink was synthesized
    pub metric_synthesized: bool,

    /// Whether a default metric sink is available
    pub has_metric_sink: bool,

    /// Selector that serves historical queries, if resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_source: Option<String>,
}

impl std::fmt::Display for BootstrapSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Sink Registry Summary ===")?;
        writeln!(f, "Requested sinks: {}", self.requested)?;
        writeln!(f, "Failed sinks: {}", self.failed)?;
        writeln!(f, "Active sinks: {}", self.sinks.len())?;
        for sink in &self.sinks {
            writeln!(f, "  - {}", sink)?;
        }

        let metric = match (self.has_metric_sink, self.metric_synthesized) {
            (false, _) => "unavailable",
            (true, true) => "synthesized",
            (true, false) => "configured",
        };
        writeln!(f, "Metric sink: {}", metric)?;
        writeln!(
            f,
            "Historical source: {}",
            self.historical_source.as_deref().unwrap_or("disabled")
        )?;

        Ok(())
    }
}
