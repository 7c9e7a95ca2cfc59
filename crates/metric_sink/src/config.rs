//! Retention configuration

use std::time::Duration;

use contracts::{METRIC_CPU_USAGE_RATE, METRIC_MEMORY_USAGE};

/// Short store window (recent-point serving)
pub const DEFAULT_SHORT_STORE_DURATION: Duration = Duration::from_secs(140);

/// Long store window (historical buffering)
pub const DEFAULT_LONG_STORE_DURATION: Duration = Duration::from_secs(15 * 60);

/// Retention parameters of a [`MetricSink`](crate::MetricSink)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSinkConfig {
    /// How long whole batches are kept
    pub short_store_duration: Duration,

    /// How long long-store metrics are kept
    pub long_store_duration: Duration,

    /// Metrics copied into the long store
    pub long_store_metrics: Vec<String>,
}

impl Default for MetricSinkConfig {
    fn default() -> Self {
        Self {
            short_store_duration: DEFAULT_SHORT_STORE_DURATION,
            long_store_duration: DEFAULT_LONG_STORE_DURATION,
            long_store_metrics: vec![
                METRIC_CPU_USAGE_RATE.to_string(),
                METRIC_MEMORY_USAGE.to_string(),
            ],
        }
    }
}
