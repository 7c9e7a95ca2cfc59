//! HistoricalSource trait - optional query capability of a sink

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContractError, MetricValue};

/// Metric value observed at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimestampedMetricValue {
    pub timestamp: DateTime<Utc>,
    pub value: MetricValue,
}

/// Identifies the entity a historical query is about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoricalKey {
    /// Entity kind (`node`, `pod`, `ns`, ...)
    pub object_type: String,
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub namespace_name: String,
    #[serde(default)]
    pub pod_name: String,
    #[serde(default)]
    pub container_name: String,
}

impl HistoricalKey {
    pub fn node(node_name: impl Into<String>) -> Self {
        Self {
            object_type: crate::METRIC_SET_TYPE_NODE.to_string(),
            node_name: node_name.into(),
            namespace_name: String::new(),
            pod_name: String::new(),
            container_name: String::new(),
        }
    }
}

impl fmt::Display for HistoricalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object_type.as_str() {
            crate::METRIC_SET_TYPE_NODE => write!(f, "node:{}", self.node_name),
            crate::METRIC_SET_TYPE_POD => {
                write!(f, "namespace:{}/pod:{}", self.namespace_name, self.pod_name)
            }
            crate::METRIC_SET_TYPE_NAMESPACE => write!(f, "namespace:{}", self.namespace_name),
            other => write!(f, "{other}:{}", self.container_name),
        }
    }
}

/// Historical query access
///
/// Exposed by sinks that retain data long enough to answer range queries.
pub trait HistoricalSource: Send + Sync {
    /// Values of one metric for each key, restricted to `[start, end)`
    fn get_metric(
        &self,
        metric_name: &str,
        keys: &[HistoricalKey],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HashMap<HistoricalKey, Vec<TimestampedMetricValue>>, ContractError>;

    /// Names of the metrics known for a key
    fn get_metric_names(&self, key: &HistoricalKey) -> Result<Vec<String>, ContractError>;
}
