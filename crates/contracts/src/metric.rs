//! DataBatch - scrape output consumed by sinks
//!
//! Minimal metric data model: a batch of metric sets keyed by entity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// CPU usage rate in millicores
pub const METRIC_CPU_USAGE_RATE: &str = "cpu/usage_rate";

/// Memory usage in bytes
pub const METRIC_MEMORY_USAGE: &str = "memory/usage";

/// Label naming the kind of entity a metric set describes
pub const LABEL_METRIC_SET_TYPE: &str = "type";

/// Entity kinds carried in the `type` label
pub const METRIC_SET_TYPE_NODE: &str = "node";
pub const METRIC_SET_TYPE_POD: &str = "pod";
pub const METRIC_SET_TYPE_NAMESPACE: &str = "ns";
pub const METRIC_SET_TYPE_POD_CONTAINER: &str = "pod_container";
pub const METRIC_SET_TYPE_SYSTEM_CONTAINER: &str = "sys_container";

/// Label carrying the node name
pub const LABEL_NODENAME: &str = "nodename";

/// Label carrying the namespace name
pub const LABEL_NAMESPACE_NAME: &str = "namespace_name";

/// Label carrying the pod name
pub const LABEL_POD_NAME: &str = "pod_name";

/// Metric set key for a node
pub fn node_key(node: &str) -> String {
    format!("node:{node}")
}

/// Metric set key for a namespace
pub fn namespace_key(namespace: &str) -> String {
    format!("namespace:{namespace}")
}

/// Metric set key for a pod
pub fn pod_key(namespace: &str, pod: &str) -> String {
    format!("namespace:{namespace}/pod:{pod}")
}

/// A single metric value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "value_type", content = "value")]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    /// Value widened to f64
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

/// Metrics describing one entity (node, pod, container, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSet {
    /// When the entity was created
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,

    /// When the entity was scraped
    #[serde(default)]
    pub scrape_time: Option<DateTime<Utc>>,

    /// Metric name -> value
    #[serde(default)]
    pub metric_values: HashMap<String, MetricValue>,

    /// Entity labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl MetricSet {
    /// Create an empty set tagged with the given entity type
    pub fn with_type(set_type: &str) -> Self {
        let mut set = Self::default();
        set.labels
            .insert(LABEL_METRIC_SET_TYPE.to_string(), set_type.to_string());
        set
    }

    /// Entity type from the `type` label
    pub fn set_type(&self) -> Option<&str> {
        self.labels.get(LABEL_METRIC_SET_TYPE).map(String::as_str)
    }

    /// Builder-style metric insertion
    pub fn with_metric(mut self, name: impl Into<String>, value: MetricValue) -> Self {
        self.metric_values.insert(name.into(), value);
        self
    }

    /// Builder-style label insertion
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

/// One scrape worth of metric sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataBatch {
    /// Scrape timestamp
    pub timestamp: DateTime<Utc>,

    /// Metric set key -> metric set
    pub metric_sets: HashMap<String, MetricSet>,
}

impl DataBatch {
    /// Create an empty batch at the given time
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            metric_sets: HashMap::new(),
        }
    }

    /// Number of metric sets in the batch
    pub fn len(&self) -> usize {
        self.metric_sets.len()
    }

    /// Whether the batch has no metric sets
    pub fn is_empty(&self) -> bool {
        self.metric_sets.is_empty()
    }
}
