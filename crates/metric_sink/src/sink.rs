//! MetricSink - in-memory retention of exported batches

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use contracts::{
    ContractError, DataBatch, DataSink, MetricValue, TimestampedMetricValue,
    METRIC_SET_TYPE_NAMESPACE, METRIC_SET_TYPE_NODE, METRIC_SET_TYPE_POD,
};
use tracing::{debug, info, instrument};

use crate::config::MetricSinkConfig;

const SINK_NAME: &str = "metric";

/// Long-store snapshot of one batch, restricted to the long-store metrics
#[derive(Debug)]
struct LongStoreEntry {
    timestamp: DateTime<Utc>,
    /// Metric set key -> metric name -> value
    values: HashMap<String, HashMap<String, MetricValue>>,
}

#[derive(Debug, Default)]
struct Stores {
    short: VecDeque<Arc<DataBatch>>,
    long: VecDeque<LongStoreEntry>,
}

/// In-memory metric sink
///
/// Serves the latest batch and recent points from the short store, and the
/// configured long-store metrics over a longer window.
#[derive(Debug)]
pub struct MetricSink {
    config: MetricSinkConfig,
    stores: RwLock<Stores>,
}

impl Default for MetricSink {
    fn default() -> Self {
        Self::new(MetricSinkConfig::default())
    }
}

impl MetricSink {
    /// Create a new MetricSink with the given retention
    pub fn new(config: MetricSinkConfig) -> Self {
        Self {
            config,
            stores: RwLock::new(Stores::default()),
        }
    }

    /// Retention configuration
    pub fn config(&self) -> &MetricSinkConfig {
        &self.config
    }

    /// Store a batch, evicting entries that fell out of their window at `now`
    pub fn export_data_at(&self, batch: &DataBatch, now: DateTime<Utc>) {
        let short_cutoff = cutoff(now, self.config.short_store_duration);
        let long_cutoff = cutoff(now, self.config.long_store_duration);
        let long_entry = self.long_store_entry(batch);

        let mut stores = self.stores.write().unwrap_or_else(PoisonError::into_inner);

        while stores
            .short
            .front()
            .is_some_and(|b| b.timestamp < short_cutoff)
        {
            stores.short.pop_front();
        }
        while stores
            .long
            .front()
            .is_some_and(|e| e.timestamp < long_cutoff)
        {
            stores.long.pop_front();
        }

        stores.short.push_back(Arc::new(batch.clone()));
        stores.long.push_back(long_entry);

        debug!(
            timestamp = %batch.timestamp,
            metric_sets = batch.len(),
            short_store = stores.short.len(),
            long_store = stores.long.len(),
            "batch stored"
        );
    }

    /// Most recent batch, if any
    pub fn latest_batch(&self) -> Option<Arc<DataBatch>> {
        self.read().short.back().cloned()
    }

    /// Copy of the short store, oldest first
    pub fn short_store(&self) -> Vec<Arc<DataBatch>> {
        self.read().short.iter().cloned().collect()
    }

    /// Values of `metric_name` for each key within `[start, end)`, oldest first
    ///
    /// Long-store metrics are answered from the long store, everything else
    /// from the short store. Every requested key is present in the result.
    pub fn get_metric(
        &self,
        metric_name: &str,
        keys: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> HashMap<String, Vec<TimestampedMetricValue>> {
        let mut result: HashMap<String, Vec<TimestampedMetricValue>> =
            keys.iter().map(|k| (k.clone(), Vec::new())).collect();
        let in_range = |ts: DateTime<Utc>| start <= ts && ts < end;
        let stores = self.read();

        if self.is_long_store_metric(metric_name) {
            for entry in stores.long.iter().filter(|e| in_range(e.timestamp)) {
                for (key, points) in result.iter_mut() {
                    if let Some(value) = entry.values.get(key).and_then(|m| m.get(metric_name)) {
                        points.push(TimestampedMetricValue {
                            timestamp: entry.timestamp,
                            value: *value,
                        });
                    }
                }
            }
        } else {
            for batch in stores.short.iter().filter(|b| in_range(b.timestamp)) {
                for (key, points) in result.iter_mut() {
                    if let Some(value) = batch
                        .metric_sets
                        .get(key)
                        .and_then(|set| set.metric_values.get(metric_name))
                    {
                        points.push(TimestampedMetricValue {
                            timestamp: batch.timestamp,
                            value: *value,
                        });
                    }
                }
            }
        }

        result
    }

    /// Metric names present for `key` in the latest batch, sorted
    pub fn get_metric_names(&self, key: &str) -> Vec<String> {
        let Some(batch) = self.latest_batch() else {
            return Vec::new();
        };
        let mut names: Vec<String> = batch
            .metric_sets
            .get(key)
            .map(|set| set.metric_values.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Node keys in the latest batch
    pub fn get_nodes(&self) -> Vec<String> {
        self.keys_of_type(METRIC_SET_TYPE_NODE)
    }

    /// Pod keys in the latest batch
    pub fn get_pods(&self) -> Vec<String> {
        self.keys_of_type(METRIC_SET_TYPE_POD)
    }

    /// Namespace keys in the latest batch
    pub fn get_namespaces(&self) -> Vec<String> {
        self.keys_of_type(METRIC_SET_TYPE_NAMESPACE)
    }

    fn keys_of_type(&self, set_type: &str) -> Vec<String> {
        let Some(batch) = self.latest_batch() else {
            return Vec::new();
        };
        let mut keys: Vec<String> = batch
            .metric_sets
            .iter()
            .filter(|(_, set)| set.set_type() == Some(set_type))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn is_long_store_metric(&self, metric_name: &str) -> bool {
        self.config
            .long_store_metrics
            .iter()
            .any(|m| m == metric_name)
    }

    fn long_store_entry(&self, batch: &DataBatch) -> LongStoreEntry {
        let wanted: HashSet<&str> = self
            .config
            .long_store_metrics
            .iter()
            .map(String::as_str)
            .collect();

        let values = batch
            .metric_sets
            .iter()
            .filter_map(|(key, set)| {
                let kept: HashMap<String, MetricValue> = set
                    .metric_values
                    .iter()
                    .filter(|(name, _)| wanted.contains(name.as_str()))
                    .map(|(name, value)| (name.clone(), *value))
                    .collect();
                (!kept.is_empty()).then(|| (key.clone(), kept))
            })
            .collect();

        LongStoreEntry {
            timestamp: batch.timestamp,
            values,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Stores> {
        self.stores.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DataSink for MetricSink {
    fn name(&self) -> &str {
        SINK_NAME
    }

    #[instrument(
        name = "metric_sink_export",
        skip(self, batch),
        fields(metric_sets = batch.len())
    )]
    fn export_data(&self, batch: &DataBatch) -> Result<(), ContractError> {
        self.export_data_at(batch, Utc::now());
        observability::record_batch_exported(SINK_NAME, batch.len());
        Ok(())
    }

    fn stop(&self) {
        info!(sink = SINK_NAME, "MetricSink stopped");
    }
}

/// Oldest timestamp still outside the window ending at `now`
fn cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(window)
        .ok()
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        namespace_key, node_key, pod_key, MetricSet, LABEL_NAMESPACE_NAME, METRIC_CPU_USAGE_RATE,
        METRIC_MEMORY_USAGE,
    };

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn batch(secs: i64, cpu: i64) -> DataBatch {
        let mut batch = DataBatch::new(at(secs));
        batch.metric_sets.insert(
            node_key("n1"),
            MetricSet::with_type(METRIC_SET_TYPE_NODE)
                .with_metric(METRIC_CPU_USAGE_RATE, MetricValue::Int(cpu))
                .with_metric(METRIC_MEMORY_USAGE, MetricValue::Int(1024))
                .with_metric("network/rx", MetricValue::Int(7)),
        );
        batch.metric_sets.insert(
            pod_key("default", "web"),
            MetricSet::with_type(METRIC_SET_TYPE_POD)
                .with_label(LABEL_NAMESPACE_NAME, "default")
                .with_metric(METRIC_CPU_USAGE_RATE, MetricValue::Int(cpu / 2)),
        );
        batch.metric_sets.insert(
            pod_key("kube-system", "dns"),
            MetricSet::with_type(METRIC_SET_TYPE_POD)
                .with_label(LABEL_NAMESPACE_NAME, "kube-system"),
        );
        batch.metric_sets.insert(
            namespace_key("default"),
            MetricSet::with_type(METRIC_SET_TYPE_NAMESPACE),
        );
        batch
    }

    #[test]
    fn test_empty_sink() {
        let sink = MetricSink::default();
        assert!(sink.latest_batch().is_none());
        assert!(sink.short_store().is_empty());
        assert!(sink.get_nodes().is_empty());
        assert!(sink.get_metric_names("node:n1").is_empty());
    }

    #[test]
    fn test_latest_batch_and_name() {
        let sink = MetricSink::default();
        sink.export_data_at(&batch(0, 100), at(0));
        sink.export_data_at(&batch(60, 200), at(60));

        assert_eq!(sink.name(), "metric");
        assert_eq!(sink.latest_batch().unwrap().timestamp, at(60));
        assert_eq!(sink.short_store().len(), 2);
    }

    #[test]
    fn test_short_store_eviction() {
        let sink = MetricSink::default();
        sink.export_data_at(&batch(0, 100), at(0));
        sink.export_data_at(&batch(60, 200), at(60));
        // 140s window: the batch at t=0 sits on the edge at t=140 and is kept
        sink.export_data_at(&batch(140, 300), at(140));

        let stored: Vec<_> = sink.short_store().iter().map(|b| b.timestamp).collect();
        assert_eq!(stored, vec![at(0), at(60), at(140)]);

        sink.export_data_at(&batch(141, 400), at(141));
        let stored: Vec<_> = sink.short_store().iter().map(|b| b.timestamp).collect();
        assert_eq!(stored, vec![at(60), at(140), at(141)]);
    }

    #[test]
    fn test_long_store_outlives_short_store() {
        let sink = MetricSink::default();
        for i in 0..10 {
            sink.export_data_at(&batch(i * 60, 100 + i), at(i * 60));
        }

        let keys = vec![node_key("n1")];
        let cpu = sink.get_metric(METRIC_CPU_USAGE_RATE, &keys, at(0), at(600));
        assert_eq!(cpu[&keys[0]].len(), 10);
        assert_eq!(cpu[&keys[0]][0].value, MetricValue::Int(100));
        assert_eq!(cpu[&keys[0]][9].timestamp, at(540));

        // Non long-store metric only comes from the short store
        let rx = sink.get_metric("network/rx", &keys, at(0), at(600));
        assert_eq!(rx[&keys[0]].len(), 3);
    }

    #[test]
    fn test_long_store_eviction() {
        let sink = MetricSink::default();
        sink.export_data_at(&batch(0, 1), at(0));
        sink.export_data_at(&batch(901, 2), at(901));

        let keys = vec![node_key("n1")];
        let cpu = sink.get_metric(METRIC_CPU_USAGE_RATE, &keys, at(0), at(1000));
        assert_eq!(cpu[&keys[0]].len(), 1);
        assert_eq!(cpu[&keys[0]][0].value, MetricValue::Int(2));
    }

    #[test]
    fn test_long_store_keeps_entry_on_window_edge() {
        let sink = MetricSink::default();
        sink.export_data_at(&batch(0, 1), at(0));
        sink.export_data_at(&batch(900, 2), at(900));

        let keys = vec![node_key("n1")];
        let cpu = sink.get_metric(METRIC_CPU_USAGE_RATE, &keys, at(0), at(1000));
        assert_eq!(cpu[&keys[0]].len(), 2);
        assert_eq!(cpu[&keys[0]][0].value, MetricValue::Int(1));
    }

    #[test]
    fn test_get_metric_range_is_half_open() {
        let sink = MetricSink::default();
        sink.export_data_at(&batch(0, 1), at(0));
        sink.export_data_at(&batch(60, 2), at(60));

        let keys = vec![node_key("n1"), node_key("absent")];
        let cpu = sink.get_metric(METRIC_CPU_USAGE_RATE, &keys, at(0), at(60));
        assert_eq!(cpu[&keys[0]].len(), 1);
        assert!(cpu[&keys[1]].is_empty());
    }

    #[test]
    fn test_lookups_on_latest_batch() {
        let sink = MetricSink::default();
        sink.export_data_at(&batch(0, 100), at(0));

        assert_eq!(sink.get_nodes(), vec![node_key("n1")]);
        assert_eq!(
            sink.get_pods(),
            vec![pod_key("default", "web"), pod_key("kube-system", "dns")]
        );
        assert_eq!(sink.get_namespaces(), vec![namespace_key("default")]);
        assert_eq!(
            sink.get_metric_names(&node_key("n1")),
            vec![
                "cpu/usage_rate".to_string(),
                "memory/usage".to_string(),
                "network/rx".to_string()
            ]
        );
    }

    #[test]
    fn test_export_via_trait() {
        let sink: Arc<dyn DataSink> = Arc::new(MetricSink::default());
        let batch = DataBatch::new(Utc::now());
        assert!(sink.export_data(&batch).is_ok());
        sink.stop();
    }
}
