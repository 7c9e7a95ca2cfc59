//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 -> registry -> sink 全链路
//! - 启动阶段的不变量 (默认 metric sink、历史源解析、致命错误)

#[cfg(test)]
mod contract_tests {
    use contracts::{node_key, pod_key, HistoricalKey, METRIC_SET_TYPE_POD};

    #[test]
    fn test_historical_keys_match_batch_keys() {
        assert_eq!(HistoricalKey::node("n1").to_string(), node_key("n1"));

        let pod = HistoricalKey {
            object_type: METRIC_SET_TYPE_POD.to_string(),
            namespace_name: "default".to_string(),
            pod_name: "web".to_string(),
            ..HistoricalKey::node("")
        };
        assert_eq!(pod.to_string(), pod_key("default", "web"));
    }

    #[test]
    fn test_default_descriptor_is_the_metric_kind() {
        let uri = sink_factory::SinkKind::default_metric_uri();
        assert_eq!(uri.to_string(), sink_factory::SinkKind::METRIC_KEY);
        assert!(sink_factory::SinkKind::from_uri(&uri).is_ok());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Duration, Utc};
    use config_loader::{ConfigFormat, ConfigLoader, SinkUri, SinkUris};
    use contracts::{
        node_key, ContractError, DataBatch, DataSink, HistoricalKey, HistoricalSource, MetricSet,
        MetricValue, TimestampedMetricValue, METRIC_CPU_USAGE_RATE, METRIC_SET_TYPE_NODE,
    };
    use sink_factory::{
        BuiltSink, ExternalSink, SinkBuilder, SinkFactory, SinkFactoryError, SinkRegistry,
    };

    /// In-memory store answering historical queries from what it was fed
    #[derive(Default)]
    struct RecordingStore {
        points: Mutex<Vec<(DateTime<Utc>, String, MetricValue)>>,
    }

    impl DataSink for RecordingStore {
        fn name(&self) -> &str {
            "historicalstore"
        }

        fn export_data(&self, batch: &DataBatch) -> Result<(), ContractError> {
            let mut points = self
                .points
                .lock()
                .map_err(|e| ContractError::sink_write("historicalstore", e.to_string()))?;
            for (key, set) in &batch.metric_sets {
                if let Some(value) = set.metric_values.get(METRIC_CPU_USAGE_RATE) {
                    points.push((batch.timestamp, key.clone(), *value));
                }
            }
            Ok(())
        }

        fn stop(&self) {}
    }

    impl HistoricalSource for RecordingStore {
        fn get_metric(
            &self,
            metric_name: &str,
            keys: &[HistoricalKey],
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<HashMap<HistoricalKey, Vec<TimestampedMetricValue>>, ContractError> {
            if metric_name != METRIC_CPU_USAGE_RATE {
                return Err(ContractError::historical_query(metric_name, "not stored"));
            }
            let points = self
                .points
                .lock()
                .map_err(|e| ContractError::historical_query(metric_name, e.to_string()))?;

            Ok(keys
                .iter()
                .map(|key| {
                    let wanted = key.to_string();
                    let values = points
                        .iter()
                        .filter(|(ts, k, _)| *k == wanted && start <= *ts && *ts < end)
                        .map(|(ts, _, v)| TimestampedMetricValue {
                            timestamp: *ts,
                            value: *v,
                        })
                        .collect();
                    (key.clone(), values)
                })
                .collect())
        }

        fn get_metric_names(&self, _key: &HistoricalKey) -> Result<Vec<String>, ContractError> {
            Ok(vec![METRIC_CPU_USAGE_RATE.to_string()])
        }
    }

    /// Built-in kinds plus `historicalstore`
    struct ExtendedFactory;

    impl SinkBuilder for ExtendedFactory {
        fn build(&self, uri: &SinkUri) -> sink_factory::Result<BuiltSink> {
            match uri.key() {
                "historicalstore" => Ok(ExternalSink::with_historical(Arc::new(
                    RecordingStore::default(),
                ))
                .into()),
                _ => SinkFactory.build(uri),
            }
        }
    }

    /// Builder that knows no kinds at all
    struct EmptyFactory;

    impl SinkBuilder for EmptyFactory {
        fn build(&self, uri: &SinkUri) -> sink_factory::Result<BuiltSink> {
            Err(SinkFactoryError::unrecognized(uri.key()))
        }
    }

    fn node_batch(ts: DateTime<Utc>, cpu: i64) -> DataBatch {
        let mut batch = DataBatch::new(ts);
        batch.metric_sets.insert(
            node_key("n1"),
            MetricSet::with_type(METRIC_SET_TYPE_NODE)
                .with_metric(METRIC_CPU_USAGE_RATE, MetricValue::Int(cpu)),
        );
        batch
    }

    #[test]
    fn test_config_file_to_registry() {
        let settings = ConfigLoader::load_from_str(
            r#"
sinks = ["bogus:http://nowhere", "metric"]
historical_source = ""
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        let uris = settings.uris().unwrap();
        let result = SinkRegistry::new()
            .build_all(&uris, &settings.historical_source)
            .unwrap();

        assert_eq!(result.sinks.len(), 1);
        assert!(!result.metric_synthesized());
        assert!(result.historical.is_none());
        assert_eq!(result.summary().failed, 1);
    }

    #[test]
    fn test_scenario_metric_only() {
        let uris: SinkUris = "metric".parse().unwrap();
        let result = SinkRegistry::new().build_all(&uris, "").unwrap();

        assert_eq!(result.sinks.len(), 1);
        assert!(Arc::ptr_eq(
            result.metric.as_ref().unwrap(),
            result.sinks[0].as_metric().unwrap()
        ));
        assert!(result.historical.is_none());
    }

    #[test]
    fn test_scenario_bogus_only() {
        let uris: SinkUris = "bogus".parse().unwrap();
        let result = SinkRegistry::new().build_all(&uris, "").unwrap();

        assert_eq!(result.sinks.len(), 1);
        assert!(result.metric_synthesized());
        assert!(Arc::ptr_eq(
            result.metric.as_ref().unwrap(),
            result.sinks[0].as_metric().unwrap()
        ));
        assert!(result.historical.is_none());
    }

    #[test]
    fn test_scenario_empty() {
        let result = SinkRegistry::new().build_all(&SinkUris::new(), "").unwrap();

        assert_eq!(result.sinks.len(), 1);
        assert!(result.metric_synthesized());
        assert!(result.historical.is_none());
    }

    #[test]
    fn test_scenario_historical_store() {
        let uris: SinkUris = "metric,historicalstore".parse().unwrap();
        let result = SinkRegistry::with_builder(ExtendedFactory)
            .build_all(&uris, "historicalstore")
            .unwrap();

        assert_eq!(result.sinks.len(), 2);
        assert!(result.sinks[0].is_metric());
        assert_eq!(result.sinks[1].name(), "historicalstore");

        // Data written through the write path is visible through the historical view
        let now = Utc::now();
        for (i, sink) in result.data_sinks().iter().enumerate() {
            sink.export_data(&node_batch(now, 100 + i as i64)).unwrap();
        }

        let historical = result.historical.as_ref().unwrap();
        let key = HistoricalKey::node("n1");
        let values = historical
            .get_metric(
                METRIC_CPU_USAGE_RATE,
                std::slice::from_ref(&key),
                now - Duration::minutes(1),
                now + Duration::minutes(1),
            )
            .unwrap();
        assert_eq!(values[&key].len(), 1);
        assert_eq!(values[&key][0].value, MetricValue::Int(101));

        // The metric sink received the same batch
        let metric = result.metric.as_ref().unwrap();
        assert_eq!(metric.get_nodes(), vec![node_key("n1")]);
    }

    #[test]
    fn test_duplicate_metric_last_wins() {
        let uris: SinkUris = "metric,metric".parse().unwrap();
        let result = SinkRegistry::new().build_all(&uris, "").unwrap();

        let metric = result.metric.as_ref().unwrap();
        assert!(Arc::ptr_eq(metric, result.sinks[1].as_metric().unwrap()));

        // Exporting to the first does not reach the default
        result.sinks[0]
            .data_sink()
            .export_data(&node_batch(Utc::now(), 1))
            .unwrap();
        assert!(metric.latest_batch().is_none());
    }

    #[test]
    fn test_all_unrecognized_without_synthesis_is_fatal() {
        let uris: SinkUris = "bogus,other:x".parse().unwrap();
        let err = SinkRegistry::with_builder(EmptyFactory)
            .build_all(&uris, "")
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_input_without_synthesis_is_not_fatal() {
        let result = SinkRegistry::with_builder(EmptyFactory)
            .build_all(&SinkUris::new(), "historicalstore")
            .unwrap();
        assert!(result.metric.is_none());
        assert!(result.sinks.is_empty());
        assert!(result.historical.is_none());
    }

    #[test]
    fn test_metric_as_historical_selector_stays_unset() {
        let uris: SinkUris = "metric,historicalstore".parse().unwrap();
        let result = SinkRegistry::with_builder(ExtendedFactory)
            .build_all(&uris, "metric")
            .unwrap();
        assert!(result.historical.is_none());
        assert_eq!(result.sinks.len(), 2);
    }

    #[test]
    fn test_canonical_form_matches_selector() {
        let uri = SinkUri::parse("historicalstore:http://db:8086?db=k8s").unwrap();
        let uris = SinkUris::from(vec![uri.clone()]);
        let result = SinkRegistry::with_builder(ExtendedFactory)
            .build_all(&uris, &uri.to_string())
            .unwrap();
        assert!(result.historical.is_some());
        assert_eq!(
            result.summary().historical_source.as_deref(),
            Some("historicalstore:http://db:8086?db=k8s")
        );
    }
}
