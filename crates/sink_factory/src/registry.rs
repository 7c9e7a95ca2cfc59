//! SinkRegistry - bootstrap resolution of all configured sinks

use std::sync::Arc;

use config_loader::SinkUri;
use contracts::{DataSink, HistoricalSource};
use metric_sink::MetricSink;
use observability::BootstrapSummary;
use tracing::{error, info, instrument, warn};

use crate::error::{Result, SinkFactoryError};
use crate::factory::{SinkBuilder, SinkFactory};
use crate::kind::SinkKind;
use crate::sink::BuiltSink;

/// Outcome of a bootstrap pass
///
/// Handed to the caller once; the registry keeps no reference to it.
#[derive(Clone)]
pub struct BuildResult {
    /// Default metric sink; unset only if explicit and implicit construction both failed
    pub metric: Option<Arc<MetricSink>>,

    /// Every sink that was built, in descriptor order (synthesized metric sink last)
    pub sinks: Vec<BuiltSink>,

    /// Historical query access of the sink matching the selector
    pub historical: Option<Arc<dyn HistoricalSource>>,

    requested: usize,
    failed: usize,
    metric_synthesized: bool,
    historical_uri: Option<String>,
}

impl BuildResult {
    /// Write-path handles of every sink
    pub fn data_sinks(&self) -> Vec<Arc<dyn DataSink>> {
        self.sinks.iter().map(BuiltSink::data_sink).collect()
    }

    /// Whether the default metric sink was synthesized rather than configured
    pub fn metric_synthesized(&self) -> bool {
        self.metric_synthesized
    }

    /// Stop every sink, in registry order
    pub fn stop_all(&self) {
        for sink in &self.sinks {
            sink.data_sink().stop();
        }
    }

    pub fn summary(&self) -> BootstrapSummary {
        BootstrapSummary {
            requested: self.requested,
            failed: self.failed,
            sinks: self.sinks.iter().map(|s| s.name().to_string()).collect(),
            metric_synthesized: self.metric_synthesized,
            has_metric_sink: self.metric.is_some(),
            historical_source: self.historical_uri.clone(),
        }
    }
}

impl std::fmt::Debug for BuildResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildResult")
            .field("metric", &self.metric.is_some())
            .field("sinks", &self.sinks)
            .field("historical", &self.historical.is_some())
            .finish()
    }
}

/// Sink registry
///
/// Builds every configured sink, guarantees the default metric sink and
/// resolves the historical source.
#[derive(Debug, Clone, Default)]
pub struct SinkRegistry<B = SinkFactory> {
    builder: B,
}

impl SinkRegistry<SinkFactory> {
    /// Registry over the built-in sink kinds
    pub fn new() -> Self {
        Self::with_builder(SinkFactory)
    }
}

impl<B: SinkBuilder> SinkRegistry<B> {
    /// Registry over a custom builder
    pub fn with_builder(builder: B) -> Self {
        Self { builder }
    }

    /// Build all sinks
    ///
    /// Per-descriptor failures are logged and skipped. The historical source
    /// is the sink whose canonical descriptor equals `historical_uri` exactly;
    /// an empty selector disables historical access. If no metric sink was
    /// configured, one is synthesized from the bare `metric` descriptor.
    /// When several metric sinks are configured the last one is the default.
    ///
    /// # Errors
    /// `NoSinksAvailable` when descriptors were supplied but the bootstrap
    /// ended with no sink at all. Callers should treat it as fatal.
    #[instrument(
        name = "sink_registry_build_all",
        skip(self, uris, historical_uri),
        fields(requested = uris.len(), historical = %historical_uri)
    )]
    pub fn build_all(&self, uris: &[SinkUri], historical_uri: &str) -> Result<BuildResult> {
        let mut sinks: Vec<BuiltSink> = Vec::with_capacity(uris.len() + 1);
        let mut metric: Option<Arc<MetricSink>> = None;
        let mut historical: Option<Arc<dyn HistoricalSource>> = None;
        let mut failed = 0;

        for uri in uris {
            let sink = match self.builder.build(uri) {
                Ok(sink) => sink,
                Err(e) => {
                    error!(uri = %uri, error = %e, "Failed to create sink");
                    observability::record_sink_build_failed(uri.key());
                    failed += 1;
                    continue;
                }
            };
            observability::record_sink_built(uri.key());

            if let Some(m) = sink.as_metric() {
                metric = Some(Arc::clone(m));
            }

            if uri.to_string() == historical_uri {
                match sink.historical() {
                    Some(h) => historical = Some(h),
                    None => error!(
                        kind = uri.key(),
                        selector = %historical_uri,
                        "Sink type does not support being used for historical access"
                    ),
                }
            }

            sinks.push(sink);
        }

        let mut metric_synthesized = false;
        if metric.is_none() {
            let uri = SinkKind::default_metric_uri();
            match self.builder.build(&uri) {
                Ok(sink) => {
                    if let Some(m) = sink.as_metric() {
                        metric = Some(Arc::clone(m));
                        metric_synthesized = true;
                    } else {
                        warn!(
                            sink = sink.name(),
                            "Default metric descriptor built a non-metric sink"
                        );
                    }
                    observability::record_sink_built(uri.key());
                    sinks.push(sink);
                }
                Err(e) => {
                    error!(error = %e, "Error while creating metric sink");
                    observability::record_sink_build_failed(uri.key());
                }
            }
        }

        if !uris.is_empty() && sinks.is_empty() {
            error!(requested = uris.len(), "No available sink to use");
            return Err(SinkFactoryError::NoSinksAvailable {
                requested: uris.len(),
            });
        }

        if !historical_uri.is_empty() && historical.is_none() {
            error!(
                historical = %historical_uri,
                "Error while initializing historical access: unable to use sink as a historical source"
            );
        }

        info!(
            sinks = sinks.len(),
            failed,
            metric = metric.is_some(),
            metric_synthesized,
            historical = historical.is_some(),
            "sink registry built"
        );

        Ok(BuildResult {
            metric,
            sinks,
            historical_uri: historical.as_ref().map(|_| historical_uri.to_string()),
            historical,
            requested: uris.len(),
            failed,
            metric_synthesized,
        })
    }
}
