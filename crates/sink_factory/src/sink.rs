//! BuiltSink - a constructed sink and its capabilities

use std::fmt;
use std::sync::Arc;

use contracts::{DataSink, HistoricalSource};
use metric_sink::MetricSink;

/// A sink produced by a [`SinkBuilder`](crate::SinkBuilder)
///
/// The historical capability is an explicit optional handle fixed at
/// construction time.
#[derive(Clone)]
pub enum BuiltSink {
    /// The in-memory metric sink; never historical-capable
    Metric(Arc<MetricSink>),

    /// Any other sink, supplied by a custom builder
    External(ExternalSink),
}

impl BuiltSink {
    /// Sink name
    pub fn name(&self) -> &str {
        match self {
            Self::Metric(sink) => sink.name(),
            Self::External(ext) => ext.sink.name(),
        }
    }

    /// Write-path handle
    pub fn data_sink(&self) -> Arc<dyn DataSink> {
        match self {
            Self::Metric(sink) => Arc::clone(sink) as Arc<dyn DataSink>,
            Self::External(ext) => Arc::clone(&ext.sink),
        }
    }

    /// Historical query handle, when the sink supports it
    pub fn historical(&self) -> Option<Arc<dyn HistoricalSource>> {
        match self {
            Self::Metric(_) => None,
            Self::External(ext) => ext.historical.clone(),
        }
    }

    /// The metric sink, when this is the metric kind
    pub fn as_metric(&self) -> Option<&Arc<MetricSink>> {
        match self {
            Self::Metric(sink) => Some(sink),
            Self::External(_) => None,
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, Self::Metric(_))
    }
}

impl fmt::Debug for BuiltSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric(_) => f.debug_tuple("Metric").field(&self.name()).finish(),
            Self::External(ext) => f.debug_tuple("External").field(ext).finish(),
        }
    }
}

/// A sink outside the built-in kinds
#[derive(Clone)]
pub struct ExternalSink {
    sink: Arc<dyn DataSink>,
    historical: Option<Arc<dyn HistoricalSource>>,
}

impl ExternalSink {
    /// Sink without historical access
    pub fn new(sink: Arc<dyn DataSink>) -> Self {
        Self {
            sink,
            historical: None,
        }
    }

    /// Sink that also answers historical queries
    pub fn with_historical<S>(sink: Arc<S>) -> Self
    where
        S: DataSink + HistoricalSource + 'static,
    {
        Self {
            sink: Arc::clone(&sink) as Arc<dyn DataSink>,
            historical: Some(sink as Arc<dyn HistoricalSource>),
        }
    }
}

impl fmt::Debug for ExternalSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalSink")
            .field("name", &self.sink.name())
            .field("historical", &self.historical.is_some())
            .finish()
    }
}

impl From<ExternalSink> for BuiltSink {
    fn from(sink: ExternalSink) -> Self {
        Self::External(sink)
    }
}
