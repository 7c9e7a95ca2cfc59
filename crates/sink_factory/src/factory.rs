//! SinkFactory - builds one sink from one descriptor

use std::sync::Arc;

use config_loader::SinkUri;
use metric_sink::MetricSink;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::kind::SinkKind;
use crate::sink::BuiltSink;

/// Builds a single sink from a descriptor
///
/// Implementations must not register the sink anywhere; the registry owns
/// aggregation.
pub trait SinkBuilder {
    /// Build a new, independent sink
    ///
    /// # Errors
    /// `UnrecognizedKind` when the descriptor names an unknown kind.
    fn build(&self, uri: &SinkUri) -> Result<BuiltSink>;
}

impl<B: SinkBuilder + ?Sized> SinkBuilder for &B {
    fn build(&self, uri: &SinkUri) -> Result<BuiltSink> {
        (**self).build(uri)
    }
}

/// Builder for the closed set of [`SinkKind`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SinkFactory;

impl SinkFactory {
    pub fn new() -> Self {
        Self
    }

    /// Construct a sink of a resolved kind
    pub fn build_kind(&self, kind: SinkKind) -> BuiltSink {
        match kind {
            SinkKind::Metric(config) => BuiltSink::Metric(Arc::new(MetricSink::new(config))),
        }
    }
}

impl SinkBuilder for SinkFactory {
    #[instrument(name = "sink_factory_build", skip(self), fields(uri = %uri))]
    fn build(&self, uri: &SinkUri) -> Result<BuiltSink> {
        let kind = SinkKind::from_uri(uri)?;
        debug!(kind = kind.key(), "building sink");
        Ok(self.build_kind(kind))
    }
}
