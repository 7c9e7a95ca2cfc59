//! # Sink Factory
//!
//! Sink registry and bootstrap resolver.
//!
//! Responsibilities:
//! - Build one sink per descriptor (`SinkFactory`)
//! - Build the whole registry at bootstrap (`SinkRegistry`)
//! - Guarantee a default in-memory metric sink
//! - Resolve the optional historical source
//!
//! ## Example
//!
//! ```
//! use config_loader::SinkUris;
//! use sink_factory::SinkRegistry;
//!
//! let uris: SinkUris = "metric".parse().unwrap();
//! let result = SinkRegistry::new().build_all(&uris, "").unwrap();
//! assert!(result.metric.is_some());
//! assert_eq!(result.sinks.len(), 1);
//! ```

pub mod error;
pub mod factory;
pub mod kind;
pub mod registry;
pub mod sink;

pub use config_loader::{SinkUri, SinkUris};
pub use contracts::{DataSink, HistoricalSource};
pub use error::{Result, SinkFactoryError};
pub use factory::{SinkBuilder, SinkFactory};
pub use kind::SinkKind;
pub use metric_sink::{MetricSink, MetricSinkConfig};
pub use registry::{BuildResult, SinkRegistry};
pub use sink::{BuiltSink, ExternalSink};
