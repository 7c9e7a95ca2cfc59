//! # Metric Sink
//!
//! In-memory metric retention sink.
//!
//! Keeps two views of exported data:
//! - a short store of whole batches, used to serve the most recent points
//! - a long store restricted to a few metric names, used as a historical buffer

mod config;
mod sink;

pub use config::{MetricSinkConfig, DEFAULT_LONG_STORE_DURATION, DEFAULT_SHORT_STORE_DURATION};
pub use sink::MetricSink;
