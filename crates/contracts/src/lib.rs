//! # Contracts
//!
//! Frozen interface contracts shared by the sink registry crates.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Batches carry a wall-clock `DateTime<Utc>` taken at scrape time
//! - Retention windows are evaluated against the exporting process clock

mod error;
mod historical;
mod metric;
mod sink;

pub use error::*;
pub use historical::*;
pub use metric::*;
pub use sink::*;
