//! Filtered aggregate views over the canonical table.
//!
//! Every query re-filters the table from scratch; nothing is cached
//! between calls.

pub mod filter;
pub mod hiring;
pub mod metrics;

pub use filter::{filter_rows, Filter, YearRange};
pub use hiring::{hiring_rates, DEFAULT_MAX_YEARS};
pub use metrics::aggregate_metrics;
