//! Dashboard presentation.
//!
//! `presenter` maps query results onto chart and metric payloads;
//! `generator` renders the assembled dashboard.

pub mod generator;
pub mod presenter;

pub use generator::{OutputFormat, PresentationSink, ReportWriter};
pub use presenter::{hiring_chart, metric_cards};
