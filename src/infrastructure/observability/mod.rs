//! Observability for summarization runs
//!
//! Metrics are collected in-process and rendered on demand in Prometheus text
//! format. Nothing is served or pushed from here.

pub mod metrics;

pub use metrics::SummaryMetrics;
