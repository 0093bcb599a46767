//! Prometheus metrics for page-load summarization
//!
//! All metrics use the `pageload_` prefix.

use prometheus::{CounterVec, Histogram, HistogramOpts, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::domain::ports::ProviderId;

/// Counters and timings for summary runs
#[derive(Clone)]
pub struct SummaryMetrics {
    registry: Arc<Registry>,
    /// Provider outcomes by provider and outcome (resolved, degraded, failed)
    pub provider_outcomes_total: CounterVec,
    /// Summaries by status (ok, failed)
    pub summaries_total: CounterVec,
    /// Wall time of one summarization in seconds
    pub summary_duration_seconds: Histogram,
}

impl SummaryMetrics {
    /// Create a new instance with every metric registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let provider_outcomes_total = CounterVec::new(
            Opts::new(
                "pageload_provider_outcomes_total",
                "Metric provider outcomes by provider and outcome",
            ),
            &["provider", "outcome"],
        )?;
        registry.register(Box::new(provider_outcomes_total.clone()))?;

        let summaries_total = CounterVec::new(
            Opts::new("pageload_summaries_total", "Summarizations by status"),
            &["status"],
        )?;
        registry.register(Box::new(summaries_total.clone()))?;

        let summary_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "pageload_summary_duration_seconds",
                "Summarization wall time in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;
        registry.register(Box::new(summary_duration_seconds.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            provider_outcomes_total,
            summaries_total,
            summary_duration_seconds,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    pub fn record_provider(&self, provider: ProviderId, outcome: &str) {
        self.provider_outcomes_total
            .with_label_values(&[provider.name(), outcome])
            .inc();
    }

    /// Count one finished summarization and observe its duration
    pub fn record_summary(&self, status: &str, seconds: f64) {
        self.summaries_total.with_label_values(&[status]).inc();
        self.summary_duration_seconds.observe(seconds);
    }
}
