use std::time::Instant;
use tracing::{debug, info};

use crate::application::summary::assembler::{Assembler, ProviderOutcome};
use crate::application::summary::provider_registry::{MetricProviders, ProviderRegistry};
use crate::domain::computation::ComputationContext;
use crate::domain::errors::SummaryError;
use crate::domain::inputs::{MetricComputationData, RawInputs};
use crate::domain::ports::ProviderId;
use crate::domain::summary::{DebugInfo, SummaryField, SummaryOutput};
use crate::infrastructure::observability::SummaryMetrics;

/// Tunables for a [`SummaryBuilder`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Resolve the independent metrics concurrently
    pub fan_out: bool,
}

/// Orchestrates one summarization: bundle the inputs, drive the assembler,
/// derive the debug record.
///
/// Holds no per-run state; a single builder can serve any number of concurrent
/// summarizations.
pub struct SummaryBuilder {
    registry: ProviderRegistry,
    options: SummaryOptions,
    metrics: Option<SummaryMetrics>,
}

impl SummaryBuilder {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            options: SummaryOptions::default(),
            metrics: None,
        }
    }

    /// Builder over the standard registry
    pub fn standard(providers: &MetricProviders) -> Self {
        Self::new(ProviderRegistry::standard(providers))
    }

    pub fn with_options(mut self, options: SummaryOptions) -> Self {
        self.options = options;
        self
    }

    /// Record provider outcomes and run status into `metrics`
    pub fn with_metrics(mut self, metrics: SummaryMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub async fn summarize(
        &self,
        inputs: &RawInputs,
        context: &ComputationContext,
    ) -> Result<SummaryOutput, SummaryError> {
        let started = Instant::now();
        let result = self.run(inputs, context).await;

        if let Some(metrics) = &self.metrics {
            let status = if result.is_ok() { "ok" } else { "failed" };
            metrics.record_summary(status, started.elapsed().as_secs_f64());
            if let Err(SummaryError::Provider(error)) = &result {
                metrics.record_provider(error.provider(), "failed");
            }
        }

        result
    }

    async fn run(
        &self,
        inputs: &RawInputs,
        context: &ComputationContext,
    ) -> Result<SummaryOutput, SummaryError> {
        let data = MetricComputationData::new(inputs)?;
        debug!(
            "Summarizing trace {} ({} events)",
            data.trace_fingerprint(),
            inputs.trace.trace_events.len()
        );

        let assembly = Assembler::new(&self.registry)
            .with_fan_out(self.options.fan_out)
            .assemble(&data, context)
            .await?;

        let mut degraded = 0;
        for (id, outcome) in assembly.outcomes() {
            if let Some(metrics) = &self.metrics {
                metrics.record_provider(id, outcome.as_str());
            }
            if outcome == ProviderOutcome::Degraded {
                degraded += 1;
            }
        }

        // Reflects the navigation parse alone, whether or not the LCP metric resolved
        let debug_info = DebugInfo {
            lcp_invalidated: assembly
                .output(ProviderId::ProcessedNavigation)
                .and_then(|output| output.as_navigation())
                .is_some_and(|navigation| navigation.lcp_invalidated),
        };

        info!(
            "Summary complete: {} of {} fields known, {} degraded providers",
            SummaryField::ALL.len() - assembly.summary.missing_fields().len(),
            SummaryField::ALL.len(),
            degraded
        );

        Ok(SummaryOutput {
            metrics: assembly.summary,
            debug_info,
        })
    }
}
