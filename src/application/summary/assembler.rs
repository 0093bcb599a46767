use futures::future::join_all;
use tracing::debug;

use crate::application::summary::provider_registry::{Phase, ProviderRegistry, ProviderSpec};
use crate::application::summary::request_gate::gate;
use crate::domain::computation::ComputationContext;
use crate::domain::errors::ProviderError;
use crate::domain::inputs::{MetricComputationData, ProviderInput};
use crate::domain::metric_result::ProviderOutput;
use crate::domain::ports::ProviderId;
use crate::domain::summary::TimingSummary;

/// What became of one provider during a summarization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderOutcome {
    Resolved,
    /// Optional provider failed; its fields are unknown
    Degraded,
}

impl ProviderOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderOutcome::Resolved => "resolved",
            ProviderOutcome::Degraded => "degraded",
        }
    }
}

/// Merged result of every provider in a registry
#[derive(Debug, Clone)]
pub struct Assembly {
    pub summary: TimingSummary,
    resolved: Vec<(ProviderId, Option<ProviderOutput>)>,
}

impl Assembly {
    /// Output of `id`, if it resolved
    pub fn output(&self, id: ProviderId) -> Option<&ProviderOutput> {
        self.resolved
            .iter()
            .find(|(resolved_id, _)| *resolved_id == id)
            .and_then(|(_, output)| output.as_ref())
    }

    pub fn outcomes(&self) -> impl Iterator<Item = (ProviderId, ProviderOutcome)> + '_ {
        self.resolved.iter().map(|(id, output)| {
            let outcome = if output.is_some() {
                ProviderOutcome::Resolved
            } else {
                ProviderOutcome::Degraded
            };
            (*id, outcome)
        })
    }
}

/// Resolves every provider of a registry and merges the results into one record
pub struct Assembler<'r> {
    registry: &'r ProviderRegistry,
    fan_out: bool,
}

impl<'r> Assembler<'r> {
    pub fn new(registry: &'r ProviderRegistry) -> Self {
        Self {
            registry,
            fan_out: false,
        }
    }

    /// Poll the metric phase concurrently instead of one provider at a time
    pub fn with_fan_out(mut self, fan_out: bool) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub async fn assemble(
        &self,
        data: &MetricComputationData<'_>,
        context: &ComputationContext,
    ) -> Result<Assembly, ProviderError> {
        let mut resolved: Vec<(&ProviderSpec, Option<ProviderOutput>)> =
            Vec::with_capacity(self.registry.specs().len());

        // 1. Foundation parses, strictly in order
        for spec in self.registry.phase(Phase::Foundation) {
            let output = Self::resolve(spec, data, context).await?;
            resolved.push((spec, output));
        }
        debug!("Foundation phase resolved ({} providers)", resolved.len());

        // 2. Independent metrics
        if self.fan_out {
            let specs: Vec<&ProviderSpec> = self.registry.phase(Phase::Metric).collect();
            let outputs = join_all(specs.iter().map(|spec| Self::resolve(spec, data, context))).await;
            for (spec, output) in specs.into_iter().zip(outputs) {
                resolved.push((spec, output?));
            }
        } else {
            for spec in self.registry.phase(Phase::Metric) {
                let output = Self::resolve(spec, data, context).await?;
                resolved.push((spec, output));
            }
        }
        debug!("Metric phase resolved ({} providers total)", resolved.len());

        // 3. Merge by field name; order is irrelevant
        Ok(Self::merge(resolved))
    }

    async fn resolve(
        spec: &ProviderSpec,
        data: &MetricComputationData<'_>,
        context: &ComputationContext,
    ) -> Result<Option<ProviderOutput>, ProviderError> {
        let input = ProviderInput::from_bundle(spec.policy.input, data);
        gate(spec, input, context).await
    }

    fn merge(resolved: Vec<(&ProviderSpec, Option<ProviderOutput>)>) -> Assembly {
        let mut summary = TimingSummary::default();
        for (spec, output) in &resolved {
            for (field, value) in spec.policy.mapping.assignments(output.as_ref()) {
                summary.set(field, value);
            }
        }

        Assembly {
            summary,
            resolved: resolved
                .into_iter()
                .map(|(spec, output)| (spec.id(), output))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::summary::provider_registry::MetricProviders;
    use crate::domain::inputs::RawInputs;
    use crate::domain::summary::SummaryField;
    use crate::infrastructure::cache::InMemoryComputationCache;
    use crate::infrastructure::mock::MockProvider;
    use std::sync::Arc;

    fn context() -> ComputationContext {
        ComputationContext::new(Arc::new(InMemoryComputationCache::new()))
    }

    #[tokio::test]
    async fn test_all_resolved_fills_every_field() {
        let registry = ProviderRegistry::standard(&MockProvider::healthy_set());
        let inputs = RawInputs::default();
        let data = MetricComputationData::new(&inputs).unwrap();

        let assembly = Assembler::new(&registry)
            .assemble(&data, &context())
            .await
            .unwrap();

        assert!(assembly.summary.is_complete(), "missing: {:?}", assembly.summary.missing_fields());
        assert!(assembly
            .outcomes()
            .all(|(_, outcome)| outcome == ProviderOutcome::Resolved));
    }

    #[tokio::test]
    async fn test_degraded_provider_only_clears_its_fields() {
        let mut providers = MockProvider::healthy_set();
        providers.interactive = Arc::new(MockProvider::failing("main thread never quiet"));
        let registry = ProviderRegistry::standard(&providers);
        let inputs = RawInputs::default();
        let data = MetricComputationData::new(&inputs).unwrap();

        let assembly = Assembler::new(&registry)
            .assemble(&data, &context())
            .await
            .unwrap();

        assert_eq!(
            assembly.summary.missing_fields(),
            vec![SummaryField::Interactive, SummaryField::InteractiveTs]
        );
        let degraded: Vec<ProviderId> = assembly
            .outcomes()
            .filter(|(_, outcome)| *outcome == ProviderOutcome::Degraded)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(degraded, vec![ProviderId::Interactive]);
    }

    #[tokio::test]
    async fn test_foundation_failure_stops_before_metric_phase() {
        let mut providers = MockProvider::healthy_set();
        providers.speedline = Arc::new(MockProvider::failing("no screenshots"));
        let tbt = MockProvider::timing(150.0, 0.0);
        let tbt_calls = tbt.call_counter();
        providers.total_blocking_time = Arc::new(tbt);
        let registry = ProviderRegistry::standard(&providers);
        let inputs = RawInputs::default();
        let data = MetricComputationData::new(&inputs).unwrap();

        let error = Assembler::new(&registry)
            .assemble(&data, &context())
            .await
            .unwrap_err();

        assert_eq!(error.provider(), ProviderId::Speedline);
        assert_eq!(tbt_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fan_out_matches_sequential() {
        let mut providers = MockProvider::healthy_set();
        providers.cumulative_layout_shift = Arc::new(MockProvider::failing("no layout shifts"));
        let registry = ProviderRegistry::standard(&providers);
        let inputs = RawInputs::default();
        let data = MetricComputationData::new(&inputs).unwrap();

        let sequential = Assembler::new(&registry)
            .assemble(&data, &context())
            .await
            .unwrap();
        let fanned = Assembler::new(&registry)
            .with_fan_out(true)
            .assemble(&data, &context())
            .await
            .unwrap();

        assert_eq!(sequential.summary, fanned.summary);
    }
}
