use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::computation::ComputationContext;
use crate::domain::errors::ProviderError;
use crate::domain::inputs::{InputFingerprint, ProviderInput};
use crate::domain::metric_result::ProviderOutput;

/// Identity of every computation the summary consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderId {
    ProcessedTrace,
    ProcessedNavigation,
    Speedline,
    FirstContentfulPaint,
    FirstContentfulPaintAllFrames,
    FirstMeaningfulPaint,
    LargestContentfulPaint,
    LargestContentfulPaintAllFrames,
    Interactive,
    CumulativeLayoutShift,
    MaxPotentialFid,
    SpeedIndex,
    TotalBlockingTime,
}

impl ProviderId {
    pub const ALL: [ProviderId; 13] = [
        ProviderId::ProcessedTrace,
        ProviderId::ProcessedNavigation,
        ProviderId::Speedline,
        ProviderId::FirstContentfulPaint,
        ProviderId::FirstContentfulPaintAllFrames,
        ProviderId::FirstMeaningfulPaint,
        ProviderId::LargestContentfulPaint,
        ProviderId::LargestContentfulPaintAllFrames,
        ProviderId::Interactive,
        ProviderId::CumulativeLayoutShift,
        ProviderId::MaxPotentialFid,
        ProviderId::SpeedIndex,
        ProviderId::TotalBlockingTime,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ProviderId::ProcessedTrace => "processed-trace",
            ProviderId::ProcessedNavigation => "processed-navigation",
            ProviderId::Speedline => "speedline",
            ProviderId::FirstContentfulPaint => "first-contentful-paint",
            ProviderId::FirstContentfulPaintAllFrames => "first-contentful-paint-all-frames",
            ProviderId::FirstMeaningfulPaint => "first-meaningful-paint",
            ProviderId::LargestContentfulPaint => "largest-contentful-paint",
            ProviderId::LargestContentfulPaintAllFrames => "largest-contentful-paint-all-frames",
            ProviderId::Interactive => "interactive",
            ProviderId::CumulativeLayoutShift => "cumulative-layout-shift",
            ProviderId::MaxPotentialFid => "max-potential-fid",
            ProviderId::SpeedIndex => "speed-index",
            ProviderId::TotalBlockingTime => "total-blocking-time",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single metric computation.
///
/// Implementations live outside this crate (paint detection, layout-shift scoring,
/// visual diffing, ...). They may request other computations through `context`,
/// which memoizes them for the duration of its caching scope.
#[async_trait]
pub trait MetricProvider: Send + Sync {
    async fn compute(
        &self,
        input: ProviderInput<'_>,
        context: &ComputationContext,
    ) -> anyhow::Result<ProviderOutput>;
}

/// Memoization key: which computation, over which input
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub provider: ProviderId,
    pub input: InputFingerprint,
}

impl CacheKey {
    pub fn new(provider: ProviderId, input: InputFingerprint) -> Self {
        Self { provider, input }
    }
}

/// Memoizing store behind a [`ComputationContext`].
///
/// For a given key the first caller's `computation` runs; every later (or
/// concurrent) caller observes the same value or the same failure without
/// recomputing.
#[async_trait]
pub trait ComputationCache: Send + Sync {
    async fn get_or_compute<'a>(
        &self,
        key: CacheKey,
        computation: BoxFuture<'a, Result<ProviderOutput, ProviderError>>,
    ) -> Result<ProviderOutput, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_match_serde() {
        for id in ProviderId::ALL {
            let json = serde_json::to_value(id).unwrap();
            assert_eq!(json, serde_json::json!(id.name()));
        }
    }

    #[test]
    fn test_cache_key_equality() {
        let inputs = crate::domain::inputs::RawInputs::default();
        let fingerprint = inputs.trace.fingerprint().unwrap();

        let a = CacheKey::new(ProviderId::Speedline, fingerprint.clone());
        let b = CacheKey::new(ProviderId::Speedline, fingerprint.clone());
        let c = CacheKey::new(ProviderId::ProcessedTrace, fingerprint);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
