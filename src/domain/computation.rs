use std::sync::Arc;

use crate::domain::errors::ProviderError;
use crate::domain::inputs::ProviderInput;
use crate::domain::metric_result::ProviderOutput;
use crate::domain::ports::{CacheKey, ComputationCache, MetricProvider, ProviderId};

/// Handle to the current memoization scope.
///
/// Every provider call is routed through the injected cache, keyed by provider
/// identity and input fingerprint. Created by the caller before a summarization and
/// dropped (or reused for an identical run) afterwards.
#[derive(Clone)]
pub struct ComputationContext {
    cache: Arc<dyn ComputationCache>,
}

impl std::fmt::Debug for ComputationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputationContext")
            .field("cache", &"<dyn ComputationCache>")
            .finish()
    }
}

impl ComputationContext {
    pub fn new(cache: Arc<dyn ComputationCache>) -> Self {
        Self { cache }
    }

    /// Run `provider` over `input`, or return the memoized outcome of an earlier run
    pub async fn request(
        &self,
        provider_id: ProviderId,
        provider: &dyn MetricProvider,
        input: ProviderInput<'_>,
    ) -> Result<ProviderOutput, ProviderError> {
        let key = CacheKey::new(provider_id, input.fingerprint().clone());
        let computation = Box::pin(async move {
            provider
                .compute(input, self)
                .await
                .map_err(|error| ProviderError::failed(provider_id, error))
        });

        self.cache.get_or_compute(key, computation).await
    }
}
