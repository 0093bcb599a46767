//! In-memory computation cache.
//!
//! One `OnceCell` per key: the first caller initializes it, concurrent callers wait
//! on the same cell, later callers read the stored outcome. Failures are stored
//! like values, so a failed computation is never retried within the cache's
//! lifetime.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::trace;

use crate::domain::errors::ProviderError;
use crate::domain::metric_result::ProviderOutput;
use crate::domain::ports::{CacheKey, ComputationCache};

type Slot = Arc<OnceCell<Result<ProviderOutput, ProviderError>>>;

#[derive(Default)]
pub struct InMemoryComputationCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl InMemoryComputationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys seen so far
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }

    /// Drop every memoized outcome
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}

#[async_trait]
impl ComputationCache for InMemoryComputationCache {
    async fn get_or_compute<'a>(
        &self,
        key: CacheKey,
        computation: BoxFuture<'a, Result<ProviderOutput, ProviderError>>,
    ) -> Result<ProviderOutput, ProviderError> {
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        if slot.initialized() {
            trace!("Cache hit for {}", key.provider);
        }

        slot.get_or_init(|| computation).await.clone()
    }
}
