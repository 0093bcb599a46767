use std::sync::Arc;
use thiserror::Error;

use crate::domain::metric_result::OutputKind;
use crate::domain::ports::ProviderId;

/// Failure of a single provider computation.
///
/// Cloneable so that a memoized failure can be handed to every caller that
/// requests the same computation.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("{provider} failed: {error:#}")]
    Failed {
        provider: ProviderId,
        error: Arc<anyhow::Error>,
    },

    #[error("{provider} produced {actual} output, expected {expected}")]
    UnexpectedOutput {
        provider: ProviderId,
        expected: OutputKind,
        actual: OutputKind,
    },
}

impl ProviderError {
    pub fn failed(provider: ProviderId, error: anyhow::Error) -> Self {
        ProviderError::Failed {
            provider,
            error: Arc::new(error),
        }
    }

    pub fn provider(&self) -> ProviderId {
        match self {
            ProviderError::Failed { provider, .. } => *provider,
            ProviderError::UnexpectedOutput { provider, .. } => *provider,
        }
    }
}

/// Failure of a whole summarization
#[derive(Debug, Error)]
pub enum SummaryError {
    /// A mandatory provider failed; no partial record exists
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Unable to fingerprint summarization inputs: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

impl SummaryError {
    /// The mandatory provider that aborted the summarization, if any
    pub fn failed_provider(&self) -> Option<ProviderId> {
        match self {
            SummaryError::Provider(error) => Some(error.provider()),
            SummaryError::Fingerprint(_) => None,
        }
    }
}
