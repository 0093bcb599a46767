use tracing::{debug, warn};

use crate::application::summary::provider_registry::ProviderSpec;
use crate::domain::computation::ComputationContext;
use crate::domain::errors::ProviderError;
use crate::domain::inputs::ProviderInput;
use crate::domain::metric_result::ProviderOutput;

/// Invoke one provider under its mandatory/optional policy.
///
/// Mandatory providers propagate any failure unmodified. Optional providers turn
/// every failure into `Ok(None)` so a best-effort metric can never abort the
/// summary. No retries: the provider runs at most once, and the context's cache
/// decides whether it runs at all.
pub async fn gate(
    spec: &ProviderSpec,
    input: ProviderInput<'_>,
    context: &ComputationContext,
) -> Result<Option<ProviderOutput>, ProviderError> {
    let outcome = context
        .request(spec.id(), spec.provider.as_ref(), input)
        .await
        .and_then(|output| spec.check_output(output));

    match outcome {
        Ok(output) => Ok(Some(output)),
        Err(error) if !spec.is_mandatory() => {
            debug!("Optional metric {} unavailable: {}", spec.id(), error);
            Ok(None)
        }
        Err(error) => {
            warn!("Mandatory metric {} failed: {}", spec.id(), error);
            Err(error)
        }
    }
}
