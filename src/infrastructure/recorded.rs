//! Replay of previously computed provider outcomes.
//!
//! A recording captures the raw inputs of one page load together with what each
//! provider produced for them, so a summary can be rebuilt offline without the
//! trace-processing machinery:
//!
//! ```json
//! {
//!   "inputs": { "trace": { "traceEvents": [] } },
//!   "results": {
//!     "first-contentful-paint": { "ok": { "kind": "timing", "value": { "timing": 1200, "timestamp": 500000 } } },
//!     "speed-index": { "error": "no screenshots" }
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::application::summary::MetricProviders;
use crate::domain::computation::ComputationContext;
use crate::domain::inputs::{ProviderInput, RawInputs};
use crate::domain::metric_result::ProviderOutput;
use crate::domain::ports::{MetricProvider, ProviderId};

/// What one provider produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordedOutcome {
    Ok(ProviderOutput),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub inputs: RawInputs,
    #[serde(default)]
    pub results: BTreeMap<ProviderId, RecordedOutcome>,
}

impl Recording {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse recording")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid recording {}", path.display()))
    }

    /// One replaying provider per id; ids without a recorded outcome fail when asked
    pub fn providers(&self) -> MetricProviders {
        MetricProviders::from_fn(|id| {
            Arc::new(RecordedProvider::new(id, self.results.get(&id).cloned()))
        })
    }
}

/// Provider answering with a recorded outcome
#[derive(Debug, Clone)]
pub struct RecordedProvider {
    id: ProviderId,
    outcome: Option<RecordedOutcome>,
}

impl RecordedProvider {
    pub fn new(id: ProviderId, outcome: Option<RecordedOutcome>) -> Self {
        Self { id, outcome }
    }
}

#[async_trait]
impl MetricProvider for RecordedProvider {
    async fn compute(
        &self,
        _input: ProviderInput<'_>,
        _context: &ComputationContext,
    ) -> Result<ProviderOutput> {
        match &self.outcome {
            Some(RecordedOutcome::Ok(output)) => Ok(output.clone()),
            Some(RecordedOutcome::Error(message)) => anyhow::bail!("{}", message),
            None => anyhow::bail!("no recorded result for {}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metric_result::MetricResult;
    use crate::infrastructure::cache::InMemoryComputationCache;
    use serde_json::json;

    fn context() -> ComputationContext {
        ComputationContext::new(Arc::new(InMemoryComputationCache::new()))
    }

    #[test]
    fn test_parse_recording() {
        let recording = Recording::from_json(
            &json!({
                "inputs": { "trace": { "traceEvents": [{ "name": "navigationStart" }] } },
                "results": {
                    "first-contentful-paint": {
                        "ok": { "kind": "timing", "value": { "timing": 1200.0, "timestamp": 500000.0 } }
                    },
                    "speed-index": { "error": "no screenshots" }
                }
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(recording.inputs.trace.trace_events.len(), 1);
        assert_eq!(
            recording.results.get(&ProviderId::FirstContentfulPaint),
            Some(&RecordedOutcome::Ok(ProviderOutput::Timing(MetricResult::new(
                1_200.0, 500_000.0
            ))))
        );
        assert_eq!(
            recording.results.get(&ProviderId::SpeedIndex),
            Some(&RecordedOutcome::Error("no screenshots".to_string()))
        );
    }

    #[test]
    fn test_invalid_recording_is_rejected() {
        let error = Recording::from_json(r#"{"results": {}}"#).unwrap_err();
        assert!(error.to_string().contains("Failed to parse recording"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let error = Recording::from_path("/nonexistent/recording.json").unwrap_err();
        assert!(format!("{:#}", error).contains("/nonexistent/recording.json"));
    }

    #[tokio::test]
    async fn test_replay_outcomes() {
        let mut recording = Recording::default();
        recording.results.insert(
            ProviderId::Interactive,
            RecordedOutcome::Ok(ProviderOutput::Timing(MetricResult::new(3_000.0, 4_000.0))),
        );
        recording.results.insert(
            ProviderId::SpeedIndex,
            RecordedOutcome::Error("no screenshots".to_string()),
        );
        let providers = recording.providers();
        let trace = recording.inputs.trace.clone();
        let fingerprint = trace.fingerprint().unwrap();
        let input = || ProviderInput::Trace {
            trace: &trace,
            fingerprint: &fingerprint,
        };
        let ctx = context();

        let output = providers.interactive.compute(input(), &ctx).await.unwrap();
        assert_eq!(output, ProviderOutput::Timing(MetricResult::new(3_000.0, 4_000.0)));

        let error = providers.speed_index.compute(input(), &ctx).await.unwrap_err();
        assert_eq!(error.to_string(), "no screenshots");

        let error = providers
            .total_blocking_time
            .compute(input(), &ctx)
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "no recorded result for total-blocking-time");
    }
}
