use pageload_summary::application::summary::{SummaryBuilder, SummaryOptions};
use pageload_summary::domain::computation::ComputationContext;
use pageload_summary::domain::ports::ProviderId;
use pageload_summary::infrastructure::cache::InMemoryComputationCache;
use pageload_summary::infrastructure::mock::MockProvider;
use pageload_summary::infrastructure::observability::SummaryMetrics;
use pageload_summary::infrastructure::recorded::{RecordedOutcome, Recording};
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn context() -> ComputationContext {
    ComputationContext::new(Arc::new(InMemoryComputationCache::new()))
}

/// Recording in which every provider produced its healthy output
fn healthy_recording() -> Recording {
    let mut recording = Recording::default();
    recording.inputs.trace.trace_events = vec![json!({ "name": "navigationStart", "ts": 0 })];
    for id in ProviderId::ALL {
        if let Some(output) = MockProvider::healthy(id).output() {
            recording.results.insert(id, RecordedOutcome::Ok(output.clone()));
        }
    }
    recording
}

#[tokio::test]
async fn test_recording_file_replays_into_summary() {
    let mut recording = healthy_recording();
    recording.results.insert(
        ProviderId::SpeedIndex,
        RecordedOutcome::Error("no screenshots".to_string()),
    );

    let path = std::env::temp_dir().join(format!(
        "pageload-summary-recording-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, serde_json::to_string_pretty(&recording).unwrap()).unwrap();
    let loaded = Recording::from_path(&path);
    std::fs::remove_file(&path).ok();
    let loaded = assert_ok!(loaded);
    assert_eq!(loaded, recording);

    let metrics = SummaryMetrics::new().unwrap();
    let output = assert_ok!(
        SummaryBuilder::standard(&loaded.providers())
            .with_options(SummaryOptions { fan_out: true })
            .with_metrics(metrics.clone())
            .summarize(&loaded.inputs, &context())
            .await
    );

    assert_eq!(output.metrics.speed_index, None);
    assert_eq!(output.metrics.speed_index_ts, None);
    assert_eq!(output.metrics.first_contentful_paint, Some(1_200.0));
    assert!(metrics.render().lines().any(|line| {
        line.contains(r#"provider="speed-index""#) && line.contains(r#"outcome="degraded""#)
    }));
}

#[tokio::test]
async fn test_missing_mandatory_entry_fails_the_run() {
    let mut recording = healthy_recording();
    recording.results.remove(&ProviderId::FirstMeaningfulPaint);

    let error = assert_err!(
        SummaryBuilder::standard(&recording.providers())
            .summarize(&recording.inputs, &context())
            .await
    );

    assert_eq!(error.failed_provider(), Some(ProviderId::FirstMeaningfulPaint));
    assert!(error.to_string().contains("no recorded result"));
}

#[tokio::test]
async fn test_missing_optional_entry_degrades() {
    let mut recording = healthy_recording();
    recording.results.remove(&ProviderId::MaxPotentialFid);

    let output = assert_ok!(
        SummaryBuilder::standard(&recording.providers())
            .summarize(&recording.inputs, &context())
            .await
    );

    assert_eq!(output.metrics.max_potential_fid, None);
    assert_eq!(output.metrics.missing_fields().len(), 1);
}
