use crate::application::summary::MetricProviders;
use crate::domain::computation::ComputationContext;
use crate::domain::inputs::ProviderInput;
use crate::domain::metric_result::{
    LayoutShiftValues, MetricResult, ProcessedNavigation, ProcessedTrace, ProviderOutput,
    VisualProgress,
};
use crate::domain::ports::{MetricProvider, ProviderId};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted provider: always returns the same output or the same failure.
///
/// Counts its invocations so tests can assert on memoization and short-circuiting.
#[derive(Debug, Clone)]
pub struct MockProvider {
    outcome: std::result::Result<ProviderOutput, String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn returning(output: ProviderOutput) -> Self {
        Self {
            outcome: Ok(output),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn timing(timing: f64, timestamp: f64) -> Self {
        Self::returning(ProviderOutput::Timing(MetricResult::new(timing, timestamp)))
    }

    pub fn layout_shift(cls: f64, cls_main_frame: f64, total_cls: f64) -> Self {
        Self::returning(ProviderOutput::LayoutShift(LayoutShiftValues {
            cumulative_layout_shift: cls,
            cumulative_layout_shift_main_frame: cls_main_frame,
            total_cumulative_layout_shift: total_cls,
        }))
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to the invocation counter
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// The scripted output, if this mock succeeds
    pub fn output(&self) -> Option<&ProviderOutput> {
        self.outcome.as_ref().ok()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sample_trace() -> ProcessedTrace {
        ProcessedTrace {
            time_origin: MetricResult::new(0.0, 1_000_000.0),
            trace_end: MetricResult::new(6_000.0, 7_000_000.0),
        }
    }

    pub fn sample_navigation() -> ProcessedNavigation {
        ProcessedNavigation {
            time_origin: MetricResult::new(0.0, 1_000_000.0),
            first_paint: Some(MetricResult::new(800.0, 1_800_000.0)),
            first_contentful_paint: MetricResult::new(900.0, 1_900_000.0),
            first_contentful_paint_all_frames: MetricResult::new(880.0, 1_880_000.0),
            first_meaningful_paint: Some(MetricResult::new(1_100.0, 2_100_000.0)),
            largest_contentful_paint: Some(MetricResult::new(1_500.0, 2_500_000.0)),
            largest_contentful_paint_all_frames: Some(MetricResult::new(1_450.0, 2_450_000.0)),
            load: Some(MetricResult::new(3_000.0, 4_000_000.0)),
            dom_content_loaded: Some(MetricResult::new(1_200.0, 2_200_000.0)),
            lcp_invalidated: false,
        }
    }

    pub fn sample_visual_progress() -> VisualProgress {
        VisualProgress {
            beginning: 1.0,
            first: 0.9,
            complete: 2.5,
            speed_index: 1.4,
        }
    }

    /// A full provider set in which every computation succeeds with plausible values
    pub fn healthy_set() -> MetricProviders {
        MetricProviders::from_fn(|id| Arc::new(Self::healthy(id)))
    }

    /// A succeeding provider with the right output shape for `id`
    pub fn healthy(id: ProviderId) -> Self {
        match id {
            ProviderId::ProcessedTrace => Self::returning(Self::sample_trace().into()),
            ProviderId::ProcessedNavigation => Self::returning(Self::sample_navigation().into()),
            ProviderId::Speedline => Self::returning(Self::sample_visual_progress().into()),
            ProviderId::FirstContentfulPaint => Self::timing(1_200.0, 500_000.0),
            ProviderId::FirstContentfulPaintAllFrames => Self::timing(1_150.0, 450_000.0),
            ProviderId::FirstMeaningfulPaint => Self::timing(1_400.0, 700_000.0),
            ProviderId::LargestContentfulPaint => Self::timing(2_100.0, 1_400_000.0),
            ProviderId::LargestContentfulPaintAllFrames => Self::timing(2_050.0, 1_350_000.0),
            ProviderId::Interactive => Self::timing(3_800.0, 3_100_000.0),
            ProviderId::CumulativeLayoutShift => Self::layout_shift(0.12, 0.08, 0.31),
            ProviderId::MaxPotentialFid => Self::timing(90.0, 0.0),
            ProviderId::SpeedIndex => Self::timing(2_300.0, 1_600_000.0),
            ProviderId::TotalBlockingTime => Self::timing(240.0, 0.0),
        }
    }
}

#[async_trait]
impl MetricProvider for MockProvider {
    async fn compute(
        &self,
        _input: ProviderInput<'_>,
        _context: &ComputationContext,
    ) -> Result<ProviderOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            Ok(output) => Ok(output.clone()),
            Err(message) => anyhow::bail!("{}", message),
        }
    }
}
