use serde::{Deserialize, Serialize};

/// A single timing produced by a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Milliseconds relative to navigation start
    pub timing: f64,
    /// Absolute trace time in microseconds
    pub timestamp: f64,
}

impl MetricResult {
    pub fn new(timing: f64, timestamp: f64) -> Self {
        Self { timing, timestamp }
    }
}

/// The three related layout-shift scores produced together
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutShiftValues {
    pub cumulative_layout_shift: f64,
    pub cumulative_layout_shift_main_frame: f64,
    pub total_cumulative_layout_shift: f64,
}

/// Trace-wide timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedTrace {
    pub time_origin: MetricResult,
    pub trace_end: MetricResult,
}

/// Navigation-scoped timings observed in the trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedNavigation {
    pub time_origin: MetricResult,
    #[serde(default)]
    pub first_paint: Option<MetricResult>,
    pub first_contentful_paint: MetricResult,
    pub first_contentful_paint_all_frames: MetricResult,
    #[serde(default)]
    pub first_meaningful_paint: Option<MetricResult>,
    #[serde(default)]
    pub largest_contentful_paint: Option<MetricResult>,
    #[serde(default)]
    pub largest_contentful_paint_all_frames: Option<MetricResult>,
    #[serde(default)]
    pub load: Option<MetricResult>,
    #[serde(default)]
    pub dom_content_loaded: Option<MetricResult>,
    /// A later, larger LCP candidate invalidated the one first reported
    #[serde(default)]
    pub lcp_invalidated: bool,
}

/// Visual progress computed from screenshot diffing.
///
/// All values are seconds; `first`, `complete` and `speed_index` are relative to
/// `beginning`, which is itself an offset on the trace clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualProgress {
    pub beginning: f64,
    pub first: f64,
    pub complete: f64,
    pub speed_index: f64,
}

impl VisualProgress {
    /// Convert a value relative to `beginning` into an absolute timestamp
    pub fn absolute_timestamp(&self, seconds: f64) -> f64 {
        (seconds + self.beginning) * 1000.0
    }
}

/// Shape of a provider's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Timing,
    LayoutShift,
    Trace,
    Navigation,
    VisualProgress,
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputKind::Timing => "timing",
            OutputKind::LayoutShift => "layout-shift",
            OutputKind::Trace => "processed-trace",
            OutputKind::Navigation => "processed-navigation",
            OutputKind::VisualProgress => "visual-progress",
        };
        f.write_str(name)
    }
}

/// Everything a provider may hand back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ProviderOutput {
    Timing(MetricResult),
    LayoutShift(LayoutShiftValues),
    Trace(ProcessedTrace),
    Navigation(ProcessedNavigation),
    VisualProgress(VisualProgress),
}

impl ProviderOutput {
    pub fn kind(&self) -> OutputKind {
        match self {
            ProviderOutput::Timing(_) => OutputKind::Timing,
            ProviderOutput::LayoutShift(_) => OutputKind::LayoutShift,
            ProviderOutput::Trace(_) => OutputKind::Trace,
            ProviderOutput::Navigation(_) => OutputKind::Navigation,
            ProviderOutput::VisualProgress(_) => OutputKind::VisualProgress,
        }
    }

    pub fn as_navigation(&self) -> Option<&ProcessedNavigation> {
        match self {
            ProviderOutput::Navigation(navigation) => Some(navigation),
            _ => None,
        }
    }
}

impl From<MetricResult> for ProviderOutput {
    fn from(value: MetricResult) -> Self {
        ProviderOutput::Timing(value)
    }
}

impl From<LayoutShiftValues> for ProviderOutput {
    fn from(value: LayoutShiftValues) -> Self {
        ProviderOutput::LayoutShift(value)
    }
}

impl From<ProcessedTrace> for ProviderOutput {
    fn from(value: ProcessedTrace) -> Self {
        ProviderOutput::Trace(value)
    }
}

impl From<ProcessedNavigation> for ProviderOutput {
    fn from(value: ProcessedNavigation) -> Self {
        ProviderOutput::Navigation(value)
    }
}

impl From<VisualProgress> for ProviderOutput {
    fn from(value: VisualProgress) -> Self {
        ProviderOutput::VisualProgress(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_visual_progress_absolute_timestamp() {
        let progress = VisualProgress {
            beginning: 0.5,
            first: 2.0,
            complete: 3.25,
            speed_index: 2.5,
        };

        assert!((progress.absolute_timestamp(progress.first) - 2500.0).abs() < 1e-9);
        assert!((progress.absolute_timestamp(progress.complete) - 3750.0).abs() < 1e-9);
    }

    #[test]
    fn test_provider_output_kind() {
        let timing: ProviderOutput = MetricResult::new(1200.0, 500_000.0).into();
        assert_eq!(timing.kind(), OutputKind::Timing);
        assert!(timing.as_navigation().is_none());
        assert_eq!(OutputKind::LayoutShift.to_string(), "layout-shift");
    }

    #[test]
    fn test_provider_output_tagged_json() {
        let output: ProviderOutput = serde_json::from_value(json!({
            "kind": "layoutShift",
            "value": {
                "cumulativeLayoutShift": 0.1,
                "cumulativeLayoutShiftMainFrame": 0.05,
                "totalCumulativeLayoutShift": 0.2
            }
        }))
        .unwrap();

        let ProviderOutput::LayoutShift(values) = output else {
            panic!("Expected LayoutShift");
        };
        assert_eq!(values.cumulative_layout_shift_main_frame, 0.05);
    }

    #[test]
    fn test_navigation_optional_marks_default_to_none() {
        let navigation: ProcessedNavigation = serde_json::from_value(json!({
            "timeOrigin": {"timing": 0.0, "timestamp": 100.0},
            "firstContentfulPaint": {"timing": 900.0, "timestamp": 900_100.0},
            "firstContentfulPaintAllFrames": {"timing": 850.0, "timestamp": 850_100.0}
        }))
        .unwrap();

        assert!(navigation.load.is_none());
        assert!(navigation.largest_contentful_paint.is_none());
        assert!(!navigation.lcp_invalidated);
    }
}
