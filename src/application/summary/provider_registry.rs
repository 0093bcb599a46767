use std::sync::Arc;

use crate::domain::errors::ProviderError;
use crate::domain::inputs::InputKind;
use crate::domain::metric_result::{MetricResult, OutputKind, ProviderOutput};
use crate::domain::ports::{MetricProvider, ProviderId};
use crate::domain::summary::SummaryField;

/// When a provider is resolved during a summarization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Parses other metrics depend on. Resolved first, one at a time, in order.
    Foundation,
    /// Independent metrics. May be fanned out.
    Metric,
}

/// How a provider's output populates the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMapping {
    /// A single `MetricResult`, with an optional timestamp counterpart
    Timing {
        timing: SummaryField,
        timestamp: Option<SummaryField>,
    },
    /// The layout-shift group, split into three fields and their observed twins
    LayoutShift,
    ProcessedTrace,
    ProcessedNavigation,
    VisualProgress,
}

impl OutputMapping {
    pub fn expected_kind(&self) -> OutputKind {
        match self {
            OutputMapping::Timing { .. } => OutputKind::Timing,
            OutputMapping::LayoutShift => OutputKind::LayoutShift,
            OutputMapping::ProcessedTrace => OutputKind::Trace,
            OutputMapping::ProcessedNavigation => OutputKind::Navigation,
            OutputMapping::VisualProgress => OutputKind::VisualProgress,
        }
    }

    /// Every field this mapping writes
    pub fn fields(&self) -> Vec<SummaryField> {
        self.assignments(None)
            .into_iter()
            .map(|(field, _)| field)
            .collect()
    }

    /// Field values to write for `output`.
    ///
    /// An absent output (degraded provider) or an absent value inside it still
    /// yields an assignment of `None` for every mapped field.
    pub fn assignments(&self, output: Option<&ProviderOutput>) -> Vec<(SummaryField, Option<f64>)> {
        match *self {
            OutputMapping::Timing { timing, timestamp } => {
                let result = match output {
                    Some(ProviderOutput::Timing(result)) => Some(*result),
                    _ => None,
                };
                let mut assignments = vec![(timing, result.map(|r| r.timing))];
                if let Some(timestamp) = timestamp {
                    assignments.push((timestamp, result.map(|r| r.timestamp)));
                }
                assignments
            }
            OutputMapping::LayoutShift => {
                let values = match output {
                    Some(ProviderOutput::LayoutShift(values)) => Some(*values),
                    _ => None,
                };
                let cls = values.map(|v| v.cumulative_layout_shift);
                let cls_main_frame = values.map(|v| v.cumulative_layout_shift_main_frame);
                let total_cls = values.map(|v| v.total_cumulative_layout_shift);
                vec![
                    (SummaryField::CumulativeLayoutShift, cls),
                    (SummaryField::CumulativeLayoutShiftMainFrame, cls_main_frame),
                    (SummaryField::TotalCumulativeLayoutShift, total_cls),
                    (SummaryField::ObservedCumulativeLayoutShift, cls),
                    (SummaryField::ObservedCumulativeLayoutShiftMainFrame, cls_main_frame),
                    (SummaryField::ObservedTotalCumulativeLayoutShift, total_cls),
                ]
            }
            OutputMapping::ProcessedTrace => {
                let trace = match output {
                    Some(ProviderOutput::Trace(trace)) => Some(*trace),
                    _ => None,
                };
                let mut assignments = Vec::with_capacity(4);
                assignments.extend(mark(
                    SummaryField::ObservedTimeOrigin,
                    SummaryField::ObservedTimeOriginTs,
                    trace.map(|t| t.time_origin),
                ));
                assignments.extend(mark(
                    SummaryField::ObservedTraceEnd,
                    SummaryField::ObservedTraceEndTs,
                    trace.map(|t| t.trace_end),
                ));
                assignments
            }
            OutputMapping::ProcessedNavigation => {
                let navigation = match output {
                    Some(ProviderOutput::Navigation(navigation)) => Some(navigation),
                    _ => None,
                };
                let marks = [
                    (
                        SummaryField::ObservedNavigationStart,
                        SummaryField::ObservedNavigationStartTs,
                        navigation.map(|n| n.time_origin),
                    ),
                    (
                        SummaryField::ObservedFirstPaint,
                        SummaryField::ObservedFirstPaintTs,
                        navigation.and_then(|n| n.first_paint),
                    ),
                    (
                        SummaryField::ObservedFirstContentfulPaint,
                        SummaryField::ObservedFirstContentfulPaintTs,
                        navigation.map(|n| n.first_contentful_paint),
                    ),
                    (
                        SummaryField::ObservedFirstContentfulPaintAllFrames,
                        SummaryField::ObservedFirstContentfulPaintAllFramesTs,
                        navigation.map(|n| n.first_contentful_paint_all_frames),
                    ),
                    (
                        SummaryField::ObservedFirstMeaningfulPaint,
                        SummaryField::ObservedFirstMeaningfulPaintTs,
                        navigation.and_then(|n| n.first_meaningful_paint),
                    ),
                    (
                        SummaryField::ObservedLargestContentfulPaint,
                        SummaryField::ObservedLargestContentfulPaintTs,
                        navigation.and_then(|n| n.largest_contentful_paint),
                    ),
                    (
                        SummaryField::ObservedLargestContentfulPaintAllFrames,
                        SummaryField::ObservedLargestContentfulPaintAllFramesTs,
                        navigation.and_then(|n| n.largest_contentful_paint_all_frames),
                    ),
                    (
                        SummaryField::ObservedLoad,
                        SummaryField::ObservedLoadTs,
                        navigation.and_then(|n| n.load),
                    ),
                    (
                        SummaryField::ObservedDomContentLoaded,
                        SummaryField::ObservedDomContentLoadedTs,
                        navigation.and_then(|n| n.dom_content_loaded),
                    ),
                ];
                marks
                    .into_iter()
                    .flat_map(|(timing, timestamp, result)| mark(timing, timestamp, result))
                    .collect()
            }
            OutputMapping::VisualProgress => {
                let progress = match output {
                    Some(ProviderOutput::VisualProgress(progress)) => Some(*progress),
                    _ => None,
                };
                let first = progress.map(|p| p.first);
                let complete = progress.map(|p| p.complete);
                let speed_index = progress.map(|p| p.speed_index);
                vec![
                    (SummaryField::ObservedFirstVisualChange, first),
                    (
                        SummaryField::ObservedFirstVisualChangeTs,
                        progress.map(|p| p.absolute_timestamp(p.first)),
                    ),
                    (SummaryField::ObservedLastVisualChange, complete),
                    (
                        SummaryField::ObservedLastVisualChangeTs,
                        progress.map(|p| p.absolute_timestamp(p.complete)),
                    ),
                    (SummaryField::ObservedSpeedIndex, speed_index),
                    (
                        SummaryField::ObservedSpeedIndexTs,
                        progress.map(|p| p.absolute_timestamp(p.speed_index)),
                    ),
                ]
            }
        }
    }
}

fn mark(
    timing: SummaryField,
    timestamp: SummaryField,
    result: Option<MetricResult>,
) -> [(SummaryField, Option<f64>); 2] {
    [
        (timing, result.map(|r| r.timing)),
        (timestamp, result.map(|r| r.timestamp)),
    ]
}

/// Static policy for one provider: when it runs, what it receives, whether its
/// failure is fatal and where its output lands
#[derive(Debug, Clone, Copy)]
pub struct ProviderPolicy {
    pub id: ProviderId,
    pub phase: Phase,
    pub mandatory: bool,
    pub input: InputKind,
    pub mapping: OutputMapping,
}

const fn timing(timing: SummaryField, timestamp: SummaryField) -> OutputMapping {
    OutputMapping::Timing {
        timing,
        timestamp: Some(timestamp),
    }
}

const fn timing_only(timing: SummaryField) -> OutputMapping {
    OutputMapping::Timing {
        timing,
        timestamp: None,
    }
}

/// The standard policy table, in resolution order
pub const STANDARD_POLICY: [ProviderPolicy; 13] = [
    ProviderPolicy {
        id: ProviderId::ProcessedTrace,
        phase: Phase::Foundation,
        mandatory: true,
        input: InputKind::Trace,
        mapping: OutputMapping::ProcessedTrace,
    },
    ProviderPolicy {
        id: ProviderId::ProcessedNavigation,
        phase: Phase::Foundation,
        mandatory: true,
        input: InputKind::Trace,
        mapping: OutputMapping::ProcessedNavigation,
    },
    ProviderPolicy {
        id: ProviderId::Speedline,
        phase: Phase::Foundation,
        mandatory: true,
        input: InputKind::Trace,
        mapping: OutputMapping::VisualProgress,
    },
    ProviderPolicy {
        id: ProviderId::FirstContentfulPaint,
        phase: Phase::Foundation,
        mandatory: true,
        input: InputKind::Computation,
        mapping: timing(
            SummaryField::FirstContentfulPaint,
            SummaryField::FirstContentfulPaintTs,
        ),
    },
    ProviderPolicy {
        id: ProviderId::FirstContentfulPaintAllFrames,
        phase: Phase::Metric,
        mandatory: false,
        input: InputKind::Computation,
        mapping: timing(
            SummaryField::FirstContentfulPaintAllFrames,
            SummaryField::FirstContentfulPaintAllFramesTs,
        ),
    },
    ProviderPolicy {
        id: ProviderId::FirstMeaningfulPaint,
        phase: Phase::Metric,
        mandatory: true,
        input: InputKind::Computation,
        mapping: timing(
            SummaryField::FirstMeaningfulPaint,
            SummaryField::FirstMeaningfulPaintTs,
        ),
    },
    ProviderPolicy {
        id: ProviderId::LargestContentfulPaint,
        phase: Phase::Metric,
        mandatory: false,
        input: InputKind::Computation,
        mapping: timing(
            SummaryField::LargestContentfulPaint,
            SummaryField::LargestContentfulPaintTs,
        ),
    },
    ProviderPolicy {
        id: ProviderId::LargestContentfulPaintAllFrames,
        phase: Phase::Metric,
        mandatory: false,
        input: InputKind::Computation,
        mapping: timing(
            SummaryField::LargestContentfulPaintAllFrames,
            SummaryField::LargestContentfulPaintAllFramesTs,
        ),
    },
    ProviderPolicy {
        id: ProviderId::Interactive,
        phase: Phase::Metric,
        mandatory: false,
        input: InputKind::Computation,
        mapping: timing(SummaryField::Interactive, SummaryField::InteractiveTs),
    },
    ProviderPolicy {
        id: ProviderId::CumulativeLayoutShift,
        phase: Phase::Metric,
        mandatory: false,
        input: InputKind::Computation,
        mapping: OutputMapping::LayoutShift,
    },
    ProviderPolicy {
        id: ProviderId::MaxPotentialFid,
        phase: Phase::Metric,
        mandatory: false,
        input: InputKind::Computation,
        mapping: timing_only(SummaryField::MaxPotentialFid),
    },
    ProviderPolicy {
        id: ProviderId::SpeedIndex,
        phase: Phase::Metric,
        mandatory: false,
        input: InputKind::Computation,
        mapping: timing(SummaryField::SpeedIndex, SummaryField::SpeedIndexTs),
    },
    ProviderPolicy {
        id: ProviderId::TotalBlockingTime,
        phase: Phase::Metric,
        mandatory: true,
        input: InputKind::Computation,
        mapping: timing_only(SummaryField::TotalBlockingTime),
    },
];

/// Registry entry: a provider bound to its policy
#[derive(Clone)]
pub struct ProviderSpec {
    pub policy: ProviderPolicy,
    pub provider: Arc<dyn MetricProvider>,
}

impl std::fmt::Debug for ProviderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSpec")
            .field("policy", &self.policy)
            .field("provider", &"<dyn MetricProvider>")
            .finish()
    }
}

impl ProviderSpec {
    pub fn new(policy: ProviderPolicy, provider: Arc<dyn MetricProvider>) -> Self {
        Self { policy, provider }
    }

    pub fn id(&self) -> ProviderId {
        self.policy.id
    }

    pub fn is_mandatory(&self) -> bool {
        self.policy.mandatory
    }

    /// Reject outputs whose shape does not match the mapping
    pub fn check_output(&self, output: ProviderOutput) -> Result<ProviderOutput, ProviderError> {
        let expected = self.policy.mapping.expected_kind();
        let actual = output.kind();
        if actual == expected {
            Ok(output)
        } else {
            Err(ProviderError::UnexpectedOutput {
                provider: self.policy.id,
                expected,
                actual,
            })
        }
    }
}

/// One implementation for every computation the standard policy names
#[derive(Clone)]
pub struct MetricProviders {
    pub processed_trace: Arc<dyn MetricProvider>,
    pub processed_navigation: Arc<dyn MetricProvider>,
    pub speedline: Arc<dyn MetricProvider>,
    pub first_contentful_paint: Arc<dyn MetricProvider>,
    pub first_contentful_paint_all_frames: Arc<dyn MetricProvider>,
    pub first_meaningful_paint: Arc<dyn MetricProvider>,
    pub largest_contentful_paint: Arc<dyn MetricProvider>,
    pub largest_contentful_paint_all_frames: Arc<dyn MetricProvider>,
    pub interactive: Arc<dyn MetricProvider>,
    pub cumulative_layout_shift: Arc<dyn MetricProvider>,
    pub max_potential_fid: Arc<dyn MetricProvider>,
    pub speed_index: Arc<dyn MetricProvider>,
    pub total_blocking_time: Arc<dyn MetricProvider>,
}

impl MetricProviders {
    /// Build the set by asking `make` for each provider in turn
    pub fn from_fn(mut make: impl FnMut(ProviderId) -> Arc<dyn MetricProvider>) -> Self {
        Self {
            processed_trace: make(ProviderId::ProcessedTrace),
            processed_navigation: make(ProviderId::ProcessedNavigation),
            speedline: make(ProviderId::Speedline),
            first_contentful_paint: make(ProviderId::FirstContentfulPaint),
            first_contentful_paint_all_frames: make(ProviderId::FirstContentfulPaintAllFrames),
            first_meaningful_paint: make(ProviderId::FirstMeaningfulPaint),
            largest_contentful_paint: make(ProviderId::LargestContentfulPaint),
            largest_contentful_paint_all_frames: make(ProviderId::LargestContentfulPaintAllFrames),
            interactive: make(ProviderId::Interactive),
            cumulative_layout_shift: make(ProviderId::CumulativeLayoutShift),
            max_potential_fid: make(ProviderId::MaxPotentialFid),
            speed_index: make(ProviderId::SpeedIndex),
            total_blocking_time: make(ProviderId::TotalBlockingTime),
        }
    }

    pub fn get(&self, id: ProviderId) -> &Arc<dyn MetricProvider> {
        match id {
            ProviderId::ProcessedTrace => &self.processed_trace,
            ProviderId::ProcessedNavigation => &self.processed_navigation,
            ProviderId::Speedline => &self.speedline,
            ProviderId::FirstContentfulPaint => &self.first_contentful_paint,
            ProviderId::FirstContentfulPaintAllFrames => &self.first_contentful_paint_all_frames,
            ProviderId::FirstMeaningfulPaint => &self.first_meaningful_paint,
            ProviderId::LargestContentfulPaint => &self.largest_contentful_paint,
            ProviderId::LargestContentfulPaintAllFrames => {
                &self.largest_contentful_paint_all_frames
            }
            ProviderId::Interactive => &self.interactive,
            ProviderId::CumulativeLayoutShift => &self.cumulative_layout_shift,
            ProviderId::MaxPotentialFid => &self.max_potential_fid,
            ProviderId::SpeedIndex => &self.speed_index,
            ProviderId::TotalBlockingTime => &self.total_blocking_time,
        }
    }
}

/// Ordered, declarative list of provider specs driving a summarization
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    specs: Vec<ProviderSpec>,
}

impl ProviderRegistry {
    pub fn new(specs: Vec<ProviderSpec>) -> Self {
        Self { specs }
    }

    /// The standard registry: [`STANDARD_POLICY`] bound to `providers`
    pub fn standard(providers: &MetricProviders) -> Self {
        let specs = STANDARD_POLICY
            .iter()
            .map(|policy| ProviderSpec::new(*policy, Arc::clone(providers.get(policy.id))))
            .collect();
        Self { specs }
    }

    pub fn specs(&self) -> &[ProviderSpec] {
        &self.specs
    }

    /// Specs of `phase`, in registry order
    pub fn phase(&self, phase: Phase) -> impl Iterator<Item = &ProviderSpec> {
        self.specs.iter().filter(move |spec| spec.policy.phase == phase)
    }

    pub fn get(&self, id: ProviderId) -> Option<&ProviderSpec> {
        self.specs.iter().find(|spec| spec.id() == id)
    }
}
