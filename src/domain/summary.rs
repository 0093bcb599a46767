//! Output record of a summarization.
//!
//! [`TimingSummary`] has one slot per [`SummaryField`]. Both are generated from a
//! single field table so the record and its field enumeration can never drift apart.

use serde::{Deserialize, Serialize};

macro_rules! summary_fields {
    ($($variant:ident => $field:ident : $name:literal),* $(,)?) => {
        /// Name of a single slot in [`TimingSummary`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SummaryField {
            $($variant),*
        }

        impl SummaryField {
            /// Every field, in output order
            pub const ALL: &'static [SummaryField] = &[$(SummaryField::$variant),*];

            /// Serialized (camelCase) field name
            pub const fn name(self) -> &'static str {
                match self {
                    $(SummaryField::$variant => $name),*
                }
            }
        }

        /// Flat timing record. `None` means the value is unknown for this run.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct TimingSummary {
            $(
                #[serde(rename = $name, default)]
                pub $field: Option<f64>,
            )*
        }

        impl TimingSummary {
            pub fn get(&self, field: SummaryField) -> Option<f64> {
                match field {
                    $(SummaryField::$variant => self.$field),*
                }
            }

            pub fn set(&mut self, field: SummaryField, value: Option<f64>) {
                match field {
                    $(SummaryField::$variant => self.$field = value),*
                }
            }
        }
    };
}

summary_fields! {
    FirstContentfulPaint => first_contentful_paint: "firstContentfulPaint",
    FirstContentfulPaintTs => first_contentful_paint_ts: "firstContentfulPaintTs",
    FirstContentfulPaintAllFrames => first_contentful_paint_all_frames: "firstContentfulPaintAllFrames",
    FirstContentfulPaintAllFramesTs => first_contentful_paint_all_frames_ts: "firstContentfulPaintAllFramesTs",
    FirstMeaningfulPaint => first_meaningful_paint: "firstMeaningfulPaint",
    FirstMeaningfulPaintTs => first_meaningful_paint_ts: "firstMeaningfulPaintTs",
    LargestContentfulPaint => largest_contentful_paint: "largestContentfulPaint",
    LargestContentfulPaintTs => largest_contentful_paint_ts: "largestContentfulPaintTs",
    LargestContentfulPaintAllFrames => largest_contentful_paint_all_frames: "largestContentfulPaintAllFrames",
    LargestContentfulPaintAllFramesTs => largest_contentful_paint_all_frames_ts: "largestContentfulPaintAllFramesTs",
    Interactive => interactive: "interactive",
    InteractiveTs => interactive_ts: "interactiveTs",
    SpeedIndex => speed_index: "speedIndex",
    SpeedIndexTs => speed_index_ts: "speedIndexTs",
    TotalBlockingTime => total_blocking_time: "totalBlockingTime",
    MaxPotentialFid => max_potential_fid: "maxPotentialFID",
    CumulativeLayoutShift => cumulative_layout_shift: "cumulativeLayoutShift",
    CumulativeLayoutShiftMainFrame => cumulative_layout_shift_main_frame: "cumulativeLayoutShiftMainFrame",
    TotalCumulativeLayoutShift => total_cumulative_layout_shift: "totalCumulativeLayoutShift",

    ObservedTimeOrigin => observed_time_origin: "observedTimeOrigin",
    ObservedTimeOriginTs => observed_time_origin_ts: "observedTimeOriginTs",
    ObservedNavigationStart => observed_navigation_start: "observedNavigationStart",
    ObservedNavigationStartTs => observed_navigation_start_ts: "observedNavigationStartTs",
    ObservedFirstPaint => observed_first_paint: "observedFirstPaint",
    ObservedFirstPaintTs => observed_first_paint_ts: "observedFirstPaintTs",
    ObservedFirstContentfulPaint => observed_first_contentful_paint: "observedFirstContentfulPaint",
    ObservedFirstContentfulPaintTs => observed_first_contentful_paint_ts: "observedFirstContentfulPaintTs",
    ObservedFirstContentfulPaintAllFrames => observed_first_contentful_paint_all_frames: "observedFirstContentfulPaintAllFrames",
    ObservedFirstContentfulPaintAllFramesTs => observed_first_contentful_paint_all_frames_ts: "observedFirstContentfulPaintAllFramesTs",
    ObservedFirstMeaningfulPaint => observed_first_meaningful_paint: "observedFirstMeaningfulPaint",
    ObservedFirstMeaningfulPaintTs => observed_first_meaningful_paint_ts: "observedFirstMeaningfulPaintTs",
    ObservedLargestContentfulPaint => observed_largest_contentful_paint: "observedLargestContentfulPaint",
    ObservedLargestContentfulPaintTs => observed_largest_contentful_paint_ts: "observedLargestContentfulPaintTs",
    ObservedLargestContentfulPaintAllFrames => observed_largest_contentful_paint_all_frames: "observedLargestContentfulPaintAllFrames",
    ObservedLargestContentfulPaintAllFramesTs => observed_largest_contentful_paint_all_frames_ts: "observedLargestContentfulPaintAllFramesTs",
    ObservedTraceEnd => observed_trace_end: "observedTraceEnd",
    ObservedTraceEndTs => observed_trace_end_ts: "observedTraceEndTs",
    ObservedLoad => observed_load: "observedLoad",
    ObservedLoadTs => observed_load_ts: "observedLoadTs",
    ObservedDomContentLoaded => observed_dom_content_loaded: "observedDomContentLoaded",
    ObservedDomContentLoadedTs => observed_dom_content_loaded_ts: "observedDomContentLoadedTs",
    ObservedCumulativeLayoutShift => observed_cumulative_layout_shift: "observedCumulativeLayoutShift",
    ObservedCumulativeLayoutShiftMainFrame => observed_cumulative_layout_shift_main_frame: "observedCumulativeLayoutShiftMainFrame",
    ObservedTotalCumulativeLayoutShift => observed_total_cumulative_layout_shift: "observedTotalCumulativeLayoutShift",

    ObservedFirstVisualChange => observed_first_visual_change: "observedFirstVisualChange",
    ObservedFirstVisualChangeTs => observed_first_visual_change_ts: "observedFirstVisualChangeTs",
    ObservedLastVisualChange => observed_last_visual_change: "observedLastVisualChange",
    ObservedLastVisualChangeTs => observed_last_visual_change_ts: "observedLastVisualChangeTs",
    ObservedSpeedIndex => observed_speed_index: "observedSpeedIndex",
    ObservedSpeedIndexTs => observed_speed_index_ts: "observedSpeedIndexTs",
}

impl SummaryField {
    /// Look up a field by its serialized name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}

impl std::fmt::Display for SummaryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TimingSummary {
    /// Fields whose value is unknown for this run
    pub fn missing_fields(&self) -> Vec<SummaryField> {
        SummaryField::ALL
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    pub lcp_invalidated: bool,
}

/// Result of one summarization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutput {
    pub metrics: TimingSummary,
    pub debug_info: DebugInfo,
}
