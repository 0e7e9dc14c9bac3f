use serde::{Deserialize, Serialize};

use crate::core::{ScaleState, TimeRange, ViewportWindow};
use crate::error::{TimelineError, TimelineResult};
use crate::layout::{ConnectingSegment, Graduation, MilestoneItem, PlacedMilestone};

pub const TIMELINE_LAYOUT_JSON_SCHEMA_V1: u32 = 1;

/// Whether a layout carries content, and if not, why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStatus {
    /// No dataset has been loaded (or retrieval failed).
    NoData,
    /// A dataset is loaded but holds zero milestones.
    EmptyDataset,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodLayout {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 1-based lane.
    pub lane: usize,
    pub start_px: f64,
    pub width_px: f64,
    pub items: Vec<MilestoneItem>,
    pub segments: Vec<ConnectingSegment>,
}

/// Everything the rendering layer needs for one frame.
///
/// Pixel offsets are relative to the range origin; the content adds
/// `content_padding_px` on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub status: LayoutStatus,
    pub viewport_width_px: f64,
    pub scroll_px: f64,
    pub content_padding_px: f64,
    pub content_width_px: f64,
    pub time_range: Option<TimeRange>,
    pub scale: Option<ScaleState>,
    pub window: Option<ViewportWindow>,
    pub lane_count: usize,
    /// Standalone markers drawn in lane 0.
    pub isolated_milestones: Vec<PlacedMilestone>,
    pub periods: Vec<PeriodLayout>,
    pub graduations: Vec<Graduation>,
    /// Periods skipped because they hold no milestones.
    pub empty_periods: Vec<String>,
}

impl TimelineLayout {
    #[must_use]
    pub fn empty(
        status: LayoutStatus,
        viewport_width_px: f64,
        scroll_px: f64,
        content_padding_px: f64,
    ) -> Self {
        Self {
            status,
            viewport_width_px,
            scroll_px,
            content_padding_px,
            content_width_px: 2.0 * content_padding_px,
            time_range: None,
            scale: None,
            window: None,
            lane_count: 0,
            isolated_milestones: Vec::new(),
            periods: Vec::new(),
            graduations: Vec::new(),
            empty_periods: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == LayoutStatus::Ready
    }

    #[must_use]
    pub fn period(&self, name: &str) -> Option<&PeriodLayout> {
        self.periods.iter().find(|period| period.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLayoutJsonContractV1 {
    pub schema_version: u32,
    pub layout: TimelineLayout,
}

impl TimelineLayout {
    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize layout json: {e}"))
        })
    }

    pub fn to_json_contract_v1_pretty(&self) -> TimelineResult<String> {
        let payload = TimelineLayoutJsonContractV1 {
            schema_version: TIMELINE_LAYOUT_JSON_SCHEMA_V1,
            layout: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize layout contract v1: {e}"))
        })
    }

    /// Accepts either a bare layout or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> TimelineResult<Self> {
        if let Ok(layout) = serde_json::from_str::<TimelineLayout>(input) {
            return Ok(layout);
        }
        let payload: TimelineLayoutJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse layout json payload: {e}"))
        })?;
        if payload.schema_version != TIMELINE_LAYOUT_JSON_SCHEMA_V1 {
            return Err(TimelineError::InvalidData(format!(
                "unsupported layout schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.layout)
    }
}
