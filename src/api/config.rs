use serde::{Deserialize, Serialize};

use crate::core::ZoomWarp;
use crate::core::scale::validate_scale;
use crate::error::{TimelineError, TimelineResult};
use crate::layout::{ClusteringConfig, GraduationConfig};

/// Public engine configuration.
///
/// Serializable so hosts can persist and reload their legibility thresholds;
/// every field has a default, so partial documents are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineEngineConfig {
    #[serde(default)]
    pub zoom_warp: ZoomWarp,
    #[serde(default = "default_fallback_base_scale")]
    pub fallback_base_scale_ms_per_px: f64,
    #[serde(default = "default_content_padding_px")]
    pub content_padding_px: f64,
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub graduations: GraduationConfig,
}

impl Default for TimelineEngineConfig {
    fn default() -> Self {
        Self {
            zoom_warp: ZoomWarp::default(),
            fallback_base_scale_ms_per_px: default_fallback_base_scale(),
            content_padding_px: default_content_padding_px(),
            clustering: ClusteringConfig::default(),
            graduations: GraduationConfig::default(),
        }
    }
}

impl TimelineEngineConfig {
    #[must_use]
    pub fn with_zoom_warp(mut self, warp: ZoomWarp) -> Self {
        self.zoom_warp = warp;
        self
    }

    #[must_use]
    pub fn with_marker_diameter_px(mut self, diameter_px: f64) -> Self {
        self.clustering.marker_diameter_px = diameter_px;
        self
    }

    #[must_use]
    pub fn with_content_padding_px(mut self, padding_px: f64) -> Self {
        self.content_padding_px = padding_px;
        self
    }

    #[must_use]
    pub fn with_graduations(mut self, graduations: GraduationConfig) -> Self {
        self.graduations = graduations;
        self
    }

    pub fn validate(self) -> TimelineResult<Self> {
        validate_scale(self.fallback_base_scale_ms_per_px)?;
        if !self.content_padding_px.is_finite() || self.content_padding_px < 0.0 {
            return Err(TimelineError::InvalidData(
                "`content_padding_px` must be finite and >= 0".to_owned(),
            ));
        }
        self.clustering.validate()?;
        self.graduations.validate()?;
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse engine config json: {e}"))
        })?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize engine config: {e}"))
        })
    }
}

fn default_fallback_base_scale() -> f64 {
    250_000_000.0
}

fn default_content_padding_px() -> f64 {
    16.0
}
