use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::dataset::TimeRange;
use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::error::{TimelineError, TimelineResult};

/// Zoom-to-magnification curve.
///
/// `SuperLinear` (`z^ln(z+1)`) is the default: high zoom values accelerate,
/// which keeps the numeric zoom input usable across decades-to-days spans.
/// `Linear` magnifies by exactly `z`. Both satisfy `warp(1) == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZoomWarp {
    Linear,
    #[default]
    SuperLinear,
}

impl ZoomWarp {
    #[must_use]
    pub fn warp(self, zoom: f64) -> f64 {
        match self {
            Self::Linear => zoom,
            Self::SuperLinear => zoom.powf((zoom + 1.0).ln()),
        }
    }
}

/// Where the base scale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaseScaleSource {
    /// Full range fills the viewport at zoom 1.
    Fitted,
    /// Range was degenerate; the configured fallback was substituted.
    Fallback,
}

pub fn validate_viewport_width(width_px: f64) -> TimelineResult<f64> {
    if !width_px.is_finite() || width_px <= 0.0 {
        return Err(TimelineError::InvalidViewport { width: width_px });
    }
    Ok(width_px)
}

pub fn validate_zoom(zoom: f64) -> TimelineResult<f64> {
    if !zoom.is_finite() || zoom < 1.0 {
        return Err(TimelineError::InvalidZoom { zoom });
    }
    Ok(zoom)
}

pub fn validate_scale(ms_per_px: f64) -> TimelineResult<f64> {
    if !ms_per_px.is_finite() || ms_per_px <= 0.0 {
        return Err(TimelineError::InvalidScale { scale: ms_per_px });
    }
    Ok(ms_per_px)
}

/// Time-per-pixel that makes `range` exactly fill `viewport_width_px`.
///
/// Returns `Ok(None)` for a degenerate range; callers substitute a default.
pub fn base_scale(range: TimeRange, viewport_width_px: f64) -> TimelineResult<Option<f64>> {
    let width = validate_viewport_width(viewport_width_px)?;
    if range.is_degenerate() {
        return Ok(None);
    }
    Ok(Some(range.span_millis() / width))
}

pub fn effective_scale(base_scale: f64, zoom: f64, warp: ZoomWarp) -> TimelineResult<f64> {
    let base = validate_scale(base_scale)?;
    let zoom = validate_zoom(zoom)?;
    validate_scale(base / warp.warp(zoom))
}

/// Resolved scale for one `(range, width, zoom)` combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleState {
    pub base_scale: f64,
    pub base_scale_source: BaseScaleSource,
    pub zoom: f64,
    pub warp: ZoomWarp,
    pub effective_scale: f64,
}

impl ScaleState {
    pub fn derive(
        range: TimeRange,
        viewport_width_px: f64,
        zoom: f64,
        warp: ZoomWarp,
        fallback_base_scale: f64,
    ) -> TimelineResult<Self> {
        let (base_scale, base_scale_source) = match base_scale(range, viewport_width_px)? {
            Some(fitted) => (fitted, BaseScaleSource::Fitted),
            None => (validate_scale(fallback_base_scale)?, BaseScaleSource::Fallback),
        };
        let effective_scale = effective_scale(base_scale, zoom, warp)?;
        Ok(Self {
            base_scale,
            base_scale_source,
            zoom,
            warp,
            effective_scale,
        })
    }
}

/// Linear date <-> pixel mapping anchored at the dataset's earliest instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    origin_millis: f64,
    ms_per_px: f64,
}

impl TimeScale {
    pub fn new(origin: DateTime<Utc>, ms_per_px: f64) -> TimelineResult<Self> {
        Ok(Self {
            origin_millis: datetime_to_unix_millis(origin),
            ms_per_px: validate_scale(ms_per_px)?,
        })
    }

    #[must_use]
    pub fn ms_per_px(self) -> f64 {
        self.ms_per_px
    }

    #[must_use]
    pub fn origin_millis(self) -> f64 {
        self.origin_millis
    }

    #[must_use]
    pub fn millis_to_pixel(self, millis: f64) -> f64 {
        (millis - self.origin_millis) / self.ms_per_px
    }

    #[must_use]
    pub fn pixel_to_millis(self, pixel: f64) -> f64 {
        self.origin_millis + pixel * self.ms_per_px
    }

    #[must_use]
    pub fn date_to_pixel(self, date: DateTime<Utc>) -> f64 {
        self.millis_to_pixel(datetime_to_unix_millis(date))
    }

    pub fn pixel_to_date(self, pixel: f64) -> TimelineResult<DateTime<Utc>> {
        if !pixel.is_finite() {
            return Err(TimelineError::InvalidData("pixel must be finite".to_owned()));
        }
        unix_millis_to_datetime(self.pixel_to_millis(pixel))
    }

    #[must_use]
    pub fn span_to_pixels(self, span_millis: f64) -> f64 {
        span_millis / self.ms_per_px
    }
}

/// Width of the scrollable content: the full range plus padding on both sides.
#[must_use]
pub fn content_width_px(range: TimeRange, ms_per_px: f64, padding_px: f64) -> f64 {
    range.span_millis() / ms_per_px + 2.0 * padding_px
}

/// First half of a center-preserving zoom: where the viewport center sat,
/// as a fraction of the content width, before the scale changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRecenter {
    pub normalized_center: f64,
    pub viewport_width_px: f64,
}

impl ZoomRecenter {
    pub fn capture(
        scroll_px: f64,
        viewport_width_px: f64,
        content_width_px: f64,
    ) -> TimelineResult<Self> {
        let viewport_width_px = validate_viewport_width(viewport_width_px)?;
        let normalized_center = if content_width_px.is_finite() && content_width_px > 0.0 {
            (scroll_px + viewport_width_px / 2.0) / content_width_px
        } else {
            0.5
        };
        Ok(Self {
            normalized_center,
            viewport_width_px,
        })
    }

    /// Second half: scroll offset placing the same fraction at the viewport
    /// center once the new content width is known.
    #[must_use]
    pub fn resolve_scroll(self, new_content_width_px: f64) -> f64 {
        let max_scroll = (new_content_width_px - self.viewport_width_px).max(0.0);
        let target = new_content_width_px * self.normalized_center - self.viewport_width_px / 2.0;
        if target.is_finite() {
            target.clamp(0.0, max_scroll)
        } else {
            0.0
        }
    }
}
