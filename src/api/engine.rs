use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::calendar::MonthNameLookup;
use crate::core::scale::{validate_viewport_width, validate_zoom};
use crate::core::{Dataset, Period, TimeScale, ViewportWindow, ZoomRecenter, content_width_px};
use crate::error::{TimelineError, TimelineResult};
use crate::layout::PlacedMilestone;

use super::layout_cache::{LayoutCache, LayoutCacheStats};
use super::{LayoutStatus, PeriodLayout, TimelineEngineConfig, TimelineLayout};

/// Scroll adjustment applied by a center-preserving zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomOutcome {
    pub previous_zoom: f64,
    pub zoom: f64,
    pub previous_scroll_px: f64,
    pub scroll_px: f64,
    /// `None` when no dataset range is available to re-center against.
    pub content_width_px: Option<f64>,
}

/// Stateful facade over the pure layout derivations.
///
/// Holds the session inputs (dataset, viewport width, zoom, scroll) and
/// recomputes only the derivations whose inputs changed.
pub struct TimelineEngine {
    config: TimelineEngineConfig,
    dataset: Option<Dataset>,
    dataset_generation: u64,
    viewport_width_px: f64,
    zoom: f64,
    scroll_px: f64,
    month_names: Option<Arc<dyn MonthNameLookup + Send + Sync>>,
    month_names_generation: u64,
    cache: LayoutCache,
}

impl TimelineEngine {
    pub fn new(config: TimelineEngineConfig, viewport_width_px: f64) -> TimelineResult<Self> {
        let config = config.validate()?;
        let viewport_width_px = validate_viewport_width(viewport_width_px)?;
        Ok(Self {
            config,
            dataset: None,
            dataset_generation: 0,
            viewport_width_px,
            zoom: 1.0,
            scroll_px: 0.0,
            month_names: None,
            month_names_generation: 0,
            cache: LayoutCache::default(),
        })
    }

    /// Replaces the dataset. Invalid datasets are rejected and the previous
    /// one is kept.
    pub fn set_dataset(&mut self, dataset: Dataset) -> TimelineResult<()> {
        let dataset = dataset.validate()?;
        debug!(
            periods = dataset.periods.len(),
            isolated_milestones = dataset.isolated_milestones.len(),
            milestones = dataset.milestone_count(),
            "set dataset"
        );
        self.dataset = Some(dataset);
        self.dataset_generation += 1;
        self.scroll_px = 0.0;
        Ok(())
    }

    /// Drops the dataset; the next layout reports `LayoutStatus::NoData`.
    pub fn clear_dataset(&mut self) {
        if self.dataset.take().is_some() {
            debug!("clear dataset");
            self.dataset_generation += 1;
        }
        self.scroll_px = 0.0;
    }

    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> TimelineEngineConfig {
        self.config
    }

    pub fn set_config(&mut self, config: TimelineEngineConfig) -> TimelineResult<()> {
        self.config = config.validate()?;
        debug!(
            zoom_warp = ?self.config.zoom_warp,
            marker_diameter_px = self.config.clustering.marker_diameter_px,
            "set engine config"
        );
        Ok(())
    }

    #[must_use]
    pub fn viewport_width_px(&self) -> f64 {
        self.viewport_width_px
    }

    pub fn set_viewport_width(&mut self, viewport_width_px: f64) -> TimelineResult<()> {
        self.viewport_width_px = validate_viewport_width(viewport_width_px)?;
        debug!(viewport_width_px, "set viewport width");
        Ok(())
    }

    #[must_use]
    pub fn scroll_px(&self) -> f64 {
        self.scroll_px
    }

    /// Negative offsets clamp to zero.
    pub fn set_scroll_offset(&mut self, scroll_px: f64) -> TimelineResult<()> {
        if !scroll_px.is_finite() {
            return Err(TimelineError::InvalidData(
                "scroll offset must be finite".to_owned(),
            ));
        }
        self.scroll_px = scroll_px.max(0.0);
        Ok(())
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Center-preserving zoom.
    ///
    /// Equivalent to `begin_zoom` followed by `complete_zoom` with the
    /// content width derived at the new scale.
    pub fn set_zoom(&mut self, zoom: f64) -> TimelineResult<ZoomOutcome> {
        let previous_zoom = self.zoom;
        let previous_scroll_px = self.scroll_px;
        let recenter = self.begin_zoom(zoom)?;
        let content_width_px = self.current_content_width()?;
        if let (Some(recenter), Some(width)) = (recenter, content_width_px) {
            self.complete_zoom(recenter, width);
        }
        debug!(
            previous_zoom,
            zoom = self.zoom,
            previous_scroll_px,
            scroll_px = self.scroll_px,
            "set zoom"
        );
        Ok(ZoomOutcome {
            previous_zoom,
            zoom: self.zoom,
            previous_scroll_px,
            scroll_px: self.scroll_px,
            content_width_px,
        })
    }

    /// First step of a zoom: records where the viewport center sits and
    /// applies the new zoom. Returns `None` when there is no range to
    /// re-center against.
    pub fn begin_zoom(&mut self, zoom: f64) -> TimelineResult<Option<ZoomRecenter>> {
        let zoom = validate_zoom(zoom)?;
        let recenter = match self.current_content_width()? {
            Some(width) => Some(ZoomRecenter::capture(
                self.scroll_px,
                self.viewport_width_px,
                width,
            )?),
            None => None,
        };
        self.zoom = zoom;
        Ok(recenter)
    }

    /// Second step of a zoom: scrolls so the captured center fraction sits at
    /// the viewport center of the measured new content width.
    pub fn complete_zoom(&mut self, recenter: ZoomRecenter, new_content_width_px: f64) -> f64 {
        self.scroll_px = recenter.resolve_scroll(new_content_width_px);
        self.scroll_px
    }

    /// Overrides the month names used for graduation labels.
    pub fn set_month_name_lookup(&mut self, lookup: Arc<dyn MonthNameLookup + Send + Sync>) {
        self.month_names = Some(lookup);
        self.month_names_generation += 1;
    }

    /// Reverts to the configured `CalendarLocale` tables.
    pub fn clear_month_name_lookup(&mut self) {
        if self.month_names.take().is_some() {
            self.month_names_generation += 1;
        }
    }

    #[must_use]
    pub fn cache_stats(&self) -> LayoutCacheStats {
        self.cache.stats()
    }

    /// Content width at the current scale, or `None` without a non-empty dataset.
    pub fn current_content_width(&mut self) -> TimelineResult<Option<f64>> {
        let Some(dataset) = self.dataset.as_ref() else {
            return Ok(None);
        };
        let Some(range) = self.cache.time_range(self.dataset_generation, dataset) else {
            return Ok(None);
        };
        let state = self.cache.scale(
            range,
            self.viewport_width_px,
            self.zoom,
            self.config.zoom_warp,
            self.config.fallback_base_scale_ms_per_px,
        )?;
        Ok(Some(content_width_px(
            range,
            state.effective_scale,
            self.config.content_padding_px,
        )))
    }

    /// Derives the full layout for the current inputs.
    ///
    /// Degenerate inputs produce an explicit status instead of an error:
    /// no dataset gives `NoData`, zero milestones gives `EmptyDataset`, and
    /// periods without milestones are listed in `empty_periods`.
    pub fn layout(&mut self) -> TimelineResult<TimelineLayout> {
        let padding = self.config.content_padding_px;
        let Some(dataset) = self.dataset.as_ref() else {
            return Ok(TimelineLayout::empty(
                LayoutStatus::NoData,
                self.viewport_width_px,
                self.scroll_px,
                padding,
            ));
        };
        let Some(range) = self.cache.time_range(self.dataset_generation, dataset) else {
            return Ok(TimelineLayout::empty(
                LayoutStatus::EmptyDataset,
                self.viewport_width_px,
                self.scroll_px,
                padding,
            ));
        };

        let state = self.cache.scale(
            range,
            self.viewport_width_px,
            self.zoom,
            self.config.zoom_warp,
            self.config.fallback_base_scale_ms_per_px,
        )?;
        let scale = TimeScale::new(range.earliest, state.effective_scale)?;

        let populated: Vec<&Period> = dataset
            .periods
            .iter()
            .filter(|period| !period.milestones.is_empty())
            .collect();
        let empty_periods = dataset.empty_period_names();
        for name in &empty_periods {
            warn!(period = %name, "period has no milestones; excluded from layout");
        }

        let lanes = self.cache.lanes(&populated)?;
        let clusters = self
            .cache
            .clusters(&populated, scale, self.config.clustering)?;
        let mut periods = Vec::with_capacity(populated.len());
        for (period, clusters) in populated.iter().zip(clusters) {
            let span = period.span()?;
            let lane = lanes.lane(&period.name).ok_or_else(|| {
                TimelineError::InvalidData(format!("period `{}` has no lane", period.name))
            })?;
            periods.push(PeriodLayout {
                name: period.name.clone(),
                description: period.description.clone(),
                lane,
                start_px: scale.date_to_pixel(span.earliest),
                width_px: scale.span_to_pixels(span.span_millis()),
                items: clusters.items,
                segments: clusters.segments,
            });
        }

        let isolated_milestones = dataset
            .isolated_milestones
            .iter()
            .map(|milestone| PlacedMilestone::place(milestone, scale))
            .collect();

        let window = ViewportWindow::from_scroll(
            range.earliest,
            self.scroll_px,
            padding,
            self.viewport_width_px,
            state.effective_scale,
        )?;
        let locale = self.config.graduations.locale;
        let month_names: &dyn MonthNameLookup = match self.month_names.as_deref() {
            Some(lookup) => lookup,
            None => &locale,
        };
        let graduations = match window.clamp_to(range) {
            Some(visible) => self.cache.graduations(
                visible,
                scale,
                self.config.graduations,
                month_names,
                self.month_names_generation,
            )?,
            None => Vec::new(),
        };

        Ok(TimelineLayout {
            status: LayoutStatus::Ready,
            viewport_width_px: self.viewport_width_px,
            scroll_px: self.scroll_px,
            content_padding_px: padding,
            content_width_px: content_width_px(range, state.effective_scale, padding),
            time_range: Some(range),
            scale: Some(state),
            window: Some(window),
            lane_count: lanes.lane_count(),
            isolated_milestones,
            periods,
            graduations,
            empty_periods,
        })
    }
}
