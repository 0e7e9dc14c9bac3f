use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::calendar::MonthNameLookup;
use crate::core::{
    BaseScaleSource, Dataset, Milestone, Period, ScaleState, TimeRange, TimeScale, ZoomWarp,
};
use crate::error::TimelineResult;
use crate::layout::{
    ClusteringConfig, Graduation, GraduationConfig, LaneAssignment, PeriodClusters,
    assign_period_lanes, cluster_milestones, generate_graduations,
};

/// Recomputation counters per derivation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutCacheStats {
    pub time_range_computations: u64,
    pub scale_computations: u64,
    pub lane_computations: u64,
    pub cluster_computations: u64,
    pub graduation_computations: u64,
    pub hits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScaleKey {
    range: TimeRange,
    viewport_width_px: OrderedFloat<f64>,
    zoom: OrderedFloat<f64>,
    warp: ZoomWarp,
    fallback_base_scale: OrderedFloat<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClusterKey {
    origin_millis: OrderedFloat<f64>,
    effective_scale: OrderedFloat<f64>,
    marker_diameter_px: OrderedFloat<f64>,
}

impl ClusterKey {
    fn new(scale: TimeScale, config: ClusteringConfig) -> Self {
        Self {
            origin_millis: OrderedFloat(scale.origin_millis()),
            effective_scale: OrderedFloat(scale.ms_per_px()),
            marker_diameter_px: OrderedFloat(config.marker_diameter_px),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct GraduationKey {
    window: TimeRange,
    origin_millis: OrderedFloat<f64>,
    effective_scale: OrderedFloat<f64>,
    config: GraduationConfig,
    month_names_generation: u64,
}

#[derive(Debug)]
struct ClusterSlot {
    key: ClusterKey,
    milestones: Vec<Milestone>,
    clusters: PeriodClusters,
}

/// Memoized derivations, each keyed by exactly the inputs it reads.
#[derive(Debug, Default)]
pub(super) struct LayoutCache {
    time_range: Option<(u64, Option<TimeRange>)>,
    scale: Option<(ScaleKey, ScaleState)>,
    lanes: Option<(Vec<(String, TimeRange)>, LaneAssignment)>,
    clusters: IndexMap<String, ClusterSlot>,
    graduations: Option<(GraduationKey, Vec<Graduation>)>,
    stats: LayoutCacheStats,
}

impl LayoutCache {
    pub(super) fn stats(&self) -> LayoutCacheStats {
        self.stats
    }

    pub(super) fn time_range(&mut self, generation: u64, dataset: &Dataset) -> Option<TimeRange> {
        if let Some((cached_generation, range)) = self.time_range {
            if cached_generation == generation {
                self.stats.hits += 1;
                return range;
            }
        }
        let range = TimeRange::from_dataset(dataset);
        self.stats.time_range_computations += 1;
        trace!(generation, has_range = range.is_some(), "derive time range");
        if range.is_none() {
            warn!("dataset has no milestones; layout will be empty");
        }
        self.time_range = Some((generation, range));
        range
    }

    pub(super) fn scale(
        &mut self,
        range: TimeRange,
        viewport_width_px: f64,
        zoom: f64,
        warp: ZoomWarp,
        fallback_base_scale: f64,
    ) -> TimelineResult<ScaleState> {
        let key = ScaleKey {
            range,
            viewport_width_px: OrderedFloat(viewport_width_px),
            zoom: OrderedFloat(zoom),
            warp,
            fallback_base_scale: OrderedFloat(fallback_base_scale),
        };
        if let Some((cached_key, state)) = self.scale {
            if cached_key == key {
                self.stats.hits += 1;
                return Ok(state);
            }
        }
        let state = ScaleState::derive(range, viewport_width_px, zoom, warp, fallback_base_scale)?;
        self.stats.scale_computations += 1;
        trace!(
            base_scale = state.base_scale,
            effective_scale = state.effective_scale,
            zoom,
            "derive scale"
        );
        if state.base_scale_source == BaseScaleSource::Fallback {
            warn!(
                fallback_base_scale,
                "time range is degenerate; using fallback base scale"
            );
        }
        self.scale = Some((key, state));
        Ok(state)
    }

    /// Lanes depend only on each period's name and `[start, end]`, so the
    /// key is the ordered list of those spans.
    pub(super) fn lanes(&mut self, periods: &[&Period]) -> TimelineResult<LaneAssignment> {
        let key = periods
            .iter()
            .map(|period| Ok((period.name.clone(), period.span()?)))
            .collect::<TimelineResult<Vec<_>>>()?;
        if let Some((cached_key, assignment)) = &self.lanes {
            if *cached_key == key {
                self.stats.hits += 1;
                return Ok(assignment.clone());
            }
        }
        let assignment = assign_period_lanes(periods.iter().copied())?;
        self.stats.lane_computations += 1;
        trace!(
            periods = periods.len(),
            lane_count = assignment.lane_count(),
            "derive period lanes"
        );
        self.lanes = Some((key, assignment.clone()));
        Ok(assignment)
    }

    /// Clusters for every period, reusing slots whose milestones and scale
    /// are unchanged. Slots of periods no longer present are dropped.
    pub(super) fn clusters(
        &mut self,
        periods: &[&Period],
        scale: TimeScale,
        config: ClusteringConfig,
    ) -> TimelineResult<Vec<PeriodClusters>> {
        let key = ClusterKey::new(scale, config);
        let stale: Vec<&Period> = periods
            .iter()
            .copied()
            .filter(|period| {
                self.clusters
                    .get(&period.name)
                    .is_none_or(|slot| slot.key != key || slot.milestones != period.milestones)
            })
            .collect();

        for (period, clusters) in compute_clusters(&stale, scale, config)? {
            self.clusters.insert(
                period.name.clone(),
                ClusterSlot {
                    key,
                    milestones: period.milestones.clone(),
                    clusters,
                },
            );
        }
        self.stats.cluster_computations += stale.len() as u64;
        self.stats.hits += (periods.len() - stale.len()) as u64;
        if !stale.is_empty() {
            trace!(
                recomputed = stale.len(),
                reused = periods.len() - stale.len(),
                "derive milestone clusters"
            );
        }

        self.clusters
            .retain(|name, _| periods.iter().any(|period| &period.name == name));
        Ok(periods
            .iter()
            .map(|period| {
                self.clusters
                    .get(&period.name)
                    .map(|slot| slot.clusters.clone())
                    .unwrap_or_default()
            })
            .collect())
    }

    pub(super) fn graduations(
        &mut self,
        window: TimeRange,
        scale: TimeScale,
        config: GraduationConfig,
        month_names: &dyn MonthNameLookup,
        month_names_generation: u64,
    ) -> TimelineResult<Vec<Graduation>> {
        let key = GraduationKey {
            window,
            origin_millis: OrderedFloat(scale.origin_millis()),
            effective_scale: OrderedFloat(scale.ms_per_px()),
            config,
            month_names_generation,
        };
        if let Some((cached_key, graduations)) = &self.graduations {
            if *cached_key == key {
                self.stats.hits += 1;
                return Ok(graduations.clone());
            }
        }
        let graduations = generate_graduations(window, scale, config, month_names)?;
        self.stats.graduation_computations += 1;
        trace!(count = graduations.len(), "derive graduations");
        self.graduations = Some((key, graduations.clone()));
        Ok(graduations)
    }
}

#[cfg(not(feature = "parallel-layout"))]
fn compute_clusters<'a>(
    periods: &[&'a Period],
    scale: TimeScale,
    config: ClusteringConfig,
) -> TimelineResult<Vec<(&'a Period, PeriodClusters)>> {
    periods
        .iter()
        .map(|period| Ok((*period, cluster_milestones(&period.milestones, scale, config)?)))
        .collect()
}

#[cfg(feature = "parallel-layout")]
fn compute_clusters<'a>(
    periods: &[&'a Period],
    scale: TimeScale,
    config: ClusteringConfig,
) -> TimelineResult<Vec<(&'a Period, PeriodClusters)>> {
    use rayon::prelude::*;

    periods
        .par_iter()
        .map(|period| Ok((*period, cluster_milestones(&period.milestones, scale, config)?)))
        .collect()
}
