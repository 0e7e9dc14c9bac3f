use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Milestone, TimeScale};
use crate::error::{TimelineError, TimelineResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Two consecutive milestones closer than this (in px) fuse into a cluster.
    pub marker_diameter_px: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            marker_diameter_px: 16.0,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(self) -> TimelineResult<Self> {
        if !self.marker_diameter_px.is_finite() || self.marker_diameter_px < 0.0 {
            return Err(TimelineError::InvalidData(
                "clustering `marker_diameter_px` must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedMilestone {
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub x_px: f64,
}

impl PlacedMilestone {
    #[must_use]
    pub fn place(milestone: &Milestone, scale: TimeScale) -> Self {
        Self {
            name: milestone.name.clone(),
            date: milestone.date,
            description: milestone.description.clone(),
            x_px: scale.date_to_pixel(milestone.date),
        }
    }
}

/// Milestones fused into one marker because they render too close together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneCluster {
    pub milestones: Vec<PlacedMilestone>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub start_px: f64,
    pub width_px: f64,
    /// Group marker extent including half a marker of overhang.
    pub bounds_left_px: f64,
    pub bounds_width_px: f64,
    /// One `"• name"` line per milestone, for the label popup.
    pub label: String,
}

impl MilestoneCluster {
    fn from_members(members: Vec<PlacedMilestone>, marker_diameter_px: f64) -> Self {
        let first = &members[0];
        let (mut start, mut end) = (first, first);
        for member in &members[1..] {
            if member.date < start.date {
                start = member;
            }
            if member.date > end.date {
                end = member;
            }
        }
        let start_px = start.x_px;
        let width_px = end.x_px - start.x_px;
        let (start_date, end_date) = (start.date, end.date);
        let label = members
            .iter()
            .map(|member| format!("• {}", member.name))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            start_date,
            end_date,
            start_px,
            width_px,
            bounds_left_px: start_px - marker_diameter_px / 4.0,
            bounds_width_px: width_px + marker_diameter_px / 2.0,
            label,
            milestones: members,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MilestoneItem {
    Marker(PlacedMilestone),
    Cluster(MilestoneCluster),
}

impl MilestoneItem {
    pub fn milestone_names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Self::Marker(marker) => Box::new(std::iter::once(marker.name.as_str())),
            Self::Cluster(cluster) => {
                Box::new(cluster.milestones.iter().map(|m| m.name.as_str()))
            }
        }
    }
}

/// Connecting line between two consecutive milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectingSegment {
    pub from: String,
    pub to: String,
    pub start_px: f64,
    pub width_px: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodClusters {
    pub items: Vec<MilestoneItem>,
    pub segments: Vec<ConnectingSegment>,
}

impl PeriodClusters {
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, MilestoneItem::Marker(_)))
            .count()
    }

    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.items.len() - self.marker_count()
    }
}

/// Partitions a period's milestones into standalone markers and
/// single-linkage clusters at the current scale.
///
/// Milestones are ordered by date (stable for equal dates). Each consecutive
/// pair whose pixel gap is `<= marker_diameter_px` joins the open cluster;
/// a wider gap closes it. Every pair also yields a connecting segment.
pub fn cluster_milestones(
    milestones: &[Milestone],
    scale: TimeScale,
    config: ClusteringConfig,
) -> TimelineResult<PeriodClusters> {
    let config = config.validate()?;
    let mut sorted: Vec<&Milestone> = milestones.iter().collect();
    sorted.sort_by_key(|milestone| milestone.date);

    let placed: Vec<PlacedMilestone> = sorted
        .iter()
        .map(|milestone| PlacedMilestone::place(milestone, scale))
        .collect();

    let mut output = PeriodClusters {
        items: Vec::with_capacity(placed.len()),
        segments: Vec::with_capacity(placed.len().saturating_sub(1)),
    };
    // Members are tracked by sorted index so equal names cannot be counted twice.
    let mut open: Vec<usize> = Vec::new();
    let close = |open: &mut Vec<usize>| {
        let members = open.drain(..).map(|index| placed[index].clone()).collect();
        MilestoneItem::Cluster(MilestoneCluster::from_members(
            members,
            config.marker_diameter_px,
        ))
    };

    for index in 0..placed.len() {
        let current = &placed[index];
        let Some(next) = placed.get(index + 1) else {
            if open.is_empty() {
                output.items.push(MilestoneItem::Marker(current.clone()));
            } else {
                output.items.push(close(&mut open));
            }
            break;
        };

        let gap_px = scale.span_to_pixels((next.date - current.date).num_milliseconds() as f64);
        if gap_px <= config.marker_diameter_px {
            if open.last() != Some(&index) {
                open.push(index);
            }
            open.push(index + 1);
        } else if open.is_empty() {
            output.items.push(MilestoneItem::Marker(current.clone()));
        } else {
            output.items.push(close(&mut open));
        }

        output.segments.push(ConnectingSegment {
            from: current.name.clone(),
            to: next.name.clone(),
            start_px: current.x_px,
            width_px: gap_px,
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::{ClusteringConfig, MilestoneItem, cluster_milestones};
    use crate::core::{Milestone, TimeScale};
    use chrono::{TimeZone, Utc};

    const DAY_MS: f64 = 86_400_000.0;

    fn scale(ms_per_px: f64) -> TimeScale {
        TimeScale::new(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(), ms_per_px)
            .expect("scale")
    }

    fn day(name: &str, day: u32) -> Milestone {
        Milestone::new(name, Utc.with_ymd_and_hms(2000, 1, day, 0, 0, 0).unwrap())
    }

    #[test]
    fn single_milestone_is_one_marker_without_segments() {
        let clusters = cluster_milestones(
            &[day("solo", 3)],
            scale(DAY_MS),
            ClusteringConfig::default(),
        )
        .expect("clusters");
        assert_eq!(clusters.items.len(), 1);
        assert!(matches!(clusters.items[0], MilestoneItem::Marker(_)));
        assert!(clusters.segments.is_empty());
    }

    #[test]
    fn clusters_grow_transitively() {
        // 1 px per day: 1-2-3 chain, gap to 30 is wide.
        let milestones = [day("a", 1), day("b", 2), day("c", 3), day("d", 30)];
        let config = ClusteringConfig {
            marker_diameter_px: 1.5,
        };
        let clusters = cluster_milestones(&milestones, scale(DAY_MS), config).expect("clusters");
        assert_eq!(clusters.items.len(), 2);
        let MilestoneItem::Cluster(cluster) = &clusters.items[0] else {
            panic!("expected leading cluster");
        };
        assert_eq!(cluster.len(), 3);
        assert_eq!(cluster.label, "• a\n• b\n• c");
        assert!((cluster.width_px - 2.0).abs() <= 1e-9);
        assert!(matches!(clusters.items[1], MilestoneItem::Marker(ref m) if m.name == "d"));
        assert_eq!(clusters.segments.len(), 3);
    }

    #[test]
    fn milestones_are_sorted_before_walking() {
        let milestones = [day("late", 20), day("early", 1)];
        let clusters =
            cluster_milestones(&milestones, scale(DAY_MS), ClusteringConfig::default())
                .expect("clusters");
        assert_eq!(clusters.segments[0].from, "early");
        assert_eq!(clusters.segments[0].to, "late");
        assert!((clusters.segments[0].width_px - 19.0).abs() <= 1e-9);
    }

    #[test]
    fn trailing_cluster_is_emitted() {
        let milestones = [day("a", 1), day("b", 20), day("c", 21)];
        let config = ClusteringConfig {
            marker_diameter_px: 2.0,
        };
        let clusters = cluster_milestones(&milestones, scale(DAY_MS), config).expect("clusters");
        assert_eq!(clusters.marker_count(), 1);
        assert_eq!(clusters.cluster_count(), 1);
        let names: Vec<&str> = clusters.items[1].milestone_names().collect();
        assert_eq!(names, ["b", "c"]);
    }
}
