pub mod clustering;
pub mod graduations;
pub mod lanes;
pub mod proximity;

pub use clustering::{
    ClusteringConfig, ConnectingSegment, MilestoneCluster, MilestoneItem, PeriodClusters,
    PlacedMilestone, cluster_milestones,
};
pub use graduations::{
    Graduation, GraduationConfig, GraduationLabel, GraduationTier, ReferenceWidths,
    generate_graduations,
};
pub use lanes::{LaneAssignment, assign_period_lanes};
pub use proximity::{Edge, EdgeProximity, EdgeRect, near_edges};
