//! Viewport-edge proximity for label repositioning.
//!
//! Independent of the layout engine: hosts feed it rendered rectangles.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeProximity {
    pub near_edges: SmallVec<[Edge; 4]>,
}

impl EdgeProximity {
    #[must_use]
    pub fn is_near_edge(&self) -> bool {
        !self.near_edges.is_empty()
    }

    #[must_use]
    pub fn is_near(&self, edge: Edge) -> bool {
        self.near_edges.contains(&edge)
    }
}

#[must_use]
pub fn near_edges(
    rect: EdgeRect,
    viewport_width_px: f64,
    viewport_height_px: f64,
    threshold_px: f64,
) -> EdgeProximity {
    let mut near_edges = SmallVec::new();
    if rect.top < threshold_px {
        near_edges.push(Edge::Top);
    }
    if viewport_height_px - rect.bottom < threshold_px {
        near_edges.push(Edge::Bottom);
    }
    if rect.left < threshold_px {
        near_edges.push(Edge::Left);
    }
    if viewport_width_px - rect.right < threshold_px {
        near_edges.push(Edge::Right);
    }
    EdgeProximity { near_edges }
}
