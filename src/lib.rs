//! timeline-rs: temporal layout engine for zoomable chronological charts.
//!
//! Turns a dataset of dated milestones, optionally grouped into periods,
//! plus a viewport/zoom/scroll state into pixel-space layout descriptors:
//! period lanes, clustered milestone markers, connecting segments and
//! adaptive calendar graduations. Drawing is left to the host.

pub mod api;
pub mod core;
pub mod error;
pub mod layout;
pub mod telemetry;

pub use api::{TimelineEngine, TimelineEngineConfig, TimelineLayout};
pub use error::{TimelineError, TimelineResult};
