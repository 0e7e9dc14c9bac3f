mod config;
mod engine;
mod layout;
mod layout_cache;

pub use config::TimelineEngineConfig;
pub use engine::{TimelineEngine, ZoomOutcome};
pub use layout::{
    LayoutStatus, PeriodLayout, TIMELINE_LAYOUT_JSON_SCHEMA_V1, TimelineLayout,
    TimelineLayoutJsonContractV1,
};
pub use layout_cache::LayoutCacheStats;
