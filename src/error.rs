use thiserror::Error;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("invalid viewport width: {width}")]
    InvalidViewport { width: f64 },

    #[error("invalid zoom factor: {zoom} (must be finite and >= 1)")]
    InvalidZoom { zoom: f64 },

    #[error("invalid time scale: {scale} ms/px (must be finite and > 0)")]
    InvalidScale { scale: f64 },

    #[error("dataset has no milestones")]
    EmptyDataset,

    #[error("period `{name}` has no milestones")]
    EmptyPeriod { name: String },

    #[error("invalid milestone date `{value}`")]
    InvalidDate { value: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
