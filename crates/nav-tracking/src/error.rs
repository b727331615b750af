use nav_core::StopIndex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("invalid tracking configuration: {0}")]
    Config(String),

    #[error("trip is already complete")]
    Completed,

    #[error("active route does not visit destination {0}")]
    MissingDestination(StopIndex),

    #[error("stop at position {position} has sequence {found}; stops must be numbered 0..{count}")]
    StopSequence { position: usize, found: StopIndex, count: usize },
}

pub type TrackingResult<T> = Result<T, TrackingError>;
