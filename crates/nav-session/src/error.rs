use std::time::Duration;

use nav_route::{RouteError, SolveError};
use nav_tracking::TrackingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripError {
    #[error("trip configuration error: {0}")]
    Config(String),

    #[error("invalid route: {0}")]
    Route(#[from] RouteError),

    #[error("route solving failed: {0}")]
    Solve(#[from] SolveError),

    #[error("route solving timed out after {0:?}")]
    SolveTimeout(Duration),

    #[error("tracking error: {0}")]
    Tracking(#[from] TrackingError),

    #[error("no tokio runtime available to run reroutes")]
    NoRuntime,

    /// A condition the state machine guarantees cannot happen.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

pub type TripResult<T> = Result<T, TripError>;
