//! Route-subsystem error types.

use thiserror::Error;

use nav_core::{GeoPoint, NavError, StopIndex};

/// Errors raised while constructing or loading a [`Route`][crate::Route].
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route path has {got} points, at least 2 required")]
    TooFewPoints { got: usize },

    #[error("route has no stops")]
    NoStops,

    #[error("invalid coordinate {0} in route")]
    InvalidCoordinate(GeoPoint),

    #[error("stop {got} follows {previous}: stop sequence must be strictly increasing")]
    StopOrder { previous: StopIndex, got: StopIndex },

    #[error("stop {stop} offset {offset_m:.1} m is outside the path or behind the previous stop")]
    StopOffset { stop: StopIndex, offset_m: f64 },

    #[error("maneuver {index} offset {offset_m:.1} m is outside the path or out of order")]
    ManeuverOffset { index: usize, offset_m: f64 },

    #[error("stop {0} is not on this route")]
    MissingStop(StopIndex),

    #[error("stop list error: {0}")]
    StopList(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Core(#[from] NavError),
}

pub type RouteResult<T> = Result<T, RouteError>;

/// Errors returned by a [`RouteSolver`][crate::RouteSolver].
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("no route found: {0}")]
    NoRoute(String),

    #[error("route service unavailable: {0}")]
    Unavailable(String),

    #[error("solver returned an invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
}
