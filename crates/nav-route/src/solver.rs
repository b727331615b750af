//! The route-solving contract.
//!
//! # Pluggability
//!
//! The tracker never computes routes itself.  A trip is planned once and
//! rerouted on deviation through the [`RouteSolver`] trait, so an online
//! routing service, an offline dataset, or a test double can be swapped in
//! without touching tracking code.  [`DirectSolver`][crate::DirectSolver]
//! is the bundled offline implementation.
//!
//! # Async
//!
//! Solving is network-bound, so `solve` returns a `Send` future.  Callers
//! bound it with their own timeout; implementations need not.

use std::future::Future;

use nav_core::{GeoPoint, TravelMode};

use crate::{Route, SolveError, Stop};

/// How a reroute re-plans the remaining trip.
///
/// There is deliberately no `Default`: a trip must name its strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReroutingStrategy {
    /// Solve only the leg to the current destination, then re-chain the
    /// previous route's path through the remaining stops.
    ToNextWaypoint,
    /// Solve a fresh route through every remaining stop.
    ToNextStop,
}

impl ReroutingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ReroutingStrategy::ToNextWaypoint => "to_next_waypoint",
            ReroutingStrategy::ToNextStop     => "to_next_stop",
        }
    }
}

impl std::fmt::Display for ReroutingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options passed through to the solver.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct SolveOptions {
    /// `None` for the initial plan, `Some` when rerouting.
    pub strategy:    Option<ReroutingStrategy>,
    pub travel_mode: TravelMode,
}

/// Everything a solver needs to produce a [`Route`].
#[derive(Clone, Debug, PartialEq)]
pub struct SolveRequest {
    /// Where the route starts (the current fix when rerouting).
    pub origin:  GeoPoint,
    /// Stops to visit in order.  Never empty.
    pub stops:   Vec<Stop>,
    pub options: SolveOptions,
}

/// Pluggable route-solving service.
///
/// The returned route must visit `request.stops` in order, carrying each
/// stop's original `sequence`.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync + 'static`; the rerouting
/// coordinator shares one solver behind an `Arc` and solves on a spawned
/// task.
pub trait RouteSolver: Send + Sync + 'static {
    fn solve(&self, request: SolveRequest) -> impl Future<Output = Result<Route, SolveError>> + Send;
}
