//! Fluent builder for constructing a [`Trip`].

use std::sync::Arc;

use nav_core::GeoPoint;
use nav_route::{Route, RouteSolver, SolveOptions, SolveRequest, Stop};
use nav_tracking::RouteTracker;
use tokio::runtime::Handle;
use tracing::info;

use crate::{ActiveRoute, CancelHandle, RerouteCoordinator, Trip, TripConfig, TripError, TripResult, TripState};

/// Fluent builder for [`Trip<S>`].
///
/// # Required inputs
///
/// - `S: RouteSolver`, used for reroutes, and for the first route when
///   the trip is built with [`solve`](Self::solve)
/// - the first route, either pre-solved ([`build`](Self::build)) or solved
///   from an origin and stop list ([`solve`](Self::solve))
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                          |
/// |-------------------|----------------------------------|
/// | `.config(c)`      | `TripConfig::default()`          |
/// | `.runtime(h)`     | `Handle::try_current()`          |
/// | `.cancel(h)`      | A fresh `CancelHandle`           |
///
/// # Example
///
/// ```rust,ignore
/// let trip = TripBuilder::new(DirectSolver::new())
///     .config(config)
///     .solve(origin, stops)
///     .await?;
/// ```
pub struct TripBuilder<S: RouteSolver> {
    solver:  S,
    config:  TripConfig,
    runtime: Option<Handle>,
    cancel:  Option<CancelHandle>,
}

impl<S: RouteSolver> TripBuilder<S> {
    pub fn new(solver: S) -> Self {
        Self { solver, config: TripConfig::default(), runtime: None, cancel: None }
    }

    pub fn config(mut self, config: TripConfig) -> Self {
        self.config = config;
        self
    }

    /// Runtime that runs reroute tasks.
    ///
    /// If not called, the runtime the builder is called from is used;
    /// building outside a runtime then fails with [`TripError::NoRuntime`].
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Share a cancellation handle created before the trip exists.
    pub fn cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Plan the first route with the solver, bounded by `solve_timeout`,
    /// then build.
    pub async fn solve(self, origin: GeoPoint, stops: Vec<Stop>) -> TripResult<Trip<S>> {
        self.config.validate()?;
        if stops.is_empty() {
            return Err(TripError::Config("a trip needs at least one stop".into()));
        }
        let request = SolveRequest {
            origin,
            stops,
            options: SolveOptions { strategy: None, travel_mode: self.config.travel_mode },
        };
        let route = tokio::time::timeout(self.config.solve_timeout, self.solver.solve(request))
            .await
            .map_err(|_| TripError::SolveTimeout(self.config.solve_timeout))??;
        self.build(route)
    }

    /// Validate inputs and start a trip on `route`.
    ///
    /// The route's stops become the trip's fixed stop list and must be
    /// numbered `0..n`.
    pub fn build(self, route: Route) -> TripResult<Trip<S>> {
        self.config.validate()?;
        let runtime = match self.runtime {
            Some(h) => h,
            None => Handle::try_current().map_err(|_| TripError::NoRuntime)?,
        };

        let tracker = RouteTracker::new(self.config.tracking, &route, self.config.skip_coincident_stops)?;
        let stops: Vec<Stop> = route.stops().iter().map(|rs| rs.stop.clone()).collect();

        info!(
            stops = stops.len(),
            length_m = route.total_length_m(),
            rerouting = self.config.rerouting.map(|s| s.as_str()).unwrap_or("disabled"),
            "trip started"
        );

        let reroute = RerouteCoordinator::new(
            Arc::new(self.solver),
            runtime,
            self.config.solve_timeout,
            self.config.travel_mode,
        );

        Ok(Trip {
            config: self.config,
            stops,
            active: ActiveRoute::new(route),
            tracker,
            reroute,
            cancel: self.cancel.unwrap_or_default(),
            state: TripState::Active,
            last_status: None,
        })
    }
}
