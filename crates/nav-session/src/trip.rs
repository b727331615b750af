//! The `Trip` aggregate and its run loop.

use std::sync::Arc;

use nav_core::{GeoPoint, StopIndex};
use nav_route::{ReroutingStrategy, Route, RouteSolver, Stop};
use nav_tracking::{Arrival, Deviation, PositionFix, RouteTracker, TrackingError, TrackingStatus};
use tracing::{debug, error, info, warn};

use crate::{
    ActiveRoute, CancelHandle, FixSource, NavEvent, RerouteCoordinator, RerouteFailure, RerouteOutcome,
    RerouteTicket, TripConfig, TripError, TripObserver, TripResult,
};

/// Lifecycle of a trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TripState {
    /// Accepting fixes.
    Active,
    /// The final stop was reached.
    Completed,
    /// Cancelled by the host.
    Cancelled,
}

impl TripState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TripState::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TripState::Active    => "active",
            TripState::Completed => "completed",
            TripState::Cancelled => "cancelled",
        }
    }
}

/// The result of one tracking cycle.
#[derive(Clone, Debug)]
pub struct Cycle {
    pub status: TrackingStatus,
    /// Events in the order they occurred during this cycle, including the
    /// outcome of a reroute that finished since the previous fix.
    pub events: Vec<NavEvent>,
}

// ── Trip ──────────────────────────────────────────────────────────────────────

/// A trip in progress: the active route, the destination index, and the
/// rerouting state.
///
/// The stop list is fixed at creation.  Reroutes replace the path between
/// stops but never the stops themselves, and the destination index only
/// moves forward.
///
/// Create via [`TripBuilder`][crate::TripBuilder].
pub struct Trip<S: RouteSolver> {
    pub(crate) config:  TripConfig,
    pub(crate) stops:   Vec<Stop>,
    pub(crate) active:  ActiveRoute,
    pub(crate) tracker: RouteTracker,
    pub(crate) reroute: RerouteCoordinator<S>,
    pub(crate) cancel:  CancelHandle,
    pub(crate) state:   TripState,
    pub(crate) last_status: Option<TrackingStatus>,
}

impl<S: RouteSolver> Trip<S> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &TripConfig {
        &self.config
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn state(&self) -> TripState {
        self.state
    }

    /// Index of the stop currently being driven to.
    pub fn current_destination(&self) -> StopIndex {
        self.tracker.current_destination()
    }

    /// The route in use right now.
    pub fn route(&self) -> Arc<Route> {
        self.active.snapshot().0
    }

    /// A shared handle on the route cell, for readers outside the trip.
    pub fn active_route(&self) -> ActiveRoute {
        self.active.clone()
    }

    /// Status from the most recent cycle.
    pub fn last_status(&self) -> Option<&TrackingStatus> {
        self.last_status.as_ref()
    }

    /// `true` while a reroute is in flight.
    pub fn is_rerouting(&self) -> bool {
        self.reroute.is_in_flight()
    }

    /// Number of solver calls made for reroutes.
    pub fn reroute_requests(&self) -> u64 {
        self.reroute.requests()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Stop accepting fixes and abandon any in-flight reroute.  Idempotent;
    /// a completed trip stays completed.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.close_if_cancelled();
    }

    fn close_if_cancelled(&mut self) -> bool {
        if self.state == TripState::Active && self.cancel.is_cancelled() {
            self.reroute.abort();
            self.state = TripState::Cancelled;
            info!("trip cancelled");
        }
        self.state == TripState::Cancelled
    }

    // ── Per-fix processing ────────────────────────────────────────────────

    /// Run one tracking cycle.
    ///
    /// Returns `Ok(None)` without doing anything once the trip is completed
    /// or cancelled.
    ///
    /// # Errors
    ///
    /// Only [`TripError::Invariant`]: solver failures, timeouts and stale
    /// reroutes are reported as [`NavEvent::RerouteFailed`] instead.
    pub fn process_fix(&mut self, fix: &PositionFix) -> TripResult<Option<Cycle>> {
        self.close_if_cancelled();
        if self.state.is_terminal() {
            debug!(time = %fix.time, state = self.state.as_str(), "fix ignored");
            return Ok(None);
        }

        let mut events = Vec::new();
        if let Some(outcome) = self.reroute.poll() {
            self.apply_reroute(outcome, &mut events);
        }

        let update = {
            let guard = self.active.read();
            let route = guard.route();
            let update = self.tracker.update(route, fix).map_err(|e| match e {
                TrackingError::MissingDestination(stop) => {
                    invariant(format!("active route revision {} does not visit {stop}", guard.revision()))
                }
                other => invariant(format!("tracking failed: {other}")),
            })?;

            for &index in &update.announced {
                let instruction = route.maneuvers()[index.index()].instruction.clone();
                info!(maneuver = %index, %instruction, "maneuver announced");
                events.push(NavEvent::ManeuverAnnounced { index, instruction });
            }
            update
        };

        for arrival in &update.arrivals {
            match *arrival {
                Arrival::Reached(index) => events.push(NavEvent::DestinationReached { index, time: fix.time }),
                Arrival::Completed(index) => {
                    events.push(NavEvent::TripCompleted { index, time: fix.time });
                    self.state = TripState::Completed;
                    self.reroute.abort();
                }
            }
        }

        if update.deviation == Deviation::Sustained && self.state == TripState::Active {
            self.on_sustained_deviation(fix)?;
        }

        self.last_status = Some(update.status.clone());
        Ok(Some(Cycle { status: update.status, events }))
    }

    fn on_sustained_deviation(&mut self, fix: &PositionFix) -> TripResult<()> {
        let Some(strategy) = self.config.rerouting else {
            debug!("sustained deviation; rerouting disabled");
            return Ok(());
        };

        let destination = self.tracker.current_destination();
        let remaining = self.stops.get(destination.index()..).unwrap_or_default();
        let stops: Vec<Stop> = match strategy {
            ReroutingStrategy::ToNextWaypoint => remaining.iter().take(1).cloned().collect(),
            ReroutingStrategy::ToNextStop => remaining.to_vec(),
        };

        let ticket = RerouteTicket {
            strategy,
            destination,
            origin: fix.coordinate,
            requested_at: fix.time,
            revision: self.active.revision(),
        };
        self.reroute.request(ticket, stops).map_err(|e| match e {
            TripError::Invariant(msg) => invariant(msg),
            other => other,
        })?;
        Ok(())
    }

    // ── Reroute completion ────────────────────────────────────────────────

    fn apply_reroute(&mut self, outcome: RerouteOutcome, events: &mut Vec<NavEvent>) {
        let RerouteOutcome { ticket, result } = outcome;
        let current = self.tracker.current_destination();

        let route = match result.and_then(|route| self.accept(&ticket, current, route)) {
            Ok(route) => route,
            Err(reason) => {
                warn!(destination = %ticket.destination, %reason, "reroute failed; keeping current route");
                events.push(NavEvent::RerouteFailed { destination: ticket.destination, reason });
                return;
            }
        };

        let length_m = route.total_length_m();
        let revision = self.active.swap(route);
        self.tracker.route_swapped();
        info!(
            strategy = %ticket.strategy,
            destination = %current,
            revision,
            length_m,
            "rerouted"
        );
        events.push(NavEvent::Rerouted { strategy: ticket.strategy, destination: current, revision, length_m });
    }

    /// Check a solved route against the trip and build the route to swap in.
    fn accept(&self, ticket: &RerouteTicket, current: StopIndex, solved: Route) -> Result<Route, RerouteFailure> {
        if current != ticket.destination || !solved.covers(current) {
            return Err(RerouteFailure::Stale { requested: ticket.destination, current });
        }

        let route = match ticket.strategy {
            ReroutingStrategy::ToNextStop => solved,
            ReroutingStrategy::ToNextWaypoint => {
                let (previous, _) = self.active.snapshot();
                solved
                    .chain(&previous, current)
                    .map_err(|e| RerouteFailure::Solver(format!("cannot join new leg: {e}")))?
            }
        };

        if let Some(missing) = self.stops[current.index()..].iter().find(|s| !route.covers(s.sequence)) {
            return Err(RerouteFailure::Solver(format!("route does not visit {}", missing.sequence)));
        }
        Ok(route)
    }

    /// Wait for the in-flight reroute (if any) and apply it now.
    ///
    /// Returns the resulting `Rerouted`/`RerouteFailed` event.
    pub async fn finish_reroute(&mut self) -> Option<NavEvent> {
        let outcome = self.reroute.wait().await?;
        let mut events = Vec::with_capacity(1);
        self.apply_reroute(outcome, &mut events);
        events.pop()
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Drive the trip from `source` until it completes, is cancelled, or the
    /// source runs dry.
    ///
    /// Reroute results are applied as soon as they arrive, even between
    /// fixes.  Returns the trip state at exit; a source that ends early
    /// leaves the trip `Active`.
    pub async fn run<F, O>(&mut self, source: &mut F, observer: &mut O) -> TripResult<TripState>
    where
        F: FixSource,
        O: TripObserver,
    {
        while !self.close_if_cancelled() && self.state == TripState::Active {
            let rerouting = self.reroute.is_in_flight();
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {}

                Some(outcome) = self.reroute.wait(), if rerouting => {
                    let mut events = Vec::new();
                    self.apply_reroute(outcome, &mut events);
                    for event in &events {
                        observer.on_event(event);
                    }
                }

                fix = source.next_fix() => {
                    let Some(fix) = fix else {
                        debug!("fix source exhausted");
                        break;
                    };
                    if let Some(cycle) = self.process_fix(&fix)? {
                        observer.on_progress(&cycle.status);
                        for event in &cycle.events {
                            observer.on_event(event);
                        }
                    }
                }
            }
        }

        observer.on_trip_end(self.state);
        Ok(self.state)
    }

    /// Project a coordinate against the current route without touching any
    /// trip state.
    pub fn distance_from_route_m(&self, point: GeoPoint) -> f64 {
        self.active.read().route().nearest(point).distance_m
    }
}

/// Report a broken invariant: logged, asserted in debug builds, returned.
fn invariant(msg: String) -> TripError {
    error!(%msg, "invariant violated");
    debug_assert!(false, "invariant violated: {msg}");
    TripError::Invariant(msg)
}
