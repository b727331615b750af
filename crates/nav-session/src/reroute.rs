//! Rerouting coordinator: single-flight, time-bounded route solving.
//!
//! A request spawns the solver call on the trip's tokio runtime and returns
//! immediately; the trip keeps tracking against the old route.  The result
//! is collected either by polling between fixes ([`poll`]) or by awaiting it
//! from the trip's run loop ([`wait`]).
//!
//! [`poll`]: RerouteCoordinator::poll
//! [`wait`]: RerouteCoordinator::wait

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use nav_core::{FixTime, GeoPoint, StopIndex, TravelMode};
use nav_route::{ReroutingStrategy, Route, RouteSolver, SolveError, SolveOptions, SolveRequest, Stop};
use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::error::Elapsed;
use tracing::debug;

use crate::{RerouteFailure, TripError, TripResult};

type SolveOutput = Result<Result<Route, SolveError>, Elapsed>;

/// What a reroute was asked to do.
#[derive(Clone, Debug, PartialEq)]
pub struct RerouteTicket {
    pub strategy:     ReroutingStrategy,
    /// Destination index current when the reroute was requested.
    pub destination:  StopIndex,
    pub origin:       GeoPoint,
    pub requested_at: FixTime,
    /// Active-route revision the reroute replaces.
    pub revision:     u64,
}

/// A finished reroute.
#[derive(Debug)]
pub struct RerouteOutcome {
    pub ticket: RerouteTicket,
    pub result: Result<Route, RerouteFailure>,
}

struct InFlight {
    ticket: RerouteTicket,
    handle: JoinHandle<SolveOutput>,
}

pub struct RerouteCoordinator<S: RouteSolver> {
    solver:      Arc<S>,
    runtime:     Handle,
    timeout:     Duration,
    travel_mode: TravelMode,
    in_flight:   Option<InFlight>,
    requests:    u64,
}

impl<S: RouteSolver> RerouteCoordinator<S> {
    pub fn new(solver: Arc<S>, runtime: Handle, timeout: Duration, travel_mode: TravelMode) -> Self {
        Self { solver, runtime, timeout, travel_mode, in_flight: None, requests: 0 }
    }

    pub fn solver(&self) -> &Arc<S> {
        &self.solver
    }

    /// `true` while a solve is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of solver calls started so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Start a reroute unless one is already running.
    ///
    /// Returns `Ok(false)` when the request was coalesced into the one in
    /// flight.
    ///
    /// # Errors
    ///
    /// [`TripError::Invariant`] if `stops` is empty.
    pub fn request(&mut self, ticket: RerouteTicket, stops: Vec<Stop>) -> TripResult<bool> {
        if stops.is_empty() {
            return Err(TripError::Invariant(format!(
                "reroute requested toward {} with no remaining stops",
                ticket.destination
            )));
        }
        if let Some(flight) = &self.in_flight {
            debug!(in_flight = %flight.ticket.destination, "reroute coalesced");
            return Ok(false);
        }

        let request = SolveRequest {
            origin: ticket.origin,
            stops,
            options: SolveOptions { strategy: Some(ticket.strategy), travel_mode: self.travel_mode },
        };
        let solver = Arc::clone(&self.solver);
        let timeout = self.timeout;
        let handle = self
            .runtime
            .spawn(async move { tokio::time::timeout(timeout, solver.solve(request)).await });

        self.requests += 1;
        debug!(
            strategy = %ticket.strategy,
            destination = %ticket.destination,
            revision = ticket.revision,
            "reroute requested"
        );
        self.in_flight = Some(InFlight { ticket, handle });
        Ok(true)
    }

    /// Collect a finished reroute without blocking.
    pub fn poll(&mut self) -> Option<RerouteOutcome> {
        let flight = self.in_flight.as_mut()?;
        if !flight.handle.is_finished() {
            return None;
        }
        let joined = (&mut flight.handle).now_or_never()?;
        let flight = self.in_flight.take()?;
        Some(self.finish(flight.ticket, joined))
    }

    /// Wait for the in-flight reroute; `None` if there is none.
    pub async fn wait(&mut self) -> Option<RerouteOutcome> {
        let flight = self.in_flight.as_mut()?;
        let joined = (&mut flight.handle).await;
        let flight = self.in_flight.take()?;
        Some(self.finish(flight.ticket, joined))
    }

    /// Abandon the in-flight reroute, if any.  Does not wait for the task.
    pub fn abort(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            flight.handle.abort();
            debug!(destination = %flight.ticket.destination, "reroute abandoned");
        }
    }

    fn finish(&self, ticket: RerouteTicket, joined: Result<SolveOutput, JoinError>) -> RerouteOutcome {
        let result = match joined {
            Ok(Ok(Ok(route))) => Ok(route),
            Ok(Ok(Err(err))) => Err(RerouteFailure::Solver(err.to_string())),
            Ok(Err(_elapsed)) => Err(RerouteFailure::Timeout(self.timeout)),
            Err(err) => Err(RerouteFailure::Solver(format!("solver task failed: {err}"))),
        };
        RerouteOutcome { ticket, result }
    }
}

impl<S: RouteSolver> Drop for RerouteCoordinator<S> {
    fn drop(&mut self) {
        self.abort();
    }
}
