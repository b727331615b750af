//! Unit tests for nav-session.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nav_core::{FixTime, GeoPoint, StopIndex};
use nav_route::{DirectSolver, Maneuver, ReroutingStrategy, Route, RouteSolver, SolveError, SolveRequest, Stop};
use nav_tracking::PositionFix;
use tokio::sync::Notify;

use crate::{NavEvent, Trip, TripBuilder, TripConfig, TripObserver, TripState};

// ── Helpers ───────────────────────────────────────────────────────────────────

const M_PER_DEG: f64 = 6_371_000.0 * std::f64::consts::PI / 180.0;

fn at(north_m: f64, east_m: f64) -> GeoPoint {
    GeoPoint::new(north_m / M_PER_DEG, east_m / M_PER_DEG)
}

fn fix(north_m: f64, east_m: f64, secs: u64) -> PositionFix {
    PositionFix::new(at(north_m, east_m), FixTime::from_secs(secs))
}

/// 9 km straight north; stops at 0 / 5000 / 9000 m.
fn nine_km_route() -> Route {
    Route::new(
        vec![at(0.0, 0.0), at(5_000.0, 0.0), at(9_000.0, 0.0)],
        vec![Stop::new(0, at(0.0, 0.0)), Stop::new(1, at(5_000.0, 0.0)), Stop::new(2, at(9_000.0, 0.0))],
        vec![
            Maneuver::new("Head north", 0.0, 5_000.0),
            Maneuver::new("Arrive at stop 1, then continue straight", 5_000.0, 4_000.0),
            Maneuver::new("Arrive at stop 2", 9_000.0, 0.0),
        ],
    )
    .unwrap()
    .with_travel_time(900.0)
}

fn rerouting(strategy: ReroutingStrategy) -> TripConfig {
    TripConfig { rerouting: Some(strategy), ..Default::default() }
}

/// Test solver: counts calls, records the last request, and can wait on a
/// gate, hang forever, or fail.  Otherwise solves with `DirectSolver`.
#[derive(Clone, Default)]
struct Probe {
    calls: Arc<AtomicUsize>,
    last:  Arc<Mutex<Option<SolveRequest>>>,
    gate:  Option<Arc<Notify>>,
    hang:  bool,
    fail:  bool,
}

impl Probe {
    fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        (Self { gate: Some(Arc::clone(&gate)), ..Default::default() }, gate)
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> Option<SolveRequest> {
        self.last.lock().unwrap().clone()
    }
}

impl RouteSolver for Probe {
    fn solve(&self, request: SolveRequest) -> impl Future<Output = Result<Route, SolveError>> + Send {
        let probe = self.clone();
        async move {
            probe.calls.fetch_add(1, Ordering::SeqCst);
            *probe.last.lock().unwrap() = Some(request.clone());
            if let Some(gate) = &probe.gate {
                gate.notified().await;
            }
            if probe.hang {
                std::future::pending::<()>().await;
            }
            if probe.fail {
                return Err(SolveError::Unavailable("routing service offline".into()));
            }
            DirectSolver::new().plan(&request)
        }
    }
}

fn trip<S: RouteSolver>(solver: S, config: TripConfig) -> Trip<S> {
    TripBuilder::new(solver).config(config).build(nine_km_route()).unwrap()
}

/// Feed fixes and collect every event.
fn feed<S: RouteSolver>(trip: &mut Trip<S>, fixes: &[PositionFix]) -> Vec<NavEvent> {
    fixes
        .iter()
        .filter_map(|f| trip.process_fix(f).unwrap())
        .flat_map(|cycle| cycle.events)
        .collect()
}

/// Three fixes 80 m east of the path around `north_m`.
fn off_route(north_m: f64, first_sec: u64) -> Vec<PositionFix> {
    (0..3).map(|i| fix(north_m + 10.0 * i as f64, 80.0, first_sec + i)).collect()
}

async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[derive(Default)]
struct Recorder {
    progress: usize,
    events:   Vec<NavEvent>,
    ended:    Option<TripState>,
}

impl TripObserver for Recorder {
    fn on_progress(&mut self, _status: &nav_tracking::TrackingStatus) {
        self.progress += 1;
    }
    fn on_event(&mut self, event: &NavEvent) {
        self.events.push(event.clone());
    }
    fn on_trip_end(&mut self, state: TripState) {
        self.ended = Some(state);
    }
}

// ── TripConfig ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;
    use crate::TripError;

    #[test]
    fn defaults_are_valid() {
        let c = TripConfig::default();
        assert_eq!(c.rerouting, None);
        assert_eq!(c.solve_timeout, Duration::from_secs(30));
        assert!(!c.skip_coincident_stops);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_zero_timeout_and_bad_tracking() {
        let c = TripConfig { solve_timeout: Duration::ZERO, ..Default::default() };
        assert!(matches!(c.validate(), Err(TripError::Config(_))));

        let mut c = TripConfig::default();
        c.tracking.off_route_debounce = 0;
        assert!(matches!(c.validate(), Err(TripError::Tracking(_))));
    }
}

// ── ActiveRoute ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod active {
    use super::*;
    use crate::ActiveRoute;

    fn straight(points: usize) -> Route {
        let path: Vec<_> = (0..points).map(|i| at(100.0 * i as f64, 0.0)).collect();
        let maneuvers = (0..points - 1).map(|i| Maneuver::new(format!("m{i}"), 100.0 * i as f64, 100.0)).collect();
        Route::new(path, vec![Stop::new(0, at(0.0, 0.0))], maneuvers).unwrap()
    }

    #[test]
    fn swap_bumps_revision() {
        let cell = ActiveRoute::new(straight(2));
        assert_eq!(cell.revision(), 0);
        assert_eq!(cell.swap(straight(3)), 1);
        let (route, revision) = cell.snapshot();
        assert_eq!(revision, 1);
        assert_eq!(route.path().len(), 3);
    }

    #[test]
    fn readers_never_see_a_mixed_route() {
        let cell = ActiveRoute::new(straight(2));
        let writer = {
            let cell = cell.clone();
            std::thread::spawn(move || {
                for i in 0..200 {
                    cell.swap(straight(2 + i % 5));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cell = cell.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let guard = cell.read();
                        let route = guard.route();
                        assert_eq!(route.path().len(), route.maneuvers().len() + 1);
                    }
                })
            })
            .collect();
        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(cell.revision(), 200);
    }
}

// ── CancelHandle ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancel {
    use crate::CancelHandle;

    #[tokio::test]
    async fn cancel_is_idempotent_and_wakes_waiters() {
        let handle = CancelHandle::new();
        let waiter = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.cancelled().await })
        };
        tokio::task::yield_now().await;
        handle.cancel();
        handle.cancel();
        waiter.await.unwrap();
        assert!(handle.is_cancelled());
        // Already cancelled: resolves immediately.
        handle.cancelled().await;
    }
}

// ── TripBuilder ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use crate::TripError;

    #[test]
    fn needs_a_runtime() {
        let result = TripBuilder::new(DirectSolver::new()).build(nine_km_route());
        assert!(matches!(result, Err(TripError::NoRuntime)));
    }

    #[test]
    fn explicit_runtime_handle() {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let trip = TripBuilder::new(DirectSolver::new()).runtime(rt.handle().clone()).build(nine_km_route()).unwrap();
        assert_eq!(trip.state(), TripState::Active);
        assert_eq!(trip.stops().len(), 3);
    }

    #[tokio::test]
    async fn stops_must_be_numbered_from_zero() {
        let route = Route::new(
            vec![at(0.0, 0.0), at(100.0, 0.0)],
            vec![Stop::new(1, at(0.0, 0.0)), Stop::new(2, at(100.0, 0.0))],
            vec![],
        )
        .unwrap();
        let result = TripBuilder::new(DirectSolver::new()).build(route);
        assert!(matches!(result, Err(TripError::Tracking(_))));
    }

    #[tokio::test]
    async fn solves_first_route() {
        let stops = vec![Stop::new(0, at(0.0, 0.0)), Stop::new(1, at(1_000.0, 0.0))];
        let trip = TripBuilder::new(DirectSolver::new()).solve(at(0.0, 0.0), stops).await.unwrap();
        assert!((trip.route().total_length_m() - 1_000.0).abs() < 0.01);
        assert_eq!(trip.current_destination(), StopIndex(0));
    }

    #[tokio::test]
    async fn skip_coincident_stops() {
        let stops = vec![Stop::new(0, at(0.0, 0.0)), Stop::new(1, at(1_000.0, 0.0))];
        let config = TripConfig { skip_coincident_stops: true, ..Default::default() };
        let trip = TripBuilder::new(DirectSolver::new()).config(config).solve(at(0.0, 0.0), stops).await.unwrap();
        assert_eq!(trip.current_destination(), StopIndex(1));
    }

    #[tokio::test]
    async fn empty_stop_list_is_rejected() {
        let result = TripBuilder::new(DirectSolver::new()).solve(at(0.0, 0.0), vec![]).await;
        assert!(matches!(result, Err(TripError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn first_solve_is_time_bounded() {
        let solver = Probe { hang: true, ..Default::default() };
        let config = TripConfig { solve_timeout: Duration::from_secs(5), ..Default::default() };
        let stops = vec![Stop::new(0, at(0.0, 0.0))];
        let result = TripBuilder::new(solver).config(config).solve(at(0.0, 0.0), stops).await;
        assert!(matches!(result, Err(TripError::SolveTimeout(d)) if d == Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn first_solve_failure_is_an_error() {
        let solver = Probe { fail: true, ..Default::default() };
        let stops = vec![Stop::new(0, at(0.0, 0.0))];
        let result = TripBuilder::new(solver).solve(at(0.0, 0.0), stops).await;
        assert!(matches!(result, Err(TripError::Solve(SolveError::Unavailable(_)))));
    }
}

// ── Tracking through the trip ─────────────────────────────────────────────────

#[cfg(test)]
mod tracking {
    use super::*;

    #[tokio::test]
    async fn three_stop_trip_completes_once() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        let events = feed(
            &mut trip,
            &[fix(0.0, 0.0, 0), fix(4_950.0, 0.0, 495), fix(5_010.0, 0.0, 501), fix(9_000.0, 0.0, 900)],
        );

        let arrivals: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, NavEvent::DestinationReached { .. } | NavEvent::TripCompleted { .. }))
            .cloned()
            .collect();
        assert_eq!(
            arrivals,
            vec![
                NavEvent::DestinationReached { index: StopIndex(0), time: FixTime::from_secs(0) },
                NavEvent::DestinationReached { index: StopIndex(1), time: FixTime::from_secs(501) },
                NavEvent::TripCompleted { index: StopIndex(2), time: FixTime::from_secs(900) },
            ]
        );
        assert_eq!(trip.state(), TripState::Completed);
        assert_eq!(trip.current_destination(), StopIndex(2));

        assert!(trip.process_fix(&fix(9_000.0, 0.0, 901)).unwrap().is_none());
    }

    #[tokio::test]
    async fn maneuvers_are_spoken_in_order() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        let events = feed(&mut trip, &[fix(0.0, 0.0, 0), fix(100.0, 0.0, 10), fix(5_010.0, 0.0, 500)]);
        let spoken: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                NavEvent::ManeuverAnnounced { instruction, .. } => Some(instruction.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(spoken, ["Head north", "Arrive at stop 1, then continue straight"]);
    }

    #[tokio::test]
    async fn status_is_kept() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        assert!(trip.last_status().is_none());
        feed(&mut trip, &[fix(0.0, 0.0, 0), fix(1_000.0, 0.0, 100)]);
        let status = trip.last_status().unwrap();
        assert_eq!(status.current_destination_index, StopIndex(1));
        assert!((status.distance_remaining_m - 4_000.0).abs() < 0.01);
        assert!((trip.distance_from_route_m(at(1_000.0, 50.0)) - 50.0).abs() < 0.05);
    }
}

// ── Rerouting ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rerouting {
    use super::*;
    use crate::{RerouteCoordinator, RerouteFailure, RerouteTicket, TripError};

    #[tokio::test]
    async fn two_off_then_on_does_not_reroute() {
        let mut trip = trip(Probe::default(), rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0), fix(1_000.0, 80.0, 1), fix(1_010.0, 80.0, 2), fix(1_020.0, 0.0, 3)]);
        assert_eq!(trip.reroute_requests(), 0);
        assert!(!trip.is_rerouting());
    }

    #[tokio::test]
    async fn three_off_request_exactly_one_reroute() {
        let (probe, _gate) = Probe::gated();
        let mut trip = trip(probe.clone(), rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(1_000.0, 1));
        assert_eq!(trip.reroute_requests(), 1);
        assert!(trip.is_rerouting());

        settle().await;
        assert_eq!(probe.calls(), 1);
        let request = probe.last_request().unwrap();
        assert_eq!(request.stops.len(), 1);
        assert_eq!(request.stops[0].sequence, StopIndex(1));
        assert_eq!(request.origin, at(1_020.0, 80.0));
        assert_eq!(request.options.strategy, Some(ReroutingStrategy::ToNextWaypoint));
    }

    #[tokio::test]
    async fn deviation_while_in_flight_is_coalesced() {
        let (probe, _gate) = Probe::gated();
        let mut trip = trip(probe.clone(), rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(1_000.0, 1));
        feed(&mut trip, &off_route(1_100.0, 4));
        feed(&mut trip, &off_route(1_200.0, 7));
        settle().await;
        assert_eq!(trip.reroute_requests(), 1);
        assert_eq!(probe.calls(), 1);
    }

    #[tokio::test]
    async fn next_waypoint_rechains_remaining_route() {
        let mut trip = trip(Probe::default(), rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0), fix(1_000.0, 0.0, 100)]);
        feed(&mut trip, &off_route(1_000.0, 101));

        let event = trip.finish_reroute().await.unwrap();
        let NavEvent::Rerouted { strategy, destination, revision, .. } = event else {
            panic!("expected a Rerouted event");
        };
        assert_eq!(strategy, ReroutingStrategy::ToNextWaypoint);
        assert_eq!(destination, StopIndex(1));
        assert_eq!(revision, 1);
        assert!(!trip.is_rerouting());

        let route = trip.route();
        assert_eq!(route.path()[0], at(1_020.0, 80.0));
        assert!(route.covers(StopIndex(1)) && route.covers(StopIndex(2)));
        assert_eq!(route.path().last(), Some(&at(9_000.0, 0.0)));
        let texts: Vec<_> = route.maneuvers().iter().map(|m| m.instruction.as_str()).collect();
        assert_eq!(texts[1..], ["Arrive at stop 1, then continue straight", "Arrive at stop 2"]);

        // Stop list and destination index survive the swap; guidance restarts.
        assert_eq!(trip.stops().len(), 3);
        let cycle = trip.process_fix(&fix(1_020.0, 80.0, 110)).unwrap().unwrap();
        assert_eq!(cycle.status.current_destination_index, StopIndex(1));
        assert!(cycle.status.is_on_route);
        assert!(matches!(&cycle.events[..], [NavEvent::ManeuverAnnounced { .. }]));
    }

    #[tokio::test]
    async fn next_stop_solves_all_remaining_stops() {
        let probe = Probe::default();
        let mut trip = trip(probe.clone(), rerouting(ReroutingStrategy::ToNextStop));
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(2_000.0, 1));
        let event = trip.finish_reroute().await.unwrap();
        assert!(matches!(event, NavEvent::Rerouted { strategy: ReroutingStrategy::ToNextStop, .. }));

        let request = probe.last_request().unwrap();
        let sequences: Vec<_> = request.stops.iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, [StopIndex(1), StopIndex(2)]);
        assert_eq!(trip.route().stops().len(), 2);
    }

    #[tokio::test]
    async fn finished_reroute_is_applied_on_next_fix() {
        let mut trip = trip(Probe::default(), rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(3_000.0, 1));
        settle().await;

        let cycle = trip.process_fix(&fix(3_030.0, 80.0, 4)).unwrap().unwrap();
        assert!(matches!(cycle.events.first(), Some(NavEvent::Rerouted { .. })));
        assert!(cycle.status.is_on_route);
        assert_eq!(trip.active_route().revision(), 1);
    }

    #[tokio::test]
    async fn solver_failure_keeps_old_route_and_retriggers() {
        let probe = Probe { fail: true, ..Default::default() };
        let mut trip = trip(probe.clone(), rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(1_000.0, 1));

        let event = trip.finish_reroute().await.unwrap();
        assert!(matches!(event, NavEvent::RerouteFailed { reason: RerouteFailure::Solver(_), .. }));
        assert_eq!(trip.active_route().revision(), 0);
        assert_eq!(trip.state(), TripState::Active);

        feed(&mut trip, &off_route(1_100.0, 4));
        assert_eq!(trip.reroute_requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_solver_times_out() {
        let probe = Probe { hang: true, ..Default::default() };
        let config = TripConfig { solve_timeout: Duration::from_secs(5), ..rerouting(ReroutingStrategy::ToNextStop) };
        let mut trip = trip(probe, config);
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(1_000.0, 1));

        let event = trip.finish_reroute().await.unwrap();
        assert_eq!(
            event,
            NavEvent::RerouteFailed { destination: StopIndex(1), reason: RerouteFailure::Timeout(Duration::from_secs(5)) }
        );
        assert!(!trip.is_rerouting());
    }

    #[tokio::test]
    async fn result_for_passed_destination_is_stale() {
        let (probe, gate) = Probe::gated();
        let mut trip = trip(probe, rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(4_000.0, 1));
        let events = feed(&mut trip, &[fix(4_500.0, 0.0, 50), fix(5_010.0, 0.0, 100)]);
        assert!(events.contains(&NavEvent::DestinationReached { index: StopIndex(1), time: FixTime::from_secs(100) }));

        gate.notify_one();
        let event = trip.finish_reroute().await.unwrap();
        assert_eq!(
            event,
            NavEvent::RerouteFailed {
                destination: StopIndex(1),
                reason: RerouteFailure::Stale { requested: StopIndex(1), current: StopIndex(2) },
            }
        );
        assert_eq!(trip.active_route().revision(), 0);
    }

    #[tokio::test]
    async fn disabled_rerouting_never_solves() {
        let probe = Probe::default();
        let mut trip = trip(probe.clone(), TripConfig::default());
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(1_000.0, 1));
        settle().await;
        assert_eq!(trip.reroute_requests(), 0);
        assert_eq!(probe.calls(), 0);
    }

    #[tokio::test]
    async fn request_without_stops_is_an_invariant_violation() {
        let mut coordinator = RerouteCoordinator::new(
            Arc::new(DirectSolver::new()),
            tokio::runtime::Handle::current(),
            Duration::from_secs(1),
            Default::default(),
        );
        let ticket = RerouteTicket {
            strategy:     ReroutingStrategy::ToNextStop,
            destination:  StopIndex(3),
            origin:       at(0.0, 0.0),
            requested_at: FixTime::ZERO,
            revision:     0,
        };
        assert!(matches!(coordinator.request(ticket, vec![]), Err(TripError::Invariant(_))));
        assert!(!coordinator.is_in_flight());
        assert!(coordinator.poll().is_none());
        assert!(coordinator.wait().await.is_none());
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancellation {
    use super::*;
    use crate::ChannelSource;

    #[tokio::test]
    async fn cancel_abandons_reroute_and_stops_tracking() {
        let (probe, _gate) = Probe::gated();
        let mut trip = trip(probe, rerouting(ReroutingStrategy::ToNextWaypoint));
        feed(&mut trip, &[fix(0.0, 0.0, 0)]);
        feed(&mut trip, &off_route(1_000.0, 1));
        assert!(trip.is_rerouting());

        trip.cancel();
        trip.cancel();
        assert_eq!(trip.state(), TripState::Cancelled);
        assert!(!trip.is_rerouting());
        assert!(trip.process_fix(&fix(1_100.0, 0.0, 5)).unwrap().is_none());
    }

    #[tokio::test]
    async fn cancel_after_completion_keeps_completed() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        feed(&mut trip, &[fix(9_000.0, 0.0, 0)]);
        assert_eq!(trip.state(), TripState::Completed);
        trip.cancel();
        assert_eq!(trip.state(), TripState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn handle_stops_a_waiting_run() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        let handle = trip.cancel_handle();
        let (_tx, mut source) = ChannelSource::channel(4);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            handle.cancel();
        });

        let mut recorder = Recorder::default();
        let state = trip.run(&mut source, &mut recorder).await.unwrap();
        assert_eq!(state, TripState::Cancelled);
        assert_eq!(recorder.ended, Some(TripState::Cancelled));
        assert_eq!(recorder.progress, 0);
    }
}

// ── Run loop and sources ──────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use super::*;
    use crate::{ChannelObserver, ChannelSource, ReplaySource, SimulatedSource, TripMessage};

    #[tokio::test]
    async fn replay_stops_at_completion() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        let mut source = ReplaySource::new([
            fix(0.0, 0.0, 0),
            fix(4_950.0, 0.0, 495),
            fix(5_010.0, 0.0, 501),
            fix(9_000.0, 0.0, 900),
            fix(9_000.0, 0.0, 901),
        ]);
        let mut recorder = Recorder::default();

        let state = trip.run(&mut source, &mut recorder).await.unwrap();
        assert_eq!(state, TripState::Completed);
        assert_eq!(recorder.progress, 4);
        assert_eq!(source.remaining(), 1);
        let completed = recorder.events.iter().filter(|e| matches!(e, NavEvent::TripCompleted { .. })).count();
        assert_eq!(completed, 1);
        assert_eq!(recorder.ended, Some(TripState::Completed));
    }

    #[tokio::test]
    async fn exhausted_source_leaves_trip_active() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        let mut source = ReplaySource::new([fix(0.0, 0.0, 0), fix(100.0, 0.0, 10)]);
        let state = trip.run(&mut source, &mut crate::NoopObserver).await.unwrap();
        assert_eq!(state, TripState::Active);
        assert_eq!(trip.current_destination(), StopIndex(1));
    }

    #[tokio::test]
    async fn simulated_detour_reroutes_and_completes() {
        let config = TripConfig {
            rerouting: Some(ReroutingStrategy::ToNextWaypoint),
            ..Default::default()
        };
        let mut trip = trip(DirectSolver::new(), config);
        let mut source = SimulatedSource::new(nine_km_route(), 20.0, Duration::from_secs(1))
            .unwrap()
            .with_detour(2_000.0, 400.0, 150.0);
        let mut recorder = Recorder::default();

        let state = trip.run(&mut source, &mut recorder).await.unwrap();
        assert_eq!(state, TripState::Completed);
        assert!(recorder.events.iter().any(|e| matches!(e, NavEvent::Rerouted { .. })));
        let reached: Vec<_> = recorder
            .events
            .iter()
            .filter_map(|e| match e {
                NavEvent::DestinationReached { index, .. } | NavEvent::TripCompleted { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(reached, [StopIndex(0), StopIndex(1), StopIndex(2)]);
    }

    #[tokio::test]
    async fn channel_source_and_observer() {
        let mut trip = trip(DirectSolver::new(), TripConfig::default());
        let (tx, mut source) = ChannelSource::channel(8);
        for f in [fix(0.0, 0.0, 0), fix(9_000.0, 0.0, 900)] {
            tx.send(f).await.unwrap();
        }
        drop(tx);

        let (mut observer, mut rx) = ChannelObserver::new();
        let state = trip.run(&mut source, &mut observer).await.unwrap();
        assert_eq!(state, TripState::Completed);

        let mut kinds = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            kinds.push(match msg {
                TripMessage::Progress(_) => "progress",
                TripMessage::Event(e) => e.kind(),
                TripMessage::End(_) => "end",
            });
        }
        assert_eq!(kinds.first(), Some(&"progress"));
        assert_eq!(kinds.last(), Some(&"end"));
        assert!(kinds.contains(&"trip_completed"));
    }

    #[test]
    fn simulated_source_walks_the_route() {
        let fixes: Vec<_> = SimulatedSource::new(nine_km_route(), 100.0, Duration::from_secs(7))
            .unwrap()
            .starting_at(FixTime::from_secs(1_000))
            .collect();
        // 700 m per fix: offsets 0, 700, …, 8400, then clamped to the end.
        assert_eq!(fixes.len(), 14);
        assert_eq!(fixes[0].time, FixTime::from_secs(1_000));
        assert_eq!(fixes[13].time, FixTime::from_secs(1_091));
        assert_eq!(fixes[13].coordinate, at(9_000.0, 0.0));
        assert!(fixes[3].coordinate.distance_m(at(2_100.0, 0.0)) < 0.01);
        assert_eq!(fixes[3].heading_deg.map(f64::round), Some(0.0));
    }

    #[test]
    fn simulated_detour_and_noise() {
        let route = nine_km_route();
        let fixes: Vec<_> = SimulatedSource::new(route.clone(), 100.0, Duration::from_secs(1))
            .unwrap()
            .with_detour(1_000.0, 500.0, 200.0)
            .with_noise(5.0, 42)
            .collect();
        let off = |i: usize| route.nearest(fixes[i].coordinate).distance_m;
        assert!(off(5) < 30.0);
        assert!((off(12) - 200.0).abs() < 30.0);
        assert!(off(20) < 30.0);

        let again: Vec<_> = SimulatedSource::new(route, 100.0, Duration::from_secs(1))
            .unwrap()
            .with_detour(1_000.0, 500.0, 200.0)
            .with_noise(5.0, 42)
            .collect();
        assert_eq!(fixes, again);
    }

    #[test]
    fn simulated_source_rejects_bad_parameters() {
        assert!(SimulatedSource::new(nine_km_route(), 0.0, Duration::from_secs(1)).is_err());
        assert!(SimulatedSource::new(nine_km_route(), 10.0, Duration::ZERO).is_err());
    }
}
