//! Plain data row types written by log backends.

use nav_core::{FixTime, StopIndex};
use nav_session::{NavEvent, RerouteFailure, TripState};
use nav_tracking::TrackingStatus;

/// One tracking cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRow {
    /// Fix time, milliseconds.
    pub time_ms:               u64,
    /// Snapped marker position.
    pub lat:                   f64,
    pub lon:                   f64,
    pub distance_along_path_m: f64,
    pub distance_from_route_m: f64,
    pub destination:           u32,
    pub distance_remaining_m:  f64,
    pub time_remaining_s:      f64,
    pub destination_status:    &'static str,
    pub on_route:              bool,
}

impl ProgressRow {
    pub fn from_status(status: &TrackingStatus) -> Self {
        Self {
            time_ms:               status.fix_time.0,
            lat:                   status.snapped_position.lat,
            lon:                   status.snapped_position.lon,
            distance_along_path_m: status.distance_along_path_m,
            distance_from_route_m: status.distance_from_route_m,
            destination:           status.current_destination_index.0,
            distance_remaining_m:  status.distance_remaining_m,
            time_remaining_s:      status.time_remaining_s,
            destination_status:    status.destination_status.as_str(),
            on_route:              status.is_on_route,
        }
    }
}

/// One discrete event, or the end-of-trip marker.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    /// Time of the fix that produced the event, milliseconds.
    pub time_ms: u64,
    pub kind:    &'static str,
    /// Stop the event concerns; `None` for maneuvers and the end marker.
    pub stop:    Option<u32>,
    pub detail:  String,
}

impl EventRow {
    /// `fallback` stamps events that carry no time of their own.
    pub fn from_event(event: &NavEvent, fallback: FixTime) -> Self {
        let (time, stop, detail) = match event {
            NavEvent::DestinationReached { index, time } => (*time, Some(*index), String::new()),
            NavEvent::TripCompleted { index, time } => (*time, Some(*index), String::new()),
            NavEvent::Rerouted { strategy, destination, revision, length_m } => (
                fallback,
                Some(*destination),
                format!("{strategy} revision={revision} length_m={length_m:.1}"),
            ),
            NavEvent::RerouteFailed { destination, reason } => {
                (fallback, Some(*destination), failure_detail(reason))
            }
            NavEvent::ManeuverAnnounced { index, instruction } => {
                (fallback, None, format!("{}: {instruction}", index.0))
            }
        };
        Self { time_ms: time.0, kind: event.kind(), stop: stop.map(|s: StopIndex| s.0), detail }
    }

    pub fn trip_end(state: TripState, time: FixTime) -> Self {
        Self { time_ms: time.0, kind: "trip_end", stop: None, detail: state.as_str().to_owned() }
    }
}

fn failure_detail(reason: &RerouteFailure) -> String {
    match reason {
        RerouteFailure::Solver(msg) => format!("solver: {msg}"),
        RerouteFailure::Timeout(d) => format!("timeout: {} ms", d.as_millis()),
        RerouteFailure::Stale { requested, current } => format!("stale: requested={} current={}", requested.0, current.0),
    }
}
