//! Discrete events delivered to presentation sinks.

use std::fmt;
use std::time::Duration;

use nav_core::{FixTime, ManeuverIndex, StopIndex};
use nav_route::ReroutingStrategy;

/// Why a reroute produced no new route.  The trip keeps tracking against
/// the previous route in every case.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RerouteFailure {
    /// The solver returned an error, panicked, or produced an unusable route.
    Solver(String),
    /// The solver did not answer within `solve_timeout`.
    Timeout(Duration),
    /// The trip moved on to another destination while the solver ran.
    Stale { requested: StopIndex, current: StopIndex },
}

impl fmt::Display for RerouteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RerouteFailure::Solver(msg) => write!(f, "solver error: {msg}"),
            RerouteFailure::Timeout(d) => write!(f, "timed out after {d:?}"),
            RerouteFailure::Stale { requested, current } => {
                write!(f, "stale: solved for {requested}, trip now at {current}")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavEvent {
    /// Stop `index` was reached and the next stop is now current.
    DestinationReached { index: StopIndex, time: FixTime },
    /// The final stop was reached; the trip is over.
    TripCompleted { index: StopIndex, time: FixTime },
    /// A new route replaced the active one.
    Rerouted {
        strategy:    ReroutingStrategy,
        destination: StopIndex,
        revision:    u64,
        length_m:    f64,
    },
    RerouteFailed { destination: StopIndex, reason: RerouteFailure },
    /// Speak `instruction`.
    ManeuverAnnounced { index: ManeuverIndex, instruction: String },
}

impl NavEvent {
    /// Short machine-readable tag, used as the `kind` column of trip logs.
    pub fn kind(&self) -> &'static str {
        match self {
            NavEvent::DestinationReached { .. } => "destination_reached",
            NavEvent::TripCompleted { .. }      => "trip_completed",
            NavEvent::Rerouted { .. }           => "rerouted",
            NavEvent::RerouteFailed { .. }      => "reroute_failed",
            NavEvent::ManeuverAnnounced { .. }  => "maneuver_announced",
        }
    }
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavEvent::DestinationReached { index, time } => write!(f, "[{time}] reached {index}"),
            NavEvent::TripCompleted { index, time } => write!(f, "[{time}] trip completed at {index}"),
            NavEvent::Rerouted { strategy, destination, revision, length_m } => write!(
                f,
                "rerouted ({strategy}) toward {destination}: revision {revision}, {}",
                nav_core::format_distance(*length_m)
            ),
            NavEvent::RerouteFailed { destination, reason } => {
                write!(f, "reroute toward {destination} failed: {reason}")
            }
            NavEvent::ManeuverAnnounced { instruction, .. } => write!(f, "\"{instruction}\""),
        }
    }
}
