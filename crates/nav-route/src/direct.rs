//! Offline solver that joins the origin and stops with straight legs.
//!
//! Useful where no road network is available (tests, demos, open terrain).
//! Directions are derived from the bearing change at every vertex; stop
//! vertices announce the arrival as well as the following turn.

use std::future::{ready, Future};

use nav_core::GeoPoint;
use tracing::debug;

use crate::{Maneuver, Route, RouteSolver, RouteStop, SolveError, SolveRequest};

/// Straight-leg route solver.
#[derive(Clone, Debug, Default)]
pub struct DirectSolver {
    /// Overrides the travel mode's default speed for travel-time estimates.
    speed_mps: Option<f64>,
}

impl DirectSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speed(speed_mps: f64) -> Self {
        Self { speed_mps: Some(speed_mps) }
    }

    /// Solve synchronously.
    pub fn plan(&self, request: &SolveRequest) -> Result<Route, SolveError> {
        if request.stops.is_empty() {
            return Err(SolveError::NoRoute("no stops to visit".into()));
        }

        let mut path: Vec<GeoPoint> = vec![request.origin];
        let mut cumulative = vec![0.0];
        let mut stop_vertex = Vec::with_capacity(request.stops.len());

        for stop in &request.stops {
            let last = path[path.len() - 1];
            if last != stop.coordinate {
                cumulative.push(cumulative[cumulative.len() - 1] + last.distance_m(stop.coordinate));
                path.push(stop.coordinate);
            }
            stop_vertex.push(path.len() - 1);
        }
        if path.len() == 1 {
            // Origin and every stop coincide: a zero-length route.
            path.push(request.origin);
            cumulative.push(0.0);
        }

        let stops: Vec<RouteStop> = request
            .stops
            .iter()
            .zip(&stop_vertex)
            .map(|(stop, &v)| RouteStop { stop: stop.clone(), offset_m: cumulative[v] })
            .collect();

        let labels: Vec<Option<String>> = (0..path.len())
            .map(|v| {
                stop_vertex
                    .iter()
                    .rposition(|&sv| sv == v)
                    .map(|i| request.stops[i].label())
            })
            .collect();

        let maneuvers = generate_maneuvers(&path, &cumulative, &labels);
        let total = cumulative[cumulative.len() - 1];
        let speed = self
            .speed_mps
            .unwrap_or_else(|| request.options.travel_mode.default_speed_mps());

        debug!(
            stops = request.stops.len(),
            length_m = total,
            strategy = ?request.options.strategy,
            "direct route solved"
        );

        Ok(Route::with_stop_offsets(path, stops, maneuvers)?.with_travel_time(total / speed))
    }
}

impl RouteSolver for DirectSolver {
    fn solve(&self, request: SolveRequest) -> impl Future<Output = Result<Route, SolveError>> + Send {
        ready(self.plan(&request))
    }
}

// ── Directions ────────────────────────────────────────────────────────────────

/// Turn direction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Straight,
    SlightLeft,
    Left,
    SharpLeft,
    SlightRight,
    Right,
    SharpRight,
    UTurn,
}

impl Turn {
    fn text(self) -> &'static str {
        match self {
            Turn::Straight    => "continue straight",
            Turn::SlightLeft  => "keep slightly left",
            Turn::Left        => "turn left",
            Turn::SharpLeft   => "turn sharp left",
            Turn::SlightRight => "keep slightly right",
            Turn::Right       => "turn right",
            Turn::SharpRight  => "turn sharp right",
            Turn::UTurn       => "make a U-turn",
        }
    }
}

/// Classify the turn at `b` when arriving from `a` and leaving toward `c`.
pub fn turn_at(a: GeoPoint, b: GeoPoint, c: GeoPoint) -> Turn {
    // Positive = right, negative = left, normalised to [-180, 180].
    let mut angle = b.bearing_deg(c) - a.bearing_deg(b);
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle < -180.0 {
        angle += 360.0;
    }

    let abs_angle = angle.abs();
    if abs_angle > 170.0 {
        Turn::UTurn
    } else if abs_angle > 120.0 {
        if angle > 0.0 { Turn::SharpRight } else { Turn::SharpLeft }
    } else if abs_angle > 60.0 {
        if angle > 0.0 { Turn::Right } else { Turn::Left }
    } else if abs_angle > 20.0 {
        if angle > 0.0 { Turn::SlightRight } else { Turn::SlightLeft }
    } else {
        Turn::Straight
    }
}

fn compass(bearing_deg: f64) -> &'static str {
    const POINTS: [&str; 8] = ["north", "northeast", "east", "southeast", "south", "southwest", "west", "northwest"];
    POINTS[((bearing_deg + 22.5).rem_euclid(360.0) / 45.0) as usize % 8]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One maneuver per vertex: depart, turn (or arrive-and-turn), arrive.
fn generate_maneuvers(path: &[GeoPoint], cumulative: &[f64], labels: &[Option<String>]) -> Vec<Maneuver> {
    let last = path.len() - 1;
    let leg = |v: usize| if v < last { cumulative[v + 1] - cumulative[v] } else { 0.0 };
    let mut maneuvers = Vec::with_capacity(path.len());

    maneuvers.push(Maneuver::new(
        format!("Head {}", compass(path[0].bearing_deg(path[1]))),
        0.0,
        leg(0),
    ));

    for v in 1..last {
        let turn = turn_at(path[v - 1], path[v], path[v + 1]);
        let instruction = match &labels[v] {
            Some(label) => format!("Arrive at {label}, then {}", turn.text()),
            None => capitalize(turn.text()),
        };
        maneuvers.push(Maneuver::new(instruction, cumulative[v], leg(v)));
    }

    if last > 0 {
        let instruction = match &labels[last] {
            Some(label) => format!("Arrive at {label}"),
            None => "Arrive at destination".to_string(),
        };
        maneuvers.push(Maneuver::new(instruction, cumulative[last], 0.0));
    }

    maneuvers
}
