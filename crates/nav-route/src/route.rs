//! The route a trip follows: path geometry, stops along it, and directions.
//!
//! A [`Route`] is immutable once built.  Rerouting produces a new `Route`
//! which replaces the old one wholesale, so the path geometry and the
//! maneuver list a reader sees always belong to the same solve.
//!
//! # Offsets
//!
//! Every position along the route is a path offset in metres from the first
//! path vertex (haversine length of the polyline up to that point).  Stops
//! and maneuvers are pinned to offsets at construction time.

use std::fmt;

use nav_core::{GeoPoint, LocalFrame, StopIndex};

use crate::index::{closest_on_segment, SegmentIndex};
use crate::{RouteError, RouteResult};

/// Slack allowed when comparing offsets computed along different paths.
const OFFSET_EPSILON_M: f64 = 1e-3;

// ── Stop / Maneuver ───────────────────────────────────────────────────────────

/// An ordered waypoint of a trip.  The sequence is fixed when the trip is
/// planned and never changes on reroute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub sequence:   StopIndex,
    pub coordinate: GeoPoint,
    pub name:       Option<String>,
}

impl Stop {
    pub fn new(sequence: u32, coordinate: GeoPoint) -> Self {
        Self { sequence: StopIndex(sequence), coordinate, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The stop's name, or `"stop N"` for unnamed stops.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("stop {}", self.sequence.0),
        }
    }
}

/// One turn-by-turn instruction tied to a position along the path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Maneuver {
    pub instruction: String,
    /// Path offset at which the maneuver takes place.
    pub offset_m:    f64,
    /// Length of path covered by this maneuver.
    pub length_m:    f64,
}

impl Maneuver {
    pub fn new(instruction: impl Into<String>, offset_m: f64, length_m: f64) -> Self {
        Self { instruction: instruction.into(), offset_m, length_m }
    }
}

/// A stop together with its offset along one particular route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    pub stop:     Stop,
    pub offset_m: f64,
}

/// A point projected onto the route path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// The nearest point on the path.
    pub point:      GeoPoint,
    /// Path offset of `point`.
    pub offset_m:   f64,
    /// Distance from the query point to `point`, metres.
    pub distance_m: f64,
    /// Index of the segment containing `point`.
    pub segment:    usize,
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// A solved route: path polyline, the stops it visits, and its directions.
///
/// Build with [`Route::new`] (stop offsets found by projection) or
/// [`Route::with_stop_offsets`] (offsets supplied by the solver).
#[derive(Clone)]
pub struct Route {
    path:          Vec<GeoPoint>,
    /// `cumulative_m[i]` = path offset of vertex `i`.  Same length as `path`.
    cumulative_m:  Vec<f64>,
    stops:         Vec<RouteStop>,
    maneuvers:     Vec<Maneuver>,
    travel_time_s: Option<f64>,
    frame:         LocalFrame,
    index:         SegmentIndex,
}

impl Route {
    /// Build a route, locating each stop on the path.
    ///
    /// Stops are projected in sequence order and each search starts at the
    /// previous stop's offset, so a path that passes near a later stop early
    /// on still places that stop after its predecessors.
    ///
    /// # Errors
    ///
    /// Fails for a path with fewer than two points, an empty stop list,
    /// invalid coordinates, a non-increasing stop sequence, or maneuvers out
    /// of order.
    pub fn new(path: Vec<GeoPoint>, stops: Vec<Stop>, maneuvers: Vec<Maneuver>) -> RouteResult<Self> {
        let mut route = Self::geometry(path)?;
        validate_stops(stops.iter())?;

        let mut min_offset = 0.0;
        let mut placed = Vec::with_capacity(stops.len());
        for stop in stops {
            let offset_m = route.project_forward(stop.coordinate, min_offset).offset_m;
            min_offset = offset_m;
            placed.push(RouteStop { stop, offset_m });
        }
        route.stops = placed;

        route.set_maneuvers(maneuvers)?;
        Ok(route)
    }

    /// Build a route whose stop offsets are already known.
    ///
    /// Offsets must be non-decreasing and lie on the path.
    pub fn with_stop_offsets(
        path:      Vec<GeoPoint>,
        stops:     Vec<RouteStop>,
        maneuvers: Vec<Maneuver>,
    ) -> RouteResult<Self> {
        let mut route = Self::geometry(path)?;
        validate_stops(stops.iter().map(|s| &s.stop))?;

        let total = route.total_length_m();
        let mut previous = 0.0;
        let mut placed = Vec::with_capacity(stops.len());
        for mut rs in stops {
            if !(rs.offset_m >= previous - OFFSET_EPSILON_M && rs.offset_m <= total + OFFSET_EPSILON_M) {
                return Err(RouteError::StopOffset { stop: rs.stop.sequence, offset_m: rs.offset_m });
            }
            rs.offset_m = rs.offset_m.clamp(previous, total);
            previous = rs.offset_m;
            placed.push(rs);
        }
        route.stops = placed;

        route.set_maneuvers(maneuvers)?;
        Ok(route)
    }

    /// Attach the solver's travel-time estimate for the whole route.
    pub fn with_travel_time(mut self, secs: f64) -> Self {
        self.travel_time_s = (secs.is_finite() && secs >= 0.0).then_some(secs);
        self
    }

    fn geometry(path: Vec<GeoPoint>) -> RouteResult<Self> {
        if path.len() < 2 {
            return Err(RouteError::TooFewPoints { got: path.len() });
        }
        if let Some(bad) = path.iter().find(|p| !p.is_valid()) {
            return Err(RouteError::InvalidCoordinate(*bad));
        }

        let mut cumulative_m = Vec::with_capacity(path.len());
        let mut acc = 0.0;
        cumulative_m.push(0.0);
        for w in path.windows(2) {
            acc += w[0].distance_m(w[1]);
            cumulative_m.push(acc);
        }

        let frame = LocalFrame::new(path[0]);
        let xy: Vec<[f64; 2]> = path.iter().map(|&p| frame.to_xy(p)).collect();
        let index = SegmentIndex::build(&xy);

        Ok(Self {
            path,
            cumulative_m,
            stops: Vec::new(),
            maneuvers: Vec::new(),
            travel_time_s: None,
            frame,
            index,
        })
    }

    fn set_maneuvers(&mut self, maneuvers: Vec<Maneuver>) -> RouteResult<()> {
        let total = self.total_length_m();
        let mut previous = 0.0;
        for (index, m) in maneuvers.iter().enumerate() {
            if !(m.offset_m >= previous && m.offset_m <= total + OFFSET_EPSILON_M && m.length_m >= 0.0) {
                return Err(RouteError::ManeuverOffset { index, offset_m: m.offset_m });
            }
            previous = m.offset_m;
        }
        self.maneuvers = maneuvers;
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    /// Path offset of every vertex.
    pub fn cumulative_m(&self) -> &[f64] {
        &self.cumulative_m
    }

    pub fn total_length_m(&self) -> f64 {
        self.cumulative_m.last().copied().unwrap_or(0.0)
    }

    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    pub fn maneuvers(&self) -> &[Maneuver] {
        &self.maneuvers
    }

    pub fn travel_time_s(&self) -> Option<f64> {
        self.travel_time_s
    }

    /// Mean speed implied by the solver's travel time, if it supplied one.
    pub fn average_speed_mps(&self) -> Option<f64> {
        match self.travel_time_s {
            Some(t) if t > 0.0 && self.total_length_m() > 0.0 => Some(self.total_length_m() / t),
            _ => None,
        }
    }

    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    /// Path offset of stop `sequence`, if this route visits it.
    pub fn stop_offset(&self, sequence: StopIndex) -> Option<f64> {
        self.stops
            .iter()
            .find(|rs| rs.stop.sequence == sequence)
            .map(|rs| rs.offset_m)
    }

    /// `true` if this route visits stop `sequence`.
    pub fn covers(&self, sequence: StopIndex) -> bool {
        self.stop_offset(sequence).is_some()
    }

    // ── Geometry queries ──────────────────────────────────────────────────

    /// Project `p` onto the nearest point of the path.
    ///
    /// Ties go to the earliest segment (see [`SegmentIndex`]).
    pub fn nearest(&self, p: GeoPoint) -> Projection {
        let xy = self.frame.to_xy(p);
        match self.index.nearest(xy) {
            Some(hit) => self.projection_on(p, hit.segment, hit.t),
            // Unreachable for a validated route (≥ 1 segment); fall back to
            // the start rather than panic.
            None => self.projection_on(p, 0, 0.0),
        }
    }

    /// Project `p` onto the path, considering only offsets `>= min_offset_m`.
    ///
    /// Linear in the number of segments; used for placing stops.
    pub fn project_forward(&self, p: GeoPoint, min_offset_m: f64) -> Projection {
        let xy = self.frame.to_xy(p);
        let first = self.segment_at(min_offset_m);
        let mut best: Option<Projection> = None;

        for segment in first..self.segment_count() {
            let a = self.frame.to_xy(self.path[segment]);
            let b = self.frame.to_xy(self.path[segment + 1]);
            let (mut t, _) = closest_on_segment(a, b, xy);

            let seg_len = self.segment_length(segment);
            if segment == first && seg_len > 0.0 {
                let t_min = ((min_offset_m - self.cumulative_m[segment]) / seg_len).clamp(0.0, 1.0);
                t = t.max(t_min);
            }

            let candidate = self.projection_on(p, segment, t);
            let better = match &best {
                None => true,
                Some(b) => candidate.distance_m < b.distance_m - OFFSET_EPSILON_M,
            };
            if better {
                best = Some(candidate);
            }
        }

        best.unwrap_or_else(|| self.projection_on(p, first, 0.0))
    }

    /// The point at path offset `offset_m` (clamped to the path).
    pub fn point_at(&self, offset_m: f64) -> GeoPoint {
        let segment = self.segment_at(offset_m);
        let seg_len = self.segment_length(segment);
        let t = if seg_len > 0.0 {
            (offset_m - self.cumulative_m[segment]) / seg_len
        } else {
            0.0
        };
        self.path[segment].lerp(self.path[segment + 1], t)
    }

    /// Split the path at `offset_m` into `(traversed, remaining)` polylines.
    ///
    /// Both halves contain the split point; either may be a single point at
    /// the ends of the path.
    pub fn split_at(&self, offset_m: f64) -> (Vec<GeoPoint>, Vec<GeoPoint>) {
        let offset_m = offset_m.clamp(0.0, self.total_length_m());
        let segment = self.segment_at(offset_m);
        let split = self.point_at(offset_m);

        let mut traversed: Vec<GeoPoint> = self.path[..=segment].to_vec();
        if traversed.last() != Some(&split) {
            traversed.push(split);
        }

        let mut remaining = Vec::with_capacity(self.path.len() - segment);
        remaining.push(split);
        for &p in &self.path[segment + 1..] {
            if remaining.last() != Some(&p) {
                remaining.push(p);
            }
        }

        (traversed, remaining)
    }

    /// Re-chain a freshly solved leg with the rest of `tail`.
    ///
    /// `self` must end at stop `at`; the result follows `self` up to `at` and
    /// then `tail`'s path, stops and maneuvers after `at`.  A maneuver `tail`
    /// gives at `at` itself takes the place of the leg's final arrival.
    pub fn chain(self, tail: &Route, at: StopIndex) -> RouteResult<Route> {
        match self.stops.last() {
            Some(last) if last.stop.sequence == at => {}
            _ => return Err(RouteError::MissingStop(at)),
        }
        let tail_offset = tail.stop_offset(at).ok_or(RouteError::MissingStop(at))?;

        let leg_total = self.total_length_m();
        let (_, tail_path) = tail.split_at(tail_offset);
        let leg_end = self.path[self.path.len() - 1];
        let connector = leg_end.distance_m(tail_path[0]);
        let shift = leg_total + connector - tail_offset;

        let mut path = self.path;
        for p in tail_path {
            if path.last() != Some(&p) {
                path.push(p);
            }
        }

        let mut stops = self.stops;
        stops.extend(
            tail.stops
                .iter()
                .filter(|rs| rs.stop.sequence > at)
                .map(|rs| RouteStop { stop: rs.stop.clone(), offset_m: rs.offset_m + shift }),
        );

        // The tail's maneuver at the joining stop ("Arrive at X, then ...")
        // replaces the leg's closing arrival and stays at the leg end.
        let at_stop = |m: &Maneuver| (m.offset_m - tail_offset).abs() <= OFFSET_EPSILON_M;
        let mut maneuvers = self.maneuvers;
        if tail.maneuvers.iter().any(at_stop)
            && maneuvers.last().is_some_and(|m| m.offset_m >= leg_total - OFFSET_EPSILON_M)
        {
            maneuvers.pop();
        }
        maneuvers.extend(
            tail.maneuvers
                .iter()
                .filter(|m| m.offset_m >= tail_offset - OFFSET_EPSILON_M)
                .map(|m| {
                    let offset_m = if at_stop(m) { leg_total } else { m.offset_m + shift };
                    Maneuver { offset_m, ..m.clone() }
                }),
        );

        let travel_time_s = match (self.travel_time_s, tail.travel_time_s) {
            (Some(leg), Some(rest)) if tail.total_length_m() > 0.0 => {
                Some(leg + rest * (tail.total_length_m() - tail_offset) / tail.total_length_m())
            }
            _ => None,
        };

        // Offsets were shifted by the summed segment lengths of the source
        // routes; re-measuring the joined path can differ by rounding, so
        // clamp instead of re-validating.
        let mut route = Route::geometry(path)?;
        let total = route.total_length_m();
        let mut previous = 0.0;
        for rs in &mut stops {
            rs.offset_m = rs.offset_m.clamp(previous, total);
            previous = rs.offset_m;
        }
        previous = 0.0;
        for m in &mut maneuvers {
            m.offset_m = m.offset_m.clamp(previous, total);
            previous = m.offset_m;
        }
        route.stops = stops;
        route.maneuvers = maneuvers;
        route.travel_time_s = travel_time_s;
        Ok(route)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn segment_count(&self) -> usize {
        self.path.len() - 1
    }

    fn segment_length(&self, segment: usize) -> f64 {
        self.cumulative_m[segment + 1] - self.cumulative_m[segment]
    }

    /// Segment containing `offset_m`; clamped to the first/last segment.
    fn segment_at(&self, offset_m: f64) -> usize {
        let after = self.cumulative_m.partition_point(|&c| c <= offset_m);
        after.saturating_sub(1).min(self.segment_count() - 1)
    }

    fn projection_on(&self, p: GeoPoint, segment: usize, t: f64) -> Projection {
        let point = self.path[segment].lerp(self.path[segment + 1], t);
        Projection {
            point,
            offset_m: self.cumulative_m[segment] + t * self.segment_length(segment),
            distance_m: p.distance_m(point),
            segment,
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("points", &self.path.len())
            .field("length_m", &self.total_length_m())
            .field("stops", &self.stops.iter().map(|s| (s.stop.sequence.0, s.offset_m)).collect::<Vec<_>>())
            .field("maneuvers", &self.maneuvers.len())
            .field("travel_time_s", &self.travel_time_s)
            .finish()
    }
}

fn validate_stops<'a>(stops: impl Iterator<Item = &'a Stop>) -> RouteResult<()> {
    let mut previous: Option<StopIndex> = None;
    let mut any = false;
    for stop in stops {
        any = true;
        if !stop.coordinate.is_valid() {
            return Err(RouteError::InvalidCoordinate(stop.coordinate));
        }
        if let Some(prev) = previous {
            if stop.sequence <= prev {
                return Err(RouteError::StopOrder { previous: prev, got: stop.sequence });
            }
        }
        previous = Some(stop.sequence);
    }
    if !any {
        return Err(RouteError::NoStops);
    }
    Ok(())
}
