//! The combined per-fix pipeline.

use nav_core::{ManeuverIndex, StopIndex};
use nav_route::Route;
use tracing::{debug, info};

use crate::{
    Arrival, DestinationTracker, Deviation, DeviationDetector, GuidanceEmitter, PositionFix,
    ProgressTracker, Projector, TrackingConfig, TrackingError, TrackingResult, TrackingStatus,
};

/// Everything that happened while processing one fix.
#[derive(Clone, Debug)]
pub struct TrackingUpdate {
    pub status:    TrackingStatus,
    pub deviation: Deviation,
    /// Maneuvers crossed by this fix, in order.
    pub announced: Vec<ManeuverIndex>,
    /// Stops reached by this fix, in order.  A fix that passes several
    /// stops at once reaches each of them.
    pub arrivals:  Vec<Arrival>,
}

impl TrackingUpdate {
    /// `true` if this fix completed the trip.
    pub fn completed(&self) -> bool {
        self.arrivals.iter().any(|a| matches!(a, Arrival::Completed(_)))
    }
}

/// Projector → deviation → guidance → progress → destination, one fix at a
/// time.
///
/// The tracker owns all per-trip state except the route itself, which is
/// borrowed per call.  After swapping in a new route call
/// [`RouteTracker::route_swapped`] before the next update.
#[derive(Clone, Debug)]
pub struct RouteTracker {
    config:       TrackingConfig,
    projector:    Projector,
    deviation:    DeviationDetector,
    progress:     ProgressTracker,
    destinations: DestinationTracker,
    guidance:     GuidanceEmitter,
}

impl RouteTracker {
    /// Create a tracker for `route`, whose stops must be numbered `0..n`.
    ///
    /// With `skip_coincident_stops`, leading stops that lie within the
    /// arrival tolerance of the path start are treated as already visited.
    pub fn new(config: TrackingConfig, route: &Route, skip_coincident_stops: bool) -> TrackingResult<Self> {
        config.validate()?;

        let stops = route.stops();
        for (position, rs) in stops.iter().enumerate() {
            if rs.stop.sequence.index() != position {
                return Err(TrackingError::StopSequence {
                    position,
                    found: rs.stop.sequence,
                    count: stops.len(),
                });
            }
        }

        let mut destinations =
            DestinationTracker::new(stops.len(), config.approach_threshold_m, config.arrival_tolerance_m);
        if skip_coincident_stops {
            let first_away = stops
                .iter()
                .position(|rs| rs.offset_m > config.arrival_tolerance_m)
                .unwrap_or(stops.len());
            if first_away > 0 {
                debug!(skipped = first_away, "coincident stops marked visited");
            }
            destinations.skip_to(first_away);
        }

        Ok(Self {
            projector: Projector::new(),
            deviation: DeviationDetector::new(config.off_route_tolerance_m, config.off_route_debounce),
            progress: ProgressTracker::new(config.speed),
            destinations,
            guidance: GuidanceEmitter::new(),
            config,
        })
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn current_destination(&self) -> StopIndex {
        self.destinations.current()
    }

    pub fn stop_count(&self) -> usize {
        self.destinations.stop_count()
    }

    pub fn is_complete(&self) -> bool {
        self.destinations.is_complete()
    }

    pub fn is_on_route(&self) -> bool {
        self.deviation.is_on_route()
    }

    /// A new route is active: restart projection, debounce and guidance.
    /// The destination index carries over.
    pub fn route_swapped(&mut self) {
        self.projector.reset();
        self.deviation.reset();
        self.guidance.reset();
    }

    /// Process one fix against `route`.
    ///
    /// # Errors
    ///
    /// - [`TrackingError::Completed`] once the trip is complete.
    /// - [`TrackingError::MissingDestination`] if `route` does not visit the
    ///   current destination.
    pub fn update(&mut self, route: &Route, fix: &PositionFix) -> TrackingResult<TrackingUpdate> {
        if self.destinations.is_complete() {
            return Err(TrackingError::Completed);
        }
        let mut destination = self.destinations.current();
        let mut destination_offset =
            route.stop_offset(destination).ok_or(TrackingError::MissingDestination(destination))?;

        let tolerance_m = self.config.off_route_tolerance_m;
        let mut position = self.projector.project(route, fix.coordinate, tolerance_m);
        let deviation = self.deviation.observe(position.distance_m);
        if deviation == Deviation::Sustained {
            debug!(distance_m = position.distance_m, floor_m = self.projector.floor_m(), "sustained deviation");
            self.projector.reset();
            position = self.projector.project(route, fix.coordinate, tolerance_m);
        }

        let announced = if position.within_tolerance {
            self.guidance.advance(route.maneuvers(), position.offset_m, self.config.announce_ahead_m)
        } else {
            Vec::new()
        };

        let mut arrivals = Vec::new();
        let mut progress = self.progress.measure(route, position.offset_m, destination_offset);
        while let Some(arrival) = self.destinations.update(progress.distance_remaining_m, position.within_tolerance) {
            arrivals.push(arrival);
            match arrival {
                Arrival::Completed(stop) => {
                    info!(stop = %stop, "trip completed");
                    break;
                }
                Arrival::Reached(stop) => {
                    info!(stop = %stop, "destination reached");
                    destination = self.destinations.current();
                    destination_offset = route
                        .stop_offset(destination)
                        .ok_or(TrackingError::MissingDestination(destination))?;
                    progress = self.progress.measure(route, position.offset_m, destination_offset);
                }
            }
        }

        let (traversed_geometry, remaining_geometry) = route.split_at(position.offset_m);
        let status = TrackingStatus {
            fix_time: fix.time,
            traversed_geometry,
            remaining_geometry,
            distance_along_path_m: position.offset_m,
            distance_from_route_m: position.distance_m,
            current_destination_index: destination,
            distance_remaining_m: progress.distance_remaining_m,
            time_remaining_s: progress.time_remaining_s,
            destination_status: self.destinations.status(),
            is_on_route: self.deviation.is_on_route(),
            remaining_destination_count: self.destinations.remaining(),
            route_traversed_m: progress.route_traversed_m,
            route_remaining_m: progress.route_remaining_m,
            route_remaining_time_s: progress.route_remaining_time_s,
            next_maneuver: self.guidance.next(route.maneuvers()),
            snapped_position: if position.within_tolerance { position.snapped } else { fix.coordinate },
        };

        Ok(TrackingUpdate { status, deviation, announced, arrivals })
    }
}
