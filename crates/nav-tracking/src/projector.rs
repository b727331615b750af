//! Geometry projection of fixes onto the active route.
//!
//! The projector keeps a floor: the furthest offset reached by an on-route
//! fix.  While the traveler stays on route the reported offset never drops
//! below it, so GPS jitter near a completed stop cannot walk progress
//! backward.  A lone off-route fix leaves the floor in place; it is released
//! by [`Projector::reset`], which the tracker calls on a sustained deviation
//! and after a route swap.

use nav_core::GeoPoint;
use nav_route::Route;
use tracing::debug;

/// Slack when comparing the forward match against the global nearest.
const TIE_EPSILON_M: f64 = 1e-3;

/// Where a fix lies relative to the route path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPosition {
    /// Offset along the path used for progress (monotonic while on route).
    pub offset_m:         f64,
    /// Offset of the geometrically nearest point, before clamping.
    pub raw_offset_m:     f64,
    /// Perpendicular distance from the fix to the path.
    pub distance_m:       f64,
    /// Point on the path at `offset_m`.
    pub snapped:          GeoPoint,
    /// `distance_m` is within the off-route tolerance.
    pub within_tolerance: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Projector {
    floor_m: f64,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Furthest on-route offset seen since the last reset.
    pub fn floor_m(&self) -> f64 {
        self.floor_m
    }

    /// Forget the floor; the next fix is projected freely.
    pub fn reset(&mut self) {
        self.floor_m = 0.0;
    }

    /// Project `point` onto `route`.
    ///
    /// Within tolerance the fix is matched to the path at or past the floor,
    /// so a route that retraces itself keeps advancing on the return leg.
    /// Off route the floor is held; only [`Projector::reset`] lowers it.
    pub fn project(&mut self, route: &Route, point: GeoPoint, tolerance_m: f64) -> PathPosition {
        let nearest = route.nearest(point);
        let within_tolerance = nearest.distance_m <= tolerance_m;

        if !within_tolerance {
            let offset_m = nearest.offset_m.max(self.floor_m);
            return PathPosition {
                offset_m,
                raw_offset_m: nearest.offset_m,
                distance_m: nearest.distance_m,
                snapped: route.point_at(offset_m),
                within_tolerance,
            };
        }

        let forward = if nearest.offset_m >= self.floor_m {
            nearest
        } else {
            route.project_forward(point, self.floor_m)
        };
        if forward.distance_m <= tolerance_m || forward.distance_m <= nearest.distance_m + TIE_EPSILON_M {
            self.floor_m = forward.offset_m.max(self.floor_m);
            return PathPosition {
                offset_m: self.floor_m,
                raw_offset_m: nearest.offset_m,
                distance_m: nearest.distance_m,
                snapped: forward.point,
                within_tolerance,
            };
        }

        debug!(
            raw_offset_m = nearest.offset_m,
            floor_m = self.floor_m,
            "backward drift ignored"
        );
        PathPosition {
            offset_m: self.floor_m,
            raw_offset_m: nearest.offset_m,
            distance_m: nearest.distance_m,
            snapped: route.point_at(self.floor_m),
            within_tolerance,
        }
    }
}
