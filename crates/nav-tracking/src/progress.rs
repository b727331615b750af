//! Distance and time remaining.

use nav_route::Route;

use crate::SpeedModel;

/// Remaining-work figures for one fix.  All values are `>= 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Progress {
    /// Path distance from the fix to the current destination.
    pub distance_remaining_m:   f64,
    pub time_remaining_s:       f64,
    /// Path distance covered on the active route.
    pub route_traversed_m:      f64,
    /// Path distance to the end of the active route.
    pub route_remaining_m:      f64,
    pub route_remaining_time_s: f64,
}

#[derive(Copy, Clone, Debug)]
pub struct ProgressTracker {
    speed: SpeedModel,
}

impl ProgressTracker {
    pub fn new(speed: SpeedModel) -> Self {
        Self { speed }
    }

    pub fn measure(&self, route: &Route, offset_m: f64, destination_offset_m: f64) -> Progress {
        let total = route.total_length_m();
        let offset_m = offset_m.clamp(0.0, total);
        let speed = self.speed.speed_mps(route);

        let distance_remaining_m = (destination_offset_m - offset_m).max(0.0);
        let route_remaining_m = (total - offset_m).max(0.0);

        Progress {
            distance_remaining_m,
            time_remaining_s: seconds(distance_remaining_m, speed),
            route_traversed_m: offset_m,
            route_remaining_m,
            route_remaining_time_s: seconds(route_remaining_m, speed),
        }
    }
}

fn seconds(distance_m: f64, speed_mps: f64) -> f64 {
    if speed_mps > 0.0 { distance_m / speed_mps } else { 0.0 }
}
