//! The per-fix tracking snapshot handed to presentation sinks.

use nav_core::{format_distance, format_duration, FixTime, GeoPoint, ManeuverIndex, StopIndex};

use crate::DestinationStatus;

/// Everything a sink needs to render one tracking cycle.
///
/// Derived entirely from the active route, the destination index and the
/// latest fix; recomputed on every fix and never mutated in place.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackingStatus {
    pub fix_time:                    FixTime,
    /// Path from the route start to the projected point.
    pub traversed_geometry:          Vec<GeoPoint>,
    /// Path from the projected point to the route end.
    pub remaining_geometry:          Vec<GeoPoint>,
    pub distance_along_path_m:       f64,
    pub distance_from_route_m:       f64,
    pub current_destination_index:   StopIndex,
    pub distance_remaining_m:        f64,
    pub time_remaining_s:            f64,
    pub destination_status:          DestinationStatus,
    /// Debounced: stays `true` through isolated off-route fixes.
    pub is_on_route:                 bool,
    /// Stops not yet reached, the current one included; 0 once complete.
    pub remaining_destination_count: usize,
    pub route_traversed_m:           f64,
    pub route_remaining_m:           f64,
    pub route_remaining_time_s:      f64,
    /// Next maneuver not yet announced on the active route.
    pub next_maneuver:               Option<ManeuverIndex>,
    /// Marker position: the point on the route for an on-route fix, the raw
    /// fix otherwise.
    pub snapped_position:            GeoPoint,
}

impl TrackingStatus {
    /// `"350 m"` / `"1.2 km"`.
    pub fn distance_remaining_text(&self) -> String {
        format_distance(self.distance_remaining_m)
    }

    /// `"mm:ss"` / `"h:mm:ss"`.
    pub fn time_remaining_text(&self) -> String {
        format_duration(self.time_remaining_s)
    }
}
