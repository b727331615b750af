//! Tracking parameters, fixed for the lifetime of a trip.

use nav_core::TravelMode;
use nav_route::Route;

use crate::{TrackingError, TrackingResult};

/// How remaining time is derived from remaining distance.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpeedModel {
    /// Constant speed in m/s.
    Fixed(f64),
    /// The active route's own travel-time estimate (length / solver time),
    /// or `fallback_mps` when the solver supplied none.
    RouteAverage { fallback_mps: f64 },
}

impl SpeedModel {
    /// Speed in m/s to use against `route`.
    pub fn speed_mps(&self, route: &Route) -> f64 {
        match *self {
            SpeedModel::Fixed(mps) => mps,
            SpeedModel::RouteAverage { fallback_mps } => route.average_speed_mps().unwrap_or(fallback_mps),
        }
    }

    /// Route average, falling back to the typical speed of `mode`.
    pub fn for_mode(mode: TravelMode) -> Self {
        SpeedModel::RouteAverage { fallback_mps: mode.default_speed_mps() }
    }
}

impl Default for SpeedModel {
    fn default() -> Self {
        Self::for_mode(TravelMode::default())
    }
}

/// Thresholds for deviation, arrival and guidance.
///
/// | Field                  | Default | Meaning                                         |
/// |------------------------|---------|-------------------------------------------------|
/// | `off_route_tolerance_m`| 30      | Max distance from the path for an on-route fix  |
/// | `off_route_debounce`   | 3       | Consecutive off-route fixes before deviation    |
/// | `approach_threshold_m` | 100     | Remaining distance that enters APPROACHING      |
/// | `arrival_tolerance_m`  | 0       | Remaining distance that counts as REACHED       |
/// | `announce_ahead_m`     | 0       | Announce maneuvers this far before their offset |
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackingConfig {
    pub off_route_tolerance_m: f64,
    pub off_route_debounce:    u32,
    pub approach_threshold_m:  f64,
    pub arrival_tolerance_m:   f64,
    pub announce_ahead_m:      f64,
    pub speed:                 SpeedModel,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            off_route_tolerance_m: 30.0,
            off_route_debounce:    3,
            approach_threshold_m:  100.0,
            arrival_tolerance_m:   0.0,
            announce_ahead_m:      0.0,
            speed:                 SpeedModel::default(),
        }
    }
}

impl TrackingConfig {
    pub fn validate(&self) -> TrackingResult<()> {
        fn positive(name: &str, v: f64) -> TrackingResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(TrackingError::Config(format!("{name} must be positive, got {v}")))
            }
        }
        fn non_negative(name: &str, v: f64) -> TrackingResult<()> {
            if v.is_finite() && v >= 0.0 {
                Ok(())
            } else {
                Err(TrackingError::Config(format!("{name} must be non-negative, got {v}")))
            }
        }

        positive("off_route_tolerance_m", self.off_route_tolerance_m)?;
        if self.off_route_debounce == 0 {
            return Err(TrackingError::Config("off_route_debounce must be at least 1".into()));
        }
        non_negative("approach_threshold_m", self.approach_threshold_m)?;
        non_negative("arrival_tolerance_m", self.arrival_tolerance_m)?;
        non_negative("announce_ahead_m", self.announce_ahead_m)?;
        if self.arrival_tolerance_m > self.approach_threshold_m {
            return Err(TrackingError::Config(format!(
                "arrival_tolerance_m ({}) exceeds approach_threshold_m ({})",
                self.arrival_tolerance_m, self.approach_threshold_m
            )));
        }
        match self.speed {
            SpeedModel::Fixed(mps) => positive("speed", mps),
            SpeedModel::RouteAverage { fallback_mps } => positive("fallback speed", fallback_mps),
        }
    }
}
