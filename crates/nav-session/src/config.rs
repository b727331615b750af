//! Trip-level configuration.

use std::time::Duration;

use nav_core::TravelMode;
use nav_route::ReroutingStrategy;
use nav_tracking::TrackingConfig;

use crate::{TripError, TripResult};

/// Fixed at trip creation.
///
/// | Field                   | Default           |
/// |-------------------------|-------------------|
/// | `tracking`              | see `TrackingConfig` |
/// | `rerouting`             | `None` (disabled) |
/// | `solve_timeout`         | 30 s              |
/// | `skip_coincident_stops` | `false`           |
/// | `travel_mode`           | `Drive`           |
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TripConfig {
    pub tracking:              TrackingConfig,
    /// Strategy used on sustained deviation; `None` never reroutes.
    pub rerouting:             Option<ReroutingStrategy>,
    /// Upper bound on one solver call (initial plan and reroutes).
    pub solve_timeout:         Duration,
    /// Treat stops at the very start of the route as already visited.
    pub skip_coincident_stops: bool,
    pub travel_mode:           TravelMode,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            tracking:              TrackingConfig::default(),
            rerouting:             None,
            solve_timeout:         Duration::from_secs(30),
            skip_coincident_stops: false,
            travel_mode:           TravelMode::default(),
        }
    }
}

impl TripConfig {
    pub fn validate(&self) -> TripResult<()> {
        self.tracking.validate()?;
        if self.solve_timeout.is_zero() {
            return Err(TripError::Config("solve_timeout must be greater than zero".into()));
        }
        Ok(())
    }
}
