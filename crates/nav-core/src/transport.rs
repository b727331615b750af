//! Travel mode shared by the solver and the time-remaining estimate.

/// How the traveler moves along the route.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum TravelMode {
    /// Private vehicle.
    #[default]
    Drive,
    /// On foot.
    Walk,
    /// Bicycle.
    Bike,
}

impl TravelMode {
    /// Assumed cruising speed in metres per second when no better speed
    /// estimate is available.
    ///
    /// | Mode  | Speed      |
    /// |-------|------------|
    /// | Drive | 13.9 m/s   |
    /// | Walk  | 1.4 m/s    |
    /// | Bike  | 4.2 m/s    |
    pub fn default_speed_mps(self) -> f64 {
        match self {
            TravelMode::Drive => 13.9,
            TravelMode::Walk  => 1.4,
            TravelMode::Bike  => 4.2,
        }
    }

    /// Human-readable label, useful for log rows.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Drive => "drive",
            TravelMode::Walk  => "walk",
            TravelMode::Bike  => "bike",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
