use nav_core::{FixTime, GeoPoint};

/// One raw location sample from a live or replayed source.
///
/// Consumed by a single tracking cycle and not retained afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionFix {
    pub coordinate:  GeoPoint,
    pub time:        FixTime,
    /// Horizontal accuracy radius in metres (0 when unknown).
    pub accuracy_m:  f64,
    pub heading_deg: Option<f64>,
}

impl PositionFix {
    pub fn new(coordinate: GeoPoint, time: FixTime) -> Self {
        Self { coordinate, time, accuracy_m: 0.0, heading_deg: None }
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = accuracy_m;
        self
    }

    pub fn with_heading(mut self, heading_deg: f64) -> Self {
        self.heading_deg = Some(heading_deg);
        self
    }
}
