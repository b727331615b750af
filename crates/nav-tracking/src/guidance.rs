//! Voice guidance: each maneuver is announced once, in path order.

use nav_core::ManeuverIndex;
use nav_route::Maneuver;

/// Pointer to the next maneuver not yet announced on the active route.
#[derive(Clone, Debug, Default)]
pub struct GuidanceEmitter {
    next: usize,
}

impl GuidanceEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next maneuver to be announced, if any remain.
    pub fn next(&self, maneuvers: &[Maneuver]) -> Option<ManeuverIndex> {
        (self.next < maneuvers.len()).then(|| ManeuverIndex(self.next as u32))
    }

    /// Announce every maneuver whose offset lies at or before
    /// `offset_m + ahead_m`.
    pub fn advance(&mut self, maneuvers: &[Maneuver], offset_m: f64, ahead_m: f64) -> Vec<ManeuverIndex> {
        let mut announced = Vec::new();
        while let Some(m) = maneuvers.get(self.next) {
            if m.offset_m > offset_m + ahead_m {
                break;
            }
            announced.push(ManeuverIndex(self.next as u32));
            self.next += 1;
        }
        announced
    }

    /// Start over at the first maneuver of a new route.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}
