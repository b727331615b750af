//! Debounced off-route detection.

/// Outcome of one fix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Deviation {
    /// Within tolerance; the off-route counter is back at zero.
    OnRoute,
    /// Beyond tolerance, but fewer than `debounce` fixes in a row.
    OffRoute { consecutive: u32 },
    /// `debounce` consecutive fixes beyond tolerance.  The counter restarts,
    /// so a deviation that persists fires again every `debounce` fixes.
    Sustained,
}

/// Counts consecutive off-route fixes.
#[derive(Clone, Debug)]
pub struct DeviationDetector {
    tolerance_m: f64,
    debounce:    u32,
    consecutive: u32,
    /// Set by `Sustained`; cleared by the next on-route fix or `reset`.
    deviated:    bool,
}

impl DeviationDetector {
    pub fn new(tolerance_m: f64, debounce: u32) -> Self {
        Self { tolerance_m, debounce: debounce.max(1), consecutive: 0, deviated: false }
    }

    pub fn observe(&mut self, distance_m: f64) -> Deviation {
        if distance_m <= self.tolerance_m {
            self.consecutive = 0;
            self.deviated = false;
            return Deviation::OnRoute;
        }

        self.consecutive += 1;
        if self.consecutive >= self.debounce {
            self.consecutive = 0;
            self.deviated = true;
            Deviation::Sustained
        } else {
            Deviation::OffRoute { consecutive: self.consecutive }
        }
    }

    /// Debounced state: `false` only after a sustained deviation that no
    /// on-route fix has cleared yet.
    pub fn is_on_route(&self) -> bool {
        !self.deviated
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    /// Clear the counter and the deviation latch (new route in place).
    pub fn reset(&mut self) {
        self.consecutive = 0;
        self.deviated = false;
    }
}
