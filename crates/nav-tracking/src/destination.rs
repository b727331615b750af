//! Destination state machine.
//!
//! ```text
//!   NOT_REACHED ──(remaining < approach)──▶ APPROACHING ──(remaining ≤ arrival)──▶ REACHED
//! ```
//!
//! Reaching a stop other than the last advances the index and starts the
//! next stop at NOT_REACHED.  Reaching the last stop completes the trip; the
//! tracker is terminal afterwards and ignores further updates.

use nav_core::StopIndex;

/// Remaining distances below this count as zero (float slack between a stop
/// offset and a fix projected onto the same vertex).
const ARRIVAL_EPSILON_M: f64 = 1e-3;

/// Per-destination progress state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestinationStatus {
    #[default]
    NotReached,
    Approaching,
    Reached,
}

impl DestinationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DestinationStatus::NotReached  => "not_reached",
            DestinationStatus::Approaching => "approaching",
            DestinationStatus::Reached     => "reached",
        }
    }
}

/// Result of feeding one distance sample to the state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arrival {
    /// Stop reached; the next stop is now current.
    Reached(StopIndex),
    /// Final stop reached; the trip is complete.
    Completed(StopIndex),
}

#[derive(Clone, Debug)]
pub struct DestinationTracker {
    stop_count:           usize,
    index:                usize,
    status:               DestinationStatus,
    completed:            bool,
    approach_threshold_m: f64,
    arrival_tolerance_m:  f64,
}

impl DestinationTracker {
    /// Tracker for a trip with `stop_count` stops (must be at least one).
    pub fn new(stop_count: usize, approach_threshold_m: f64, arrival_tolerance_m: f64) -> Self {
        Self {
            stop_count: stop_count.max(1),
            index: 0,
            status: DestinationStatus::NotReached,
            completed: false,
            approach_threshold_m,
            arrival_tolerance_m,
        }
    }

    /// Mark every stop before `index` as visited without reporting them.
    ///
    /// Only moves forward, and never past the last stop.
    pub fn skip_to(&mut self, index: usize) {
        let index = index.min(self.stop_count - 1);
        if index > self.index {
            self.index = index;
            self.status = DestinationStatus::NotReached;
        }
    }

    pub fn current(&self) -> StopIndex {
        StopIndex(self.index as u32)
    }

    pub fn status(&self) -> DestinationStatus {
        self.status
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Stops not yet reached, the current one included.
    pub fn remaining(&self) -> usize {
        if self.completed { 0 } else { self.stop_count - self.index }
    }

    /// Advance the state machine for the current destination.
    ///
    /// `within_tolerance` is whether the fix itself lies on the route; an
    /// off-route fix can approach a stop but never reach it.
    pub fn update(&mut self, distance_remaining_m: f64, within_tolerance: bool) -> Option<Arrival> {
        if self.completed {
            return None;
        }

        if within_tolerance && distance_remaining_m <= self.arrival_tolerance_m + ARRIVAL_EPSILON_M {
            let reached = self.current();
            if self.index + 1 == self.stop_count {
                self.status = DestinationStatus::Reached;
                self.completed = true;
                return Some(Arrival::Completed(reached));
            }
            self.index += 1;
            self.status = DestinationStatus::NotReached;
            return Some(Arrival::Reached(reached));
        }

        if self.status == DestinationStatus::NotReached && distance_remaining_m < self.approach_threshold_m {
            self.status = DestinationStatus::Approaching;
        }
        None
    }
}
