//! Position-fix sources.
//!
//! The trip treats finite (replayed, simulated) and unbounded (live) sources
//! identically: it asks for the next fix until the source returns `None`.
//! A source that simply stops producing fixes leaves the trip waiting; gaps
//! never cancel a trip.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use nav_core::{FixTime, NoiseRng};
use nav_route::Route;
use nav_tracking::PositionFix;
use tokio::sync::mpsc;

use crate::{TripError, TripResult};

/// A stream of position fixes.
pub trait FixSource {
    /// The next fix, or `None` when the source is exhausted.
    fn next_fix(&mut self) -> impl Future<Output = Option<PositionFix>> + Send;
}

// ── ReplaySource ──────────────────────────────────────────────────────────────

/// Replays a recorded list of fixes.
///
/// Without pacing, every fix yields to the scheduler once so that spawned
/// reroute tasks make progress between fixes.
pub struct ReplaySource {
    fixes:   VecDeque<PositionFix>,
    pace:    Option<Duration>,
    started: bool,
}

impl ReplaySource {
    pub fn new(fixes: impl IntoIterator<Item = PositionFix>) -> Self {
        Self { fixes: fixes.into_iter().collect(), pace: None, started: false }
    }

    /// Wait `interval` between consecutive fixes.
    pub fn paced(mut self, interval: Duration) -> Self {
        self.pace = Some(interval);
        self
    }

    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }
}

impl FixSource for ReplaySource {
    fn next_fix(&mut self) -> impl Future<Output = Option<PositionFix>> + Send {
        async move {
            match self.pace {
                Some(interval) if self.started => tokio::time::sleep(interval).await,
                _ => tokio::task::yield_now().await,
            }
            self.started = true;
            self.fixes.pop_front()
        }
    }
}

// ── ChannelSource ─────────────────────────────────────────────────────────────

/// Live fixes pushed by another task (a GPS driver, a socket reader).
///
/// Exhausted once every sender is dropped.
pub struct ChannelSource {
    rx: mpsc::Receiver<PositionFix>,
}

impl ChannelSource {
    /// A source and the sender that feeds it.
    pub fn channel(buffer: usize) -> (mpsc::Sender<PositionFix>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self { rx })
    }
}

impl FixSource for ChannelSource {
    fn next_fix(&mut self) -> impl Future<Output = Option<PositionFix>> + Send {
        self.rx.recv()
    }
}

// ── SimulatedSource ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct Detour {
    start_m:   f64,
    end_m:     f64,
    lateral_m: f64,
}

/// Drives along a route at constant speed, emitting a fix every interval.
///
/// Fixes carry seeded Gaussian jitter, and detours push the traveler
/// sideways off the path for a stretch of the route.  The last fix lies
/// exactly at the end of the route.
pub struct SimulatedSource {
    route:         Route,
    speed_mps:     f64,
    interval_ms:   u64,
    noise_sigma_m: f64,
    detours:       Vec<Detour>,
    rng:           NoiseRng,
    start:         FixTime,
    step:          u64,
    done:          bool,
    realtime:      bool,
}

impl SimulatedSource {
    pub fn new(route: Route, speed_mps: f64, interval: Duration) -> TripResult<Self> {
        if !(speed_mps.is_finite() && speed_mps > 0.0) {
            return Err(TripError::Config(format!("simulated speed must be positive, got {speed_mps}")));
        }
        let interval_ms = interval.as_millis() as u64;
        if interval_ms == 0 {
            return Err(TripError::Config("simulated fix interval must be at least 1 ms".into()));
        }
        Ok(Self {
            route,
            speed_mps,
            interval_ms,
            noise_sigma_m: 0.0,
            detours: Vec::new(),
            rng: NoiseRng::new(0),
            start: FixTime::ZERO,
            step: 0,
            done: false,
            realtime: false,
        })
    }

    /// Gaussian jitter with standard deviation `sigma_m` per axis.
    pub fn with_noise(mut self, sigma_m: f64, seed: u64) -> Self {
        self.noise_sigma_m = sigma_m.max(0.0);
        self.rng = NoiseRng::new(seed);
        self
    }

    /// Drive `lateral_m` to the right of the path (negative: left) between
    /// offsets `start_m` and `start_m + length_m`.
    pub fn with_detour(mut self, start_m: f64, length_m: f64, lateral_m: f64) -> Self {
        self.detours.push(Detour { start_m, end_m: start_m + length_m, lateral_m });
        self
    }

    /// Timestamp of the first fix.
    pub fn starting_at(mut self, start: FixTime) -> Self {
        self.start = start;
        self
    }

    /// Sleep one interval between fixes instead of emitting them as fast as
    /// the trip consumes them.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    fn fix_at(&mut self, offset_m: f64, time: FixTime) -> PositionFix {
        let total = self.route.total_length_m();
        let base = self.route.point_at(offset_m);
        let heading = if offset_m + 1.0 <= total {
            base.bearing_deg(self.route.point_at(offset_m + 1.0))
        } else {
            self.route.point_at((offset_m - 1.0).max(0.0)).bearing_deg(base)
        };

        let mut p = base;
        if let Some(d) = self.detours.iter().find(|d| offset_m >= d.start_m && offset_m < d.end_m) {
            p = p.destination(heading + 90.0, d.lateral_m);
        }
        if self.noise_sigma_m > 0.0 {
            let north = self.rng.normal(self.noise_sigma_m);
            let east = self.rng.normal(self.noise_sigma_m);
            p = p.destination(0.0, north).destination(90.0, east);
        }

        PositionFix::new(p, time).with_accuracy(self.noise_sigma_m).with_heading(heading)
    }
}

impl Iterator for SimulatedSource {
    type Item = PositionFix;

    fn next(&mut self) -> Option<PositionFix> {
        if self.done {
            return None;
        }
        let total = self.route.total_length_m();
        let elapsed_s = (self.step * self.interval_ms) as f64 / 1_000.0;
        let mut offset_m = elapsed_s * self.speed_mps;
        if offset_m >= total {
            offset_m = total;
            self.done = true;
        }
        let time = self.start + self.step * self.interval_ms;
        self.step += 1;
        Some(self.fix_at(offset_m, time))
    }
}

impl FixSource for SimulatedSource {
    fn next_fix(&mut self) -> impl Future<Output = Option<PositionFix>> + Send {
        async move {
            if self.realtime && self.step > 0 {
                tokio::time::sleep(Duration::from_millis(self.interval_ms)).await;
            } else {
                tokio::task::yield_now().await;
            }
            self.next()
        }
    }
}
