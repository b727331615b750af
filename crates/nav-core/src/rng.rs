//! Deterministic RNG for simulated position sources.
//!
//! Simulated drives must be reproducible in tests, so every source owns a
//! `SmallRng` seeded from a caller-supplied seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seeded RNG used to jitter simulated GPS fixes.
pub struct NoiseRng(SmallRng);

impl NoiseRng {
    pub fn new(seed: u64) -> Self {
        NoiseRng(SmallRng::seed_from_u64(seed))
    }

    /// Zero-mean normal sample with standard deviation `sigma` (Box–Muller).
    pub fn normal(&mut self, sigma: f64) -> f64 {
        if sigma <= 0.0 {
            return 0.0;
        }
        // Open interval: ln(0) is undefined.
        let u1: f64 = self.0.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.0.r#gen();
        sigma * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}
