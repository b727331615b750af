//! Position-fix timestamps.
//!
//! Fixes carry a millisecond Unix timestamp.  Integer milliseconds keep
//! ordering exact; conversion to seconds happens only where speeds are
//! computed.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixTime(pub u64);

impl FixTime {
    pub const ZERO: FixTime = FixTime(0);

    /// The current wall-clock time.  Clocks set before 1970 read as `ZERO`.
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        FixTime(ms)
    }

    #[inline]
    pub fn from_secs(secs: u64) -> Self {
        FixTime(secs * 1_000)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }
}

impl std::ops::Add<u64> for FixTime {
    type Output = FixTime;
    /// Add `rhs` milliseconds.
    #[inline]
    fn add(self, rhs: u64) -> FixTime {
        FixTime(self.0 + rhs)
    }
}

impl fmt::Display for FixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1_000, self.0 % 1_000)
    }
}
