//! `nav-core` — foundational types for the route-progress tracker.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `StopIndex`, `ManeuverIndex`                          |
//! | [`geo`]         | `GeoPoint`, haversine distance, bearing, `LocalFrame` |
//! | [`time`]        | `FixTime`                                             |
//! | [`transport`]   | `TravelMode` enum and its default speeds              |
//! | [`rng`]         | `NoiseRng` (seeded GPS jitter for simulations)        |
//! | [`display`]     | Human-readable distance / remaining-time strings      |
//! | [`error`]       | `NavError`, `NavResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod display;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;
pub mod transport;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use display::{format_distance, format_duration};
pub use error::{NavError, NavResult};
pub use geo::{GeoPoint, LocalFrame};
pub use ids::{ManeuverIndex, StopIndex};
pub use rng::NoiseRng;
pub use time::FixTime;
pub use transport::TravelMode;
