//! `nav-session` — a trip in progress: tracking, rerouting and events.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`config`]   | `TripConfig`                                                      |
//! | [`builder`]  | `TripBuilder`: validate inputs, solve or accept the first route   |
//! | [`trip`]     | `Trip<S>`: per-fix processing and the async `run` loop            |
//! | [`active`]   | `ActiveRoute`: the route cell swapped atomically on reroute       |
//! | [`reroute`]  | `RerouteCoordinator<S>`: single-flight, time-bounded solving      |
//! | [`event`]    | `NavEvent`, `RerouteFailure`                                      |
//! | [`observer`] | `TripObserver` trait, `NoopObserver`, `ChannelObserver`           |
//! | [`source`]   | `FixSource` trait, `ReplaySource`, `ChannelSource`, `SimulatedSource` |
//! | [`cancel`]   | `CancelHandle`: idempotent cancellation from any thread           |
//! | [`error`]    | `TripError`, `TripResult<T>`                                      |
//!
//! # Concurrency model
//!
//! Fixes are processed one at a time.  Each cycle holds a read guard on the
//! [`ActiveRoute`] for its whole duration; a finished reroute is applied
//! between cycles under a short write lock, so no cycle ever sees geometry
//! from one route and maneuvers from another.
//!
//! The solver call itself runs on a spawned tokio task bounded by
//! `TripConfig::solve_timeout`.  At most one reroute is in flight per trip;
//! deviations detected meanwhile are coalesced into it.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut trip = TripBuilder::new(DirectSolver::new())
//!     .config(TripConfig { rerouting: Some(ReroutingStrategy::ToNextWaypoint), ..Default::default() })
//!     .solve(origin, stops)
//!     .await?;
//! let state = trip.run(&mut source, &mut observer).await?;
//! ```

pub mod active;
pub mod builder;
pub mod cancel;
pub mod config;
pub mod error;
pub mod event;
pub mod observer;
pub mod reroute;
pub mod source;
pub mod trip;

#[cfg(test)]
mod tests;

pub use active::ActiveRoute;
pub use builder::TripBuilder;
pub use cancel::CancelHandle;
pub use config::TripConfig;
pub use error::{TripError, TripResult};
pub use event::{NavEvent, RerouteFailure};
pub use observer::{ChannelObserver, NoopObserver, TripMessage, TripObserver};
pub use reroute::{RerouteCoordinator, RerouteOutcome, RerouteTicket};
pub use source::{ChannelSource, FixSource, ReplaySource, SimulatedSource};
pub use trip::{Cycle, Trip, TripState};
