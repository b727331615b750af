//! `nav-route` — the route a trip follows and the contract for producing one.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`route`]   | `Stop`, `Maneuver`, `Route` (validated, immutable), `Projection`|
//! | [`index`]   | `SegmentIndex`: R-tree over path segments for nearest lookups   |
//! | [`solver`]  | `RouteSolver` trait, `SolveRequest`, `ReroutingStrategy`        |
//! | [`direct`]  | `DirectSolver`: offline straight-leg solver with directions     |
//! | [`loader`]  | `load_stops_csv` / `load_stops_reader`                          |
//! | [`error`]   | `RouteError`, `SolveError`                                      |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod direct;
pub mod error;
pub mod index;
pub mod loader;
pub mod route;
pub mod solver;


pub use direct::DirectSolver;
pub use error::{RouteError, RouteResult, SolveError};
pub use index::SegmentIndex;
pub use loader::{load_stops_csv, load_stops_reader};
pub use route::{Maneuver, Projection, Route, RouteStop, Stop};
pub use solver::{ReroutingStrategy, RouteSolver, SolveOptions, SolveRequest};
