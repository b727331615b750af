//! `nav-tracking` — turns a stream of position fixes into route progress.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`config`]      | `TrackingConfig`, `SpeedModel`                                  |
//! | [`fix`]         | `PositionFix`: one raw location sample                          |
//! | [`projector`]   | `Projector`: monotonic snap of a fix onto the route path        |
//! | [`deviation`]   | `DeviationDetector`: debounced off-route detection              |
//! | [`progress`]    | `ProgressTracker`: distance/time remaining                      |
//! | [`destination`] | `DestinationTracker`: NOT_REACHED → APPROACHING → REACHED       |
//! | [`guidance`]    | `GuidanceEmitter`: announce each maneuver once                  |
//! | [`status`]      | `TrackingStatus`: derived per-fix snapshot                      |
//! | [`tracker`]     | `RouteTracker`: the pipeline above, one fix at a time           |
//! | [`error`]       | `TrackingError`, `TrackingResult<T>`                            |
//!
//! # Pipeline
//!
//! Every fix flows through the components in a fixed order:
//!
//! 1. **Projector**: nearest point on the path; the offset along the path
//!    never moves backward while the fix is on route.
//! 2. **Deviation**: `N` consecutive fixes beyond tolerance declare a
//!    sustained deviation (the caller decides whether to reroute).
//! 3. **Guidance**: maneuvers whose offset has been passed are announced.
//! 4. **Progress + destination**: remaining distance to the current stop;
//!    arrival advances the destination index or completes the trip.
//!
//! Nothing here owns the route.  `RouteTracker::update` borrows whichever
//! route is active for the duration of one fix, which lets the session layer
//! swap routes between fixes without tearing.

pub mod config;
pub mod destination;
pub mod deviation;
pub mod error;
pub mod fix;
pub mod guidance;
pub mod progress;
pub mod projector;
pub mod status;
pub mod tracker;


pub use config::{SpeedModel, TrackingConfig};
pub use destination::{Arrival, DestinationStatus, DestinationTracker};
pub use deviation::{Deviation, DeviationDetector};
pub use error::{TrackingError, TrackingResult};
pub use fix::PositionFix;
pub use guidance::GuidanceEmitter;
pub use progress::{Progress, ProgressTracker};
pub use projector::{PathPosition, Projector};
pub use status::TrackingStatus;
pub use tracker::{RouteTracker, TrackingUpdate};
