//! `nav-output` — trip-log writers for the route-progress tracker.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                  |
//! |-----------|---------|--------------------------------|
//! | *(none)*  | CSV     | `progress.csv`, `events.csv`   |
//! | `sqlite`  | SQLite  | `trip_log.db`                  |
//!
//! Both backends implement [`LogWriter`] and are driven by
//! [`TripLogObserver`], which implements `nav_session::TripObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use nav_output::{CsvLogWriter, TripLogObserver};
//!
//! let writer = CsvLogWriter::new(Path::new("./trip-log"))?;
//! let mut log = TripLogObserver::new(writer);
//! trip.run(&mut source, &mut log).await?;
//! log.take_error().map(|e| eprintln!("trip log error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvLogWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TripLogObserver;
pub use row::{EventRow, ProgressRow};
pub use writer::LogWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteLogWriter;
