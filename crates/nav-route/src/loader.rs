//! CSV stop loader.
//!
//! # CSV format
//!
//! One row per stop.  Rows may appear in any order; `sequence` values must
//! form `0..n` once sorted.
//!
//! ```csv
//! sequence,lat,lon,name
//! 0,33.979253,-81.257815,Depot
//! 1,33.978554,-81.252928,
//! 2,33.978477,-81.244195,Warehouse
//! ```
//!
//! The `name` column is optional and may be left empty.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nav_core::{GeoPoint, NavError, StopIndex};

use crate::{RouteError, RouteResult, Stop};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StopRecord {
    sequence: u32,
    lat:      f64,
    lon:      f64,
    #[serde(default)]
    name:     Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a trip's stops from a CSV file, sorted by sequence.
pub fn load_stops_csv(path: &Path) -> RouteResult<Vec<Stop>> {
    let file = std::fs::File::open(path).map_err(NavError::Io)?;
    load_stops_reader(file)
}

/// Like [`load_stops_csv`] but accepts any `Read` source.
pub fn load_stops_reader<R: Read>(reader: R) -> RouteResult<Vec<Stop>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stops = Vec::new();

    for result in csv_reader.deserialize::<StopRecord>() {
        let row = result?;
        let coordinate = GeoPoint::new(row.lat, row.lon);
        if !coordinate.is_valid() {
            return Err(RouteError::InvalidCoordinate(coordinate));
        }
        stops.push(Stop {
            sequence: StopIndex(row.sequence),
            coordinate,
            name: row.name.filter(|n| !n.trim().is_empty()),
        });
    }

    if stops.is_empty() {
        return Err(RouteError::NoStops);
    }

    stops.sort_by_key(|s| s.sequence);
    for (expected, stop) in stops.iter().enumerate() {
        if stop.sequence.index() != expected {
            return Err(RouteError::StopList(format!(
                "expected sequence {expected}, found {}: sequences must be 0..n without gaps or duplicates",
                stop.sequence.0
            )));
        }
    }

    Ok(stops)
}
