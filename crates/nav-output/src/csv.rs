//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `progress.csv`
//! - `events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::LogWriter;
use crate::{EventRow, OutputResult, ProgressRow};

/// Writes a trip log to two CSV files.
pub struct CsvLogWriter {
    progress: Writer<File>,
    events:   Writer<File>,
    finished: bool,
}

impl CsvLogWriter {
    /// Create `dir` if needed, open the two CSV files and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut progress = Writer::from_path(dir.join("progress.csv"))?;
        progress.write_record([
            "time_ms",
            "lat",
            "lon",
            "distance_along_path_m",
            "distance_from_route_m",
            "destination",
            "distance_remaining_m",
            "time_remaining_s",
            "destination_status",
            "on_route",
        ])?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["time_ms", "kind", "stop", "detail"])?;

        Ok(Self { progress, events, finished: false })
    }
}

impl LogWriter for CsvLogWriter {
    fn write_progress(&mut self, row: &ProgressRow) -> OutputResult<()> {
        self.progress.write_record(&[
            row.time_ms.to_string(),
            format!("{:.7}", row.lat),
            format!("{:.7}", row.lon),
            format!("{:.2}", row.distance_along_path_m),
            format!("{:.2}", row.distance_from_route_m),
            row.destination.to_string(),
            format!("{:.2}", row.distance_remaining_m),
            format!("{:.1}", row.time_remaining_s),
            row.destination_status.to_owned(),
            (row.on_route as u8).to_string(),
        ])?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.time_ms.to_string(),
                row.kind.to_owned(),
                row.stop.map(|s| s.to_string()).unwrap_or_default(),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.progress.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
