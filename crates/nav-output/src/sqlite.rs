//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `trip_log.db` file in the configured output directory
//! with two tables: `progress` and `events`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::LogWriter;
use crate::{EventRow, OutputResult, ProgressRow};

/// Writes a trip log to an SQLite database.
pub struct SqliteLogWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteLogWriter {
    /// Open (or create) `trip_log.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("trip_log.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS progress (
                 time_ms               INTEGER NOT NULL,
                 lat                   REAL    NOT NULL,
                 lon                   REAL    NOT NULL,
                 distance_along_path_m REAL    NOT NULL,
                 distance_from_route_m REAL    NOT NULL,
                 destination           INTEGER NOT NULL,
                 distance_remaining_m  REAL    NOT NULL,
                 time_remaining_s      REAL    NOT NULL,
                 destination_status    TEXT    NOT NULL,
                 on_route              INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS events (
                 time_ms INTEGER NOT NULL,
                 kind    TEXT    NOT NULL,
                 stop    INTEGER,
                 detail  TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl LogWriter for SqliteLogWriter {
    fn write_progress(&mut self, row: &ProgressRow) -> OutputResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO progress \
             (time_ms, lat, lon, distance_along_path_m, distance_from_route_m, destination, \
              distance_remaining_m, time_remaining_s, destination_status, on_route) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        stmt.execute(rusqlite::params![
            row.time_ms as i64,
            row.lat,
            row.lon,
            row.distance_along_path_m,
            row.distance_from_route_m,
            row.destination,
            row.distance_remaining_m,
            row.time_remaining_s,
            row.destination_status,
            row.on_route as i64,
        ])?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (time_ms, kind, stop, detail) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.time_ms as i64, row.kind, row.stop, row.detail])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
