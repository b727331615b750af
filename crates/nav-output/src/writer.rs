//! The `LogWriter` trait implemented by all backend writers.

use crate::{EventRow, OutputResult, ProgressRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors surface through [`TripLogObserver::take_error`][crate::TripLogObserver::take_error]
/// when the writer is driven by the observer.
pub trait LogWriter {
    /// Write one tracking-cycle row.
    fn write_progress(&mut self, row: &ProgressRow) -> OutputResult<()>;

    /// Write a batch of event rows.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
