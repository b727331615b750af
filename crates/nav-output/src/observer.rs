//! `TripLogObserver<W>` — bridges `TripObserver` to a `LogWriter`.

use nav_core::FixTime;
use nav_session::{NavEvent, TripObserver, TripState};
use nav_tracking::TrackingStatus;

use crate::row::{EventRow, ProgressRow};
use crate::writer::LogWriter;
use crate::{OutputError, OutputResult};

/// A [`TripObserver`] that records every tracking cycle and event to any
/// [`LogWriter`] backend.
///
/// Errors from the writer are stored internally because `TripObserver`
/// methods have no return value.  After `trip.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct TripLogObserver<W: LogWriter> {
    writer:     W,
    /// Time of the latest fix; stamps events that carry no time.
    last_time:  FixTime,
    last_error: Option<OutputError>,
}

impl<W: LogWriter> TripLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_time: FixTime::ZERO, last_error: None }
    }

    /// Take the stored write error (if any) after `trip.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: LogWriter> TripObserver for TripLogObserver<W> {
    fn on_progress(&mut self, status: &TrackingStatus) {
        self.last_time = status.fix_time;
        let result = self.writer.write_progress(&ProgressRow::from_status(status));
        self.store_err(result);
    }

    fn on_event(&mut self, event: &NavEvent) {
        let row = EventRow::from_event(event, self.last_time);
        let result = self.writer.write_events(std::slice::from_ref(&row));
        self.store_err(result);
    }

    fn on_trip_end(&mut self, state: TripState) {
        let result = self.writer.write_events(&[EventRow::trip_end(state, self.last_time)]);
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
