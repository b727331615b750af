//! Presentation-sink interface.

use nav_tracking::TrackingStatus;
use tokio::sync::mpsc;

use crate::{NavEvent, TripState};

/// Callbacks invoked by [`Trip::run`][crate::Trip::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: speaking instructions
///
/// ```rust,ignore
/// struct Speaker;
///
/// impl TripObserver for Speaker {
///     fn on_event(&mut self, event: &NavEvent) {
///         if let NavEvent::ManeuverAnnounced { instruction, .. } = event {
///             tts::speak(instruction);
///         }
///     }
/// }
/// ```
pub trait TripObserver {
    /// Called once per processed fix with the traversed/remaining split.
    fn on_progress(&mut self, _status: &TrackingStatus) {}

    /// Called for every discrete event, in the order they occurred.
    fn on_event(&mut self, _event: &NavEvent) {}

    /// Called once when `run` returns normally.
    fn on_trip_end(&mut self, _state: TripState) {}
}

/// A [`TripObserver`] that does nothing.
pub struct NoopObserver;

impl TripObserver for NoopObserver {}

/// Everything a [`ChannelObserver`] forwards.
#[derive(Clone, Debug)]
pub enum TripMessage {
    Progress(Box<TrackingStatus>),
    Event(NavEvent),
    End(TripState),
}

/// Forwards callbacks into an unbounded channel so a UI task can consume
/// them without sharing the trip.
///
/// Messages sent after the receiver is dropped are discarded.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<TripMessage>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TripMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl TripObserver for ChannelObserver {
    fn on_progress(&mut self, status: &TrackingStatus) {
        let _ = self.tx.send(TripMessage::Progress(Box::new(status.clone())));
    }

    fn on_event(&mut self, event: &NavEvent) {
        let _ = self.tx.send(TripMessage::Event(event.clone()));
    }

    fn on_trip_end(&mut self, state: TripState) {
        let _ = self.tx.send(TripMessage::End(state));
    }
}
