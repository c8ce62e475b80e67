#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in ossim
//!
//! All observable output of the simulation core goes through events; the
//! core never logs or prints directly. The coordinator and resolver emit
//! fire-and-forget notifications over an unbounded channel and the CLI
//! decides how to render them.

pub mod events;
pub use events::SimEvent;

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for the simulator event sender
pub type EventSender = UnboundedSender<SimEvent>;

/// Type alias for the simulator event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<SimEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout the simulator
///
/// A single, consistent API whether the caller holds a raw `EventSender`
/// or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: SimEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if the receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
