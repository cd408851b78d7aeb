//! Cross-thread event injection.
//!
//! [`EventSender`] is the only handle background threads get. Posting never
//! blocks; the main loop drains the channel between terminal reads, so
//! events from one thread are handled in the order that thread posted them.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::event::Event;
use crate::control::ControlId;

/// Cloneable, `Send` handle for posting events to the main loop.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: UnboundedSender<Event>,
}

/// Receiving half, owned by the main loop.
pub type EventReceiver = UnboundedReceiver<Event>;

/// Create a connected sender/receiver pair.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

impl EventSender {
    /// Post an event. Returns `false` if the main loop has already exited.
    pub fn post(&self, event: Event) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(event = err.0.name(), "event posted after loop exit");
                false
            }
        }
    }

    /// Ask the main loop to stop.
    pub fn quit(&self) -> bool {
        self.post(Event::Quit)
    }

    /// Ask for a full repaint.
    pub fn redraw(&self) -> bool {
        self.post(Event::Redraw)
    }

    /// Post an application message addressed to `target`.
    pub fn message(&self, target: ControlId, message: impl Into<String>) -> bool {
        self.post(Event::Message {
            target: Some(target),
            message: message.into(),
        })
    }

    /// Post a state-change notification for `target`.
    pub fn changed(&self, target: ControlId, message: impl Into<String>) -> bool {
        self.post(Event::Changed {
            target,
            message: message.into(),
        })
    }
}
