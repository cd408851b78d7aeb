//! The toolkit's single event union.
//!
//! Terminal input, window notifications and application messages all travel
//! as an [`Event`]. Events posted from other threads go through
//! [`EventSender`](super::EventSender) and are handled on the main loop in
//! the order they were posted.

use super::input::{InputEvent, KeyEvent, MouseEvent};
use crate::control::ControlId;

/// Anything a control or window can be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press, delivered to the active control of the active window.
    Key(KeyEvent),
    /// A mouse action at screen coordinates.
    Mouse(MouseEvent),
    /// Text pasted into the terminal.
    Paste(String),
    /// The terminal changed size.
    Resize { width: u16, height: u16 },
    /// The receiver gained (`true`) or lost (`false`) activation.
    Activate(bool),
    /// The receiver's geometry was recomputed.
    Layout,
    /// A window was asked to close.
    Close,
    /// Stop the main loop.
    Quit,
    /// Repaint everything.
    Redraw,
    /// A window moved to (x, y).
    Moved { x: i32, y: i32 },
    /// A window changed size.
    Resized { width: i32, height: i32 },
    /// A control changed state (a button was pressed, text was edited).
    Changed { target: ControlId, message: String },
    /// An application message, optionally addressed to one control.
    Message { target: Option<ControlId>, message: String },
    /// A background task failed; logged by the main loop.
    Error(String),
}

impl Event {
    /// Whether this is a left-button press.
    pub fn is_primary_click(&self) -> bool {
        matches!(self, Event::Mouse(me) if me.is_primary_press())
    }

    /// The control this event is addressed to, if any.
    pub fn target(&self) -> Option<ControlId> {
        match self {
            Event::Changed { target, .. } => Some(*target),
            Event::Message { target, .. } => *target,
            _ => None,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Key(_) => "key",
            Event::Mouse(_) => "mouse",
            Event::Paste(_) => "paste",
            Event::Resize { .. } => "resize",
            Event::Activate(_) => "activate",
            Event::Layout => "layout",
            Event::Close => "close",
            Event::Quit => "quit",
            Event::Redraw => "redraw",
            Event::Moved { .. } => "moved",
            Event::Resized { .. } => "resized",
            Event::Changed { .. } => "changed",
            Event::Message { .. } => "message",
            Event::Error(_) => "error",
        }
    }
}

impl From<InputEvent> for Event {
    fn from(input: InputEvent) -> Self {
        match input {
            InputEvent::Key(ke) => Event::Key(ke),
            InputEvent::Mouse(me) => Event::Mouse(me),
            InputEvent::Paste(text) => Event::Paste(text),
            InputEvent::Resize { width, height } => Event::Resize { width, height },
        }
    }
}
