//! Headless testing support: Pilot, TestTerminal, snapshot helpers.
//!
//! Use the [`Pilot`] to drive a [`Composer`](crate::composer::Composer)
//! without a terminal, [`TestTerminal`] to run the real main loop against an
//! in-memory screen, and [`canvas_to_string`] to capture drawn output as
//! plain text.

pub mod pilot;
pub mod snapshot;
mod terminal;

use std::any::Any;

pub use pilot::Pilot;
pub use snapshot::canvas_to_string;
pub use terminal::TestTerminal;

use crate::canvas::Canvas;
use crate::control::{fill_background, ControlState, EventCtx, Widget};
use crate::event::Event;
use crate::theme::{ColorFamily, ThemeManager};

/// A widget that remembers every event it receives.
///
/// `handle` decides what `process_event` returns, so tests can check both
/// the handled and the bubbling paths. `Close` is answered by `keep_open`
/// instead: a recorder window closes unless that is set.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub handle: bool,
    pub keep_open: bool,
}

impl Recorder {
    /// A recorder that reports every event as handled.
    pub fn handling() -> Self {
        Self {
            handle: true,
            ..Self::default()
        }
    }

    /// A recorder that refuses `Close`.
    pub fn keeping_open() -> Self {
        Self {
            keep_open: true,
            ..Self::default()
        }
    }
}

impl Widget for Recorder {
    fn widget_type(&self) -> &'static str {
        "Recorder"
    }

    fn draw(&self, state: &ControlState, canvas: &mut Canvas, theme: &ThemeManager) {
        fill_background(state, &ColorFamily::CONTROL, canvas, theme);
    }

    fn process_event(&mut self, _ctx: &mut EventCtx<'_>, event: &Event) -> bool {
        self.events.push(event.clone());
        match event {
            Event::Close => !self.keep_open,
            _ => self.handle,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
