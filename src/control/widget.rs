//! Widget trait: the per-kind behavior behind a control.
//!
//! A control is a [`ControlState`] plus a boxed [`Widget`]. The state is
//! common to every control; the widget decides how the control looks and how
//! it reacts to events. Widgets never hold references into the tree. They
//! receive their own state for the duration of a call and may post further
//! events through the [`EventCtx`] sender.

use std::any::Any;

use super::state::ControlState;
use super::tree::ControlId;
use crate::canvas::Canvas;
use crate::event::{Event, EventSender};
use crate::theme::{ColorFamily, ThemeManager};

// ---------------------------------------------------------------------------
// EventCtx
// ---------------------------------------------------------------------------

/// What a widget can touch while handling an event.
pub struct EventCtx<'a> {
    /// The control receiving the event.
    pub id: ControlId,
    /// Its state.
    pub state: &'a mut ControlState,
    /// Posts events back onto the main loop.
    pub sender: &'a EventSender,
}

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Behavior of one kind of control.
///
/// Object-safe; stored as `Box<dyn Widget>` in the tree.
pub trait Widget: Any {
    /// Kind name used in logs (`"Button"`, `"Label"`).
    fn widget_type(&self) -> &'static str;

    /// Theme color ids this widget draws with.
    fn color_family(&self) -> ColorFamily {
        ColorFamily::CONTROL
    }

    /// Paint within `state.region()`. The canvas clip is already set to it.
    fn draw(&self, state: &ControlState, canvas: &mut Canvas, theme: &ThemeManager);

    /// React to an event. Return `true` if handled; unhandled events are
    /// offered to the nearest clip-boundary ancestor.
    ///
    /// A window root answers [`Event::Close`] with whether the window may
    /// close; returning `false` keeps it open. The default accepts.
    fn process_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> bool {
        let _ = ctx;
        matches!(event, Event::Close)
    }

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Fill the control's region with its background. Most widgets start here.
pub fn fill_background(state: &ControlState, family: &ColorFamily, canvas: &mut Canvas, theme: &ThemeManager) {
    let (fg, bg) = state.resolve_colors(family, theme);
    let mut styled = canvas.styled(fg, bg);
    styled.fill_rect(state.region(), ' ');
}
