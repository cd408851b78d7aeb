//! Button widget: an activatable push button.
//!
//! Pressing a button (primary click, `Enter` or `Space`) draws it pressed
//! and starts a short timer on a background thread. When the timer posts
//! its release event back through the main loop, the button pops up again
//! and runs its click handler. The handler therefore always runs on the
//! main loop, never on the timer thread.

use std::any::Any;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::canvas::{markup, Canvas};
use crate::control::{ControlState, EventCtx, Widget};
use crate::event::{Event, Key};
use crate::theme::{ColorFamily, ColorId, ThemeManager};

/// How long a button stays pressed by default.
pub const PRESS_DELAY: Duration = Duration::from_millis(100);

/// Message carried by the release event a pressed button posts to itself.
pub const RELEASE_MESSAGE: &str = "button:release";

type ClickHandler = Box<dyn FnMut(&mut EventCtx<'_>)>;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A push button with a centered title.
///
/// Give its state `with_tab_stop(true)` so it can be reached with TAB and
/// activated by a click.
///
/// # Examples
///
/// ```ignore
/// let ok = tree.create(
///     window,
///     ControlState::new("OK").with_min(8, 1).with_tab_stop(true),
///     Button::new().on_click(|ctx| { ctx.sender.quit(); }),
/// );
/// ```
pub struct Button {
    pressed: bool,
    delay: Duration,
    on_click: Option<ClickHandler>,
}

impl Button {
    pub fn new() -> Self {
        Self {
            pressed: false,
            delay: PRESS_DELAY,
            on_click: None,
        }
    }

    /// Set the click handler (builder pattern).
    pub fn on_click(mut self, handler: impl FnMut(&mut EventCtx<'_>) + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Set how long the button stays pressed (builder pattern).
    pub fn press_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Whether the button is currently drawn pressed.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    fn press(&mut self, ctx: &mut EventCtx<'_>) {
        self.pressed = true;
        let (id, sender, delay) = (ctx.id, ctx.sender.clone(), self.delay);
        debug!(?id, "button pressed");
        thread::spawn(move || {
            thread::sleep(delay);
            sender.changed(id, RELEASE_MESSAGE);
        });
    }

    fn release(&mut self, ctx: &mut EventCtx<'_>) {
        self.pressed = false;
        if let Some(handler) = self.on_click.as_mut() {
            handler(ctx);
        }
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Button {
    fn widget_type(&self) -> &'static str {
        "Button"
    }

    fn color_family(&self) -> ColorFamily {
        ColorFamily::BUTTON
    }

    fn draw(&self, state: &ControlState, canvas: &mut Canvas, theme: &ThemeManager) {
        let (fg, bg) = if self.pressed && state.is_enabled() {
            (
                theme.color(ColorId::ButtonPressedText),
                theme.color(ColorId::ButtonPressedBack),
            )
        } else {
            state.resolve_colors(&ColorFamily::BUTTON, theme)
        };
        let mut canvas = canvas.styled(fg, bg);
        canvas.fill_rect(state.region(), ' ');

        let content = state.content_region();
        let len = i32::try_from(markup::visible_len(&state.title)).unwrap_or(i32::MAX);
        let x = content.x + ((content.width - len) / 2).max(0);
        let y = content.y + content.height / 2;
        canvas.put_markup(x, y, &state.title, content.width);
    }

    fn process_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> bool {
        match event {
            Event::Changed { target, message } if *target == ctx.id && message == RELEASE_MESSAGE => {
                if self.pressed {
                    self.release(ctx);
                }
                true
            }
            Event::Close => true,
            _ if !ctx.state.is_enabled() => false,
            Event::Key(key) if key.modifiers.is_empty() && matches!(key.code, Key::Enter | Key::Char(' ')) => {
                if !self.pressed {
                    self.press(ctx);
                }
                true
            }
            ev if ev.is_primary_click() => {
                if !self.pressed {
                    self.press(ctx);
                }
                true
            }
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::Composer;
    use crate::control::ControlId;
    use crate::event::{channel, EventReceiver, KeyEvent, MouseAction, MouseBtn, MouseEvent};
    use crate::geometry::Region;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup(clicks: Rc<Cell<u32>>) -> (Composer, EventReceiver, ControlId) {
        let (tx, rx) = channel();
        let mut composer = Composer::new(40, 10, tx);
        let window = composer.add_window("buttons", Region::new(0, 0, 20, 5));
        let button = composer.tree_mut().create(
            window,
            ControlState::new("OK").with_min(6, 1).with_tab_stop(true),
            Button::new()
                .press_delay(Duration::ZERO)
                .on_click(move |_| clicks.set(clicks.get() + 1)),
        );
        (composer, rx, button)
    }

    fn pressed(c: &Composer, id: ControlId) -> bool {
        c.tree().widget::<Button>(id).unwrap().is_pressed()
    }

    #[test]
    fn widget_type_is_button() {
        assert_eq!(Button::new().widget_type(), "Button");
        assert_eq!(Button::new().color_family(), ColorFamily::BUTTON);
    }

    #[test]
    fn enter_presses_then_release_clicks() {
        let clicks = Rc::new(Cell::new(0));
        let (mut c, mut rx, button) = setup(Rc::clone(&clicks));
        c.process_event(Event::Key(KeyEvent::plain(Key::Tab)));
        c.process_event(Event::Key(KeyEvent::plain(Key::Enter)));
        assert!(pressed(&c, button));
        assert_eq!(clicks.get(), 0);

        let release = rx.blocking_recv().unwrap();
        assert_eq!(
            release,
            Event::Changed { target: button, message: RELEASE_MESSAGE.into() }
        );
        c.process_event(release);
        assert!(!pressed(&c, button));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn click_activates_and_presses() {
        let clicks = Rc::new(Cell::new(0));
        let (mut c, mut rx, button) = setup(Rc::clone(&clicks));
        let region = c.tree().state(button).unwrap().region();
        let click = MouseEvent::new(
            MouseAction::Down(MouseBtn::Left),
            region.x as u16,
            region.y as u16,
        );
        c.process_event(Event::Mouse(click));
        assert_eq!(c.active_control(), Some(button));
        assert!(pressed(&c, button));
        c.process_event(rx.blocking_recv().unwrap());
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn disabled_button_ignores_keys() {
        let clicks = Rc::new(Cell::new(0));
        let (mut c, mut rx, button) = setup(Rc::clone(&clicks));
        c.process_event(Event::Key(KeyEvent::plain(Key::Tab)));
        c.tree_mut().set_enabled(button, false);
        c.process_event(Event::Key(KeyEvent::plain(Key::Char(' '))));
        assert!(!pressed(&c, button));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn draws_centered_title() {
        use crate::testing::snapshot::canvas_to_string;
        let clicks = Rc::new(Cell::new(0));
        let (mut c, _rx, _button) = setup(clicks);
        c.repaint();
        let text = canvas_to_string(c.canvas());
        let row = text.lines().nth(2).unwrap();
        assert!(row.contains("OK"), "row was {row:?}");
    }
}
