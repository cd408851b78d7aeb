//! Pilot: programmatic interaction with a headless Composer.
//!
//! The `Pilot` owns a [`Composer`] and the receiving end of its event
//! channel. It turns simulated input into events and processes them the way
//! the main loop would, including anything posted back through the sender.

use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::error::TryRecvError;

use crate::composer::Composer;
use crate::event::{
    channel, Event, EventReceiver, EventSender, InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn,
    MouseEvent,
};
use crate::testing::snapshot::canvas_to_string;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless driver for testing.
///
/// # Examples
///
/// ```ignore
/// use cellwin::event::Key;
/// use cellwin::geometry::Region;
/// use cellwin::testing::Pilot;
///
/// let mut pilot = Pilot::new(80, 24);
/// pilot.composer_mut().add_window("Hello", Region::new(0, 0, 20, 5));
/// pilot.press_key(Key::Tab);
/// assert!(pilot.screen_text().contains("Hello"));
/// ```
pub struct Pilot {
    composer: Composer,
    rx: EventReceiver,
}

impl Pilot {
    /// Create a composer for a `width` x `height` screen.
    pub fn new(width: u16, height: u16) -> Self {
        let (tx, rx) = channel();
        Self {
            composer: Composer::new(width, height, tx),
            rx,
        }
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// A sender into the pilot's queue, for background threads.
    pub fn sender(&self) -> EventSender {
        self.composer.sender().clone()
    }

    /// Whether no `Quit` has been processed.
    pub fn is_running(&self) -> bool {
        !self.composer.should_quit()
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Feed raw input, then process whatever it posted.
    pub fn input(&mut self, input: InputEvent) {
        self.composer.process_event(Event::from(input));
        self.process();
    }

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.press_key_with(key, Modifiers::NONE);
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Simulate typing each character of `text` as individual key presses.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Simulate a left-button press at (x, y).
    pub fn click(&mut self, x: u16, y: u16) {
        self.mouse(MouseAction::Down(MouseBtn::Left), x, y);
    }

    /// Simulate a left-button drag from `from` to `to`, released at `to`.
    pub fn drag(&mut self, from: (u16, u16), to: (u16, u16)) {
        self.mouse(MouseAction::Down(MouseBtn::Left), from.0, from.1);
        self.mouse(MouseAction::Drag(MouseBtn::Left), to.0, to.1);
        self.mouse(MouseAction::Up(MouseBtn::Left), to.0, to.1);
    }

    fn mouse(&mut self, kind: MouseAction, x: u16, y: u16) {
        self.input(InputEvent::Mouse(MouseEvent::new(kind, x, y)));
    }

    /// Simulate a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.input(InputEvent::Resize { width, height });
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Post an event through the sender and process the queue.
    pub fn post(&mut self, event: Event) {
        self.composer.sender().post(event);
        self.process();
    }

    /// Process every event already queued. Returns how many were handled.
    pub fn process(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.composer.process_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return handled,
            }
        }
    }

    /// Wait up to `timeout` for one event from a background thread and
    /// process it, along with anything queued behind it.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.process() > 0 {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Repaint and return the screen as text.
    pub fn screen_text(&mut self) -> String {
        self.composer.repaint();
        canvas_to_string(self.composer.canvas())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
