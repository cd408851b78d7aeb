//! Window chords.
//!
//! A chord prefix (see [`KeyBindingRegistry::with_defaults`]) arms a
//! [`ChordMode`]. While armed, keys are read as window commands instead of
//! being delivered to the active control:
//!
//! | mode     | key                 | command                         |
//! |----------|---------------------|---------------------------------|
//! | `Move`   | arrows              | move by one cell (stays armed)  |
//! | `Resize` | arrows              | resize by one cell (stays armed)|
//! | `Window` | `h`                 | send window to bottom           |
//! | `Window` | `c`                 | close window                    |
//! | `Quit`   | `q` or `Ctrl+Q`     | quit                            |
//!
//! `Esc` or any other key disarms and is swallowed.
//!
//! [`KeyBindingRegistry::with_defaults`]: super::KeyBindingRegistry::with_defaults

use super::input::{Key, KeyEvent, Modifiers};

/// Which command family the next key selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordMode {
    Move,
    Resize,
    Window,
    Quit,
}

/// Window command produced by an armed chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordCommand {
    MoveBy { dx: i32, dy: i32 },
    ResizeBy { dw: i32, dh: i32 },
    MoveToBottom,
    Close,
    Quit,
}

/// Result of feeding a key to the chord state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordOutcome {
    /// Not armed; deliver the key normally.
    Pass,
    /// The key was consumed, possibly producing a command.
    Consumed(Option<ChordCommand>),
}

/// Armed/idle chord state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chord {
    armed: Option<ChordMode>,
}

fn arrow_delta(key: Key) -> Option<(i32, i32)> {
    match key {
        Key::Left => Some((-1, 0)),
        Key::Right => Some((1, 0)),
        Key::Up => Some((0, -1)),
        Key::Down => Some((0, 1)),
        _ => None,
    }
}

impl Chord {
    /// Idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `mode`, replacing any armed mode.
    pub fn arm(&mut self, mode: ChordMode) {
        self.armed = Some(mode);
    }

    /// Return to idle.
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    /// The currently armed mode.
    pub fn armed(&self) -> Option<ChordMode> {
        self.armed
    }

    /// Feed one key.
    pub fn feed(&mut self, key: &KeyEvent) -> ChordOutcome {
        let Some(mode) = self.armed else {
            return ChordOutcome::Pass;
        };
        let plain = key.modifiers.is_empty() || key.modifiers == Modifiers::SHIFT;
        let command = match (mode, key.code) {
            (ChordMode::Move, code) if plain => {
                arrow_delta(code).map(|(dx, dy)| ChordCommand::MoveBy { dx, dy })
            }
            (ChordMode::Resize, code) if plain => {
                arrow_delta(code).map(|(dw, dh)| ChordCommand::ResizeBy { dw, dh })
            }
            (ChordMode::Window, Key::Char('h' | 'H')) if plain => Some(ChordCommand::MoveToBottom),
            (ChordMode::Window, Key::Char('c' | 'C')) if plain => Some(ChordCommand::Close),
            (ChordMode::Quit, Key::Char('q' | 'Q')) => Some(ChordCommand::Quit),
            _ => None,
        };
        let repeats = matches!(
            command,
            Some(ChordCommand::MoveBy { .. } | ChordCommand::ResizeBy { .. })
        );
        if !repeats {
            self.armed = None;
        }
        ChordOutcome::Consumed(command)
    }
}
