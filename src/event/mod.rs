//! Event system: raw input, the event union, injection, bindings, chords.

pub mod binding;
pub mod chord;
pub mod event;
pub mod input;
pub mod queue;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use chord::{Chord, ChordCommand, ChordMode, ChordOutcome};
pub use event::Event;
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
pub use queue::{channel, EventReceiver, EventSender};
