//! # cellwin
//!
//! A windowed text-console UI toolkit: overlapping windows of controls drawn
//! onto a character-cell terminal, with keyboard and mouse routing.
//!
//! All control, window and canvas state lives on one thread. Other threads
//! talk to it only by posting events through an [`EventSender`]; the main
//! loop serializes those with terminal input into a single ordered stream.
//!
//! ## Core Systems
//!
//! - **[`control`]** — Slotmap-backed control tree with pack layout
//! - **[`event`]** — Input events, the event union, injection, key bindings, chords
//! - **[`focus`]** — Hit-testing, TAB order, activation and dispatch
//! - **[`window`]** — Window bookkeeping, title buttons, drag geometry
//! - **[`composer`]** — The window stack and window-level input handling
//! - **[`app`]** — Terminal lifecycle and the main loop
//! - **[`canvas`]** — Cell buffer with clip and color stacks, color-tag markup
//! - **[`theme`]** — Colors, theme files and fallback resolution
//! - **[`terminal`]** — Terminal backend trait and the crossterm backend
//! - **[`widgets`]** — Panel, Label, Button
//! - **[`testing`]** — Pilot, in-memory terminal, snapshot helpers
//! - **[`geometry`]** — Offset, Size, Region, Padding primitives

// Foundation
pub mod error;
pub mod geometry;
pub mod logging;

// Drawing
pub mod canvas;
pub mod terminal;
pub mod theme;

// Controls and events
pub mod control;
pub mod event;
pub mod focus;
pub mod widgets;

// Windows and the main loop
pub mod app;
pub mod composer;
pub mod window;

// Headless test support
pub mod testing;

pub use app::{App, AppConfig};
pub use composer::Composer;
pub use control::{ControlId, ControlState, ControlTree, EventCtx, Widget};
pub use error::{Error, Result, TreeError};
pub use event::{Event, EventSender};
pub use geometry::{Offset, Padding, Pack, Region, Size};
