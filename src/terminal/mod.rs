//! Terminal abstraction.
//!
//! The toolkit talks to the screen through the [`Terminal`] trait and reads
//! input through an [`InputSource`] obtained from it. [`CrosstermTerminal`]
//! is the real backend; [`crate::testing::TestTerminal`] is an in-memory one.

mod backend;

use std::io;
use std::time::Duration;

pub use backend::{CrosstermInput, CrosstermTerminal};

use crate::canvas::Cell;
use crate::event::InputEvent;

// ---------------------------------------------------------------------------
// InputError
// ---------------------------------------------------------------------------

/// Failure while reading input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The read failed but the stream is still usable; the main loop logs and drops it.
    #[error("transient input error: {0}")]
    Transient(String),
    /// The stream is gone; the main loop stops and reports it.
    #[error("fatal input error: {0}")]
    Fatal(String),
}

impl From<io::Error> for InputError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
                InputError::Transient(err.to_string())
            }
            _ => InputError::Fatal(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A blocking source of terminal input, read from a dedicated thread.
///
/// Reads wait at most `timeout` so the reader can notice it was asked to
/// stop; `Ok(None)` means nothing arrived in time.
pub trait InputSource: Send + 'static {
    /// Wait up to `timeout` for the next input event.
    fn read(&mut self, timeout: Duration) -> Result<Option<InputEvent>, InputError>;
}

/// Output side of a terminal.
pub trait Terminal {
    /// Current size as (columns, rows).
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Queue one cell for output.
    fn set_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()>;

    /// Send queued output.
    fn flush(&mut self) -> io::Result<()>;

    /// Take over the terminal (raw mode, alternate screen).
    fn enter(&mut self) -> io::Result<()>;

    /// Restore the terminal. Must be safe to call more than once.
    fn leave(&mut self) -> io::Result<()>;

    /// The input stream paired with this terminal.
    fn input(&mut self) -> Box<dyn InputSource>;

    /// Set the terminal window title, where supported.
    fn set_title(&mut self, title: &str) -> io::Result<()> {
        let _ = title;
        Ok(())
    }
}
