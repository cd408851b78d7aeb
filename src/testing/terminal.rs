//! In-memory terminal with scripted input.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::canvas::Cell;
use crate::event::InputEvent;
use crate::terminal::{InputError, InputSource, Terminal};

type Scripted = Result<InputEvent, InputError>;

#[derive(Debug)]
struct Screen {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    flushes: usize,
    entered: bool,
}

/// A [`Terminal`] that draws into a cell grid and reads input pushed by the
/// test.
///
/// Clones share the same screen and input queue, so a test can keep one
/// clone for inspection after handing the other to an
/// [`App`](crate::app::App). Once [`close_input`](Self::close_input) is
/// called and the queue drains, reads fail with a fatal error.
#[derive(Debug, Clone)]
pub struct TestTerminal {
    screen: Arc<Mutex<Screen>>,
    input_tx: Arc<Mutex<Option<Sender<Scripted>>>>,
    input_rx: Arc<Mutex<Option<Receiver<Scripted>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TestTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            screen: Arc::new(Mutex::new(Screen {
                width,
                height,
                cells: vec![Cell::blank(); usize::from(width) * usize::from(height)],
                flushes: 0,
                entered: false,
            })),
            input_tx: Arc::new(Mutex::new(Some(tx))),
            input_rx: Arc::new(Mutex::new(Some(rx))),
        }
    }

    // ── Scripted input ───────────────────────────────────────────────

    /// Queue an input event.
    pub fn push_input(&self, event: InputEvent) {
        self.push(Ok(event));
    }

    /// Queue an input error.
    pub fn push_error(&self, error: InputError) {
        self.push(Err(error));
    }

    fn push(&self, item: Scripted) {
        if let Some(tx) = lock(&self.input_tx).as_ref() {
            let _ = tx.send(item);
        }
    }

    /// End the input stream.
    pub fn close_input(&self) {
        lock(&self.input_tx).take();
    }

    /// Change the reported size. The grid is cleared.
    pub fn set_size(&self, width: u16, height: u16) {
        let mut screen = lock(&self.screen);
        screen.width = width;
        screen.height = height;
        screen.cells = vec![Cell::blank(); usize::from(width) * usize::from(height)];
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// The cell last written at (x, y).
    pub fn cell(&self, x: u16, y: u16) -> Option<Cell> {
        let screen = lock(&self.screen);
        if x >= screen.width || y >= screen.height {
            return None;
        }
        screen
            .cells
            .get(usize::from(y) * usize::from(screen.width) + usize::from(x))
            .copied()
    }

    /// Screen contents as text, trimmed like
    /// [`canvas_to_string`](super::canvas_to_string).
    pub fn screen_text(&self) -> String {
        let screen = lock(&self.screen);
        let width = usize::from(screen.width).max(1);
        let rows = screen
            .cells
            .chunks(width)
            .map(|row| row.iter().map(|c| c.ch).collect::<String>().trim_end().to_owned())
            .collect();
        super::snapshot::join_rows(rows)
    }

    /// Number of completed flushes.
    pub fn flushes(&self) -> usize {
        lock(&self.screen).flushes
    }

    /// Whether the terminal is currently taken over.
    pub fn is_entered(&self) -> bool {
        lock(&self.screen).entered
    }
}

impl Terminal for TestTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        let screen = lock(&self.screen);
        Ok((screen.width, screen.height))
    }

    fn set_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        let mut screen = lock(&self.screen);
        if x < screen.width && y < screen.height {
            let idx = usize::from(y) * usize::from(screen.width) + usize::from(x);
            screen.cells[idx] = *cell;
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        lock(&self.screen).flushes += 1;
        Ok(())
    }

    fn enter(&mut self) -> io::Result<()> {
        lock(&self.screen).entered = true;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        lock(&self.screen).entered = false;
        Ok(())
    }

    fn input(&mut self) -> Box<dyn InputSource> {
        Box::new(ScriptedInput {
            rx: lock(&self.input_rx).take(),
        })
    }
}

/// Reads what the test pushed. `None` once the receiver was handed out.
struct ScriptedInput {
    rx: Option<Receiver<Scripted>>,
}

impl InputSource for ScriptedInput {
    fn read(&mut self, timeout: Duration) -> Result<Option<InputEvent>, InputError> {
        let rx = self
            .rx
            .as_ref()
            .ok_or_else(|| InputError::Fatal("input already taken".into()))?;
        match rx.recv_timeout(timeout) {
            Ok(item) => item.map(Some),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(InputError::Fatal("input closed".into())),
        }
    }
}
