//! Crossterm terminal backend.
//!
//! [`CrosstermTerminal`] wraps a buffered stdout writer. Cell output is
//! queued with `queue!` and sent on [`Terminal::flush`]. Entering switches
//! to the alternate screen with raw mode and, optionally, mouse capture.

use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{self, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};

use super::{InputError, InputSource, Terminal};
use crate::canvas::Cell;
use crate::event::input::from_crossterm;
use crate::event::InputEvent;
use crate::theme::Color;

// ---------------------------------------------------------------------------
// CrosstermTerminal
// ---------------------------------------------------------------------------

/// Terminal backend using crossterm on stdout.
pub struct CrosstermTerminal {
    writer: BufWriter<Stdout>,
    mouse: bool,
    entered: bool,
}

impl CrosstermTerminal {
    /// Create a backend. Nothing is written until [`Terminal::enter`].
    pub fn new(mouse: bool) -> Self {
        Self {
            writer: BufWriter::new(io::stdout()),
            mouse,
            entered: false,
        }
    }

    fn queue_attrs(&mut self, cell: &Cell) -> io::Result<()> {
        queue!(
            self.writer,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_crossterm(cell.fg.color)),
            SetBackgroundColor(to_crossterm(cell.bg.color))
        )?;
        let bold = cell.fg.bold || cell.bg.bold;
        let underline = cell.fg.underline || cell.bg.underline;
        let reverse = cell.fg.reverse || cell.bg.reverse;
        if bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if underline {
            queue!(self.writer, SetAttribute(Attribute::Underlined))?;
        }
        if reverse {
            queue!(self.writer, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }
}

impl Terminal for CrosstermTerminal {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn set_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        queue!(self.writer, cursor::MoveTo(x, y))?;
        self.queue_attrs(cell)?;
        queue!(self.writer, Print(cell.ch))
    }

    fn flush(&mut self) -> io::Result<()> {
        queue!(self.writer, style::ResetColor)?;
        self.writer.flush()
    }

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        terminal::enable_raw_mode()?;
        execute!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        if self.mouse {
            execute!(self.writer, EnableMouseCapture)?;
        }
        self.entered = true;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        if self.mouse {
            execute!(self.writer, DisableMouseCapture)?;
        }
        execute!(
            self.writer,
            SetAttribute(Attribute::Reset),
            cursor::Show,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn input(&mut self) -> Box<dyn InputSource> {
        Box::new(CrosstermInput)
    }

    fn set_title(&mut self, title: &str) -> io::Result<()> {
        execute!(self.writer, SetTitle(title))
    }
}

// ---------------------------------------------------------------------------
// CrosstermInput
// ---------------------------------------------------------------------------

/// Reader over `crossterm::event::poll` and `read`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn read(&mut self, timeout: Duration) -> Result<Option<InputEvent>, InputError> {
        if !crossterm::event::poll(timeout)? {
            return Ok(None);
        }
        // Events with no toolkit meaning (focus, paste) read as nothing.
        Ok(from_crossterm(crossterm::event::read()?))
    }
}

// ---------------------------------------------------------------------------
// Color mapping
// ---------------------------------------------------------------------------

/// Map a toolkit color to the crossterm color of the same meaning.
pub(crate) fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Default => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
        Color::Indexed(i) => style::Color::AnsiValue(i),
        Color::Rgb { r, g, b } => style::Color::Rgb { r, g, b },
    }
}

// ===========================================================================
// Tests
// ===========================================================================
