//! Cell: one character with foreground and background attributes.

use crate::theme::{Attr, Color};

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Attr,
    pub bg: Attr,
}

impl Cell {
    /// Create a new cell.
    pub const fn new(ch: char, fg: Attr, bg: Attr) -> Self {
        Self { ch, fg, bg }
    }

    /// A blank (space) cell with default colors.
    pub const fn blank() -> Self {
        Self {
            ch: ' ',
            fg: Attr::new(Color::Default),
            bg: Attr::new(Color::Default),
        }
    }

    /// A blank (space) cell with the given colors.
    pub const fn blank_styled(fg: Attr, bg: Attr) -> Self {
        Self { ch: ' ', fg, bg }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_space_with_default_colors() {
        let cell = Cell::default();
        assert_eq!(cell.ch, ' ');
        assert_eq!(cell.fg.color, Color::Default);
        assert_eq!(cell.bg.color, Color::Default);
    }
}
