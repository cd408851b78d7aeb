//! Canvas: the cell buffer every control draws into.
//!
//! The canvas keeps two stacks that must stay balanced across a draw call:
//! the clip stack (drawing outside the current clip region is suppressed)
//! and the attribute stack (current foreground/background). Use the scoped
//! [`ClipGuard`] / [`AttrGuard`] returned by [`Canvas::clipped`] and
//! [`Canvas::styled`] so early returns still pop what they pushed.
//!
//! [`Canvas::present`] writes the frame to a [`Terminal`], sending only cells
//! that changed since the previous frame.

pub mod cell;
pub mod markup;

use std::io;
use std::ops::{Deref, DerefMut};

pub use cell::Cell;
pub use markup::{strip_tags, visible_len, Segment};

use crate::geometry::Region;
use crate::terminal::Terminal;
use crate::theme::Attr;

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A 2D cell buffer with clip and attribute stacks.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: i32,
    height: i32,
    /// Frame being drawn. `back[y * width + x]`.
    back: Vec<Cell>,
    /// Frame last sent to the terminal.
    front: Vec<Cell>,
    /// Forces every cell out on the next `present`.
    full_redraw: bool,
    clips: Vec<Region>,
    attrs: Vec<(Attr, Attr)>,
    fg: Attr,
    bg: Attr,
}

impl Canvas {
    /// Create a blank canvas of the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let (width, height) = (i32::from(width), i32::from(height));
        let len = (width * height) as usize;
        Self {
            width,
            height,
            back: vec![Cell::blank(); len],
            front: vec![Cell::blank(); len],
            full_redraw: true,
            clips: Vec::new(),
            attrs: Vec::new(),
            fg: Attr::default(),
            bg: Attr::default(),
        }
    }

    /// Resize the buffer. Contents are cleared and the next present is a full write.
    pub fn resize(&mut self, width: u16, height: u16) {
        let (clips, attrs, fg, bg) = (
            std::mem::take(&mut self.clips),
            std::mem::take(&mut self.attrs),
            self.fg,
            self.bg,
        );
        *self = Canvas::new(width, height);
        self.clips = clips;
        self.attrs = attrs;
        self.fg = fg;
        self.bg = bg;
    }

    /// Canvas width in cells.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Canvas height in cells.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The whole canvas as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width, self.height)
    }

    /// Fill the whole canvas with blanks in the current colors. Ignores the clip.
    pub fn clear(&mut self) {
        let blank = Cell::blank_styled(self.fg, self.bg);
        self.back.fill(blank);
    }

    /// The cell at (x, y), if inside the canvas.
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.back[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some((y * self.width + x) as usize)
        }
    }

    // ── Clip stack ───────────────────────────────────────────────────

    /// The current clip region.
    pub fn clip(&self) -> Region {
        self.clips.last().copied().unwrap_or_else(|| self.bounds())
    }

    /// Push a clip region. The effective clip is its intersection with the current one.
    pub fn push_clip(&mut self, region: Region) {
        let next = self.clip().intersection(region);
        self.clips.push(next);
    }

    /// Pop the most recent clip region.
    pub fn pop_clip(&mut self) {
        let popped = self.clips.pop();
        debug_assert!(popped.is_some(), "pop_clip without matching push_clip");
    }

    /// Number of clip regions currently pushed.
    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    /// Push a clip region for the lifetime of the returned guard.
    pub fn clipped(&mut self, region: Region) -> ClipGuard<'_> {
        self.push_clip(region);
        ClipGuard { canvas: self }
    }

    // ── Attribute stack ──────────────────────────────────────────────

    /// Current foreground attribute.
    pub fn fg(&self) -> Attr {
        self.fg
    }

    /// Current background attribute.
    pub fn bg(&self) -> Attr {
        self.bg
    }

    /// Replace the current foreground without pushing.
    pub fn set_fg(&mut self, fg: Attr) {
        self.fg = fg;
    }

    /// Replace the current background without pushing.
    pub fn set_bg(&mut self, bg: Attr) {
        self.bg = bg;
    }

    /// Save the current colors and switch to `fg`/`bg`.
    pub fn push_attr(&mut self, fg: Attr, bg: Attr) {
        self.attrs.push((self.fg, self.bg));
        self.fg = fg;
        self.bg = bg;
    }

    /// Restore the colors saved by the matching `push_attr`.
    pub fn pop_attr(&mut self) {
        match self.attrs.pop() {
            Some((fg, bg)) => {
                self.fg = fg;
                self.bg = bg;
            }
            None => debug_assert!(false, "pop_attr without matching push_attr"),
        }
    }

    /// Number of attribute frames currently pushed.
    pub fn attr_depth(&self) -> usize {
        self.attrs.len()
    }

    /// Switch colors for the lifetime of the returned guard.
    pub fn styled(&mut self, fg: Attr, bg: Attr) -> AttrGuard<'_> {
        self.push_attr(fg, bg);
        AttrGuard { canvas: self }
    }

    // ── Drawing ──────────────────────────────────────────────────────

    /// Put one character in the current colors. Returns `false` if clipped.
    pub fn put_char(&mut self, x: i32, y: i32, ch: char) -> bool {
        if !self.clip().contains(x, y) {
            return false;
        }
        match self.index(x, y) {
            Some(i) => {
                self.back[i] = Cell::new(ch, self.fg, self.bg);
                true
            }
            None => false,
        }
    }

    /// Put a string on one row, one cell per character. Returns the number
    /// of cells the text spans (clipped cells included).
    pub fn put_text(&mut self, x: i32, y: i32, text: &str) -> i32 {
        let mut cx = x;
        for ch in text.chars() {
            self.put_char(cx, y, ch);
            cx += 1;
        }
        cx - x
    }

    /// Put color-tagged text on one row, truncated to `max_width` cells.
    ///
    /// Colors changed by tags are restored afterwards.
    pub fn put_markup(&mut self, x: i32, y: i32, text: &str, max_width: i32) -> i32 {
        let (start_fg, start_bg) = (self.fg, self.bg);
        let mut guard = self.styled(start_fg, start_bg);
        let mut written = 0;
        for segment in markup::parse(text) {
            match segment {
                Segment::Text(run) => {
                    for ch in run.chars() {
                        if written >= max_width {
                            return written;
                        }
                        guard.put_char(x + written, y, ch);
                        written += 1;
                    }
                }
                Segment::Fg(attr) => guard.fg = attr,
                Segment::Bg(attr) => guard.bg = attr,
                Segment::ResetFg => guard.fg = start_fg,
                Segment::ResetBg => guard.bg = start_bg,
            }
        }
        written
    }

    /// Fill a region with `ch` in the current colors.
    pub fn fill_rect(&mut self, region: Region, ch: char) {
        let area = region.intersection(self.clip());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.put_char(x, y, ch);
            }
        }
    }

    /// Draw a horizontal line of `len` cells.
    pub fn draw_hline(&mut self, x: i32, y: i32, len: i32, ch: char) {
        for dx in 0..len {
            self.put_char(x + dx, y, ch);
        }
    }

    /// Draw a vertical line of `len` cells.
    pub fn draw_vline(&mut self, x: i32, y: i32, len: i32, ch: char) {
        for dy in 0..len {
            self.put_char(x, y + dy, ch);
        }
    }

    /// Draw a rectangular frame. `glyphs` lists horizontal, vertical,
    /// top-left, top-right, bottom-left and bottom-right characters; missing
    /// glyphs fall back to ASCII.
    pub fn draw_frame(&mut self, region: Region, glyphs: &str) {
        if region.width < 2 || region.height < 2 {
            return;
        }
        let mut g = glyphs.chars();
        let h = g.next().unwrap_or('-');
        let v = g.next().unwrap_or('|');
        let tl = g.next().unwrap_or('+');
        let tr = g.next().unwrap_or('+');
        let bl = g.next().unwrap_or('+');
        let br = g.next().unwrap_or('+');

        let (right, bottom) = (region.right() - 1, region.bottom() - 1);
        self.draw_hline(region.x + 1, region.y, region.width - 2, h);
        self.draw_hline(region.x + 1, bottom, region.width - 2, h);
        self.draw_vline(region.x, region.y + 1, region.height - 2, v);
        self.draw_vline(right, region.y + 1, region.height - 2, v);
        self.put_char(region.x, region.y, tl);
        self.put_char(right, region.y, tr);
        self.put_char(region.x, bottom, bl);
        self.put_char(right, bottom, br);
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Send changed cells to the terminal and flush. Returns the number of
    /// cells written.
    pub fn present(&mut self, terminal: &mut dyn Terminal) -> io::Result<usize> {
        let mut written = 0;
        for (i, cell) in self.back.iter().enumerate() {
            if self.full_redraw || self.front[i] != *cell {
                let x = (i as i32 % self.width) as u16;
                let y = (i as i32 / self.width) as u16;
                terminal.set_cell(x, y, cell)?;
                self.front[i] = *cell;
                written += 1;
            }
        }
        terminal.flush()?;
        self.full_redraw = false;
        Ok(written)
    }

    /// Force the next `present` to write every cell.
    pub fn invalidate(&mut self) {
        self.full_redraw = true;
    }
}

// ---------------------------------------------------------------------------
// Scoped guards
// ---------------------------------------------------------------------------

/// Pops a clip region when dropped. Derefs to the canvas.
pub struct ClipGuard<'a> {
    canvas: &'a mut Canvas,
}

impl Deref for ClipGuard<'_> {
    type Target = Canvas;
    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for ClipGuard<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for ClipGuard<'_> {
    fn drop(&mut self) {
        self.canvas.pop_clip();
    }
}

/// Restores the previous colors when dropped. Derefs to the canvas.
pub struct AttrGuard<'a> {
    canvas: &'a mut Canvas,
}

impl Deref for AttrGuard<'_> {
    type Target = Canvas;
    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for AttrGuard<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for AttrGuard<'_> {
    fn drop(&mut self) {
        self.canvas.pop_attr();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::snapshot::canvas_to_string;
    use crate::testing::TestTerminal;
    use crate::theme::Color;

    fn red() -> Attr {
        Attr::new(Color::Red)
    }

    // ── Clip stack ───────────────────────────────────────────────────

    #[test]
    fn put_char_respects_clip() {
        let mut canvas = Canvas::new(10, 3);
        canvas.push_clip(Region::new(2, 0, 3, 3));
        assert!(!canvas.put_char(1, 0, 'a'));
        assert!(canvas.put_char(2, 0, 'b'));
        assert!(!canvas.put_char(5, 0, 'c'));
        canvas.pop_clip();
        assert!(canvas.put_char(1, 0, 'a'));
        assert_eq!(canvas_to_string(&canvas), "ab");
    }

    #[test]
    fn nested_clips_intersect() {
        let mut canvas = Canvas::new(10, 10);
        canvas.push_clip(Region::new(0, 0, 5, 5));
        canvas.push_clip(Region::new(3, 3, 5, 5));
        assert_eq!(canvas.clip(), Region::new(3, 3, 2, 2));
        canvas.pop_clip();
        assert_eq!(canvas.clip(), Region::new(0, 0, 5, 5));
        canvas.pop_clip();
        assert_eq!(canvas.clip(), canvas.bounds());
    }

    #[test]
    fn clip_guard_pops_on_early_return() {
        fn draw(canvas: &mut Canvas, bail: bool) -> Option<()> {
            let mut guard = canvas.clipped(Region::new(0, 0, 1, 1));
            guard.put_char(0, 0, 'x');
            if bail {
                return None;
            }
            guard.put_char(0, 0, 'y');
            Some(())
        }
        let mut canvas = Canvas::new(4, 4);
        assert!(draw(&mut canvas, true).is_none());
        assert_eq!(canvas.clip_depth(), 0);
        assert_eq!(canvas.cell(0, 0).unwrap().ch, 'x');
    }

    // ── Attribute stack ──────────────────────────────────────────────

    #[test]
    fn attr_stack_restores() {
        let mut canvas = Canvas::new(4, 1);
        canvas.push_attr(red(), Attr::new(Color::Blue));
        canvas.put_char(0, 0, 'r');
        canvas.pop_attr();
        canvas.put_char(1, 0, 'd');
        assert_eq!(canvas.cell(0, 0).unwrap().fg, red());
        assert_eq!(canvas.cell(1, 0).unwrap().fg, Attr::default());
        assert_eq!(canvas.attr_depth(), 0);
    }

    #[test]
    fn attr_guard_restores() {
        let mut canvas = Canvas::new(4, 1);
        {
            let mut guard = canvas.styled(red(), Attr::default());
            guard.put_char(0, 0, 'r');
        }
        assert_eq!(canvas.fg(), Attr::default());
        assert_eq!(canvas.attr_depth(), 0);
    }

    // ── Drawing ──────────────────────────────────────────────────────

    #[test]
    fn markup_changes_and_restores_colors() {
        let mut canvas = Canvas::new(10, 1);
        let n = canvas.put_markup(0, 0, "a<t:red>b<t:default>c", 10);
        assert_eq!(n, 3);
        assert_eq!(canvas.cell(0, 0).unwrap().fg, Attr::default());
        assert_eq!(canvas.cell(1, 0).unwrap().fg, red());
        assert_eq!(canvas.cell(2, 0).unwrap().fg, Attr::default());
        assert_eq!(canvas.fg(), Attr::default());
        assert_eq!(canvas.attr_depth(), 0);
    }

    #[test]
    fn markup_truncates_to_width() {
        let mut canvas = Canvas::new(10, 1);
        assert_eq!(canvas.put_markup(0, 0, "<b:blue>abcdef", 3), 3);
        assert_eq!(canvas_to_string(&canvas), "abc");
        assert_eq!(canvas.attr_depth(), 0);
    }

    #[test]
    fn frame_and_fill() {
        let mut canvas = Canvas::new(5, 3);
        canvas.fill_rect(Region::new(0, 0, 5, 3), '.');
        canvas.draw_frame(Region::new(0, 0, 5, 3), "-|++++");
        assert_eq!(canvas_to_string(&canvas), "+---+\n|...|\n+---+");
    }

    #[test]
    fn frame_with_missing_glyphs_uses_ascii() {
        let mut canvas = Canvas::new(3, 2);
        canvas.draw_frame(Region::new(0, 0, 3, 2), "");
        assert_eq!(canvas_to_string(&canvas), "+-+\n+-+");
    }

    // ── Output ───────────────────────────────────────────────────────

    #[test]
    fn present_writes_only_changes() {
        let mut canvas = Canvas::new(4, 2);
        let mut term = TestTerminal::new(4, 2);
        assert_eq!(canvas.present(&mut term).unwrap(), 8);
        canvas.put_char(1, 1, 'z');
        assert_eq!(canvas.present(&mut term).unwrap(), 1);
        assert_eq!(term.cell(1, 1).unwrap().ch, 'z');
        assert_eq!(canvas.present(&mut term).unwrap(), 0);
        canvas.invalidate();
        assert_eq!(canvas.present(&mut term).unwrap(), 8);
    }

    #[test]
    fn resize_clears_and_redraws() {
        let mut canvas = Canvas::new(2, 1);
        canvas.put_char(0, 0, 'q');
        canvas.resize(3, 2);
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.cell(0, 0).unwrap().ch, ' ');
        let mut term = TestTerminal::new(3, 2);
        assert_eq!(canvas.present(&mut term).unwrap(), 6);
    }
}
