//! Top-level windows: frame hit zones, drag geometry, title buttons.
//!
//! A window is a root control in the tree plus the bookkeeping the composer
//! needs: title buttons, saved geometry for maximize, the minimized flag and
//! an optional close handler. The frame occupies the root's one-cell padding.

use std::fmt;

use crate::control::ControlId;
use crate::geometry::{Region, Size};

/// Smallest frame the composer allows: room for corners, a title cell and
/// three title buttons.
pub const WINDOW_MIN: Size = Size::new(14, 3);

// ---------------------------------------------------------------------------
// Title buttons
// ---------------------------------------------------------------------------

/// A button drawn on the top border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitleButton {
    Close,
    Maximize,
    Minimize,
}

/// Which title buttons a window shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleButtons {
    pub close: bool,
    pub maximize: bool,
    pub minimize: bool,
}

impl TitleButtons {
    pub const ALL: TitleButtons = TitleButtons {
        close: true,
        maximize: true,
        minimize: true,
    };

    pub const NONE: TitleButtons = TitleButtons {
        close: false,
        maximize: false,
        minimize: false,
    };

    /// Buttons laid out on `region`'s top border, right to left, as
    /// `(button, x)` where `x` is the column of the opening bracket.
    pub fn slots(self, region: Region) -> Vec<(TitleButton, i32)> {
        let mut slots = Vec::new();
        let mut x = region.right() - 4;
        for (shown, button) in [
            (self.close, TitleButton::Close),
            (self.maximize, TitleButton::Maximize),
            (self.minimize, TitleButton::Minimize),
        ] {
            if shown {
                slots.push((button, x));
                x -= 3;
            }
        }
        slots
    }

    /// The button under (x, y), if any.
    pub fn hit(self, region: Region, x: i32, y: i32) -> Option<TitleButton> {
        if y != region.y {
            return None;
        }
        self.slots(region)
            .into_iter()
            .find(|&(_, start)| (start..start + 3).contains(&x) && start > region.x)
            .map(|(button, _)| button)
    }
}

impl Default for TitleButtons {
    fn default() -> Self {
        Self::ALL
    }
}

// ---------------------------------------------------------------------------
// Drag state machine
// ---------------------------------------------------------------------------

/// What a primary-button drag on a window frame does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragMode {
    #[default]
    None,
    Move,
    ResizeLeft,
    ResizeRight,
    ResizeBottom,
    ResizeTopLeft,
    ResizeTopRight,
    ResizeBottomLeft,
    ResizeBottomRight,
}

impl DragMode {
    /// Classify a point on `region`'s frame. The top edge moves the window;
    /// corners and the other edges resize it.
    pub fn at(region: Region, x: i32, y: i32) -> DragMode {
        if !region.contains(x, y) {
            return DragMode::None;
        }
        let (left, right) = (x == region.x, x == region.right() - 1);
        let (top, bottom) = (y == region.y, y == region.bottom() - 1);
        match (top, bottom, left, right) {
            (true, _, true, _) => DragMode::ResizeTopLeft,
            (true, _, _, true) => DragMode::ResizeTopRight,
            (true, _, _, _) => DragMode::Move,
            (_, true, true, _) => DragMode::ResizeBottomLeft,
            (_, true, _, true) => DragMode::ResizeBottomRight,
            (_, true, _, _) => DragMode::ResizeBottom,
            (_, _, true, _) => DragMode::ResizeLeft,
            (_, _, _, true) => DragMode::ResizeRight,
            _ => DragMode::None,
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, DragMode::ResizeLeft | DragMode::ResizeTopLeft | DragMode::ResizeBottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, DragMode::ResizeRight | DragMode::ResizeTopRight | DragMode::ResizeBottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, DragMode::ResizeTopLeft | DragMode::ResizeTopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(
            self,
            DragMode::ResizeBottom | DragMode::ResizeBottomLeft | DragMode::ResizeBottomRight
        )
    }
}

/// `lo` wins when the bounds cross.
fn clamp(v: i32, lo: i32, hi: i32) -> i32 {
    v.min(hi).max(lo)
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub window: ControlId,
    pub mode: DragMode,
    /// Pointer position when the drag started.
    pub anchor: (i32, i32),
    /// Window geometry when the drag started.
    pub start: Region,
}

impl Drag {
    /// Geometry for the pointer at (x, y), kept inside `screen` and no
    /// smaller than `min`.
    pub fn region_at(&self, x: i32, y: i32, screen: Size, min: Size) -> Region {
        let (dx, dy) = (x - self.anchor.0, y - self.anchor.1);
        apply(self.mode, self.start, dx, dy, screen, min)
    }
}

/// Move or resize `start` by (dx, dy) according to `mode`.
pub fn apply(mode: DragMode, start: Region, dx: i32, dy: i32, screen: Size, min: Size) -> Region {
    let mut r = start;
    match mode {
        DragMode::None => {}
        DragMode::Move => {
            r.x = clamp(start.x + dx, 0, screen.width - start.width);
            r.y = clamp(start.y + dy, 0, screen.height - start.height);
        }
        _ => {
            if mode.moves_left() {
                r.x = clamp(start.x + dx, 0, start.right() - min.width);
                r.width = start.right() - r.x;
            }
            if mode.moves_right() {
                r.width = clamp(start.width + dx, min.width, screen.width - start.x);
            }
            if mode.moves_top() {
                r.y = clamp(start.y + dy, 0, start.bottom() - min.height);
                r.height = start.bottom() - r.y;
            }
            if mode.moves_bottom() {
                r.height = clamp(start.height + dy, min.height, screen.height - start.y);
            }
        }
    }
    r
}

/// Pull `region` inside `screen`: shrink it to fit (not below `min`), then
/// move it so it does not hang off the right or bottom.
pub fn fit(region: Region, screen: Size, min: Size) -> Region {
    let width = clamp(region.width, min.width, screen.width);
    let height = clamp(region.height, min.height, screen.height);
    Region::new(
        clamp(region.x, 0, screen.width - width),
        clamp(region.y, 0, screen.height - height),
        width,
        height,
    )
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Composer bookkeeping for one top-level window.
pub struct Window {
    pub(crate) root: ControlId,
    pub(crate) buttons: TitleButtons,
    /// Geometry to restore when un-maximizing.
    pub(crate) saved: Option<Region>,
    pub(crate) minimized: bool,
    pub(crate) active: bool,
    pub(crate) on_close: Option<Box<dyn FnMut() -> bool>>,
}

impl Window {
    pub(crate) fn new(root: ControlId, buttons: TitleButtons) -> Self {
        Self {
            root,
            buttons,
            saved: None,
            minimized: false,
            active: false,
            on_close: None,
        }
    }

    /// The window's root control.
    pub fn root(&self) -> ControlId {
        self.root
    }

    pub fn is_maximized(&self) -> bool {
        self.saved.is_some()
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Ask the close handler. Windows without one always agree.
    pub(crate) fn accepts_close(&mut self) -> bool {
        self.on_close.as_mut().map_or(true, |handler| handler())
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("root", &self.root)
            .field("buttons", &self.buttons)
            .field("saved", &self.saved)
            .field("minimized", &self.minimized)
            .field("active", &self.active)
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}
