//! Per-control state shared by every widget.
//!
//! [`ControlState`] is the data every control carries regardless of what it
//! draws: geometry, constraints, layout parameters, colors and flags. The
//! tree owns one per control; widgets receive it by reference when drawing
//! and handling events.

use crate::geometry::{Offset, Padding, Pack, Region, Size};
use crate::theme::{Attr, ColorFamily, ColorId, ThemeManager};

/// Common state of a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    /// Title text (window caption, button label, ...).
    pub title: String,
    pub(crate) pos: Offset,
    pub(crate) size: Size,
    pub(crate) min: Size,
    /// Share of the parent's slack; 0 keeps the minimal size.
    pub scale: u16,
    pub fg: Option<Attr>,
    pub bg: Option<Attr>,
    pub active_fg: Option<Attr>,
    pub active_bg: Option<Attr>,
    pub(crate) enabled: bool,
    pub(crate) visible: bool,
    pub(crate) active: bool,
    pub modal: bool,
    /// Whether TAB traversal stops here.
    pub tab_stop: bool,
    /// Unhandled events from descendants are offered here.
    pub clip_boundary: bool,
    pub(crate) padding: Padding,
    pub(crate) gap: i32,
    pub(crate) pack: Pack,
}

impl ControlState {
    /// Visible, enabled, not a tab stop, everything else zero.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pos: Offset::default(),
            size: Size::ZERO,
            min: Size::ZERO,
            scale: 0,
            fg: None,
            bg: None,
            active_fg: None,
            active_bg: None,
            enabled: true,
            visible: true,
            active: false,
            modal: false,
            tab_stop: false,
            clip_boundary: false,
            padding: Padding::ZERO,
            gap: 0,
            pack: Pack::Horizontal,
        }
    }

    // ── Builders ─────────────────────────────────────────────────────

    /// Minimum size (negative values clamp to 0). The current size grows to match.
    pub fn with_min(mut self, width: i32, height: i32) -> Self {
        self.min = Size::new(width.max(0), height.max(0));
        self.size = self.size.max(self.min);
        self
    }

    pub fn with_scale(mut self, scale: u16) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_pack(mut self, pack: Pack) -> Self {
        self.pack = pack;
        self
    }

    pub fn with_padding(mut self, x: i32, y: i32) -> Self {
        self.padding = Padding::new(x, y);
        self
    }

    pub fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap.max(0);
        self
    }

    pub fn with_tab_stop(mut self, tab_stop: bool) -> Self {
        self.tab_stop = tab_stop;
        self
    }

    pub fn with_clip_boundary(mut self, clip_boundary: bool) -> Self {
        self.clip_boundary = clip_boundary;
        self
    }

    pub fn with_colors(mut self, fg: Attr, bg: Attr) -> Self {
        self.fg = Some(fg);
        self.bg = Some(bg);
        self
    }

    pub fn with_active_colors(mut self, fg: Attr, bg: Attr) -> Self {
        self.active_fg = Some(fg);
        self.active_bg = Some(bg);
        self
    }

    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn pos(&self) -> Offset {
        self.pos
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The stored minimum-size constraint.
    pub fn constraints(&self) -> Size {
        self.min
    }

    /// Screen rectangle occupied by the control.
    pub fn region(&self) -> Region {
        Region::from_parts(self.pos, self.size)
    }

    /// Rectangle inside the padding.
    pub fn content_region(&self) -> Region {
        self.region().shrink(self.padding)
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn gap(&self) -> i32 {
        self.gap
    }

    pub fn pack(&self) -> Pack {
        self.pack
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // ── Colors ───────────────────────────────────────────────────────

    /// Effective (text, background) attributes.
    ///
    /// Disabled controls use the theme's disabled pair. Active controls use
    /// their explicit active colors, falling back to the family's active ids.
    /// Otherwise the explicit colors apply, falling back to the family's
    /// normal ids.
    pub fn resolve_colors(&self, family: &ColorFamily, theme: &ThemeManager) -> (Attr, Attr) {
        if !self.enabled {
            return (
                theme.color(ColorId::DisabledText),
                theme.color(ColorId::DisabledBack),
            );
        }
        if self.active {
            (
                self.active_fg
                    .unwrap_or_else(|| theme.color(family.active_text)),
                self.active_bg
                    .unwrap_or_else(|| theme.color(family.active_back)),
            )
        } else {
            (
                self.fg.unwrap_or_else(|| theme.color(family.text)),
                self.bg.unwrap_or_else(|| theme.color(family.back)),
            )
        }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new("")
    }
}
