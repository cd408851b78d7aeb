//! Panel widget: a plain background that groups child controls.

use std::any::Any;

use crate::canvas::Canvas;
use crate::control::{fill_background, ControlState, Widget};
use crate::theme::{ColorFamily, ThemeManager};

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// A container that paints its background and nothing else.
///
/// Window roots are panels drawn with the window colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    family: ColorFamily,
}

impl Panel {
    /// A panel drawn with the generic control colors.
    pub fn new() -> Self {
        Self {
            family: ColorFamily::CONTROL,
        }
    }

    /// A panel drawn with the window body colors.
    pub fn window() -> Self {
        Self {
            family: ColorFamily::WINDOW,
        }
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Panel {
    fn widget_type(&self) -> &'static str {
        "Panel"
    }

    fn color_family(&self) -> ColorFamily {
        self.family
    }

    fn draw(&self, state: &ControlState, canvas: &mut Canvas, theme: &ThemeManager) {
        fill_background(state, &self.family, canvas, theme);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
