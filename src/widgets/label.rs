//! Label widget: one line of markup text.

use std::any::Any;

use crate::canvas::{markup, Canvas};
use crate::control::{ControlState, Widget};
use crate::theme::{ColorFamily, ThemeManager};

/// Static text drawn from the control's title. Color tags in the title are
/// honored; text past the content width is cut off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Label;

impl Label {
    pub fn new() -> Self {
        Self
    }

    /// A state for `text` whose minimum width fits the visible text.
    pub fn sized(text: impl Into<String>) -> ControlState {
        let text = text.into();
        let width = i32::try_from(markup::visible_len(&text)).unwrap_or(i32::MAX);
        ControlState::new(text).with_min(width, 1)
    }
}

impl Widget for Label {
    fn widget_type(&self) -> &'static str {
        "Label"
    }

    fn draw(&self, state: &ControlState, canvas: &mut Canvas, theme: &ThemeManager) {
        let (fg, bg) = state.resolve_colors(&ColorFamily::CONTROL, theme);
        let content = state.content_region();
        let mut canvas = canvas.styled(fg, bg);
        canvas.fill_rect(state.region(), ' ');
        canvas.put_markup(content.x, content.y, &state.title, content.width);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Offset, Size};
    use crate::testing::snapshot::canvas_to_string;

    fn draw(title: &str, width: i32) -> Canvas {
        let mut state = ControlState::new(title);
        state.pos = Offset::new(0, 0);
        state.size = Size::new(width, 1);
        let mut canvas = Canvas::new(12, 1);
        Label::new().draw(&state, &mut canvas, &ThemeManager::new());
        canvas
    }

    #[test]
    fn sized_fits_visible_text() {
        let state = Label::sized("<t:red>Hello<t:default>");
        assert_eq!(state.constraints(), Size::new(5, 1));
        assert_eq!(state.title, "<t:red>Hello<t:default>");
    }

    #[test]
    fn draws_title_without_tags() {
        let canvas = draw("<t:red>Hi<t:default> there", 12);
        assert_eq!(canvas_to_string(&canvas), "Hi there");
    }

    #[test]
    fn truncates_to_width() {
        let canvas = draw("Hello world", 5);
        assert_eq!(canvas_to_string(&canvas), "Hello");
    }
}
