//! Snapshot rendering helpers.
//!
//! Convert a canvas into a plain-text string suitable for assertions: one
//! line per row, trailing spaces trimmed, trailing blank rows dropped, lines
//! separated by `'\n'` with no final newline.

use crate::canvas::Canvas;

/// The characters of every canvas row, colors ignored.
///
/// # Examples
///
/// ```ignore
/// use cellwin::testing::canvas_to_string;
///
/// let mut canvas = Canvas::new(10, 2);
/// canvas.put_text(0, 0, "Hello");
/// assert_eq!(canvas_to_string(&canvas), "Hello");
/// ```
pub fn canvas_to_string(canvas: &Canvas) -> String {
    let rows: Vec<String> = (0..canvas.height()).map(|y| row_text(canvas, y)).collect();
    join_rows(rows)
}

/// One canvas row with trailing spaces trimmed. Empty if `y` is off the canvas.
pub fn row_text(canvas: &Canvas, y: i32) -> String {
    let row: String = (0..canvas.width())
        .filter_map(|x| canvas.cell(x, y))
        .map(|cell| cell.ch)
        .collect();
    row.trim_end().to_owned()
}

/// Join trimmed rows, dropping blank rows at the end.
pub(crate) fn join_rows(mut rows: Vec<String>) -> String {
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    rows.join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
