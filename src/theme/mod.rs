//! Theme resolution: symbolic color/glyph ids to concrete attributes.

pub mod color;
pub mod ids;
pub mod manager;

pub use color::{parse_color, Attr, Color, ParseColorError};
pub use ids::{ColorFamily, ColorId, ObjId, UnknownId};
pub use manager::{Theme, ThemeManager, DEFAULT_THEME};
