//! Concrete terminal colors and text attributes.
//!
//! Colors are written in theme files and color tags as strings: named colors
//! (`red`, `bright_blue`, `grey`), hex (`#rrggbb`, `#rgb`), a palette index
//! (`0`..`255`) or `default`. An [`Attr`] is a color plus style flags, written
//! as attribute words followed by the color: `"bold underline yellow"`.

use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// A terminal color, independent of any backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's own default foreground/background.
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    /// 256-color palette index.
    Indexed(u8),
    Rgb { r: u8, g: u8, b: u8 },
}

/// Error returned when a color or attribute string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color specification: {0:?}")]
pub struct ParseColorError(pub String);

/// Parse a color string.
///
/// Supports:
/// - `default`
/// - Named colors: `black`, `red`, `green`, `yellow`, `blue`, `magenta`, `cyan`,
///   `white`, their `bright_` variants, and `grey`/`gray` (bright black)
/// - Hex colors: `#rrggbb` or `#rgb`
/// - Palette indices: `0`..`255`
///
/// Returns `None` if the color string cannot be parsed.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    if let Ok(index) = s.parse::<u8>() {
        return Some(Color::Indexed(index));
    }

    match s.to_ascii_lowercase().as_str() {
        "default" => Some(Color::Default),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "bright_black" | "brightblack" | "grey" | "gray" => Some(Color::BrightBlack),
        "bright_red" | "brightred" => Some(Color::BrightRed),
        "bright_green" | "brightgreen" => Some(Color::BrightGreen),
        "bright_yellow" | "brightyellow" => Some(Color::BrightYellow),
        "bright_blue" | "brightblue" => Some(Color::BrightBlue),
        "bright_magenta" | "brightmagenta" => Some(Color::BrightMagenta),
        "bright_cyan" | "brightcyan" => Some(Color::BrightCyan),
        "bright_white" | "brightwhite" => Some(Color::BrightWhite),
        _ => None,
    }
}

/// Parse a hex color string (without the leading `#`).
fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb { r, g, b })
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Color::Rgb {
                r: r * 17,
                g: g * 17,
                b: b * 17,
            })
        }
        _ => None,
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s).ok_or_else(|| ParseColorError(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Attr
// ---------------------------------------------------------------------------

/// A color together with text style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attr {
    pub color: Color,
    pub bold: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Attr {
    /// A plain attribute with no style flags.
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            bold: false,
            underline: false,
            reverse: false,
        }
    }

    /// Set the bold flag (builder).
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set the underline flag (builder).
    pub const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Set the reverse-video flag (builder).
    pub const fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }
}

impl From<Color> for Attr {
    fn from(color: Color) -> Self {
        Attr::new(color)
    }
}

impl FromStr for Attr {
    type Err = ParseColorError;

    /// Parse `"[bold] [underline] [reverse] <color>"`. A bare list of flags
    /// keeps the default color.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut attr = Attr::default();
        let mut color_seen = false;
        for word in s.split_whitespace() {
            match word.to_ascii_lowercase().as_str() {
                "bold" => attr.bold = true,
                "underline" => attr.underline = true,
                "reverse" => attr.reverse = true,
                other => {
                    if color_seen {
                        return Err(ParseColorError(s.to_owned()));
                    }
                    attr.color = parse_color(other).ok_or_else(|| ParseColorError(s.to_owned()))?;
                    color_seen = true;
                }
            }
        }
        if s.trim().is_empty() {
            return Err(ParseColorError(s.to_owned()));
        }
        Ok(attr)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Default => f.write_str("default"),
            Color::Black => f.write_str("black"),
            Color::Red => f.write_str("red"),
            Color::Green => f.write_str("green"),
            Color::Yellow => f.write_str("yellow"),
            Color::Blue => f.write_str("blue"),
            Color::Magenta => f.write_str("magenta"),
            Color::Cyan => f.write_str("cyan"),
            Color::White => f.write_str("white"),
            Color::BrightBlack => f.write_str("bright_black"),
            Color::BrightRed => f.write_str("bright_red"),
            Color::BrightGreen => f.write_str("bright_green"),
            Color::BrightYellow => f.write_str("bright_yellow"),
            Color::BrightBlue => f.write_str("bright_blue"),
            Color::BrightMagenta => f.write_str("bright_magenta"),
            Color::BrightCyan => f.write_str("bright_cyan"),
            Color::BrightWhite => f.write_str("bright_white"),
            Color::Indexed(i) => write!(f, "{i}"),
            Color::Rgb { r, g, b } => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Color parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_hex_6digit() {
        assert_eq!(parse_color("#ff0000"), Some(Color::Rgb { r: 255, g: 0, b: 0 }));
    }

    #[test]
    fn parse_hex_3digit_expanded() {
        assert_eq!(
            parse_color("#abc"),
            Some(Color::Rgb {
                r: 0xaa,
                g: 0xbb,
                b: 0xcc
            })
        );
    }

    #[test]
    fn parse_hex_invalid() {
        assert_eq!(parse_color("#ff00"), None);
        assert_eq!(parse_color("#gghhii"), None);
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(parse_color("Red"), Some(Color::Red));
        assert_eq!(parse_color("BRIGHT_BLUE"), Some(Color::BrightBlue));
        assert_eq!(parse_color("gray"), Some(Color::BrightBlack));
        assert_eq!(parse_color(" default "), Some(Color::Default));
    }

    #[test]
    fn parse_palette_index() {
        assert_eq!(parse_color("208"), Some(Color::Indexed(208)));
        assert_eq!(parse_color("256"), None);
    }

    #[test]
    fn parse_unknown_color() {
        assert_eq!(parse_color("rainbow"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn display_matches_parse() {
        for c in [Color::Cyan, Color::BrightRed, Color::Indexed(12), Color::Rgb { r: 1, g: 2, b: 3 }] {
            assert_eq!(parse_color(&c.to_string()), Some(c));
        }
    }

    // -----------------------------------------------------------------------
    // Attr parsing
    // -----------------------------------------------------------------------

    #[test]
    fn attr_with_flags() {
        let attr: Attr = "bold underline yellow".parse().unwrap();
        assert_eq!(attr, Attr::new(Color::Yellow).bold().underline());
    }

    #[test]
    fn attr_flags_only_keeps_default_color() {
        let attr: Attr = "reverse".parse().unwrap();
        assert_eq!(attr.color, Color::Default);
        assert!(attr.reverse);
    }

    #[test]
    fn attr_rejects_two_colors_and_garbage() {
        assert!("red blue".parse::<Attr>().is_err());
        assert!("bold nope".parse::<Attr>().is_err());
        assert!("   ".parse::<Attr>().is_err());
    }
}
