//! Symbolic theme identifiers.
//!
//! Widgets never name concrete colors; they ask the theme for a [`ColorId`]
//! or an [`ObjId`] (a glyph string such as a border set).

use std::fmt;
use std::str::FromStr;

macro_rules! symbolic_ids {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $key:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every identifier, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// The key used for this identifier in theme files.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($key => Ok($name::$variant),)+
                    _ => Err(UnknownId(s.to_owned())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// A theme key that names no known identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme identifier: {0:?}")]
pub struct UnknownId(pub String);

symbolic_ids! {
    /// Symbolic color slots.
    pub enum ColorId {
        Back => "back",
        Text => "text",
        ActiveBack => "active_back",
        ActiveText => "active_text",
        DisabledBack => "disabled_back",
        DisabledText => "disabled_text",
        WindowBack => "window_back",
        WindowText => "window_text",
        WindowBorder => "window_border",
        WindowBorderActive => "window_border_active",
        ButtonBack => "button_back",
        ButtonText => "button_text",
        ButtonActiveBack => "button_active_back",
        ButtonActiveText => "button_active_text",
        ButtonPressedBack => "button_pressed_back",
        ButtonPressedText => "button_pressed_text",
    }
}

symbolic_ids! {
    /// Symbolic glyph strings.
    pub enum ObjId {
        SingleBorder => "single_border",
        DoubleBorder => "double_border",
        TitleClose => "title_close",
        TitleMaximize => "title_maximize",
        TitleRestore => "title_restore",
        TitleMinimize => "title_minimize",
    }
}

/// The four color slots a widget kind draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFamily {
    pub text: ColorId,
    pub back: ColorId,
    pub active_text: ColorId,
    pub active_back: ColorId,
}

impl ColorFamily {
    /// Generic controls (labels, panels).
    pub const CONTROL: ColorFamily = ColorFamily {
        text: ColorId::Text,
        back: ColorId::Back,
        active_text: ColorId::ActiveText,
        active_back: ColorId::ActiveBack,
    };

    /// Window bodies.
    pub const WINDOW: ColorFamily = ColorFamily {
        text: ColorId::WindowText,
        back: ColorId::WindowBack,
        active_text: ColorId::WindowText,
        active_back: ColorId::WindowBack,
    };

    /// Push buttons.
    pub const BUTTON: ColorFamily = ColorFamily {
        text: ColorId::ButtonText,
        back: ColorId::ButtonBack,
        active_text: ColorId::ButtonActiveText,
        active_back: ColorId::ButtonActiveBack,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_ids_round_trip_keys() {
        for id in ColorId::ALL {
            assert_eq!(id.as_str().parse::<ColorId>(), Ok(*id));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert_eq!(
            "shadow".parse::<ObjId>(),
            Err(UnknownId("shadow".to_owned()))
        );
    }
}
