//! Theme tables and the theme manager.
//!
//! A [`Theme`] maps [`ColorId`]s to [`Attr`]s and [`ObjId`]s to glyph strings,
//! and may name a parent theme. [`ThemeManager`] resolves a lookup against
//! the current theme, then its parent, then the built-in default theme, and
//! never follows more than those two hops.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::color::{Attr, Color};
use super::ids::{ColorId, ObjId};
use crate::error::{Error, Result};

/// Name of the built-in theme every lookup falls back to.
pub const DEFAULT_THEME: &str = "default";

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A named table of color and glyph mappings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Theme {
    name: String,
    parent: Option<String>,
    colors: HashMap<ColorId, Attr>,
    objects: HashMap<ObjId, String>,
}

impl Theme {
    /// Create an empty theme.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the parent theme used for fallback (builder).
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Map a color slot (builder).
    pub fn with_color(mut self, id: ColorId, attr: impl Into<Attr>) -> Self {
        self.colors.insert(id, attr.into());
        self
    }

    /// Map a glyph slot (builder).
    pub fn with_object(mut self, id: ObjId, glyphs: impl Into<String>) -> Self {
        self.objects.insert(id, glyphs.into());
        self
    }

    /// The theme's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent theme's name, if any.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// The attribute stored directly in this theme for `id`.
    pub fn color(&self, id: ColorId) -> Option<Attr> {
        self.colors.get(&id).copied()
    }

    /// The glyph string stored directly in this theme for `id`.
    pub fn object(&self, id: ObjId) -> Option<&str> {
        self.objects.get(&id).map(String::as_str)
    }

    /// The hard-coded theme that defines every identifier.
    pub fn builtin() -> Self {
        use ColorId::*;
        Theme::new(DEFAULT_THEME)
            .with_color(Back, Color::Blue)
            .with_color(Text, Color::White)
            .with_color(ActiveBack, Color::Cyan)
            .with_color(ActiveText, Attr::new(Color::BrightWhite).bold())
            .with_color(DisabledBack, Color::Blue)
            .with_color(DisabledText, Color::BrightBlack)
            .with_color(WindowBack, Color::Blue)
            .with_color(WindowText, Color::White)
            .with_color(WindowBorder, Color::White)
            .with_color(WindowBorderActive, Attr::new(Color::BrightWhite).bold())
            .with_color(ButtonBack, Color::Cyan)
            .with_color(ButtonText, Color::Black)
            .with_color(ButtonActiveBack, Color::Green)
            .with_color(ButtonActiveText, Attr::new(Color::BrightWhite).bold())
            .with_color(ButtonPressedBack, Color::Black)
            .with_color(ButtonPressedText, Color::BrightWhite)
            .with_object(ObjId::SingleBorder, "─│┌┐└┘")
            .with_object(ObjId::DoubleBorder, "═║╔╗╚╝")
            .with_object(ObjId::TitleClose, "x")
            .with_object(ObjId::TitleMaximize, "^")
            .with_object(ObjId::TitleRestore, "v")
            .with_object(ObjId::TitleMinimize, "_")
    }

    /// Parse a theme from TOML text. `fallback_name` is used when the
    /// document has no `name` key.
    pub fn from_toml_str(text: &str, fallback_name: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: ThemeFile = toml::from_str(text)?;
        let mut theme = Theme::new(file.name.unwrap_or_else(|| fallback_name.to_owned()));
        theme.parent = file.parent;
        for (key, value) in file.colors {
            match (key.parse::<ColorId>(), value.parse::<Attr>()) {
                (Ok(id), Ok(attr)) => {
                    theme.colors.insert(id, attr);
                }
                (Err(e), _) => warn!(theme = %theme.name, error = %e, "Skipping color entry"),
                (_, Err(e)) => warn!(theme = %theme.name, key = %key, error = %e, "Skipping color entry"),
            }
        }
        for (key, value) in file.objects {
            match key.parse::<ObjId>() {
                Ok(id) => {
                    theme.objects.insert(id, value);
                }
                Err(e) => warn!(theme = %theme.name, error = %e, "Skipping object entry"),
            }
        }
        Ok(theme)
    }
}

/// On-disk theme document.
#[derive(Debug, Deserialize)]
struct ThemeFile {
    name: Option<String>,
    parent: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
    #[serde(default)]
    objects: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// ThemeManager
// ---------------------------------------------------------------------------

/// Registry of themes with a current selection and fallback resolution.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    themes: HashMap<String, Theme>,
    current: String,
    builtin: Theme,
}

impl ThemeManager {
    /// Create a manager holding only the built-in default theme.
    pub fn new() -> Self {
        Self {
            themes: HashMap::new(),
            current: DEFAULT_THEME.to_owned(),
            builtin: Theme::builtin(),
        }
    }

    /// Register a theme, replacing any theme with the same name.
    pub fn add(&mut self, theme: Theme) {
        debug!(theme = %theme.name, parent = ?theme.parent, "Theme registered");
        self.themes.insert(theme.name.clone(), theme);
    }

    /// Select the current theme by name.
    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if name != DEFAULT_THEME && !self.themes.contains_key(name) {
            return Err(Error::UnknownTheme(name.to_owned()));
        }
        self.current = name.to_owned();
        Ok(())
    }

    /// Name of the current theme.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Names of all registered themes plus the built-in one, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.themes.keys().cloned().collect();
        if !self.themes.contains_key(DEFAULT_THEME) {
            names.push(DEFAULT_THEME.to_owned());
        }
        names.sort();
        names
    }

    /// Resolve a color slot.
    pub fn color(&self, id: ColorId) -> Attr {
        self.resolve(|t| t.color(id)).unwrap_or_default()
    }

    /// Resolve a glyph slot.
    pub fn object(&self, id: ObjId) -> &str {
        self.resolve(|t| t.object(id)).unwrap_or("")
    }

    /// Current theme, then its parent (one hop), then the built-in theme.
    fn resolve<'a, T>(&'a self, pick: impl Fn(&'a Theme) -> Option<T>) -> Option<T> {
        if let Some(theme) = self.themes.get(&self.current) {
            if let Some(value) = pick(theme) {
                return Some(value);
            }
            let parent = theme
                .parent
                .as_deref()
                .filter(|p| *p != theme.name)
                .and_then(|p| self.themes.get(p));
            if let Some(value) = parent.and_then(&pick) {
                return Some(value);
            }
        }
        pick(&self.builtin)
    }

    /// Load one theme file and register it. Returns the theme's name.
    pub fn load_file(&mut self, path: &Path) -> Result<String> {
        let text = fs::read_to_string(path).map_err(|source| Error::ThemeRead {
            path: path.to_path_buf(),
            source,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let theme = Theme::from_toml_str(&text, &stem).map_err(|source| Error::ThemeParse {
            path: path.to_path_buf(),
            source,
        })?;
        let name = theme.name.clone();
        self.add(theme);
        Ok(name)
    }

    /// Load every `*.toml` file in `dir`. Returns the number of themes loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let entries = fs::read_dir(dir).map_err(|source| Error::ThemeRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| Error::ThemeRead {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();
        for path in &paths {
            self.load_file(path)?;
        }
        Ok(paths.len())
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
