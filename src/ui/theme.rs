//! Theme mode and color palettes.
//!
//! The persisted setting is a [`ThemeMode`]; screens resolve it to a
//! [`Palette`] through a [`PaletteSet`]. The built-in light and dark palettes
//! ship with the crate and can be replaced by a TOML file.
//!
//! # TOML Format
//!
//! Either section may be omitted, in which case the built-in palette is kept.
//!
//! ```toml
//! [dark]
//! name = "brand-dark"
//!
//! [dark.colors]
//! background = "#121417"
//! surface = "#1e2227"
//! text = "#e6e9ee"
//! text_muted = "#9aa5b1"
//! primary = "#4da3ff"
//! accent = "#ffb74d"
//! border = "#323840"
//! danger = "#ef5350"
//! ```

use crate::domain::error::{MarketdirError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Light or dark appearance. Persisted as `"light"` / `"dark"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named color scheme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Palette {
    pub name: String,
    pub colors: PaletteColors,
}

/// Colors as hex strings (e.g. `"#0b6bcb"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaletteColors {
    /// Screen background.
    pub background: String,
    /// Cards, sheets and list rows.
    pub surface: String,
    pub text: String,
    /// Secondary text (captions, timestamps).
    pub text_muted: String,
    /// Buttons, links and the active tab.
    pub primary: String,
    /// Badges and highlights.
    pub accent: String,
    pub border: String,
    /// Errors and destructive actions.
    pub danger: String,
}

impl Palette {
    /// Returns the built-in palette for `mode`.
    ///
    /// # Panics
    ///
    /// Panics if a bundled palette fails to parse, which the tests rule out.
    #[must_use]
    pub fn builtin(mode: ThemeMode) -> Self {
        let source = match mode {
            ThemeMode::Light => include_str!("../../themes/light.toml"),
            ThemeMode::Dark => include_str!("../../themes/dark.toml"),
        };
        toml::from_str(source).expect("bundled palettes are valid TOML")
    }

    /// Converts a hex color to an RGB tuple.
    ///
    /// Accepts an optional `#` prefix. Returns white on malformed input.
    ///
    /// ```
    /// use marketdir::ui::Palette;
    ///
    /// assert_eq!(Palette::rgb("#0b6bcb"), (11, 107, 203));
    /// assert_eq!(Palette::rgb("nope"), (255, 255, 255));
    /// ```
    #[must_use]
    pub fn rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }
}

/// The pair of palettes a theme mode resolves against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaletteSet {
    #[serde(default = "light_palette")]
    pub light: Palette,
    #[serde(default = "dark_palette")]
    pub dark: Palette,
}

fn light_palette() -> Palette {
    Palette::builtin(ThemeMode::Light)
}

fn dark_palette() -> Palette {
    Palette::builtin(ThemeMode::Dark)
}

impl PaletteSet {
    /// Loads palette overrides from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`MarketdirError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            MarketdirError::Config(format!("failed to read palette file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            MarketdirError::Config(format!("failed to parse palette file {}: {e}", path.display()))
        })
    }

    #[must_use]
    pub fn for_mode(&self, mode: ThemeMode) -> &Palette {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }
}

impl Default for PaletteSet {
    fn default() -> Self {
        Self {
            light: light_palette(),
            dark: dark_palette(),
        }
    }
}
