//! Theme definitions and the TOML theme format.
//!
//! A theme is an ordered list of `(scope, foreground?, background?)` entries.
//! The first entry supplies the default colors.
//!
//! ```toml
//! name = "Glitter"
//!
//! [[settings]]
//! foreground = "#f8f8f2"
//! background = "#272822"
//!
//! [[settings]]
//! scope = "comment, string.quoted"
//! foreground = "#75715e"
//! ```

use super::color::Rgb;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// One theme entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeEntry {
    /// Exact scope key (may be empty for the global entry).
    pub scope: String,
    /// Foreground color, if the entry sets one.
    pub foreground: Option<Rgb>,
    /// Background color, if the entry sets one.
    pub background: Option<Rgb>,
}

impl ThemeEntry {
    /// Create an entry.
    pub fn new(scope: impl Into<String>, foreground: Option<Rgb>, background: Option<Rgb>) -> Self {
        Self {
            scope: scope.into(),
            foreground,
            background,
        }
    }
}

/// An ordered color theme.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    /// Display name.
    pub name: Option<String>,
    /// Entries in file order.
    pub entries: Vec<ThemeEntry>,
}

#[derive(Deserialize)]
struct RawTheme {
    name: Option<String>,
    #[serde(default)]
    settings: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    scope: String,
    foreground: Option<String>,
    background: Option<String>,
}

impl Theme {
    /// Build a theme from entries.
    pub fn from_entries(entries: Vec<ThemeEntry>) -> Self {
        Self { name: None, entries }
    }

    /// Parse a TOML theme.
    ///
    /// A comma-separated scope list expands into one entry per scope, all in the
    /// position of the original entry.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let raw: RawTheme = toml::from_str(source)?;
        let mut entries = Vec::with_capacity(raw.settings.len());
        for setting in raw.settings {
            let foreground = setting.foreground.as_deref().map(Rgb::parse_hex).transpose()?;
            let background = setting.background.as_deref().map(Rgb::parse_hex).transpose()?;
            // An entry with no scope still counts (it is usually the global one).
            if setting.scope.trim().is_empty() {
                entries.push(ThemeEntry::new("", foreground, background));
                continue;
            }
            for scope in setting.scope.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                entries.push(ThemeEntry::new(scope, foreground, background));
            }
        }
        Ok(Self {
            name: raw.name,
            entries,
        })
    }

    /// Read and parse a theme file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| Error::ThemeRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Read a theme file, logging failures and falling back to the empty theme.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(theme) => {
                tracing::info!(path = %path.display(), entries = theme.entries.len(), "loaded theme");
                theme
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "unable to load colorscheme definition");
                Self::default()
            }
        }
    }
}
