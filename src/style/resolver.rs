//! Scope-to-color resolution.
//!
//! The [`ColorTable`] is a flat map from exact scope strings to quantized
//! colors. Cascading happens at lookup time: a compound scope such as
//! `"source.go entity.name.function"` is tried as a whole, then with its last
//! token alone, then progressively less specific until something matches.

use super::color::{ColorIndex, Rgb};
use super::palette::Palette;
use super::theme::Theme;
use std::collections::HashMap;

/// Foreground/background pair in palette space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorPair {
    /// Foreground index.
    pub fg: ColorIndex,
    /// Background index.
    pub bg: ColorIndex,
}

impl ColorPair {
    /// Create a pair.
    pub const fn new(fg: ColorIndex, bg: ColorIndex) -> Self {
        Self { fg, bg }
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self::new(ColorIndex::WHITE, ColorIndex::BLACK)
    }
}

/// Theme colors quantized into the active palette.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    entries: HashMap<String, ColorPair>,
    default: ColorPair,
}

impl ColorTable {
    /// Quantize every theme entry once.
    ///
    /// Entry 0 sets the defaults; entries missing a color inherit the default
    /// as it stands at that point. Without a theme default the pair is white
    /// on black.
    pub fn build(theme: &Theme, palette: &mut Palette) -> Self {
        let mut defaults = Defaults::new(palette);
        let mut entries = HashMap::with_capacity(theme.entries.len());

        for (i, entry) in theme.entries.iter().enumerate() {
            let fg = match entry.foreground {
                Some(rgb) => defaults.quantize_or_fallback(rgb, true),
                None => defaults.fg(),
            };
            let bg = match entry.background {
                Some(rgb) => defaults.quantize_or_fallback(rgb, false),
                None => defaults.bg(),
            };
            if i == 0 {
                if entry.foreground.is_some() {
                    defaults.fg = Some(fg);
                }
                if entry.background.is_some() {
                    defaults.bg = Some(bg);
                }
            }
            entries.insert(entry.scope.clone(), ColorPair::new(fg, bg));
        }

        let default = ColorPair::new(defaults.fg(), defaults.bg());
        tracing::debug!(
            entries = entries.len(),
            palette = defaults.palette.len(),
            ?default,
            "built color table"
        );
        Self { entries, default }
    }

    /// Build a table directly from already-quantized entries.
    pub fn from_pairs<I, S>(default: ColorPair, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, ColorPair)>,
        S: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(s, p)| (s.into(), p)).collect(),
            default,
        }
    }

    /// Default foreground/background.
    pub const fn default_pair(&self) -> ColorPair {
        self.default
    }

    /// Number of exact scope keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no scope keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a scope through the cascade.
    pub fn lookup(&self, scope: &str) -> ColorPair {
        let mut rest = scope.trim();
        while !rest.is_empty() {
            if let Some(pair) = self.entries.get(rest) {
                return *pair;
            }
            let token_start = rest.rfind(' ').map_or(0, |i| i + 1);
            if token_start > 0 {
                if let Some(pair) = self.entries.get(&rest[token_start..]) {
                    return *pair;
                }
            }
            rest = match rest.rfind('.') {
                // Trailing dot segment of the last token
                Some(dot) if dot >= token_start => rest[..dot].trim_end(),
                // Last token has no segments left
                _ => rest[..token_start].trim_end(),
            };
        }
        self.default
    }
}

/// Lazily established default colors while a table is being built.
struct Defaults<'a> {
    palette: &'a mut Palette,
    fg: Option<ColorIndex>,
    bg: Option<ColorIndex>,
}

impl<'a> Defaults<'a> {
    fn new(palette: &'a mut Palette) -> Self {
        Self {
            palette,
            fg: None,
            bg: None,
        }
    }

    fn fg(&mut self) -> ColorIndex {
        if let Some(fg) = self.fg {
            return fg;
        }
        let fg = self.quantize(Rgb::WHITE).unwrap_or(ColorIndex::WHITE);
        self.fg = Some(fg);
        fg
    }

    fn bg(&mut self) -> ColorIndex {
        if let Some(bg) = self.bg {
            return bg;
        }
        let bg = self.quantize(Rgb::BLACK).unwrap_or(ColorIndex::BLACK);
        self.bg = Some(bg);
        bg
    }

    fn quantize(&mut self, rgb: Rgb) -> Option<ColorIndex> {
        match self.palette.quantize(rgb) {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::error!(color = ?rgb, error = %e, "unable to quantize theme color");
                None
            }
        }
    }

    fn quantize_or_fallback(&mut self, rgb: Rgb, foreground: bool) -> ColorIndex {
        match self.quantize(rgb) {
            Some(index) => index,
            None if foreground => self.fg(),
            None => self.bg(),
        }
    }
}

/// Per-pass memo in front of a [`ColorTable`].
///
/// The cache is keyed by the full scope string and cleared at the start of
/// every render pass.
#[derive(Debug, Clone, Default)]
pub struct StyleResolver {
    table: ColorTable,
    cache: HashMap<String, ColorPair>,
}

impl StyleResolver {
    /// Wrap a table.
    pub fn new(table: ColorTable) -> Self {
        Self {
            table,
            cache: HashMap::new(),
        }
    }

    /// Default foreground/background.
    pub const fn default_pair(&self) -> ColorPair {
        self.table.default_pair()
    }

    /// Drop memoized lookups.
    pub fn begin_pass(&mut self) {
        self.cache.clear();
    }

    /// Number of distinct scopes resolved this pass.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Resolve a scope, consulting the per-pass cache first.
    pub fn resolve(&mut self, scope: &str) -> ColorPair {
        if let Some(pair) = self.cache.get(scope) {
            return *pair;
        }
        let pair = self.table.lookup(scope);
        self.cache.insert(scope.to_string(), pair);
        pair
    }
}
