//! Cell: The atomic unit of terminal display.
//!
//! # Memory Layout
//!
//! Colors are palette indices rather than true color, so a cell packs into
//! 8 bytes (8 cells per cache line):
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Cell Layout (8 bytes)                       │
//! ├──────────────┬──────┬──────┬───────┬─────────┤
//! │    glyph     │  fg  │  bg  │  mod  │ padding │
//! │    char      │  u8  │  u8  │  u8   │   u8    │
//! └──────────────┴──────┴──────┴───────┴─────────┘
//! ```

use crate::style::{ColorIndex, ColorPair};
use bitflags::bitflags;

bitflags! {
    /// Text style modifiers.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use termview::Modifiers;
    /// let style = Modifiers::UNDERLINE | Modifiers::REVERSED;
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Underlined text
        const UNDERLINE = 0b0000_1000;
        /// Reversed colors (fg/bg swapped)
        const REVERSED = 0b0010_0000;
    }
}

impl std::fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Colors plus modifiers for one cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Style {
    /// Foreground palette index.
    pub fg: ColorIndex,
    /// Background palette index.
    pub bg: ColorIndex,
    /// Text modifiers.
    pub modifiers: Modifiers,
}

impl Style {
    /// Create a style without modifiers.
    #[inline]
    pub const fn new(fg: ColorIndex, bg: ColorIndex) -> Self {
        Self {
            fg,
            bg,
            modifiers: Modifiers::empty(),
        }
    }

    /// Add modifiers (builder pattern).
    #[inline]
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl From<ColorPair> for Style {
    #[inline]
    fn from(pair: ColorPair) -> Self {
        Self::new(pair.fg, pair.bg)
    }
}

/// A single terminal cell.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    glyph: char,
    fg: ColorIndex,
    bg: ColorIndex,
    modifiers: Modifiers,
    _padding: u8,
}

// Compile-time assertion: Cell must be exactly 8 bytes
const _: () = assert!(
    std::mem::size_of::<Cell>() == 8,
    "Cell must be exactly 8 bytes for cache efficiency"
);

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Cell {
    /// An empty cell (space, white on black).
    pub const EMPTY: Self = Self::new(' ', Style::new(ColorIndex::WHITE, ColorIndex::BLACK));

    /// Create a cell.
    #[inline]
    pub const fn new(glyph: char, style: Style) -> Self {
        Self {
            glyph,
            fg: style.fg,
            bg: style.bg,
            modifiers: style.modifiers,
            _padding: 0,
        }
    }

    /// The glyph in this cell.
    #[inline]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Get the foreground color.
    #[inline]
    pub const fn fg(&self) -> ColorIndex {
        self.fg
    }

    /// Get the background color.
    #[inline]
    pub const fn bg(&self) -> ColorIndex {
        self.bg
    }

    /// Get the modifiers.
    #[inline]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Colors and modifiers together.
    #[inline]
    pub const fn style(&self) -> Style {
        Style {
            fg: self.fg,
            bg: self.bg,
            modifiers: self.modifiers,
        }
    }
}

/// Glyph actually stored for `c`.
///
/// The grid is one narrow glyph per cell, so characters that do not occupy
/// exactly one column (wide, zero-width or control) become U+FFFD.
#[inline]
pub fn cell_glyph(c: char) -> char {
    match unicode_width::UnicodeWidthChar::width(c) {
        Some(1) => c,
        _ => char::REPLACEMENT_CHARACTER,
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("glyph", &self.glyph)
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}
