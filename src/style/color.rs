//! Color primitives: theme RGB values and terminal color indices.

use crate::error::{Error, Result};

/// True-color RGB as written in a theme.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse `#rrggbb` or `#rgb`.
    ///
    /// TextMate themes sometimes carry an alpha suffix (`#rrggbbaa`); the alpha
    /// byte is ignored.
    pub fn parse_hex(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        match digits.len() {
            3 => {
                let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                let expand = |nibble: u32| u8::try_from(nibble * 0x11).unwrap_or(u8::MAX);
                Ok(Self::new(
                    expand((value >> 8) & 0xF),
                    expand((value >> 4) & 0xF),
                    expand(value & 0xF),
                ))
            }
            6 | 8 => {
                let value = u32::from_str_radix(&digits[..6], 16).map_err(|_| invalid())?;
                Ok(Self::from_u32(value))
            }
            _ => Err(invalid()),
        }
    }

    /// Manhattan distance between two colors (`|dR| + |dG| + |dB|`).
    #[inline]
    pub const fn manhattan(self, other: Self) -> u32 {
        (self.r.abs_diff(other.r) as u32)
            + (self.g.abs_diff(other.g) as u32)
            + (self.b.abs_diff(other.b) as u32)
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// A terminal-native color: an index into the active palette.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct ColorIndex(pub u8);

impl ColorIndex {
    /// Base-table black.
    pub const BLACK: Self = Self(0);
    /// Base-table white.
    pub const WHITE: Self = Self(7);
}

/// How many colors the terminal can address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ColorDepth {
    /// 256 programmable palette entries.
    High,
    /// The 8 base colors.
    Low,
}

impl ColorDepth {
    /// Pick a depth from the color count a terminal reports.
    pub const fn for_color_count(count: u16) -> Self {
        if count >= 256 {
            Self::High
        } else {
            Self::Low
        }
    }
}
