//! Color quantization from theme RGB to terminal palette indices.
//!
//! Two strategies, chosen once at startup:
//!
//! - **High depth**: the palette grows with every distinct theme color and is
//!   later programmed into the terminal, so quantization is exact.
//! - **Low depth**: colors snap to the nearest of the 8 base colors by
//!   Manhattan distance.

use super::color::{ColorDepth, ColorIndex, Rgb};
use crate::error::{Error, Result};

/// Hardware limit for programmable palette entries.
pub const MAX_PALETTE_LEN: usize = 256;

/// The 8 base terminal colors in ANSI order.
pub const BASE_COLORS: [Rgb; 8] = [
    Rgb::new(0, 0, 0),       // black
    Rgb::new(255, 0, 0),     // red
    Rgb::new(0, 255, 0),     // green
    Rgb::new(255, 255, 0),   // yellow
    Rgb::new(0, 0, 255),     // blue
    Rgb::new(255, 0, 255),   // magenta
    Rgb::new(0, 255, 255),   // cyan
    Rgb::new(255, 255, 255), // white
];

/// The active palette.
#[derive(Debug, Clone)]
pub enum Palette {
    /// Append-only list of exact theme colors.
    High(Vec<Rgb>),
    /// Fixed base table.
    Low,
}

impl Palette {
    /// Create an empty palette for the given depth.
    pub fn new(depth: ColorDepth) -> Self {
        match depth {
            ColorDepth::High => Self::High(Vec::with_capacity(MAX_PALETTE_LEN)),
            ColorDepth::Low => Self::Low,
        }
    }

    /// Entries addressable by index.
    pub fn colors(&self) -> &[Rgb] {
        match self {
            Self::High(colors) => colors,
            Self::Low => &BASE_COLORS,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors().len()
    }

    /// Whether the palette holds no entries yet.
    pub fn is_empty(&self) -> bool {
        self.colors().is_empty()
    }

    /// Map a theme color to a palette index.
    ///
    /// High depth grows the palette by at most one entry per call and fails
    /// with [`Error::PaletteFull`] once the hardware limit is reached.
    pub fn quantize(&mut self, color: Rgb) -> Result<ColorIndex> {
        match self {
            Self::High(colors) => {
                if let Some(i) = colors.iter().position(|&c| c == color) {
                    return Ok(index(i));
                }
                if colors.len() >= MAX_PALETTE_LEN {
                    return Err(Error::PaletteFull(colors.len()));
                }
                colors.push(color);
                Ok(index(colors.len() - 1))
            }
            Self::Low => Ok(nearest(&BASE_COLORS, color)),
        }
    }
}

/// Index of the entry closest to `color`; the first one wins a tie.
fn nearest(table: &[Rgb], color: Rgb) -> ColorIndex {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (i, &candidate) in table.iter().enumerate() {
        let distance = candidate.manhattan(color);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    index(best)
}

#[inline]
fn index(i: usize) -> ColorIndex {
    ColorIndex(u8::try_from(i).unwrap_or(u8::MAX))
}
