//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::grid::Modifiers;
use crate::style::{ColorDepth, ColorIndex, Rgb};
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// All output is accumulated here, then flushed in a single `write()` syscall
/// to prevent terminal flickering.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write one glyph.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut encoded = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut encoded).as_bytes());
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    ///
    /// Uses the most compact representation.
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        let row = u32::from(y) + 1;
        let col = u32::from(x) + 1;
        if row == 1 && col == 1 {
            self.data.extend_from_slice(b"\x1b[H");
        } else if col == 1 {
            let _ = write!(self.data, "\x1b[{row}H");
        } else {
            let _ = write!(self.data, "\x1b[{row};{col}H");
        }
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Set foreground color by palette index.
    ///
    /// Low depth uses the 8-color SGR range so it works on terminals without
    /// 256-color support.
    #[inline]
    pub fn set_fg(&mut self, color: ColorIndex, depth: ColorDepth) {
        match depth {
            ColorDepth::Low if color.0 < 8 => {
                let _ = write!(self.data, "\x1b[{}m", 30 + u16::from(color.0));
            }
            _ => {
                let _ = write!(self.data, "\x1b[38;5;{}m", color.0);
            }
        }
    }

    /// Set background color by palette index.
    #[inline]
    pub fn set_bg(&mut self, color: ColorIndex, depth: ColorDepth) {
        match depth {
            ColorDepth::Low if color.0 < 8 => {
                let _ = write!(self.data, "\x1b[{}m", 40 + u16::from(color.0));
            }
            _ => {
                let _ = write!(self.data, "\x1b[48;5;{}m", color.0);
            }
        }
    }

    /// Emit SGR sequences for a set of modifiers.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::UNDERLINE) {
            self.data.extend_from_slice(b"\x1b[4m");
        }
        if modifiers.contains(Modifiers::REVERSED) {
            self.data.extend_from_slice(b"\x1b[7m");
        }
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Program one palette slot (OSC 4).
    pub fn set_palette_entry(&mut self, index: ColorIndex, color: Rgb) {
        let _ = write!(
            self.data,
            "\x1b]4;{};rgb:{:02x}/{:02x}/{:02x}\x1b\\",
            index.0, color.r, color.g, color.b
        );
    }

    /// Restore the terminal's own palette (OSC 104).
    #[inline]
    pub fn reset_palette(&mut self) {
        self.data.extend_from_slice(b"\x1b]104\x1b\\");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
