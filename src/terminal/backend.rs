//! `CrosstermTerminal`: the real terminal behind a [`Surface`].
//!
//! Owns the terminal modes and a pair of grids. Cells are written into the
//! next grid; `flush` diffs it against what is on screen and writes the
//! escape sequences in one syscall.

use super::{OutputBuffer, Surface};
use crate::grid::diff::{render_diff, render_full, DiffState};
use crate::grid::{Grid, Style};
use crate::style::{ColorDepth, ColorIndex, Palette};
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout};
use std::time::Instant;

/// Terminal surface using crossterm for mode switching.
pub struct CrosstermTerminal {
    /// Grid currently on screen.
    current: Grid,
    /// Grid being drawn.
    next: Grid,
    /// Diff state for cursor/color tracking.
    diff_state: DiffState,
    /// Pre-allocated output buffer.
    output: OutputBuffer,
    stdout: Stdout,
    depth: ColorDepth,
    needs_full_redraw: bool,
    alternate_screen: bool,
    palette_installed: bool,
    frames: u64,
}

impl CrosstermTerminal {
    /// Take over the terminal: raw mode, optional alternate screen, hidden
    /// cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be queried or switched into
    /// raw mode.
    pub fn new(depth: ColorDepth, alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;
        tracing::info!(width, height, ?depth, alternate_screen, "terminal initialized");

        Ok(Self {
            current: Grid::new(width, height),
            next: Grid::new(width, height),
            diff_state: DiffState::new(),
            output: OutputBuffer::with_capacity(65536),
            stdout,
            depth,
            needs_full_redraw: true,
            alternate_screen,
            palette_installed: false,
            frames: 0,
        })
    }

    /// Program the terminal palette with the quantized theme colors.
    ///
    /// Only high depth has a palette to install; the terminal's own palette
    /// is restored on drop.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn install_palette(&mut self, palette: &Palette) -> io::Result<()> {
        let ColorDepth::High = self.depth else {
            return Ok(());
        };
        self.output.clear();
        for (i, &color) in palette.colors().iter().enumerate() {
            let Ok(index) = u8::try_from(i) else {
                break;
            };
            self.output.set_palette_entry(ColorIndex(index), color);
        }
        self.output.flush_to(&mut self.stdout)?;
        self.palette_installed = true;
        tracing::debug!(entries = palette.len(), "installed palette");
        Ok(())
    }
}

impl Surface for CrosstermTerminal {
    fn size(&self) -> (u16, u16) {
        (self.next.width(), self.next.height())
    }

    fn clear(&mut self, style: Style) {
        self.next.fill(style);
    }

    fn set_cell(&mut self, x: u16, y: u16, glyph: char, style: Style) {
        self.next.set_cell(x, y, glyph, style);
    }

    fn flush(&mut self) -> io::Result<()> {
        let start = Instant::now();
        self.output.clear();

        if self.needs_full_redraw {
            render_full(&self.next, &mut self.output, &mut self.diff_state, self.depth);
            self.needs_full_redraw = false;
        } else {
            let result = render_diff(
                &self.current,
                &self.next,
                &mut self.output,
                &mut self.diff_state,
                self.depth,
            );
            tracing::trace!(
                cells = result.cells_changed,
                moves = result.cursor_moves,
                colors = result.color_changes,
                "diffed frame"
            );
        }

        if !self.output.is_empty() {
            self.output.flush_to(&mut self.stdout)?;
        }
        self.current.copy_from(&self.next);
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            bytes = self.output.len(),
            elapsed_us = start.elapsed().as_micros(),
            "flushed"
        );
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.current.resize(width, height);
        self.next.resize(width, height);
        self.needs_full_redraw = true;
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        self.output.clear();
        if self.palette_installed {
            self.output.reset_palette();
        }
        self.output.reset_attrs();
        let _ = self.output.flush_to(&mut self.stdout);

        // Restore terminal state
        let _ = execute!(self.stdout, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(self.stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        tracing::info!(frames = self.frames, "terminal restored");
    }
}
