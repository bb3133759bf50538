//! Diffing Engine: Generate minimal ANSI sequences from grid changes.
//!
//! Compares the grid currently on screen with the next frame and emits cursor
//! moves, SGR color changes and glyphs only for the cells that differ. Color
//! state is tracked across cells so runs of identically styled text cost one
//! SGR sequence.

use super::{Cell, Grid, Modifiers};
use crate::style::{ColorDepth, ColorIndex};
use crate::terminal::OutputBuffer;

/// Terminal state as last emitted.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    fg: Option<ColorIndex>,
    bg: Option<ColorIndex>,
    modifiers: Option<Modifiers>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Forget everything (e.g., after a full screen clear).
    pub fn reset(&mut self) {
        self.fg = None;
        self.bg = None;
        self.modifiers = None;
        // Force cursor move on next write
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }
}

/// Statistics of a diff pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
}

/// Render the difference between two grids of equal size.
pub fn render_diff(
    current: &Grid,
    next: &Grid,
    out: &mut OutputBuffer,
    state: &mut DiffState,
    depth: ColorDepth,
) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let width = next.width();

    for (i, (old, new)) in current.cells().iter().zip(next.cells()).enumerate() {
        if old == new {
            continue;
        }
        // Bounded by the grid dimensions, which are u16.
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = ((i % width as usize) as u16, (i / width as usize) as u16);
        result.cells_changed += 1;

        if state.cursor_y != y || state.cursor_x != x {
            out.cursor_move(x, y);
            state.cursor_x = x;
            state.cursor_y = y;
            result.cursor_moves += 1;
        }

        emit_cell(out, new, state, depth, &mut result);
        state.cursor_x = state.cursor_x.saturating_add(1);
    }

    result
}

/// Emit style transitions and the glyph for one cell.
fn emit_cell(
    out: &mut OutputBuffer,
    cell: &Cell,
    state: &mut DiffState,
    depth: ColorDepth,
    result: &mut DiffResult,
) {
    // Removing a modifier needs a full reset, which also drops the colors.
    let mods = cell.modifiers();
    let current = state.modifiers.unwrap_or(Modifiers::empty());
    if !current.difference(mods).is_empty() {
        out.reset_attrs();
        state.fg = None;
        state.bg = None;
        state.modifiers = None;
    }

    if state.fg != Some(cell.fg()) {
        out.set_fg(cell.fg(), depth);
        state.fg = Some(cell.fg());
        result.color_changes += 1;
    }
    if state.bg != Some(cell.bg()) {
        out.set_bg(cell.bg(), depth);
        state.bg = Some(cell.bg());
        result.color_changes += 1;
    }
    if state.modifiers != Some(mods) {
        let added = mods.difference(state.modifiers.unwrap_or(Modifiers::empty()));
        out.set_modifiers(added);
        state.modifiers = Some(mods);
    }

    out.write_char(cell.glyph());
}

/// Generate a full redraw sequence (no diffing).
///
/// Used for the first frame and after a resize, when what the terminal shows
/// is unknown.
pub fn render_full(grid: &Grid, out: &mut OutputBuffer, state: &mut DiffState, depth: ColorDepth) {
    out.cursor_hide();
    out.reset_attrs();
    out.clear_screen();
    state.reset();

    let mut result = DiffResult::default();
    for (y, row) in grid.rows().enumerate() {
        // Row count is bounded by the u16 grid height.
        #[allow(clippy::cast_possible_truncation)]
        let y = y as u16;
        out.cursor_move(0, y);
        state.cursor_x = 0;
        state.cursor_y = y;
        for cell in row {
            emit_cell(out, cell, state, depth, &mut result);
            state.cursor_x = state.cursor_x.saturating_add(1);
        }
    }
}
