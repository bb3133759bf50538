//! Viewport: which lines of a buffer a view shows.
//!
//! A [`Layout`] pairs a screen rectangle with a window of whole buffer lines
//! exactly as tall as the rectangle (when the buffer has enough lines). The
//! window moves only as far as needed to bring a requested region into view,
//! and is re-validated lazily whenever the buffer's change counter moves.

use super::{Rect, Region};
use crate::model::{TextBuffer, ViewId};
use std::collections::BTreeMap;

/// Per-view render state.
#[derive(Debug, Clone)]
pub struct Layout {
    rect: Rect,
    visible: Region,
    /// Half-open line window `[start, end)` backing `visible`.
    rows: (usize, usize),
    last_update: u64,
}

impl Layout {
    /// Create a layout showing the top of the buffer.
    pub fn new(rect: Rect, buffer: &dyn TextBuffer) -> Self {
        let mut layout = Self {
            rect,
            visible: Region::default(),
            rows: (0, 0),
            last_update: buffer.change_count(),
        };
        layout.clip_to_height(buffer, 0, rows_isize(rect.height));
        layout
    }

    /// Screen rectangle.
    #[inline]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Cached window without re-validation.
    #[inline]
    pub const fn cached(&self) -> Region {
        self.visible
    }

    /// Line window `[start, end)` without re-validation.
    #[inline]
    pub const fn rows(&self) -> (usize, usize) {
        self.rows
    }

    /// Whether the cached window matches the buffer's change counter.
    #[inline]
    pub fn is_fresh(&self, buffer: &dyn TextBuffer) -> bool {
        self.last_update == buffer.change_count()
    }

    /// The visible region, re-validated if the buffer changed since it was
    /// last computed.
    pub fn visible(&mut self, buffer: &dyn TextBuffer) -> Region {
        if !self.is_fresh(buffer) {
            tracing::trace!(
                stamp = self.last_update,
                change_count = buffer.change_count(),
                "re-validating stale viewport"
            );
            self.reveal(buffer, self.visible);
        }
        self.visible
    }

    /// Scroll the minimum distance needed to show `requested`.
    ///
    /// A fresh window that already shows every line of `requested` is left
    /// alone. Otherwise the window keeps its height and moves in one
    /// direction only, by however far the moving edge of the combined line
    /// range overshoots the old window.
    pub fn reveal(&mut self, buffer: &dyn TextBuffer, requested: Region) {
        let wanted = line_span(buffer, requested);
        let shown = Region::new(self.rows.0, self.rows.1);
        if self.is_fresh(buffer) && shown.covers(wanted) {
            return;
        }

        let hull = shown.cover(wanted);
        let (os, oe) = (shown.begin(), shown.end());
        let above = os - hull.begin();
        let below = hull.end() - oe;
        let height = rows_isize(self.rect.height);
        let (start, end) = if below > above {
            let end = to_isize(oe + below);
            (end - height, end)
        } else {
            let start = to_isize(os) - to_isize(above);
            (start, start + height)
        };
        self.clip_to_height(buffer, start, end);
    }

    /// Reveal whole lines `[start, end)`.
    pub fn reveal_rows(&mut self, buffer: &dyn TextBuffer, start: usize, end: usize) {
        let region = Region::new(buffer.text_point(start, 0), buffer.text_point(end, 0));
        self.reveal(buffer, region);
    }

    /// Force the window `[start, end)` to exactly the view height and into
    /// the buffer's bounds, then cache it.
    ///
    /// The window keeps `start` and takes `end = start + height`. If that
    /// runs past the last line, both ends are pulled back by the shortfall;
    /// a negative start is shifted forward by one view height. A buffer
    /// shorter than the view yields a window of all its lines.
    pub fn clip_to_height(&mut self, buffer: &dyn TextBuffer, start: isize, end: isize) {
        let height = rows_isize(self.rect.height);
        let lines = to_isize(buffer.line_count());
        let mut start = start;
        if end - start != height {
            tracing::trace!(start, end, height, "forcing window height");
        }
        let end = start + height;
        if end > lines {
            start -= end - lines;
        }
        if start < 0 {
            start += height;
        }
        // Still negative after the shift, or the buffer is shorter than the view.
        if start < 0 || lines < height {
            start = 0;
        }
        let end = start + height;

        let start = usize::try_from(start).unwrap_or(0);
        let end = usize::try_from(end).unwrap_or(0).min(buffer.line_count());
        self.rows = (start, end.max(start));
        self.visible = Region::new(buffer.text_point(start, 0), buffer.text_point(end, 0));
        self.last_update = buffer.change_count();
    }

    /// Move the view to a new rectangle, keeping the first visible line.
    pub fn set_rect(&mut self, rect: Rect, buffer: &dyn TextBuffer) {
        self.rect = rect;
        let start = to_isize(self.rows.0);
        self.clip_to_height(buffer, start, start + rows_isize(rect.height));
    }
}

/// Lines touched by a region, as the line range `[first, last + 1)`.
///
/// The end offset of a non-empty region is exclusive, so a region ending at
/// the start of a line does not touch that line.
fn line_span(buffer: &dyn TextBuffer, region: Region) -> Region {
    let first = buffer.row_col(region.begin()).0;
    if region.is_empty() {
        return Region::new(first, first + 1);
    }
    let last = buffer.row_col(region.end() - 1).0;
    Region::new(first, last.max(first) + 1)
}

#[inline]
fn to_isize(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

#[inline]
fn rows_isize(rows: u16) -> isize {
    to_isize(usize::from(rows))
}

/// Layouts of all live views, keyed by view id.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    layouts: BTreeMap<ViewId, Layout>,
}

impl LayoutRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The layout for `id` placed at `rect`: created on first sight, moved
    /// (keeping its first line) if it was last shown elsewhere.
    pub fn place(&mut self, id: ViewId, rect: Rect, buffer: &dyn TextBuffer) -> &mut Layout {
        let layout = self.layouts.entry(id).or_insert_with(|| {
            tracing::debug!(view = %id, ?rect, "creating layout");
            Layout::new(rect, buffer)
        });
        if layout.rect() != rect {
            tracing::debug!(view = %id, from = ?layout.rect(), to = ?rect, "moving layout");
            layout.set_rect(rect, buffer);
        }
        layout
    }

    /// Existing layout for `id`.
    pub fn get(&self, id: ViewId) -> Option<&Layout> {
        self.layouts.get(&id)
    }

    /// Existing layout for `id`, mutably.
    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut Layout> {
        self.layouts.get_mut(&id)
    }

    /// Drop the layout of a closed view.
    pub fn remove(&mut self, id: ViewId) -> Option<Layout> {
        let removed = self.layouts.remove(&id);
        if removed.is_some() {
            tracing::debug!(view = %id, "dropped layout");
        }
        removed
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether no layouts exist.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::memory::MemoryBuffer;

    fn lines(n: usize) -> MemoryBuffer {
        let text: Vec<String> = (0..n).map(|i| format!("line {i}")).collect();
        MemoryBuffer::from_text(&text.join("\n"))
    }

    fn layout(buffer: &MemoryBuffer, height: u16) -> Layout {
        Layout::new(Rect::new(0, 0, 20, height), buffer)
    }

    #[test]
    fn test_new_layout_shows_top() {
        let buffer = lines(10);
        let layout = layout(&buffer, 5);
        assert_eq!(layout.rows(), (0, 5));
        assert_eq!(layout.cached(), Region::new(0, buffer.text_point(5, 0)));
    }

    #[test]
    fn test_caret_on_last_line_scrolls_to_bottom() {
        let buffer = lines(10);
        let mut layout = layout(&buffer, 5);
        layout.reveal(&buffer, Region::caret(buffer.text_point(9, 0)));

        assert_eq!(layout.rows(), (5, 10));
        assert_eq!(
            layout.cached(),
            Region::new(buffer.text_point(5, 0), buffer.len())
        );
    }

    #[test]
    fn test_scroll_down_by_minimum() {
        let buffer = lines(50);
        let mut layout = layout(&buffer, 5);
        layout.reveal(&buffer, Region::caret(buffer.text_point(6, 2)));
        // Caret becomes the last visible line, not centered
        assert_eq!(layout.rows(), (2, 7));
    }

    #[test]
    fn test_scroll_up_by_minimum() {
        let buffer = lines(50);
        let mut layout = layout(&buffer, 5);
        layout.reveal_rows(&buffer, 20, 25);
        assert_eq!(layout.rows(), (20, 25));

        layout.reveal(&buffer, Region::caret(buffer.text_point(17, 0)));
        assert_eq!(layout.rows(), (17, 22));
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let buffer = lines(30);
        let mut layout = layout(&buffer, 5);
        let caret = Region::caret(buffer.text_point(12, 1));
        layout.reveal(&buffer, caret);
        let first = layout.cached();
        layout.reveal(&buffer, caret);
        assert_eq!(layout.cached(), first);
        assert_eq!(layout.rows(), (8, 13));
    }

    #[test]
    fn test_region_ending_at_line_start_does_not_scroll() {
        let buffer = lines(10);
        let mut layout = layout(&buffer, 5);
        // Lines 3..5, end offset is the start of line 5
        let region = Region::new(buffer.text_point(3, 0), buffer.text_point(5, 0));
        layout.reveal(&buffer, region);
        assert_eq!(layout.rows(), (0, 5));
    }

    #[test]
    fn test_clip_to_height_is_exact() {
        let buffer = lines(12);
        let mut layout = layout(&buffer, 5);
        for (start, end) in [(-3, 1), (0, 0), (4, 20), (10, 12), (11, 30), (-10, -2), (7, 12)] {
            layout.clip_to_height(&buffer, start, end);
            let (s, e) = layout.rows();
            assert_eq!(e - s, 5, "window for ({start}, {end})");
            assert!(e <= 12);
        }
    }

    #[test]
    fn test_negative_start_shifts_by_height() {
        let buffer = lines(12);
        let mut layout = layout(&buffer, 5);
        layout.clip_to_height(&buffer, -3, 2);
        assert_eq!(layout.rows(), (2, 7));

        // Too far back for one shift
        layout.clip_to_height(&buffer, -9, -4);
        assert_eq!(layout.rows(), (0, 5));
    }

    #[test]
    fn test_short_buffer_shows_all_lines() {
        let buffer = lines(3);
        let mut layout = layout(&buffer, 5);
        assert_eq!(layout.rows(), (0, 3));
        layout.reveal(&buffer, Region::caret(buffer.len()));
        assert_eq!(layout.rows(), (0, 3));
        assert_eq!(layout.cached(), Region::new(0, buffer.len()));
    }

    #[test]
    fn test_stale_window_is_revalidated() {
        let mut buffer = lines(10);
        let mut layout = layout(&buffer, 5);
        layout.reveal_rows(&buffer, 5, 10);
        assert_eq!(layout.rows(), (5, 10));

        // Shrink the buffer under the layout
        buffer.replace_all("a\nb\nc\nd\ne\nf");
        assert!(!layout.is_fresh(&buffer));
        let visible = layout.visible(&buffer);

        assert!(layout.is_fresh(&buffer));
        assert_eq!(layout.rows(), (1, 6));
        assert_eq!(visible, Region::new(buffer.text_point(1, 0), buffer.len()));
    }

    #[test]
    fn test_set_rect_reclips() {
        let buffer = lines(20);
        let mut layout = layout(&buffer, 5);
        layout.reveal_rows(&buffer, 15, 20);
        layout.set_rect(Rect::new(0, 0, 20, 8), &buffer);
        assert_eq!(layout.rows(), (12, 20));
    }

    #[test]
    fn test_registry_lifecycle() {
        let buffer = lines(4);
        let mut registry = LayoutRegistry::new();
        let id = ViewId(7);
        assert_eq!(registry.place(id, Rect::new(0, 0, 10, 2), &buffer).rows(), (0, 2));
        // Existing layout is moved, not replaced
        let layout = registry.place(id, Rect::new(0, 3, 10, 9), &buffer);
        assert_eq!(layout.rect(), Rect::new(0, 3, 10, 9));
        assert_eq!(layout.rows(), (0, 4));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(id).is_some());
        assert!(registry.is_empty());
        assert!(registry.remove(id).is_none());
    }
}
