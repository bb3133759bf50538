//! Glyph compositor: paints the visible text of a view into its rectangle.
//!
//! The walk goes character by character over the visible region, tracking a
//! column and row relative to the view's rectangle. Colors come from the
//! style resolver and are only looked up again when the scope string changes
//! from one character to the next. Selection and caret are applied on top as
//! cell modifiers.

use crate::grid::{cell_glyph, Modifiers, Style};
use crate::layout::{Layout, Region};
use crate::model::{View, ViewSettings};
use crate::style::StyleResolver;
use crate::terminal::Surface;

/// State shared by every view in a render pass.
///
/// Owned by the scheduler thread; the compositor only reads the blink flag.
#[derive(Debug)]
pub struct RenderContext {
    /// Scope to color lookup.
    pub resolver: StyleResolver,
    /// Blink phase: whether blinking carets are currently shown.
    pub blink_visible: bool,
}

impl RenderContext {
    /// A context with the caret shown.
    pub fn new(resolver: StyleResolver) -> Self {
        Self {
            resolver,
            blink_visible: true,
        }
    }

    /// Flip the blink phase.
    pub fn toggle_blink(&mut self) {
        self.blink_visible = !self.blink_visible;
    }

    /// Default colors as a cell style.
    pub fn default_style(&self) -> Style {
        Style::from(self.resolver.default_pair())
    }
}

/// Modifiers the selection adds to the character at `offset`.
///
/// Regions are checked in order and the first match wins. A caret at the
/// offset matches even while blinked off, which leaves the cell plain. A
/// non-empty region highlights the character only if it contains both
/// `offset` and `offset + 1`, so a selection ending at an offset does not
/// paint the character there.
pub fn selection_overlay(
    selection: &[Region],
    offset: usize,
    show_caret: bool,
    caret: Modifiers,
) -> Option<Modifiers> {
    for region in selection {
        if region.is_empty() {
            if region.a == offset {
                return show_caret.then_some(caret);
            }
        } else if region.contains(offset) && region.contains(offset + 1) {
            return Some(Modifiers::REVERSED);
        }
    }
    None
}

/// Cursor over the rectangle, in columns/rows relative to its corner.
struct Pen<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    layout: &'a Layout,
    col: usize,
    row: usize,
}

impl<S: Surface + ?Sized> Pen<'_, S> {
    /// Paint at the current position if it is inside the rectangle.
    fn put(&mut self, glyph: char, style: Style) {
        let rect = self.layout.rect();
        if self.col >= usize::from(rect.width) || self.row >= usize::from(rect.height) {
            return;
        }
        // Both bounded by the rectangle dimensions above.
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = (rect.x + self.col as u16, rect.y + self.row as u16);
        self.surface.set_cell(x, y, cell_glyph(glyph), style);
    }

    fn below_rect(&self) -> bool {
        self.row >= usize::from(self.layout.rect().height)
    }
}

/// Paint one view.
///
/// Cells of the rectangle not covered by text are left as they are; the
/// caller clears the surface first.
pub fn render_view<S: Surface + ?Sized>(
    surface: &mut S,
    view: &dyn View,
    layout: &mut Layout,
    ctx: &mut RenderContext,
) {
    let buffer = view.buffer();
    let visible = layout.visible(buffer);
    if layout.rect().is_empty() {
        return;
    }

    let settings = ViewSettings::read(view);
    let tab_width = usize::from(settings.tab_width.max(1));
    let caret = settings.caret_modifiers();
    let show_caret = !settings.caret_blink || ctx.blink_visible;
    let selection = view.selection();
    let text = buffer.substr(visible);

    let mut pen = Pen {
        surface,
        layout,
        col: 0,
        row: 0,
    };
    let mut last_scope: Option<&str> = None;
    let mut base = ctx.default_style();

    for (offset, ch) in (visible.begin()..).zip(text.chars()) {
        let scope = view.scope_name(offset);
        if last_scope != Some(scope) {
            base = ctx.resolver.resolve(scope).into();
            last_scope = Some(scope);
        }
        let mut style = base;
        if let Some(overlay) = selection_overlay(selection, offset, show_caret, caret) {
            style.modifiers |= overlay;
        }

        match ch {
            '\t' => {
                let stop = (pen.col / tab_width + 1) * tab_width;
                while pen.col < stop {
                    pen.put(' ', style);
                    style.modifiers.remove(Modifiers::UNDERLINE);
                    pen.col += 1;
                }
            }
            '\n' => {
                pen.put(' ', style);
                pen.col = 0;
                pen.row += 1;
                if pen.below_rect() {
                    return;
                }
            }
            glyph => {
                pen.put(glyph, style);
                pen.col += 1;
            }
        }
    }

    // A caret at the end of the buffer has no character under it.
    let end = visible.end();
    if end == buffer.len() {
        if let Some(overlay) = selection_overlay(selection, end, show_caret, caret) {
            let style = ctx.default_style();
            pen.put(' ', style.with_modifiers(style.modifiers | overlay));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::layout::Rect;
    use crate::model::memory::MemoryModel;
    use crate::model::{EditorModel, SettingValue, ViewId};
    use crate::style::{ColorIndex, ColorPair, ColorTable};

    const DEFAULT: ColorPair = ColorPair::new(ColorIndex(7), ColorIndex(0));
    const KEYWORD: ColorPair = ColorPair::new(ColorIndex(3), ColorIndex(0));
    const STRING: ColorPair = ColorPair::new(ColorIndex(2), ColorIndex(4));

    fn ctx() -> RenderContext {
        let table = ColorTable::from_pairs(
            DEFAULT,
            [("keyword", KEYWORD), ("string.quoted", STRING)],
        );
        RenderContext::new(StyleResolver::new(table))
    }

    fn model(text: &str) -> (MemoryModel, ViewId) {
        let mut model = MemoryModel::new();
        let id = model.new_view(text);
        (model, id)
    }

    fn render(model: &MemoryModel, id: ViewId, rect: Rect, ctx: &mut RenderContext) -> Grid {
        let mut grid = Grid::new(rect.right().max(1), rect.bottom().max(1));
        let view = model.view(id).unwrap();
        let mut layout = Layout::new(rect, view.buffer());
        render_view(&mut grid, view, &mut layout, ctx);
        grid
    }

    #[test]
    fn test_tab_expands_to_next_stop() {
        let (model, id) = model("a\tb");
        let grid = render(&model, id, Rect::new(0, 0, 8, 1), &mut ctx());
        assert_eq!(grid.row_text(0), "a   b   ");
        assert_eq!(grid.get(4, 0).unwrap().glyph(), 'b');
    }

    #[test]
    fn test_tab_stops_relative_to_rect() {
        let (mut model, id) = model("ab\tc");
        model.view_mut(id).unwrap().set_setting("tab_size", SettingValue::Int(3));
        let grid = render(&model, id, Rect::new(2, 0, 8, 1), &mut ctx());
        assert_eq!(grid.row_text(0), "  ab c    ");
    }

    #[test]
    fn test_tab_under_caret_underlines_first_cell_only() {
        let (model, id) = model("\tx");
        let grid = render(&model, id, Rect::new(0, 0, 6, 1), &mut ctx());
        assert_eq!(grid.get(0, 0).unwrap().modifiers(), Modifiers::UNDERLINE);
        for x in 1..4 {
            assert!(grid.get(x, 0).unwrap().modifiers().is_empty());
        }
    }

    #[test]
    fn test_caret_follows_blink_phase() {
        let (mut model, id) = model("abc");
        model.view_mut(id).unwrap().set_selection(vec![Region::caret(1)]);
        let rect = Rect::new(0, 0, 5, 1);
        let mut ctx = ctx();

        let grid = render(&model, id, rect, &mut ctx);
        assert_eq!(grid.get(1, 0).unwrap().modifiers(), Modifiers::UNDERLINE);
        assert!(grid.get(0, 0).unwrap().modifiers().is_empty());

        ctx.toggle_blink();
        let grid = render(&model, id, rect, &mut ctx);
        assert!(grid.get(1, 0).unwrap().modifiers().is_empty());

        // Blink disabled: always drawn
        model.view_mut(id).unwrap().set_setting("caret_blink", SettingValue::Bool(false));
        let grid = render(&model, id, rect, &mut ctx);
        assert_eq!(grid.get(1, 0).unwrap().modifiers(), Modifiers::UNDERLINE);
    }

    #[test]
    fn test_block_caret() {
        let (mut model, id) = model("abc");
        let view = model.view_mut(id).unwrap();
        view.set_selection(vec![Region::caret(2)]);
        view.set_setting("caret_style", SettingValue::Str("block".into()));
        let grid = render(&model, id, Rect::new(0, 0, 5, 1), &mut ctx());
        assert_eq!(grid.get(2, 0).unwrap().modifiers(), Modifiers::REVERSED);
    }

    #[test]
    fn test_caret_at_end_of_buffer() {
        let (mut model, id) = model("ab");
        model.view_mut(id).unwrap().set_selection(vec![Region::caret(2)]);
        let grid = render(&model, id, Rect::new(0, 0, 5, 1), &mut ctx());
        assert_eq!(grid.get(2, 0).unwrap().modifiers(), Modifiers::UNDERLINE);
    }

    #[test]
    fn test_selection_excludes_end_offset() {
        let (mut model, id) = model("abcdef");
        model.view_mut(id).unwrap().set_selection(vec![Region::new(4, 1)]);
        let grid = render(&model, id, Rect::new(0, 0, 6, 1), &mut ctx());
        let reversed: Vec<bool> = (0..6)
            .map(|x| grid.get(x, 0).unwrap().modifiers().contains(Modifiers::REVERSED))
            .collect();
        assert_eq!(reversed, [false, true, true, true, false, false]);
    }

    #[test]
    fn test_overlay_first_match_wins() {
        let selection = [Region::caret(3), Region::new(2, 6)];
        // Caret wins, even blinked off
        assert_eq!(selection_overlay(&selection, 3, false, Modifiers::UNDERLINE), None);
        assert_eq!(
            selection_overlay(&selection, 3, true, Modifiers::UNDERLINE),
            Some(Modifiers::UNDERLINE)
        );
        assert_eq!(
            selection_overlay(&selection, 4, true, Modifiers::UNDERLINE),
            Some(Modifiers::REVERSED)
        );
        assert_eq!(selection_overlay(&selection, 6, true, Modifiers::UNDERLINE), None);
    }

    #[test]
    fn test_newlines_and_clipping() {
        let (model, id) = model("abcdef\nxy\nlast");
        let grid = render(&model, id, Rect::new(0, 0, 3, 2), &mut ctx());
        assert_eq!(grid.row_text(0), "abc");
        assert_eq!(grid.row_text(1), "xy ");
    }

    #[test]
    fn test_scopes_resolve_colors() {
        let (mut model, id) = model("if \"s\"");
        let view = model.view_mut(id).unwrap();
        view.set_default_scope("source.go");
        view.add_scope(Region::new(0, 2), "source.go keyword.control");
        view.add_scope(Region::new(3, 6), "source.go string.quoted.double");
        let mut ctx = ctx();
        let grid = render(&model, id, Rect::new(0, 0, 8, 1), &mut ctx);

        assert_eq!(grid.get(0, 0).unwrap().fg(), KEYWORD.fg);
        assert_eq!(grid.get(2, 0).unwrap().fg(), DEFAULT.fg);
        assert_eq!(grid.get(4, 0).unwrap().bg(), STRING.bg);
        // One lookup per distinct scope
        assert_eq!(ctx.resolver.cached(), 3);
    }

    #[test]
    fn test_scrolled_view_paints_window() {
        let (mut model, id) = model("0\n1\n2\n3\n4\n5");
        model.view_mut(id).unwrap().set_selection(vec![Region::caret(10)]);
        let view = model.view(id).unwrap();
        let mut layout = Layout::new(Rect::new(0, 0, 2, 3), view.buffer());
        layout.reveal(view.buffer(), Region::caret(10));

        let mut grid = Grid::new(2, 3);
        render_view(&mut grid, view, &mut layout, &mut ctx());
        assert_eq!(grid.row_text(0), "3 ");
        assert_eq!(grid.row_text(2), "5 ");
    }
}
