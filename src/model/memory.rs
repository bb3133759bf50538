//! In-memory editor model.
//!
//! Just enough editor to drive the frontend: char-indexed buffers with a line
//! index, views with a selection, scope spans and settings, and caret editing
//! for the keys the input translator produces. One view can be marked as the
//! console, which receives a line per key press.

use super::{EditorModel, ModelEvent, SettingValue, TextBuffer, View, ViewId};
use crate::actor::{Key, KeyPress};
use crate::layout::Region;
use std::collections::HashMap;

/// Char-indexed text with a line start index.
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    text: Vec<char>,
    line_starts: Vec<usize>,
    change_count: u64,
}

impl Default for MemoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self {
            text: Vec::new(),
            line_starts: vec![0],
            change_count: 0,
        }
    }

    /// Buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.text = text.chars().collect();
        buffer.reindex();
        buffer
    }

    /// Whole content.
    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Insert at `offset` (clamped); returns the number of chars inserted.
    pub fn insert(&mut self, offset: usize, s: &str) -> usize {
        let at = offset.min(self.text.len());
        let before = self.text.len();
        self.text.splice(at..at, s.chars());
        self.touch();
        self.text.len() - before
    }

    /// Remove the characters of `region` (clamped).
    pub fn erase(&mut self, region: Region) {
        let end = region.end().min(self.text.len());
        let begin = region.begin().min(end);
        if begin == end {
            return;
        }
        self.text.drain(begin..end);
        self.touch();
    }

    /// Append at the end.
    pub fn append(&mut self, s: &str) {
        self.insert(self.text.len(), s);
    }

    /// Replace the whole content.
    pub fn replace_all(&mut self, s: &str) {
        self.text = s.chars().collect();
        self.touch();
    }

    fn touch(&mut self) {
        self.change_count += 1;
        self.reindex();
    }

    fn reindex(&mut self) {
        self.line_starts.clear();
        self.line_starts.push(0);
        self.line_starts.extend(
            self.text
                .iter()
                .enumerate()
                .filter(|&(_, c)| *c == '\n')
                .map(|(i, _)| i + 1),
        );
    }

    fn line_end(&self, line: usize) -> usize {
        self.line_starts
            .get(line + 1)
            .map_or(self.text.len(), |next| next - 1)
    }
}

impl TextBuffer for MemoryBuffer {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn text_point(&self, line: usize, col: usize) -> usize {
        match self.line_starts.get(line) {
            Some(&start) => (start + col).min(self.line_end(line)),
            None => self.text.len(),
        }
    }

    fn row_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        (line, offset - self.line_starts[line])
    }

    fn change_count(&self) -> u64 {
        self.change_count
    }

    fn substr(&self, region: Region) -> String {
        let end = region.end().min(self.text.len());
        let begin = region.begin().min(end);
        self.text[begin..end].iter().collect()
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A view over its own [`MemoryBuffer`].
#[derive(Debug, Clone)]
pub struct MemoryView {
    id: ViewId,
    buffer: MemoryBuffer,
    selection: Vec<Region>,
    scopes: Vec<(Region, String)>,
    default_scope: String,
    settings: HashMap<String, SettingValue>,
}

impl MemoryView {
    fn new(id: ViewId, text: &str) -> Self {
        Self {
            id,
            buffer: MemoryBuffer::from_text(text),
            selection: vec![Region::caret(0)],
            scopes: Vec::new(),
            default_scope: "text.plain".to_string(),
            settings: HashMap::new(),
        }
    }

    /// The buffer, mutably.
    pub fn buffer_mut(&mut self) -> &mut MemoryBuffer {
        &mut self.buffer
    }

    /// Replace the selection. An empty list leaves a caret at 0.
    pub fn set_selection(&mut self, mut regions: Vec<Region>) {
        if regions.is_empty() {
            regions.push(Region::caret(0));
        }
        regions.sort_by_key(Region::begin);
        self.selection = regions;
    }

    /// Scope reported for offsets outside every span.
    pub fn set_default_scope(&mut self, scope: impl Into<String>) {
        self.default_scope = scope.into();
    }

    /// Classify `region` as `scope`. Later spans win over earlier ones.
    pub fn add_scope(&mut self, region: Region, scope: impl Into<String>) {
        self.scopes.push((region, scope.into()));
    }

    /// Set a per-view setting.
    pub fn set_setting(&mut self, key: impl Into<String>, value: SettingValue) {
        self.settings.insert(key.into(), value);
    }

    fn primary(&self) -> Region {
        self.selection.first().copied().unwrap_or_default()
    }

    /// Apply an editing key to the primary selection.
    ///
    /// Returns whether the buffer changed.
    fn edit(&mut self, key: Key) -> bool {
        let sel = self.primary();
        let caret = sel.b.min(self.buffer.len());
        let (changed, next) = match key {
            Key::Char(c) => (true, self.replace_selection(sel, &c.to_string())),
            Key::Enter => (true, self.replace_selection(sel, "\n")),
            Key::Backspace if !sel.is_empty() => (true, self.replace_selection(sel, "")),
            Key::Backspace if caret > 0 => {
                self.buffer.erase(Region::new(caret - 1, caret));
                (true, caret - 1)
            }
            Key::Delete if !sel.is_empty() => (true, self.replace_selection(sel, "")),
            Key::Delete if caret < self.buffer.len() => {
                self.buffer.erase(Region::new(caret, caret + 1));
                (true, caret)
            }
            Key::Left if !sel.is_empty() => (false, sel.begin()),
            Key::Left => (false, caret.saturating_sub(1)),
            Key::Right if !sel.is_empty() => (false, sel.end()),
            Key::Right => (false, (caret + 1).min(self.buffer.len())),
            Key::Up | Key::Down => {
                let (line, col) = self.buffer.row_col(caret);
                let target = if key == Key::Up {
                    line.checked_sub(1)
                } else {
                    Some(line + 1).filter(|&l| l < self.buffer.line_count())
                };
                (false, target.map_or(caret, |l| self.buffer.text_point(l, col)))
            }
            Key::Backspace | Key::Delete | Key::Escape => (false, caret),
        };
        if changed {
            self.scopes.clear();
        }
        self.selection = vec![Region::caret(next)];
        changed
    }

    fn replace_selection(&mut self, sel: Region, with: &str) -> usize {
        self.buffer.erase(sel);
        let at = sel.begin().min(self.buffer.len());
        at + self.buffer.insert(at, with)
    }
}

impl View for MemoryView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn buffer(&self) -> &dyn TextBuffer {
        &self.buffer
    }

    fn selection(&self) -> &[Region] {
        &self.selection
    }

    fn scope_name(&self, offset: usize) -> &str {
        self.scopes
            .iter()
            .rev()
            .find(|(region, _)| region.begin() <= offset && offset < region.end())
            .map_or(self.default_scope.as_str(), |(_, scope)| scope.as_str())
    }

    fn setting(&self, key: &str) -> Option<SettingValue> {
        self.settings.get(key).cloned()
    }
}

/// A set of views plus global settings and pending notifications.
#[derive(Debug, Default)]
pub struct MemoryModel {
    views: Vec<MemoryView>,
    next_id: u32,
    settings: HashMap<String, SettingValue>,
    events: Vec<ModelEvent>,
    active: Option<ViewId>,
    console: Option<ViewId>,
}

impl MemoryModel {
    /// Empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a view on a new buffer holding `text`. The first view opened
    /// becomes the active one.
    pub fn new_view(&mut self, text: &str) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.views.push(MemoryView::new(id, text));
        if self.active.is_none() {
            self.active = Some(id);
        }
        tracing::debug!(view = %id, chars = text.chars().count(), "opened view");
        id
    }

    /// Close a view.
    pub fn close_view(&mut self, id: ViewId) -> bool {
        let before = self.views.len();
        self.views.retain(|v| v.id != id);
        if self.views.len() == before {
            return false;
        }
        if self.active == Some(id) {
            self.active = self.views.iter().map(|v| v.id).find(|&v| Some(v) != self.console);
        }
        if self.console == Some(id) {
            self.console = None;
        }
        self.events.push(ModelEvent::ViewClosed(id));
        true
    }

    /// A view, mutably.
    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut MemoryView> {
        self.views.iter_mut().find(|v| v.id == id)
    }

    /// The view receiving key presses.
    pub const fn active(&self) -> Option<ViewId> {
        self.active
    }

    /// Mark `id` as the console.
    pub fn set_console(&mut self, id: ViewId) {
        self.console = Some(id);
    }

    /// The console view, if any.
    pub const fn console(&self) -> Option<ViewId> {
        self.console
    }

    /// Set a global setting.
    pub fn set_setting(&mut self, key: impl Into<String>, value: SettingValue) {
        self.settings.insert(key.into(), value);
    }

    /// Append text to a view's buffer.
    pub fn append(&mut self, id: ViewId, text: &str) {
        if let Some(view) = self.view_mut(id) {
            view.buffer.append(text);
            self.events.push(ModelEvent::BufferChanged(id));
        }
    }

    /// Append a line to the console.
    pub fn log(&mut self, line: &str) {
        let Some(id) = self.console else {
            return;
        };
        let text = match self.view_mut(id) {
            Some(view) if !view.buffer.is_empty() => format!("\n{line}"),
            Some(_) => line.to_string(),
            None => return,
        };
        self.append(id, &text);
    }
}

impl EditorModel for MemoryModel {
    fn view_ids(&self) -> Vec<ViewId> {
        self.views.iter().map(|v| v.id).collect()
    }

    fn view(&self, id: ViewId) -> Option<&dyn View> {
        self.views
            .iter()
            .find(|v| v.id == id)
            .map(|v| v as &dyn View)
    }

    fn handle_input(&mut self, key: KeyPress) {
        self.log(&format!("key: {key}"));
        if key.ctrl {
            tracing::debug!(%key, "unbound key");
            return;
        }
        let Some(id) = self.active else {
            return;
        };
        let Some(view) = self.view_mut(id) else {
            return;
        };
        let changed = view.edit(key.key);
        let caret = view.primary();
        if changed {
            self.events.push(ModelEvent::BufferChanged(id));
        }
        self.events.push(ModelEvent::Show {
            view: id,
            region: caret,
        });
    }

    fn setting(&self, key: &str) -> Option<SettingValue> {
        self.settings.get(key).cloned()
    }

    fn take_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> KeyPress {
        KeyPress::new(key)
    }

    #[test]
    fn test_line_index() {
        let buffer = MemoryBuffer::from_text("ab\ncde\n\nf");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.text_point(1, 0), 3);
        assert_eq!(buffer.text_point(1, 99), 6);
        assert_eq!(buffer.text_point(9, 0), buffer.len());
        assert_eq!(buffer.row_col(4), (1, 1));
        assert_eq!(buffer.row_col(7), (2, 0));
        assert_eq!(buffer.row_col(999), (3, 1));
        assert_eq!(buffer.substr(Region::new(6, 3)), "cde");
    }

    #[test]
    fn test_mutation_bumps_change_count() {
        let mut buffer = MemoryBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        buffer.append("x\ny");
        buffer.erase(Region::new(0, 2));
        assert_eq!(buffer.text(), "y");
        assert_eq!(buffer.change_count(), 2);
        // Empty erase is not a change
        buffer.erase(Region::caret(0));
        assert_eq!(buffer.change_count(), 2);
    }

    #[test]
    fn test_scope_spans() {
        let mut model = MemoryModel::new();
        let id = model.new_view("fn main");
        let view = model.view_mut(id).unwrap();
        view.set_default_scope("source.rust");
        view.add_scope(Region::new(0, 2), "source.rust keyword");
        assert_eq!(view.scope_name(0), "source.rust keyword");
        assert_eq!(view.scope_name(2), "source.rust");
    }

    #[test]
    fn test_typing_edits_active_view() {
        let mut model = MemoryModel::new();
        let id = model.new_view("");
        for key in [Key::Char('h'), Key::Char('i'), Key::Enter, Key::Char('!')] {
            model.handle_input(press(key));
        }
        model.handle_input(press(Key::Backspace));
        model.handle_input(press(Key::Up));

        let view = model.view(id).unwrap();
        assert_eq!(view.buffer().substr(Region::new(0, 100)), "hi\n");
        assert_eq!(view.selection(), &[Region::caret(0)]);

        let events = model.take_events();
        assert_eq!(events[0], ModelEvent::BufferChanged(id));
        assert_eq!(
            events.last(),
            Some(&ModelEvent::Show {
                view: id,
                region: Region::caret(0)
            })
        );
        assert!(model.take_events().is_empty());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut model = MemoryModel::new();
        let id = model.new_view("hello world");
        model.view_mut(id).unwrap().set_selection(vec![Region::new(11, 6)]);
        model.handle_input(press(Key::Char('x')));
        let view = model.view(id).unwrap();
        assert_eq!(view.buffer().substr(Region::new(0, 100)), "hello x");
        assert_eq!(view.selection(), &[Region::caret(7)]);
    }

    #[test]
    fn test_console_logs_keys() {
        let mut model = MemoryModel::new();
        let main = model.new_view("");
        let console = model.new_view("");
        model.set_console(console);
        model.handle_input(KeyPress::ctrl('s'));
        model.handle_input(press(Key::Char('a')));

        let text = model.view(console).unwrap().buffer().substr(Region::new(0, 100));
        assert_eq!(text, "key: ctrl+s\nkey: a");
        assert_eq!(model.active(), Some(main));
        let events = model.take_events();
        assert!(events.contains(&ModelEvent::BufferChanged(console)));
        assert!(events.contains(&ModelEvent::BufferChanged(main)));
    }

    #[test]
    fn test_close_view() {
        let mut model = MemoryModel::new();
        let a = model.new_view("a");
        let b = model.new_view("b");
        assert!(model.close_view(a));
        assert!(!model.close_view(a));
        assert_eq!(model.view_ids(), vec![b]);
        assert_eq!(model.active(), Some(b));
        assert_eq!(model.take_events(), vec![ModelEvent::ViewClosed(a)]);
    }
}
