//! Frontend: screen arrangement, status line and model notifications.
//!
//! The screen is split into the main view on top, the console view (if the
//! model has one) above the last row, and a one-row status line at the
//! bottom. Only one non-console view is shown at a time; it is the first one
//! the model lists.

use crate::compositor::{render_view, RenderContext};
use crate::config::FrontendConfig;
use crate::layout::{LayoutRegistry, Rect, Region};
use crate::model::{EditorModel, ModelEvent, ViewId};
use crate::terminal::Surface;
use std::io;
use unicode_width::UnicodeWidthChar;

/// The presentation side of the editor.
#[derive(Debug)]
pub struct Frontend {
    config: FrontendConfig,
    layouts: LayoutRegistry,
    ctx: RenderContext,
    status: String,
    console: Option<ViewId>,
    size: (u16, u16),
}

impl Frontend {
    /// Create a frontend for a screen of `size`.
    pub fn new(config: FrontendConfig, ctx: RenderContext, size: (u16, u16)) -> Self {
        Self {
            config,
            layouts: LayoutRegistry::new(),
            ctx,
            status: String::new(),
            console: None,
            size,
        }
    }

    /// Show `id` as the console and keep it scrolled to its end.
    pub fn set_console(&mut self, id: ViewId) {
        self.console = Some(id);
    }

    /// Configuration in use.
    pub const fn config(&self) -> &FrontendConfig {
        &self.config
    }

    /// Render state shared with the compositor.
    pub const fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Layouts of views rendered so far.
    pub const fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    /// Current status line text.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Screen rectangles for the views shown, main view first.
    fn placements(&self, model: &dyn EditorModel) -> Vec<(ViewId, Rect)> {
        let (body, _status) = Rect::from_size(self.size.0, self.size.1).split_bottom(1);
        let ids = model.view_ids();
        let console = self.console.filter(|id| ids.contains(id));
        let main = ids.iter().copied().find(|&id| Some(id) != console);

        let mut placements = Vec::with_capacity(2);
        match console {
            Some(console) => {
                let (top, bottom) = body.split_bottom(self.config.console_height);
                if let Some(main) = main {
                    placements.push((main, top));
                }
                placements.push((console, bottom));
            }
            None => placements.extend(main.map(|main| (main, body))),
        }
        placements
    }

    /// Repaint every shown view and the status line, then flush.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the surface fails.
    pub fn render_frame<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        model: &dyn EditorModel,
    ) -> io::Result<()> {
        self.ctx.resolver.begin_pass();
        surface.clear(self.ctx.default_style());

        for (id, rect) in self.placements(model) {
            let Some(view) = model.view(id) else {
                continue;
            };
            let layout = self.layouts.place(id, rect, view.buffer());
            render_view(surface, view, layout, &mut self.ctx);
        }
        self.render_status(surface);
        surface.flush()
    }

    /// Draw the status message on the last row, clipped to the screen width.
    fn render_status<S: Surface + ?Sized>(&self, surface: &mut S) {
        let (width, height) = surface.size();
        let Some(y) = height.checked_sub(1) else {
            return;
        };
        let style = self.ctx.default_style();
        let mut x = 0u16;
        for c in self.status.chars() {
            let w = c.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if x >= width {
                break;
            }
            surface.set_cell(x, y, crate::grid::cell_glyph(c), style);
            x += 1;
        }
    }

    /// Scroll a view so that `region` is on screen.
    pub fn reveal(&mut self, model: &dyn EditorModel, id: ViewId, region: Region) {
        let Some((_, rect)) = self.placements(model).into_iter().find(|(v, _)| *v == id) else {
            return;
        };
        let Some(view) = model.view(id) else {
            return;
        };
        self.layouts
            .place(id, rect, view.buffer())
            .reveal(view.buffer(), region);
    }

    /// The visible region of a shown view, re-validated against its buffer.
    pub fn visible_region(&mut self, model: &dyn EditorModel, id: ViewId) -> Option<Region> {
        let view = model.view(id)?;
        let layout = self.layouts.get_mut(id)?;
        Some(layout.visible(view.buffer()))
    }

    /// React to one model notification.
    pub fn handle_event(&mut self, model: &dyn EditorModel, event: ModelEvent) {
        match event {
            ModelEvent::BufferChanged(id) if Some(id) == self.console => {
                let Some(view) = model.view(id) else {
                    return;
                };
                let end = view.buffer().len();
                self.reveal(model, id, Region::caret(end));
            }
            // Other views are re-validated lazily on the next render.
            ModelEvent::BufferChanged(_) => {}
            ModelEvent::ViewClosed(id) => {
                self.layouts.remove(id);
                if self.console == Some(id) {
                    self.console = None;
                }
            }
            ModelEvent::Show { view, region } => self.reveal(model, view, region),
        }
    }

    /// Adopt a new screen size and re-clip every layout.
    pub fn resize<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        model: &dyn EditorModel,
        width: u16,
        height: u16,
    ) {
        tracing::debug!(width, height, "resize");
        surface.resize(width, height);
        self.size = (width, height);
        for (id, rect) in self.placements(model) {
            let (Some(view), Some(layout)) = (model.view(id), self.layouts.get_mut(id)) else {
                continue;
            };
            layout.set_rect(rect, view.buffer());
        }
    }

    /// Replace the status line text.
    pub fn post_status_message(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    /// Report an error. There is no dialog UI; it goes to the log.
    pub fn post_error(&self, message: &str) {
        tracing::error!(message, "editor error");
    }

    /// Report information. There is no dialog UI; it goes to the log.
    pub fn post_info(&self, message: &str) {
        tracing::info!(message, "editor info");
    }

    /// Show blinking carets again, e.g. after a key press.
    pub fn reset_blink(&mut self) {
        self.ctx.blink_visible = true;
    }

    /// Advance the blink phase.
    pub fn toggle_blink(&mut self) {
        self.ctx.toggle_blink();
    }
}
