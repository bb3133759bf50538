//! Compositor benchmark: one view painted into an in-memory grid, and the
//! scope cascade on its own.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use termview::compositor::{render_view, RenderContext};
use termview::model::memory::MemoryModel;
use termview::model::{EditorModel, ViewId};
use termview::style::{ColorIndex, ColorPair, ColorTable, StyleResolver};
use termview::{Grid, Layout, Rect, Region};

const SCOPES: [&str; 4] = [
    "source.rust keyword.control",
    "source.rust entity.name.function",
    "source.rust string.quoted.double",
    "source.rust comment.line.double-slash",
];

fn color_table() -> ColorTable {
    ColorTable::from_pairs(
        ColorPair::default(),
        [
            ("keyword", ColorPair::new(ColorIndex(1), ColorIndex(0))),
            ("entity.name", ColorPair::new(ColorIndex(2), ColorIndex(0))),
            ("string", ColorPair::new(ColorIndex(3), ColorIndex(0))),
            ("comment", ColorPair::new(ColorIndex(4), ColorIndex(0))),
        ],
    )
}

/// A model with one 200-line view whose words carry rotating scopes.
fn scoped_model() -> (MemoryModel, ViewId) {
    let line = "fn render(view: &View) -> Frame { \"text\" } // painted\t\tdone\n";
    let text = line.repeat(200);
    let mut model = MemoryModel::new();
    let id = model.new_view(&text);

    if let Some(view) = model.view_mut(id) {
        view.set_default_scope("source.rust");
        let len = text.chars().count();
        for (i, start) in (0..len).step_by(8).enumerate() {
            view.add_scope(Region::new(start, (start + 5).min(len)), SCOPES[i % SCOPES.len()]);
        }
    }
    (model, id)
}

fn render_full_view(c: &mut Criterion) {
    let (model, id) = scoped_model();
    let Some(view) = model.view(id) else {
        return;
    };
    let mut grid = Grid::new(120, 50);
    let mut layout = Layout::new(Rect::new(0, 0, 120, 50), view.buffer());
    let mut ctx = RenderContext::new(StyleResolver::new(color_table()));

    c.bench_function("render_view_120x50", |b| {
        b.iter(|| {
            ctx.resolver.begin_pass();
            render_view(&mut grid, black_box(view), &mut layout, &mut ctx);
        });
    });
}

fn scope_cascade(c: &mut Criterion) {
    let table = color_table();

    c.bench_function("scope_lookup_uncached", |b| {
        b.iter(|| {
            for scope in SCOPES {
                black_box(table.lookup(black_box(scope)));
            }
        });
    });

    let mut resolver = StyleResolver::new(color_table());
    c.bench_function("scope_resolve_cached", |b| {
        b.iter(|| {
            for scope in SCOPES {
                black_box(resolver.resolve(black_box(scope)));
            }
        });
    });
}

criterion_group!(benches, render_full_view, scope_cascade);
criterion_main!(benches);
