//! Diffing engine benchmark: Measure grid diff performance.
//!
//! Target: < 500µs for 200×50 grid

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use termview::grid::diff::{render_diff, render_full, DiffState};
use termview::style::{ColorDepth, ColorIndex};
use termview::terminal::OutputBuffer;
use termview::{Cell, Grid, Style};

/// Create a grid with varied glyphs and palette indices.
fn create_test_grid(width: u16, height: u16, seed: u8) -> Grid {
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let glyph = char::from(b'A' + ((x + y + u16::from(seed)) % 26) as u8);
            let fg = ColorIndex(((x * 3 + u16::from(seed)) % 256) as u8);
            grid.set(x, y, Cell::new(glyph, Style::new(fg, ColorIndex(16))));
        }
    }
    grid
}

fn bench_diff(c: &mut Criterion, name: &str, current: &Grid, next: &Grid, depth: ColorDepth) {
    c.bench_function(name, |b| {
        let mut output = OutputBuffer::with_capacity(65536);
        b.iter(|| {
            output.clear();
            let mut state = DiffState::new();
            render_diff(
                black_box(current),
                black_box(next),
                &mut output,
                &mut state,
                depth,
            )
        });
    });
}

fn diff_identical_grids(c: &mut Criterion) {
    let grid = create_test_grid(200, 50, 0);
    bench_diff(c, "diff_200x50_identical", &grid, &grid.clone(), ColorDepth::High);
}

fn diff_single_cell_change(c: &mut Criterion) {
    let current = create_test_grid(200, 50, 0);
    let mut next = current.clone();
    next.set(100, 25, Cell::new('X', Style::new(ColorIndex(1), ColorIndex(0))));
    bench_diff(c, "diff_200x50_single_change", &current, &next, ColorDepth::High);
}

fn diff_line_change(c: &mut Criterion) {
    let current = create_test_grid(200, 50, 0);
    let mut next = current.clone();
    for x in 0..200 {
        next.set(x, 25, Cell::new('*', Style::new(ColorIndex(3), ColorIndex(0))));
    }
    bench_diff(c, "diff_200x50_line_change", &current, &next, ColorDepth::High);
}

fn diff_low_depth(c: &mut Criterion) {
    let current = create_test_grid(200, 50, 0);
    let next = create_test_grid(200, 50, 1);
    bench_diff(c, "diff_200x50_full_change_low", &current, &next, ColorDepth::Low);
}

fn full_render(c: &mut Criterion) {
    let grid = create_test_grid(200, 50, 0);

    c.bench_function("render_full_200x50", |b| {
        let mut output = OutputBuffer::with_capacity(65536);
        b.iter(|| {
            output.clear();
            let mut state = DiffState::new();
            render_full(black_box(&grid), &mut output, &mut state, ColorDepth::High);
        });
    });
}

fn diff_various_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_by_size");

    for (width, height) in [(80, 24), (120, 40), (200, 50), (300, 80)] {
        let current = create_test_grid(width, height, 0);
        let next = create_test_grid(width, height, 1);

        group.bench_with_input(
            BenchmarkId::new("full_change", format!("{width}x{height}")),
            &(current, next),
            |b, (a, bb)| {
                let mut output = OutputBuffer::with_capacity(65536);
                b.iter(|| {
                    output.clear();
                    let mut state = DiffState::new();
                    render_diff(black_box(a), black_box(bb), &mut output, &mut state, ColorDepth::High)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    diff_identical_grids,
    diff_single_cell_change,
    diff_line_change,
    diff_low_depth,
    full_render,
    diff_various_sizes,
);
criterion_main!(benches);
