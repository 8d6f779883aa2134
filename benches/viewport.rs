//! Benchmarks for the viewport hot path.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datagrid::layout::{ColumnLayout, Geometry, RowLayout, Viewport};
use datagrid::{create_grid, Column, GridOptions, RecordingSurface, Table, Theme};

fn geometry(rows: u32, cols: u32) -> Geometry {
    let widths: Vec<f64> = (0..cols).map(|c| 40.0 + f64::from(c % 7) * 20.0).collect();
    Geometry {
        columns: ColumnLayout::from_widths(&widths, 30.0, 300.0),
        rows: RowLayout::new(rows, 20.0),
    }
}

/// Visible range recomputation must not depend on table size
fn bench_visible_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_range");
    for &(rows, cols) in &[(1_000_u32, 20_u32), (1_000_000, 200), (10_000_000, 5_000)] {
        let geom = geometry(rows, cols);
        let mut viewport = Viewport::new(1200.0, 800.0);
        viewport.scroll_x = geom.total_width() / 2.0;
        viewport.scroll_y = geom.total_height() / 2.0;
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &geom,
            |b, geom| b.iter(|| black_box(&viewport).visible_range(black_box(geom))),
        );
    }
    group.finish();
}

/// A full visible redraw into the recording surface
fn bench_render_visible(c: &mut Criterion) {
    let rows = 200_000_u32;
    let table = Table::new(vec![
        Column::ints("id", (0..rows).map(i64::from)),
        Column::floats("value", (0..rows).map(|r| f64::from(r) * 0.37)),
        Column::texts("label", (0..rows).map(|r| format!("row {r}"))),
        Column::bools("flag", (0..rows).map(|r| r % 3 == 0)),
    ])
    .expect("valid table")
    .into_shared();
    let options = GridOptions {
        precision: 3,
        ..GridOptions::default()
    };
    let mut grid = create_grid(
        table,
        1200.0,
        800.0,
        options,
        Theme::default(),
        RecordingSurface::new(1200.0, 800.0),
    )
    .expect("valid grid");

    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(grid.visible_range().cell_count()));
    group.bench_function("scroll_and_render", |b| {
        let mut y = 0.0;
        b.iter(|| {
            y = (y + 97.0) % 3_000_000.0;
            grid.set_scroll(0.0, y);
            let stats = grid.render_frame();
            grid.surface_mut().take_ops();
            black_box(stats)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_visible_range, bench_render_visible);
criterion_main!(benches);
