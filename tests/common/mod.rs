//! Common test utilities: table builders and grid drivers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use datagrid::layout::{ColumnLayout, Geometry, RowLayout};
use datagrid::{
    create_grid, Column, GridOptions, GridView, Modifiers, RecordingSurface, SharedTable, Table,
    Theme,
};

pub const PLAIN: Modifiers = Modifiers::NONE;
pub const SHIFT: Modifiers = Modifiers {
    shift: true,
    ctrl: false,
};
pub const CTRL: Modifiers = Modifiers {
    shift: false,
    ctrl: true,
};

/// `rows` x 5 table: id (int), value (float), label (text), flag (bool), score (float).
pub fn sample_table(rows: u32) -> Table {
    Table::new(vec![
        Column::ints("id", (0..rows).map(i64::from)),
        Column::floats("value", (0..rows).map(|r| f64::from(r) + 0.5)),
        Column::texts("label", (0..rows).map(|r| format!("item {r}"))),
        Column::bools("flag", (0..rows).map(|r| r % 2 == 0)),
        Column::floats("score", (0..rows).map(|r| f64::from(r) / 1000.0)),
    ])
    .expect("sample table")
}

/// Table with `cols` int columns named `c0`, `c1`, ...
pub fn wide_table(rows: u32, cols: u32) -> Table {
    Table::new(
        (0..cols)
            .map(|c| Column::ints(format!("c{c}"), (0..rows).map(move |r| i64::from(r * 100 + c))))
            .collect(),
    )
    .expect("wide table")
}

pub fn uniform_geometry(rows: u32, cols: u32, row_height: f64, col_width: f64) -> Geometry {
    Geometry {
        columns: ColumnLayout::new(cols, col_width, 30.0, 300.0),
        rows: RowLayout::new(rows, row_height),
    }
}

/// Grid with default options over a surface of `width` x `height`.
///
/// The body pane is `width - 50` x `height - 25` (default header sizes).
pub fn grid(table: Table, width: f64, height: f64) -> GridView<RecordingSurface> {
    grid_shared(table.into_shared(), width, height)
}

pub fn grid_shared(table: SharedTable, width: f64, height: f64) -> GridView<RecordingSurface> {
    create_grid(
        table,
        width,
        height,
        GridOptions::default(),
        Theme::default(),
        RecordingSurface::new(width, height),
    )
    .expect("grid")
}

/// Grid whose body pane is exactly `body_w` x `body_h`.
pub fn grid_with_body(table: Table, body_w: f64, body_h: f64) -> GridView<RecordingSurface> {
    let options = GridOptions::default();
    grid(
        table,
        body_w + options.row_header_width,
        body_h + options.col_header_height,
    )
}

/// Surface point at the centre of a body cell (must be on screen).
pub fn cell_point(view: &GridView<RecordingSurface>, row: u32, col: u32) -> (f64, f64) {
    let rect = view.edit_placement(row, col).expect("cell exists");
    (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

pub fn click_cell(view: &mut GridView<RecordingSurface>, row: u32, col: u32, mods: Modifiers) {
    let (x, y) = cell_point(view, row, col);
    view.pointer_down(x, y, mods);
    view.pointer_up();
}

/// Surface point on a column header's centre.
pub fn column_header_point(view: &GridView<RecordingSurface>, col: u32) -> (f64, f64) {
    let (x, _) = cell_point(view, view.visible_range().row_start, col);
    (x, view.options().col_header_height / 2.0)
}

/// Surface point on a row header's centre.
pub fn row_header_point(view: &GridView<RecordingSurface>, row: u32) -> (f64, f64) {
    let (_, y) = cell_point(view, row, view.visible_range().col_start);
    (view.options().row_header_width / 2.0, y)
}
