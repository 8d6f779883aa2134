//! Viewport and scroll coordinate tests
//!
//! Visible row/column calculation, scroll clamping and header lockstep.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid_with_body, sample_table, uniform_geometry, wide_table};
use datagrid::layout::Viewport;
use test_case::test_case;

#[test]
fn test_initial_visible_rows_150x5() {
    let view = grid_with_body(sample_table(150), 400.0, 200.0);
    let range = view.visible_range();
    assert_eq!(range.rows(), 0..10);
    assert_eq!(range.cols(), 0..5);
}

#[test]
fn test_rows_bracket_exactly_the_intersecting_rows() {
    let geom = uniform_geometry(150, 5, 20.0, 60.0);
    let height = 200.0;
    let max = geom.total_height() - height;
    let mut sy = 0.0;
    while sy <= max {
        let mut viewport = Viewport::new(300.0, height);
        viewport.scroll_y = sy;
        let range = viewport.visible_range(&geom);
        for r in 0..150 {
            let top = geom.rows.offset_of(r);
            let bottom = top + 20.0;
            let intersects = bottom > sy && top < sy + height;
            assert_eq!(
                range.rows().contains(&r),
                intersects,
                "row {r} at sy={sy} range={range:?}"
            );
        }
        sy += 7.25;
    }
}

#[test]
fn test_columns_bracket_exactly_the_intersecting_columns() {
    let widths = [45.0, 120.0, 60.0, 300.0, 33.0, 90.0, 75.0];
    let geom = datagrid::Geometry {
        columns: datagrid::layout::ColumnLayout::from_widths(&widths, 30.0, 300.0),
        rows: datagrid::layout::RowLayout::new(10, 20.0),
    };
    let width = 250.0;
    let mut sx = 0.0;
    while sx <= geom.total_width() - width {
        let mut viewport = Viewport::new(width, 100.0);
        viewport.scroll_x = sx;
        let range = viewport.visible_range(&geom);
        for c in 0..7 {
            let left = geom.columns.offset_of(c).unwrap();
            let right = left + geom.columns.width_of(c).unwrap();
            let intersects = right > sx && left < sx + width;
            assert_eq!(range.cols().contains(&c), intersects, "col {c} at sx={sx}");
        }
        sx += 5.5;
    }
}

#[test_case(0.0, 300.0, 0, 5 ; "right edge on a boundary")]
#[test_case(0.0, 300.5, 0, 6 ; "right edge just past a boundary")]
#[test_case(60.0, 240.0, 1, 5 ; "both edges on boundaries")]
#[test_case(30.0, 270.0, 0, 5 ; "partial left, boundary right")]
fn test_column_end_on_exact_boundary(sx: f64, width: f64, start: u32, end: u32) {
    let geom = uniform_geometry(10, 10, 20.0, 60.0);
    let mut viewport = Viewport::new(width, 200.0);
    viewport.scroll_x = sx;
    assert_eq!(viewport.visible_range(&geom).cols(), start..end);
}

#[test]
fn test_column_end_on_boundary_after_resize() {
    let mut geom = uniform_geometry(10, 10, 20.0, 60.0);
    geom.columns.set_width(0, 100.0).unwrap();
    // left edges: 0, 100, 160, 220, ...
    let mut viewport = Viewport::new(220.0, 200.0);
    assert_eq!(viewport.visible_range(&geom).cols(), 0..3);
    viewport.resize(220.25, 200.0);
    assert_eq!(viewport.visible_range(&geom).cols(), 0..4);
}

#[test_case(0.0, 0, 10 ; "top")]
#[test_case(25.0, 1, 12 ; "partial first and last")]
#[test_case(2800.0, 140, 150 ; "bottom")]
fn test_visible_rows_after_scroll(sy: f64, start: u32, end: u32) {
    let mut view = grid_with_body(sample_table(150), 400.0, 200.0);
    view.set_scroll(0.0, sy);
    assert_eq!(view.visible_range().rows(), start..end);
}

#[test]
fn test_scroll_clamps_to_content() {
    let mut view = grid_with_body(wide_table(150, 10), 300.0, 200.0);
    // 10 x 60 = 600 wide, 3000 tall
    assert!(view.set_scroll(5000.0, 99_999.0));
    assert_eq!(view.scroll_offset(), (300.0, 2800.0));
    assert!(view.set_scroll(-10.0, -10.0));
    assert_eq!(view.scroll_offset(), (0.0, 0.0));
    assert!(!view.set_scroll(-1.0, 0.0));
}

#[test]
fn test_small_table_never_scrolls() {
    let mut view = grid_with_body(sample_table(3), 600.0, 400.0);
    assert!(!view.wheel(100.0, 100.0));
    assert_eq!(view.scroll_offset(), (0.0, 0.0));
}

#[test]
fn test_headers_follow_body_on_their_axis() {
    let mut view = grid_with_body(wide_table(500, 30), 300.0, 200.0);
    view.wheel(250.0, 1010.0);
    let body = view.visible_range();
    assert_eq!(body.rows(), 50..61);
    assert_eq!(body.cols(), 4..10);
    assert_eq!(view.column_header_range().cols(), body.cols());
    assert_eq!(view.column_header_range().row_start, 0);
    assert_eq!(view.row_header_range().rows(), body.rows());
    assert_eq!(view.row_header_range().col_start, 0);
}

#[test]
fn test_resize_recomputes_ranges_and_reclamps() {
    let mut view = grid_with_body(sample_table(150), 300.0, 200.0);
    view.set_scroll(0.0, 2800.0);
    view.resize(350.0, 425.0);
    // body is now 300 x 400; max scroll is 2600
    assert_eq!(view.scroll_offset().1, 2600.0);
    assert_eq!(view.visible_range().rows(), 130..150);
}

#[test]
fn test_column_resize_shifts_following_columns() {
    let mut view = grid_with_body(wide_table(10, 10), 300.0, 200.0);
    assert_eq!(view.visible_range().cols(), 0..5);
    view.set_column_width(0, 200.0).unwrap();
    assert_eq!(view.visible_range().cols(), 0..3);
    assert_eq!(view.geometry().total_width(), 740.0);
}
