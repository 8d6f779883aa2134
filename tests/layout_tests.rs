//! Column/row geometry tests
//!
//! Width clamping, offset maintenance and point lookups.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use datagrid::layout::{ColumnLayout, RowLayout};
use datagrid::GridError;
use test_case::test_case;

fn assert_offsets_consistent(layout: &ColumnLayout) {
    let offsets = layout.offsets();
    assert_eq!(offsets.len(), layout.widths().len() + 1);
    assert_eq!(offsets[0], 0.0);
    for (i, w) in layout.widths().iter().enumerate() {
        assert!(offsets[i + 1] > offsets[i], "offsets not increasing at {i}");
        assert!((offsets[i + 1] - offsets[i] - w).abs() < 1e-9);
        assert!(*w >= layout.min_width() && *w <= layout.max_width());
    }
    let sum: f64 = layout.widths().iter().sum();
    assert!((layout.total_width() - sum).abs() < 1e-6);
}

#[test]
fn test_set_width_clamps_to_max() {
    let mut layout = ColumnLayout::from_widths(&[60.0, 60.0, 60.0], 30.0, 300.0);
    let applied = layout.set_width(1, 500.0).unwrap();
    assert_eq!(applied, 300.0);
    assert_eq!(layout.width_of(1), Some(300.0));
    assert_eq!(layout.offset_of(0), Some(0.0));
    assert_eq!(layout.offset_of(1), Some(60.0));
    assert_eq!(layout.offset_of(2), Some(360.0));
    assert_eq!(layout.total_width(), 420.0);
}

#[test_case(10.0, 30.0 ; "below minimum")]
#[test_case(-5.0, 30.0 ; "negative")]
#[test_case(120.0, 120.0 ; "in range")]
#[test_case(1e9, 300.0 ; "huge")]
fn test_set_width_clamping(requested: f64, expected: f64) {
    let mut layout = ColumnLayout::new(4, 60.0, 30.0, 300.0);
    assert_eq!(layout.set_width(2, requested).unwrap(), expected);
    assert_offsets_consistent(&layout);
}

#[test]
fn test_set_width_sequence_keeps_invariants() {
    let mut layout = ColumnLayout::new(40, 60.0, 30.0, 300.0);
    // deterministic pseudo-random walk over columns and widths
    let mut state = 0x2545_f491_u32;
    for _ in 0..500 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let col = state % 40;
        let px = f64::from(state % 400) - 20.0;
        layout.set_width(col, px).unwrap();
        assert_offsets_consistent(&layout);
    }
}

#[test]
fn test_set_width_out_of_range() {
    let mut layout = ColumnLayout::new(3, 60.0, 30.0, 300.0);
    assert!(matches!(
        layout.set_width(3, 100.0),
        Err(GridError::ColumnOutOfRange { col: 3, count: 3 })
    ));
}

#[test]
fn test_column_at_boundaries() {
    let layout = ColumnLayout::from_widths(&[50.0, 100.0, 75.0], 30.0, 300.0);
    assert_eq!(layout.column_at(0.0), Some(0));
    assert_eq!(layout.column_at(49.9), Some(0));
    assert_eq!(layout.column_at(50.0), Some(1));
    assert_eq!(layout.column_at(149.0), Some(1));
    assert_eq!(layout.column_at(150.0), Some(2));
    assert_eq!(layout.column_at(225.0), None);
    assert_eq!(layout.column_at(-1.0), None);
}

#[test]
fn test_resize_keeps_existing_widths() {
    let mut layout = ColumnLayout::from_widths(&[50.0, 100.0, 75.0], 30.0, 300.0);
    layout.resize(5);
    assert_eq!(layout.widths()[1], 100.0);
    assert_eq!(layout.len(), 5);
    assert_offsets_consistent(&layout);
    layout.resize(2);
    assert_eq!(layout.total_width(), 150.0);
    assert_offsets_consistent(&layout);
}

#[test]
fn test_row_lookup_matches_offsets() {
    let rows = RowLayout::new(150, 20.0);
    for r in 0..150 {
        let top = rows.offset_of(r);
        assert_eq!(rows.row_at(top), Some(r));
        assert_eq!(rows.row_at(top + 19.5), Some(r));
    }
    assert_eq!(rows.total_height(), 3000.0);
}

#[test]
fn test_geometry_cell_rect() {
    let geom = common::uniform_geometry(10, 4, 20.0, 60.0);
    let rect = geom.cell_rect(3, 2).unwrap();
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (120.0, 60.0, 60.0, 20.0));
    assert_eq!(geom.cell_at(130.0, 65.0), Some((3, 2)));
    assert!(geom.cell_rect(10, 0).is_none());
    assert!(geom.cell_rect(0, 4).is_none());
}
