//! Selection tests driven through pointer and keyboard intents.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{
    cell_point, click_cell, column_header_point, grid, grid_with_body, row_header_point,
    sample_table, wide_table, CTRL, PLAIN, SHIFT,
};
use datagrid::types::CellRange;
use datagrid::{HitTarget, Key, Selection};

#[test]
fn test_shift_click_extends_cell_to_block() {
    let mut view = grid(sample_table(20), 600.0, 400.0);
    click_cell(&mut view, 3, 2, PLAIN);
    assert_eq!(view.selection(), &Selection::cell(3, 2));
    click_cell(&mut view, 1, 4, SHIFT);
    assert_eq!(view.selection(), &Selection::rect(1, 2, 3, 4));
}

#[test]
fn test_normalizing_is_idempotent() {
    let cases = [(0, 0, 0, 0), (5, 1, 2, 3), (2, 9, 7, 4), (1, 1, 1, 0)];
    for (r0, c0, r1, c1) in cases {
        let once = CellRange::new(r0, c0, r1, c1);
        assert!(once.r0 <= once.r1 && once.c0 <= once.c1);
        assert_eq!(once.normalized(), once);
        assert_eq!(once.normalized().normalized(), once);
    }
}

#[test]
fn test_drag_selects_renormalized_block() {
    let mut view = grid(sample_table(20), 600.0, 400.0);
    let (x, y) = cell_point(&view, 6, 3);
    view.pointer_down(x, y, PLAIN);
    let (x, y) = cell_point(&view, 2, 1);
    view.pointer_move(x, y);
    assert_eq!(view.selection(), &Selection::rect(2, 1, 6, 3));
    let (x, y) = cell_point(&view, 8, 4);
    view.pointer_move(x, y);
    assert_eq!(view.selection(), &Selection::rect(6, 3, 8, 4));
    view.pointer_up();
    // moving without the button does nothing
    let (x, y) = cell_point(&view, 0, 0);
    view.pointer_move(x, y);
    assert_eq!(view.selection(), &Selection::rect(6, 3, 8, 4));
}

#[test]
fn test_drag_past_body_edge_clamps_to_last_cell() {
    let mut view = grid(sample_table(5), 600.0, 400.0);
    let (x, y) = cell_point(&view, 1, 1);
    view.pointer_down(x, y, PLAIN);
    view.pointer_move(599.0, 399.0);
    assert_eq!(view.selection(), &Selection::rect(1, 1, 4, 4));
}

#[test]
fn test_header_clicks() {
    let mut view = grid(wide_table(30, 8), 600.0, 400.0);
    let (x, y) = column_header_point(&view, 2);
    assert_eq!(view.hit_test(x, y), HitTarget::ColumnHeader(2));
    view.pointer_down(x, y, PLAIN);
    assert_eq!(view.selection(), &Selection::cols([2]));

    let (x, y) = column_header_point(&view, 5);
    view.pointer_down(x, y, SHIFT);
    assert_eq!(view.selection(), &Selection::cols([2, 3, 4, 5]));

    let (x, y) = column_header_point(&view, 3);
    view.pointer_down(x, y, CTRL);
    assert_eq!(view.selection(), &Selection::cols([2, 4, 5]));

    let (x, y) = row_header_point(&view, 7);
    assert_eq!(view.hit_test(x, y), HitTarget::RowHeader(7));
    view.pointer_down(x, y, PLAIN);
    assert_eq!(view.selection(), &Selection::rows([7]));
    let (x, y) = row_header_point(&view, 9);
    view.pointer_down(x, y, CTRL);
    assert_eq!(view.selection(), &Selection::rows([7, 9]));
}

#[test]
fn test_corner_selects_everything() {
    let mut view = grid(wide_table(30, 8), 600.0, 400.0);
    assert_eq!(view.hit_test(10.0, 10.0), HitTarget::CornerHeader);
    view.pointer_down(10.0, 10.0, PLAIN);
    assert_eq!(view.selection(), &Selection::rect(0, 0, 29, 7));
}

#[test]
fn test_columns_changed_drops_removed_indices() {
    let table = wide_table(10, 5).into_shared();
    let mut view = common::grid_shared(Rc::clone(&table), 600.0, 400.0);
    let (x, y) = column_header_point(&view, 2);
    view.pointer_down(x, y, PLAIN);
    let (x, y) = column_header_point(&view, 3);
    view.pointer_down(x, y, CTRL);
    assert_eq!(view.selection(), &Selection::cols([2, 3]));

    table.borrow_mut().remove_column(4).unwrap();
    table.borrow_mut().remove_column(3).unwrap();
    view.model_columns_changed();
    assert_eq!(view.selection(), &Selection::cols([2]));
}

#[test]
fn test_model_changed_clips_block_and_clears_cell() {
    let table = wide_table(10, 4).into_shared();
    let mut view = common::grid_shared(Rc::clone(&table), 600.0, 400.0);
    click_cell(&mut view, 5, 1, PLAIN);
    click_cell(&mut view, 9, 3, SHIFT);
    for _ in 0..3 {
        let last = table.borrow().row_count() - 1;
        table.borrow_mut().remove_row(last).unwrap();
    }
    view.model_changed();
    assert_eq!(view.selection(), &Selection::rect(5, 1, 6, 3));

    click_cell(&mut view, 6, 0, PLAIN);
    table.borrow_mut().remove_row(6).unwrap();
    view.model_changed();
    assert!(view.selection().is_none());
}

#[test]
fn test_reload_resets_selection() {
    let mut view = grid(sample_table(10), 600.0, 400.0);
    click_cell(&mut view, 2, 2, PLAIN);
    view.model_reset(sample_table(10).into_shared());
    assert!(view.selection().is_none());
    assert!(view.cursor().is_none());
}

#[test]
fn test_selection_callback_fires_only_on_change() {
    let mut view = grid(sample_table(10), 600.0, 400.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    view.set_on_selection_changed(move |s| sink.borrow_mut().push(s.clone()));

    click_cell(&mut view, 1, 1, PLAIN);
    click_cell(&mut view, 1, 1, PLAIN);
    click_cell(&mut view, 2, 2, SHIFT);
    assert_eq!(
        *seen.borrow(),
        vec![Selection::cell(1, 1), Selection::rect(1, 1, 2, 2)]
    );
}

#[test]
fn test_keyboard_navigation_scrolls_into_view() {
    let mut view = grid_with_body(sample_table(150), 300.0, 200.0);
    click_cell(&mut view, 0, 0, PLAIN);
    for _ in 0..12 {
        view.key_down(Key::Down, PLAIN).unwrap();
    }
    assert_eq!(view.selection(), &Selection::cell(12, 0));
    // row 12 spans 240..260; the 200px body must end at 260
    assert_eq!(view.scroll_offset().1, 60.0);
    assert!(view.visible_range().contains(12, 0));

    view.key_down(Key::Right, SHIFT).unwrap();
    view.key_down(Key::Right, SHIFT).unwrap();
    assert_eq!(view.selection(), &Selection::rect(12, 0, 12, 2));

    view.key_down(Key::End, CTRL).unwrap();
    assert_eq!(view.selection(), &Selection::cell(149, 4));
    assert_eq!(view.scroll_offset().1, 2800.0);

    view.key_down(Key::PageUp, PLAIN).unwrap();
    assert_eq!(view.cursor(), Some((139, 4)));
}

#[test]
fn test_escape_and_ctrl_a() {
    let mut view = grid(sample_table(10), 600.0, 400.0);
    assert!(view.key_down(Key::Char('a'), CTRL).unwrap());
    assert_eq!(view.selection(), &Selection::rect(0, 0, 9, 4));
    assert!(view.key_down(Key::Escape, PLAIN).unwrap());
    assert!(view.selection().is_none());
}
