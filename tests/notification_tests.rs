//! Model notification tests: resets, structural changes and single-cell
//! refreshes.

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

use common::{click_cell, grid_shared, grid_with_body, sample_table, wide_table, PLAIN};
use datagrid::{CellValue, Column, DrawOp, FieldMode, RenderKind, Selection};

#[test]
fn test_reset_replaces_geometry_and_state() {
    let mut view = grid_with_body(wide_table(200, 20), 300.0, 200.0);
    view.set_scroll(100.0, 500.0);
    click_cell(&mut view, 30, 3, PLAIN);
    assert!(view.begin_edit(30, 3));
    view.render_frame();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    view.set_on_selection_changed(move |s| sink.borrow_mut().push(s.clone()));

    view.model_reset(wide_table(5, 2).into_shared());
    assert_eq!(view.scroll_offset(), (0.0, 0.0));
    assert_eq!(view.visible_range().rows(), 0..5);
    assert_eq!(view.visible_range().cols(), 0..2);
    assert!(!view.is_editing());
    assert_eq!(*seen.borrow(), vec![Selection::None]);
    assert_eq!(view.render_frame().unwrap().kind, RenderKind::Structural);
}

#[test]
fn test_added_column_is_laid_out_and_drawn() {
    let table = wide_table(5, 2).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.render_frame();
    table
        .borrow_mut()
        .push_column(Column::ints("extra", [1, 2, 3, 4, 5]))
        .unwrap();
    view.model_columns_changed();
    assert_eq!(view.geometry().columns.len(), 3);
    assert_eq!(view.visible_range().cols(), 0..3);

    view.surface_mut().take_ops();
    assert_eq!(view.render_frame().unwrap().kind, RenderKind::Structural);
    assert!(view.surface().texts().contains(&"extra"));
}

#[test]
fn test_cell_change_redraws_one_clipped_cell() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.render_frame();
    view.surface_mut().take_ops();

    table
        .borrow_mut()
        .set_cell(1, 2, CellValue::Text("new".into()))
        .unwrap();
    view.model_cell_changed(1, 2);
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.kind, RenderKind::Cell);
    assert_eq!(stats.cells_drawn, 1);

    let ops = view.surface().ops();
    assert!(matches!(ops.first(), Some(DrawOp::Clip { .. })));
    assert!(matches!(ops.last(), Some(DrawOp::ResetClip)));
    assert_eq!(view.surface().texts(), ["new"]);
}

#[test]
fn test_offscreen_cell_change_draws_nothing() {
    let table = sample_table(100).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.render_frame();
    view.surface_mut().take_ops();

    table.borrow_mut().set_cell(50, 0, CellValue::Int(5)).unwrap();
    view.model_cell_changed(50, 0);
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.cells_drawn, 0);
    assert!(view.surface().ops().is_empty());
}

#[test]
fn test_many_cell_changes_collapse_to_visible_redraw() {
    let table = wide_table(100, 5).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.render_frame();
    for row in 0..20 {
        for col in 0..4 {
            view.model_cell_changed(row, col);
        }
    }
    assert_eq!(view.render_frame().unwrap().kind, RenderKind::Visible);
}

#[test]
fn test_shape_change_without_notification_resyncs() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.render_frame();

    let row = || {
        vec![
            CellValue::Int(10),
            CellValue::Float(1.0),
            CellValue::Text("x".into()),
            CellValue::Bool(true),
            CellValue::Float(0.0),
        ]
    };
    table.borrow_mut().push_row(row()).unwrap();
    view.model_cell_changed(0, 0);
    assert_eq!(view.render_frame().unwrap().kind, RenderKind::Structural);
    assert_eq!(view.geometry().rows.len(), 11);

    // detected at render time when nothing was reported
    table.borrow_mut().push_row(row()).unwrap();
    view.invalidate();
    view.render_frame().unwrap();
    assert_eq!(view.geometry().rows.len(), 12);
    assert_eq!(view.visible_range().rows(), 0..12);
}

#[test]
fn test_field_settings_follow_column_names() {
    let table = wide_table(5, 4).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.set_column_color("c2", Some("#202020")).unwrap();
    view.set_field_mode(3, FieldMode::Disabled).unwrap();

    table.borrow_mut().remove_column(0).unwrap();
    view.model_columns_changed();
    assert_eq!(view.field_mode(0), Some(FieldMode::Editable));
    assert_eq!(view.field_mode(2), Some(FieldMode::Disabled));
    assert_eq!(view.field_mode(3), None);

    view.surface_mut().take_ops();
    view.render_frame().unwrap();
    assert_eq!(view.surface().fills_with("#202020").len(), 1);
}

#[test]
fn test_set_cell_text_writes_and_redraws_one_cell() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.render_frame();
    view.surface_mut().take_ops();

    let previous = view.set_cell_text(3, 1, "42.25").unwrap();
    assert_eq!(previous, CellValue::Float(3.5));
    assert_eq!(table.borrow().cell(3, 1), Some(&CellValue::Float(42.25)));
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.kind, RenderKind::Cell);
    assert_eq!(view.surface().texts(), ["42.25"]);

    assert!(matches!(
        view.set_cell_text(3, 0, "abc"),
        Err(datagrid::GridError::EditValidation { row: 3, col: 0, .. })
    ));
    assert!(matches!(
        view.set_cell_text(3, 9, "1"),
        Err(datagrid::GridError::CellOutOfRange { row: 3, col: 9 })
    ));
    assert_eq!(table.borrow().cell(3, 0), Some(&CellValue::Int(3)));
}
