//! In-place editing tests: session lifecycle, parsing and commit effects.

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

use common::{cell_point, click_cell, grid_shared, grid_with_body, sample_table, PLAIN, SHIFT};
use datagrid::editor::parse_input;
use datagrid::{CellValue, ColumnType, FieldMode, GridError, Key, RenderKind};
use test_case::test_case;

#[test]
fn test_invalid_int_keeps_session_and_table() {
    let table = sample_table(5).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    assert!(view.begin_edit(2, 0));
    view.set_edit_buffer("12.5");
    let err = view.commit_edit().unwrap_err();
    match err {
        GridError::EditValidation {
            row,
            col,
            expected,
            input,
            ..
        } => {
            assert_eq!((row, col), (2, 0));
            assert_eq!(expected, ColumnType::Int);
            assert_eq!(input, "12.5");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(table.borrow().cell(2, 0), Some(&CellValue::Int(2)));
    assert!(view.is_editing());
    assert_eq!(view.edit_session().unwrap().buffer, "12.5");
}

#[test]
fn test_cancel_leaves_cell_unchanged() {
    let table = sample_table(5).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    let before = table.borrow().cell(1, 2).cloned();
    assert!(view.begin_edit(1, 2));
    view.set_edit_buffer("something else");
    assert!(view.cancel_edit());
    assert!(!view.is_editing());
    assert_eq!(table.borrow().cell(1, 2).cloned(), before);
}

#[test_case(0, "42", ColumnType::Int ; "int")]
#[test_case(1, "-3.25", ColumnType::Float ; "float")]
#[test_case(2, "hello world", ColumnType::Text ; "text")]
#[test_case(3, "No", ColumnType::Bool ; "bool")]
#[test_case(4, "  ", ColumnType::Float ; "blank is missing")]
fn test_valid_commit_writes_parsed_value(col: u32, input: &str, dtype: ColumnType) {
    let table = sample_table(5).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    assert!(view.begin_edit(3, col));
    view.set_edit_buffer(input);
    assert!(view.commit_edit().unwrap());
    let expected = parse_input(input, dtype).unwrap();
    assert_eq!(table.borrow().cell(3, col), Some(&expected));
    assert!(!view.is_editing());
}

#[test]
fn test_begin_edit_seeds_buffer_with_cell_text() {
    let mut view = grid_with_body(sample_table(5), 500.0, 300.0);
    assert!(view.begin_edit(2, 1));
    assert_eq!(view.edit_session().unwrap().buffer, "2.5");
}

#[test]
fn test_only_one_session() {
    let mut view = grid_with_body(sample_table(5), 500.0, 300.0);
    assert!(view.begin_edit(0, 0));
    assert!(!view.begin_edit(1, 1));
    assert_eq!(view.edit_session().unwrap().row, 0);
}

#[test]
fn test_field_modes_block_editing() {
    let mut view = grid_with_body(sample_table(5), 500.0, 300.0);
    view.set_field_mode(0, FieldMode::ReadOnly).unwrap();
    view.set_field_mode(1, FieldMode::Disabled).unwrap();
    assert!(!view.begin_edit(0, 0));
    assert!(!view.begin_edit(0, 1));
    assert!(view.begin_edit(0, 2));
    // switching the edited column to read-only closes the session
    view.set_field_mode(2, FieldMode::ReadOnly).unwrap();
    assert!(!view.is_editing());
    assert!(matches!(
        view.set_field_mode(9, FieldMode::Editable),
        Err(GridError::ColumnOutOfRange { col: 9, .. })
    ));
}

#[test]
fn test_refused_edit_keeps_viewport() {
    let mut view = grid_with_body(sample_table(200), 300.0, 200.0);
    view.set_field_mode(0, FieldMode::ReadOnly).unwrap();
    assert!(!view.begin_edit(120, 0));
    assert_eq!(view.scroll_offset(), (0.0, 0.0));

    // a second edit is refused while the first stays on screen
    assert!(view.begin_edit(0, 1));
    assert!(!view.begin_edit(140, 2));
    assert_eq!(view.scroll_offset(), (0.0, 0.0));
    let session = view.edit_session().unwrap();
    assert_eq!((session.row, session.col), (0, 1));
}

#[test]
fn test_begin_edit_scrolls_target_into_view() {
    let mut view = grid_with_body(sample_table(200), 300.0, 200.0);
    assert!(view.begin_edit(120, 0));
    assert!(view.visible_range().rows().contains(&120));
}

#[test]
fn test_read_only_option_applies_to_every_column() {
    let options = datagrid::GridOptions {
        read_only: true,
        ..datagrid::GridOptions::default()
    };
    let mut view = datagrid::create_grid(
        sample_table(5).into_shared(),
        500.0,
        300.0,
        options,
        datagrid::Theme::default(),
        datagrid::RecordingSurface::new(0.0, 0.0),
    )
    .unwrap();
    assert_eq!(view.field_mode(3), Some(FieldMode::ReadOnly));
    assert!(!view.begin_edit(1, 1));
}

#[test]
fn test_placement_matches_cell_and_follows_scroll() {
    let mut view = grid_with_body(sample_table(150), 300.0, 200.0);
    view.set_scroll(0.0, 100.0);
    assert!(view.begin_edit(7, 2));
    let placed = view.edit_session().unwrap().placement;
    // body origin (50, 25); row 7 at y=140, scrolled by 100
    assert_eq!((placed.x, placed.y, placed.width, placed.height), (170.0, 65.0, 60.0, 20.0));
    view.wheel(0.0, 40.0);
    assert_eq!(view.edit_session().unwrap().placement.y, 25.0);
}

#[test]
fn test_double_click_and_enter_commit() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    let (x, y) = cell_point(&view, 4, 0);
    view.pointer_down(x, y, PLAIN);
    view.pointer_up();
    assert!(view.double_click(x, y));
    view.set_edit_buffer("400");
    assert!(view.key_down(Key::Enter, PLAIN).unwrap());
    assert_eq!(table.borrow().cell(4, 0), Some(&CellValue::Int(400)));
    // Enter moves the current cell down
    assert_eq!(view.cursor(), Some((5, 0)));
}

#[test]
fn test_typing_starts_replacing_edit() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    click_cell(&mut view, 2, 2, PLAIN);
    assert!(view.key_down(Key::Char('x'), PLAIN).unwrap());
    assert!(view.text_input("yz"));
    view.key_down(Key::Backspace, PLAIN).unwrap();
    assert_eq!(view.edit_session().unwrap().buffer, "xy");
    view.key_down(Key::Tab, PLAIN).unwrap();
    assert_eq!(table.borrow().cell(2, 2), Some(&CellValue::Text("xy".into())));
    assert_eq!(view.cursor(), Some((2, 3)));
}

#[test]
fn test_escape_and_focus_loss_cancel() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    click_cell(&mut view, 1, 0, PLAIN);
    view.key_down(Key::F2, PLAIN).unwrap();
    view.set_edit_buffer("99");
    view.key_down(Key::Escape, PLAIN).unwrap();
    assert!(!view.is_editing());

    view.key_down(Key::Enter, PLAIN).unwrap();
    assert!(view.is_editing());
    view.set_edit_buffer("99");
    view.focus_lost();
    assert!(!view.is_editing());
    assert_eq!(table.borrow().cell(1, 0), Some(&CellValue::Int(1)));
}

#[test]
fn test_clicking_elsewhere_cancels() {
    let mut view = grid_shared(sample_table(10).into_shared(), 600.0, 400.0);
    assert!(view.begin_edit(1, 1));
    click_cell(&mut view, 1, 1, PLAIN);
    assert!(view.is_editing());
    click_cell(&mut view, 3, 1, SHIFT);
    assert!(!view.is_editing());
}

#[test]
fn test_commit_callback_and_single_cell_redraw() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    view.render_frame();

    let commits = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commits);
    view.set_on_cell_edit_committed(move |r, c, v| sink.borrow_mut().push((r, c, v.clone())));

    view.begin_edit(6, 1);
    view.set_edit_buffer("7.75");
    view.commit_edit().unwrap();
    assert_eq!(*commits.borrow(), vec![(6, 1, CellValue::Float(7.75))]);

    view.surface_mut().take_ops();
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.kind, RenderKind::Cell);
    assert_eq!(stats.cells_drawn, 1);
    assert_eq!(view.surface().texts(), ["7.75"]);
}

#[test]
fn test_structural_change_removing_edited_cell_cancels() {
    let table = sample_table(10).into_shared();
    let mut view = grid_shared(Rc::clone(&table), 600.0, 400.0);
    assert!(view.begin_edit(9, 4));
    table.borrow_mut().remove_row(9).unwrap();
    view.model_changed();
    assert!(!view.is_editing());

    assert!(view.begin_edit(2, 1));
    table.borrow_mut().remove_column(4).unwrap();
    view.model_columns_changed();
    assert!(view.is_editing());
}
