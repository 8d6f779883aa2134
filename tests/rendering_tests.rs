//! Rendering tests against the recording surface: draw order, culling and
//! per-column presentation.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{click_cell, column_header_point, grid, grid_with_body, sample_table, wide_table, PLAIN, SHIFT};
use datagrid::{
    CellValue, Column, ColumnType, DrawOp, FieldMode, GridError, GridView, RecordingSurface,
    RenderKind, Table, Theme,
};

/// Text drawn in the body font, in draw order.
fn body_texts(view: &GridView<RecordingSurface>) -> Vec<String> {
    let font = Theme::default().font;
    view.surface()
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, font: f, .. } if *f == font => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn header_texts(view: &GridView<RecordingSurface>) -> Vec<String> {
    let font = Theme::default().header_font;
    view.surface()
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, font: f, .. } if *f == font => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn position(ops: &[DrawOp], what: &str, pred: impl Fn(&DrawOp) -> bool) -> usize {
    ops.iter()
        .position(pred)
        .unwrap_or_else(|| panic!("no {what} op"))
}

#[test]
fn test_only_visible_cells_are_drawn() {
    let mut view = grid_with_body(wide_table(1000, 50), 300.0, 200.0);
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.kind, RenderKind::Structural);
    assert_eq!(stats.cells_drawn, 50);
    let texts = body_texts(&view);
    assert_eq!(texts.len(), 50);
    assert!(texts.iter().any(|t| t == "904"));
    assert!(!texts.iter().any(|t| t == "1004" || t == "5"));

    view.surface_mut().take_ops();
    assert!(view.wheel(0.0, 200.0));
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.kind, RenderKind::Visible);
    let texts = body_texts(&view);
    assert!(texts.iter().any(|t| t == "1004"));
    assert!(!texts.iter().any(|t| t == "904"));
}

#[test]
fn test_body_draw_order() {
    let mut view = grid(wide_table(10, 4), 600.0, 400.0);
    click_cell(&mut view, 1, 1, PLAIN);
    click_cell(&mut view, 2, 2, SHIFT);
    view.render_frame().unwrap();
    let ops = view.surface().ops();
    let theme = Theme::default();

    assert!(matches!(ops[0], DrawOp::Clear { .. }));
    let background = position(ops, "cell background", |op| {
        matches!(op, DrawOp::FillRect { color, .. } if *color == theme.cell_background)
    });
    let grid_line = position(ops, "grid line", |op| {
        matches!(op, DrawOp::Line { color, .. } if *color == theme.grid_color)
    });
    let text = position(ops, "text", |op| matches!(op, DrawOp::Text { text, .. } if text == "101"));
    let fill = position(ops, "selection fill", |op| {
        matches!(op, DrawOp::FillRect { color, .. } if color == "rgba(224, 242, 247, 0.60)")
    });
    let cursor = position(ops, "cursor outline", |op| {
        matches!(op, DrawOp::StrokeRect { color, .. } if *color == theme.box_outline_color)
    });
    assert!(background < grid_line, "background before grid lines");
    assert!(grid_line < text, "grid lines before text");
    assert!(text < fill, "text before selection");
    assert!(fill < cursor, "selection before current-cell outline");
    assert_eq!(view.surface().fills_with("rgba(224, 242, 247, 0.60)").len(), 1);
}

#[test]
fn test_precision_applies_to_float_columns_only() {
    let table = Table::new(vec![
        Column::ints("n", [7, 8, 9]),
        Column::floats("x", [12.5, 0.001_234, 0.5]),
    ])
    .unwrap();
    let mut view = grid(table, 600.0, 400.0);
    view.render_frame().unwrap();
    assert_eq!(body_texts(&view), ["7", "8", "9", "12.5", "0.001234", "0.5"]);

    view.set_precision(3).unwrap();
    view.surface_mut().take_ops();
    view.render_frame().unwrap();
    assert_eq!(body_texts(&view), ["7", "8", "9", "12.500", "0.00123", "0.5"]);
}

#[test]
fn test_missing_and_nan_render_empty() {
    let column = Column::new(
        "v",
        ColumnType::Float,
        vec![CellValue::Missing, CellValue::Float(1.0), CellValue::Float(f64::NAN)],
    )
    .unwrap();
    let mut view = grid(Table::new(vec![column]).unwrap(), 600.0, 400.0);
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.cells_drawn, 3);
    assert_eq!(body_texts(&view), ["1"]);
}

#[test]
fn test_column_color_override() {
    let mut view = grid(wide_table(10, 4), 600.0, 400.0);
    view.set_column_color("c1", Some("#123456")).unwrap();
    view.render_frame().unwrap();
    assert_eq!(view.surface().fills_with("#123456").len(), 1);
    // dark background switches the text to white
    let white = view
        .surface()
        .ops()
        .iter()
        .filter(|op| matches!(op, DrawOp::Text { color, .. } if color == "#FFFFFF"))
        .count();
    assert_eq!(white, 10);

    assert!(matches!(
        view.set_column_color("c1", Some("red")),
        Err(GridError::Config(_))
    ));
    view.set_column_color("c1", None).unwrap();
    view.surface_mut().take_ops();
    view.render_frame().unwrap();
    assert!(view.surface().fills_with("#123456").is_empty());
}

#[test]
fn test_disabled_column_uses_disabled_text_color() {
    let mut view = grid(sample_table(10), 600.0, 400.0);
    view.set_field_mode(2, FieldMode::Disabled).unwrap();
    view.render_frame().unwrap();
    let dimmed: Vec<String> = view
        .surface()
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { text, color, .. } if color == "#8A8A8A" => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(dimmed.len(), 10);
    assert!(dimmed.iter().all(|t| t.starts_with("item ")));
}

#[test]
fn test_headers_follow_scroll() {
    let mut view = grid_with_body(wide_table(100, 3), 300.0, 200.0);
    view.set_scroll(0.0, 200.0);
    view.render_frame().unwrap();
    let headers = header_texts(&view);
    for name in ["c0", "c1", "c2", "10", "19"] {
        assert!(headers.iter().any(|h| h == name), "missing header {name}");
    }
    assert!(!headers.iter().any(|h| h == "9" || h == "20"));
}

#[test]
fn test_selected_column_header_is_highlighted() {
    let mut view = grid(wide_table(10, 4), 600.0, 400.0);
    let (x, y) = column_header_point(&view, 2);
    view.pointer_down(x, y, PLAIN);
    view.render_frame().unwrap();
    let theme = Theme::default();
    assert_eq!(view.surface().fills_with(&theme.header_selected_background).len(), 1);
    assert_eq!(view.surface().fills_with("rgba(228, 227, 228, 0.60)").len(), 1);
    let highlighted = view.surface().ops().iter().any(|op| {
        matches!(op, DrawOp::Text { text, color, .. }
            if text == "c2" && *color == theme.header_selected_text_color)
    });
    assert!(highlighted);
}

#[test]
fn test_empty_table_renders_chrome_only() {
    let mut view = grid(Table::default(), 300.0, 200.0);
    let stats = view.render_frame().unwrap();
    assert_eq!(stats.cells_drawn, 0);
    assert!(body_texts(&view).is_empty());
    assert!(header_texts(&view).is_empty());
}
