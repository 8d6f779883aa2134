//! Selection overlay helpers.
//!
//! These helpers keep selection math testable without depending on a surface.
//! Rectangles are in content coordinates and are clipped to the visible range.

use std::collections::BTreeSet;
use std::ops::Range;

use crate::layout::{Geometry, VisibleRange};
use crate::types::Selection;

/// What a selection rectangle represents; picks its fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandKind {
    Rows,
    Cols,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionRect {
    pub kind: BandKind,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Outline edges that are real selection borders (not viewport cuts)
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
}

/// Fill rectangles for the visible part of `selection`.
///
/// A single `Cell` selection has no fill; it is shown by the current-cell
/// outline only.
pub fn selection_rects(
    selection: &Selection,
    range: &VisibleRange,
    geom: &Geometry,
) -> Vec<SelectionRect> {
    if range.is_empty() {
        return Vec::new();
    }
    let mut rects = Vec::new();
    match selection {
        Selection::None | Selection::Cell { .. } => {}
        Selection::Rows(rows) => {
            for run in runs(rows, range.rows()) {
                push_block(&mut rects, BandKind::Rows, run, range.cols(), geom, range);
            }
        }
        Selection::Cols(cols) => {
            for run in runs(cols, range.cols()) {
                push_block(&mut rects, BandKind::Cols, range.rows(), run, geom, range);
            }
        }
        Selection::Rect(block) => {
            let rows = block.r0.max(range.row_start)..block.r1.saturating_add(1).min(range.row_end);
            let cols = block.c0.max(range.col_start)..block.c1.saturating_add(1).min(range.col_end);
            if !rows.is_empty() && !cols.is_empty() {
                let mut rect = block_rect(BandKind::Block, &rows, &cols, geom);
                rect.draw_top = rows.start == block.r0;
                rect.draw_bottom = rows.end == block.r1.saturating_add(1);
                rect.draw_left = cols.start == block.c0;
                rect.draw_right = cols.end == block.c1.saturating_add(1);
                rects.push(rect);
            }
        }
    }
    rects
}

fn push_block(
    rects: &mut Vec<SelectionRect>,
    kind: BandKind,
    rows: Range<u32>,
    cols: Range<u32>,
    geom: &Geometry,
    range: &VisibleRange,
) {
    if rows.is_empty() || cols.is_empty() {
        return;
    }
    let mut rect = block_rect(kind, &rows, &cols, geom);
    rect.draw_top = rows.start > range.row_start || rows.start == 0;
    rect.draw_bottom = rows.end < range.row_end || rows.end == geom.rows.len();
    rect.draw_left = cols.start > range.col_start || cols.start == 0;
    rect.draw_right = cols.end < range.col_end || cols.end == geom.columns.len();
    rects.push(rect);
}

fn block_rect(kind: BandKind, rows: &Range<u32>, cols: &Range<u32>, geom: &Geometry) -> SelectionRect {
    let x1 = geom.columns.offset_of(cols.start).unwrap_or(0.0);
    let x2 = geom.columns.offset_of(cols.end).unwrap_or(x1);
    let y1 = geom.rows.offset_of(rows.start);
    let y2 = geom.rows.offset_of(rows.end);
    SelectionRect {
        kind,
        x: x1,
        y: y1,
        w: (x2 - x1).max(0.0),
        h: (y2 - y1).max(0.0),
        draw_top: true,
        draw_bottom: true,
        draw_left: true,
        draw_right: true,
    }
}

/// Contiguous runs of `members` inside `window`.
fn runs(members: &BTreeSet<u32>, window: Range<u32>) -> Vec<Range<u32>> {
    let mut out: Vec<Range<u32>> = Vec::new();
    for &idx in members.range(window) {
        match out.last_mut() {
            Some(run) if run.end == idx => run.end = idx + 1,
            _ => out.push(idx..idx + 1),
        }
    }
    out
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::{ColumnLayout, RowLayout};

    fn geometry() -> Geometry {
        Geometry {
            columns: ColumnLayout::new(6, 60.0, 30.0, 300.0),
            rows: RowLayout::new(100, 20.0),
        }
    }

    fn range(rows: Range<u32>, cols: Range<u32>) -> VisibleRange {
        VisibleRange {
            row_start: rows.start,
            row_end: rows.end,
            col_start: cols.start,
            col_end: cols.end,
        }
    }

    #[test]
    fn test_rows_split_into_runs() {
        let rects = selection_rects(&Selection::rows([2, 3, 7, 50]), &range(0..10, 0..6), &geometry());
        assert_eq!(rects.len(), 2);
        assert_eq!((rects[0].y, rects[0].h), (40.0, 40.0));
        assert_eq!((rects[1].y, rects[1].h), (140.0, 20.0));
        assert_eq!(rects[0].w, 360.0);
        assert!(rects.iter().all(|r| r.kind == BandKind::Rows));
    }

    #[test]
    fn test_rect_clipped_to_visible_range() {
        let sel = Selection::rect(5, 1, 40, 2);
        let rects = selection_rects(&sel, &range(10..20, 0..6), &geometry());
        assert_eq!(rects.len(), 1);
        let r = rects[0];
        assert_eq!((r.x, r.y, r.w, r.h), (60.0, 200.0, 120.0, 200.0));
        assert!(!r.draw_top && !r.draw_bottom);
        assert!(r.draw_left && r.draw_right);
    }

    #[test]
    fn test_offscreen_and_cell_selections_have_no_fill() {
        let geom = geometry();
        let visible = range(0..10, 0..3);
        assert!(selection_rects(&Selection::rect(20, 0, 30, 1), &visible, &geom).is_empty());
        assert!(selection_rects(&Selection::cols([4, 5]), &visible, &geom).is_empty());
        assert!(selection_rects(&Selection::cell(1, 1), &visible, &geom).is_empty());
    }
}
