//! Selection state machine.
//!
//! Every transition returns whether the selection actually changed so the
//! view only notifies observers on real changes.

use std::collections::BTreeSet;

use super::events::Modifiers;
use crate::error::GridError;
use crate::types::{CellRange, Selection};

/// Header run anchor for shift-extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderAnchor {
    Row(u32),
    Col(u32),
}

/// Keyboard movement of the current cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    Left,
    Right,
    /// First column (first cell with ctrl)
    Home,
    /// Last column (last cell with ctrl)
    End,
    PageUp,
    PageDown,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    selection: Selection,
    /// Last plain-clicked cell
    anchor: Option<(u32, u32)>,
    /// Current cell
    cursor: Option<(u32, u32)>,
    header_anchor: Option<HeaderAnchor>,
    dragging: bool,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cursor(&self) -> Option<(u32, u32)> {
        self.cursor
    }

    pub fn anchor(&self) -> Option<(u32, u32)> {
        self.anchor
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn replace(&mut self, next: Selection) -> bool {
        if self.selection == next {
            return false;
        }
        self.selection = next;
        true
    }

    /// Pointer down on a body cell.
    ///
    /// Shift extends a `Cell`/`Rect` selection from the anchor; otherwise
    /// the click selects the cell and starts a drag.
    pub fn click_cell(&mut self, row: u32, col: u32, mods: Modifiers) -> bool {
        let extendable = matches!(self.selection, Selection::Cell { .. } | Selection::Rect(_));
        if let (true, true, Some(anchor)) = (mods.shift, extendable, self.anchor) {
            self.cursor = Some((row, col));
            self.header_anchor = None;
            return self.replace(Selection::Rect(CellRange::spanning(anchor, (row, col))));
        }
        self.anchor = Some((row, col));
        self.cursor = Some((row, col));
        self.header_anchor = None;
        self.dragging = true;
        self.replace(Selection::cell(row, col))
    }

    /// Pointer moved to a body cell while the button is held.
    pub fn drag_to(&mut self, row: u32, col: u32) -> bool {
        let (true, Some(anchor)) = (self.dragging, self.anchor) else {
            return false;
        };
        self.cursor = Some((row, col));
        if anchor == (row, col) {
            return self.replace(Selection::cell(row, col));
        }
        self.replace(Selection::Rect(CellRange::spanning(anchor, (row, col))))
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Click on a row header.
    pub fn click_row_header(&mut self, row: u32, mods: Modifiers) -> bool {
        let current = match &self.selection {
            Selection::Rows(rows) => Some(rows.clone()),
            _ => None,
        };
        let anchor = match self.header_anchor {
            Some(HeaderAnchor::Row(r)) => Some(r),
            _ => None,
        };
        let next = header_transition(current, anchor, row, mods);
        if mods.shift && anchor.is_some() {
            // the run keeps its anchor
        } else {
            self.header_anchor = Some(HeaderAnchor::Row(row));
        }
        self.anchor = None;
        self.cursor = None;
        self.dragging = false;
        self.replace(next.map_or(Selection::None, Selection::Rows))
    }

    /// Click on a column header.
    pub fn click_col_header(&mut self, col: u32, mods: Modifiers) -> bool {
        let current = match &self.selection {
            Selection::Cols(cols) => Some(cols.clone()),
            _ => None,
        };
        let anchor = match self.header_anchor {
            Some(HeaderAnchor::Col(c)) => Some(c),
            _ => None,
        };
        let next = header_transition(current, anchor, col, mods);
        if !(mods.shift && anchor.is_some()) {
            self.header_anchor = Some(HeaderAnchor::Col(col));
        }
        self.anchor = None;
        self.cursor = None;
        self.dragging = false;
        self.replace(next.map_or(Selection::None, Selection::Cols))
    }

    /// Index-header click: everything as one block.
    pub fn select_all(&mut self, rows: u32, cols: u32) -> bool {
        self.header_anchor = None;
        self.dragging = false;
        if rows == 0 || cols == 0 {
            self.anchor = None;
            self.cursor = None;
            return self.replace(Selection::None);
        }
        self.anchor = Some((0, 0));
        self.cursor = Some((0, 0));
        self.replace(Selection::rect(0, 0, rows - 1, cols - 1))
    }

    /// Reset to `None` (reload or explicit clear).
    pub fn clear(&mut self) -> bool {
        self.anchor = None;
        self.cursor = None;
        self.header_anchor = None;
        self.dragging = false;
        self.replace(Selection::None)
    }

    /// Move the current cell; `extend` grows a block from the anchor.
    ///
    /// Returns whether the selection changed. The new cursor is available
    /// from [`SelectionController::cursor`].
    pub fn navigate(&mut self, nav: Nav, mods: Modifiers, rows: u32, cols: u32, page: u32) -> bool {
        if rows == 0 || cols == 0 {
            return false;
        }
        let (row, col) = self.cursor.unwrap_or((0, 0));
        let last_row = rows - 1;
        let last_col = cols - 1;
        let page = page.max(1);
        let (row, col) = match nav {
            Nav::Up => (row.saturating_sub(1), col),
            Nav::Down => ((row + 1).min(last_row), col),
            Nav::Left => (row, col.saturating_sub(1)),
            Nav::Right => (row, (col + 1).min(last_col)),
            Nav::Home if mods.ctrl => (0, 0),
            Nav::Home => (row, 0),
            Nav::End if mods.ctrl => (last_row, last_col),
            Nav::End => (row, last_col),
            Nav::PageUp => (row.saturating_sub(page), col),
            Nav::PageDown => (row.saturating_add(page).min(last_row), col),
        };
        let (row, col) = (row.min(last_row), col.min(last_col));
        self.cursor = Some((row, col));
        self.header_anchor = None;
        self.dragging = false;
        match self.anchor {
            Some(anchor) if mods.shift => {
                if anchor == (row, col) {
                    self.replace(Selection::cell(row, col))
                } else {
                    self.replace(Selection::Rect(CellRange::spanning(anchor, (row, col))))
                }
            }
            _ => {
                self.anchor = Some((row, col));
                self.replace(Selection::cell(row, col))
            }
        }
    }

    /// Drop indices that refer to rows/columns past the new shape.
    pub fn retain_within(&mut self, rows: u32, cols: u32) -> bool {
        let next = match &self.selection {
            Selection::None => Selection::None,
            Selection::Cell { row, col } => {
                if *row < rows && *col < cols {
                    Selection::cell(*row, *col)
                } else {
                    log_outside(*row, *col, rows, cols);
                    Selection::None
                }
            }
            Selection::Rows(set) => filter_set(set, rows, "rows").map_or(Selection::None, Selection::Rows),
            Selection::Cols(set) => filter_set(set, cols, "cols").map_or(Selection::None, Selection::Cols),
            Selection::Rect(block) => {
                if block.r0 >= rows || block.c0 >= cols {
                    log_outside(block.r0, block.c0, rows, cols);
                    Selection::None
                } else {
                    let clipped = CellRange::new(
                        block.r0,
                        block.c0,
                        block.r1.min(rows - 1),
                        block.c1.min(cols - 1),
                    );
                    if clipped != *block {
                        log_outside(block.r1, block.c1, rows, cols);
                    }
                    Selection::Rect(clipped)
                }
            }
        };
        let inside = |p: (u32, u32)| p.0 < rows && p.1 < cols;
        self.anchor = self.anchor.filter(|&p| inside(p));
        self.cursor = self.cursor.filter(|&p| inside(p));
        self.header_anchor = self.header_anchor.filter(|a| match *a {
            HeaderAnchor::Row(r) => r < rows,
            HeaderAnchor::Col(c) => c < cols,
        });
        if matches!(next, Selection::None) {
            self.dragging = false;
        }
        self.replace(next)
    }
}

/// Header click on `index` given the current set (if the selection is of
/// the same axis) and the header anchor.
fn header_transition(
    current: Option<BTreeSet<u32>>,
    anchor: Option<u32>,
    index: u32,
    mods: Modifiers,
) -> Option<BTreeSet<u32>> {
    if mods.ctrl {
        let mut set = current.unwrap_or_default();
        if !set.remove(&index) {
            set.insert(index);
        }
        return (!set.is_empty()).then_some(set);
    }
    if let (true, Some(a)) = (mods.shift, anchor) {
        return Some((a.min(index)..=a.max(index)).collect());
    }
    Some(BTreeSet::from([index]))
}

fn filter_set(set: &BTreeSet<u32>, limit: u32, axis: &'static str) -> Option<BTreeSet<u32>> {
    let kept: BTreeSet<u32> = set.range(..limit).copied().collect();
    for &index in set.range(limit..) {
        log_dropped(axis, index, limit);
    }
    (!kept.is_empty()).then_some(kept)
}

/// Axes of `(row, col)` that fall past the table shape, as `(axis, index, limit)`.
fn outside_axes(row: u32, col: u32, rows: u32, cols: u32) -> Vec<(&'static str, u32, u32)> {
    let mut out = Vec::with_capacity(2);
    if row >= rows {
        out.push(("rows", row, rows));
    }
    if col >= cols {
        out.push(("cols", col, cols));
    }
    out
}

fn log_outside(row: u32, col: u32, rows: u32, cols: u32) {
    for (axis, index, limit) in outside_axes(row, col, rows, cols) {
        log_dropped(axis, index, limit);
    }
}

fn log_dropped(axis: &'static str, index: u32, limit: u32) {
    let err = GridError::SelectionRange { axis, index, limit };
    tracing::debug!(%err, "dropped selection index");
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

    const PLAIN: Modifiers = Modifiers::NONE;
    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };

    #[test]
    fn test_shift_click_extends_from_anchor() {
        let mut sel = SelectionController::new();
        assert!(sel.click_cell(3, 2, PLAIN));
        sel.end_drag();
        assert!(sel.click_cell(1, 4, SHIFT));
        assert_eq!(sel.selection(), &Selection::rect(1, 2, 3, 4));
        // anchor survives repeated shift-clicks
        sel.click_cell(5, 0, SHIFT);
        assert_eq!(sel.selection(), &Selection::rect(3, 0, 5, 2));
    }

    #[test]
    fn test_drag_renormalizes() {
        let mut sel = SelectionController::new();
        sel.click_cell(5, 5, PLAIN);
        assert!(sel.drag_to(2, 7));
        assert_eq!(sel.selection(), &Selection::rect(2, 5, 5, 7));
        assert!(sel.drag_to(5, 5));
        assert_eq!(sel.selection(), &Selection::cell(5, 5));
        sel.end_drag();
        assert!(!sel.drag_to(0, 0));
    }

    #[test]
    fn test_header_toggle_and_extend() {
        let mut sel = SelectionController::new();
        sel.click_row_header(4, PLAIN);
        assert_eq!(sel.selection(), &Selection::rows([4]));
        sel.click_row_header(8, CTRL);
        assert_eq!(sel.selection(), &Selection::rows([4, 8]));
        sel.click_row_header(4, CTRL);
        assert_eq!(sel.selection(), &Selection::rows([8]));
        sel.click_row_header(8, CTRL);
        assert!(sel.selection().is_none());

        sel.click_col_header(2, PLAIN);
        sel.click_col_header(5, SHIFT);
        assert_eq!(sel.selection(), &Selection::cols([2, 3, 4, 5]));
        sel.click_col_header(0, SHIFT);
        assert_eq!(sel.selection(), &Selection::cols([0, 1, 2]));
    }

    #[test]
    fn test_shift_click_without_cell_anchor_is_plain() {
        let mut sel = SelectionController::new();
        sel.click_col_header(1, PLAIN);
        sel.click_cell(2, 2, SHIFT);
        assert_eq!(sel.selection(), &Selection::cell(2, 2));
    }

    #[test]
    fn test_unchanged_selection_reports_false() {
        let mut sel = SelectionController::new();
        assert!(sel.click_cell(1, 1, PLAIN));
        assert!(!sel.click_cell(1, 1, PLAIN));
        assert!(sel.clear());
        assert!(!sel.clear());
    }

    #[test]
    fn test_navigation() {
        let mut sel = SelectionController::new();
        sel.click_cell(0, 0, PLAIN);
        sel.end_drag();
        sel.navigate(Nav::Down, PLAIN, 10, 4, 5);
        sel.navigate(Nav::Right, SHIFT, 10, 4, 5);
        assert_eq!(sel.selection(), &Selection::rect(1, 0, 1, 1));
        sel.navigate(Nav::Up, SHIFT, 10, 4, 5);
        assert_eq!(sel.selection(), &Selection::rect(0, 0, 1, 1));
        sel.navigate(Nav::End, CTRL, 10, 4, 5);
        assert_eq!(sel.selection(), &Selection::cell(9, 3));
        sel.navigate(Nav::PageUp, PLAIN, 10, 4, 5);
        assert_eq!(sel.cursor(), Some((4, 3)));
        sel.navigate(Nav::Up, PLAIN, 10, 4, 5);
        sel.navigate(Nav::Home, PLAIN, 10, 4, 5);
        assert_eq!(sel.selection(), &Selection::cell(3, 0));
    }

    #[test]
    fn test_outside_axes_names_each_dropped_index() {
        assert_eq!(outside_axes(2, 7, 10, 3), vec![("cols", 7, 3)]);
        assert_eq!(outside_axes(12, 1, 10, 3), vec![("rows", 12, 10)]);
        assert_eq!(outside_axes(12, 7, 10, 3), vec![("rows", 12, 10), ("cols", 7, 3)]);
        assert!(outside_axes(9, 2, 10, 3).is_empty());
    }

    #[test]
    fn test_retain_within_drops_removed_indices() {
        let mut sel = SelectionController::new();
        sel.click_col_header(2, PLAIN);
        sel.click_col_header(3, CTRL);
        assert!(sel.retain_within(10, 3));
        assert_eq!(sel.selection(), &Selection::cols([2]));

        sel.click_cell(8, 1, PLAIN);
        sel.drag_to(9, 2);
        assert!(sel.retain_within(9, 3));
        assert_eq!(sel.selection(), &Selection::rect(8, 1, 8, 2));
        assert!(sel.retain_within(5, 3));
        assert!(sel.selection().is_none());
        assert_eq!(sel.cursor(), None);
    }

    #[test]
    fn test_select_all() {
        let mut sel = SelectionController::new();
        assert!(sel.select_all(150, 5));
        assert_eq!(sel.selection(), &Selection::rect(0, 0, 149, 4));
        assert!(sel.select_all(0, 5));
        assert!(sel.selection().is_none());
    }
}
