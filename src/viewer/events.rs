//! Pointer, wheel and keyboard intents for [`GridView`].
//!
//! Coordinates are surface pixels. Handlers only mutate state and mark
//! damage; the host calls [`GridView::render_frame`] once per frame.

use super::selection::Nav;
use super::{Gesture, GridView};
use crate::error::Result;
use crate::render::DrawSurface;

/// Distance in pixels either side of a column's right edge that grabs it
/// for resizing.
pub const RESIZE_HANDLE_SIZE: f64 = 4.0;

/// Modifier keys held during an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };

    pub fn new(shift: bool, ctrl: bool) -> Self {
        Self { shift, ctrl }
    }
}

/// Keys the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Escape,
    Tab,
    F2,
    Backspace,
    Char(char),
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "F2" => Self::F2,
            "Backspace" => Self::Backspace,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }

    fn nav(self) -> Option<Nav> {
        Some(match self {
            Self::Up => Nav::Up,
            Self::Down => Nav::Down,
            Self::Left => Nav::Left,
            Self::Right => Nav::Right,
            Self::Home => Nav::Home,
            Self::End => Nav::End,
            Self::PageUp => Nav::PageUp,
            Self::PageDown => Nav::PageDown,
            _ => return None,
        })
    }
}

/// What a surface point lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// A body cell at (row, col)
    Cell(u32, u32),
    RowHeader(u32),
    ColumnHeader(u32),
    /// The right-edge handle of a column header
    ColumnResize(u32),
    /// The index header (select all)
    CornerHeader,
    None,
}

impl<S: DrawSurface> GridView<S> {
    /// Classify a surface point.
    pub fn hit_test(&self, x: f64, y: f64) -> HitTarget {
        let corner = self.corner.borrow().view();
        let col_header = self.col_header.borrow().view();
        let row_header = self.row_header.borrow().view();
        let body = self.body.borrow().view();

        if corner.contains_point(x, y) {
            return HitTarget::CornerHeader;
        }
        if col_header.contains_point(x, y) {
            let content_x = x - col_header.x + col_header.viewport.scroll_x;
            if let Some(col) = self.resize_handle_at(content_x) {
                return HitTarget::ColumnResize(col);
            }
            return self
                .geom
                .columns
                .column_at(content_x)
                .map_or(HitTarget::None, HitTarget::ColumnHeader);
        }
        if row_header.contains_point(x, y) {
            let content_y = y - row_header.y + row_header.viewport.scroll_y;
            return self
                .geom
                .rows
                .row_at(content_y)
                .map_or(HitTarget::None, HitTarget::RowHeader);
        }
        if body.contains_point(x, y) {
            let content_x = x - body.x + body.viewport.scroll_x;
            let content_y = y - body.y + body.viewport.scroll_y;
            return self
                .geom
                .cell_at(content_x, content_y)
                .map_or(HitTarget::None, |(row, col)| HitTarget::Cell(row, col));
        }
        HitTarget::None
    }

    /// Column whose right edge is within the handle distance of `content_x`.
    fn resize_handle_at(&self, content_x: f64) -> Option<u32> {
        let offsets = self.geom.columns.offsets();
        let edge = offsets.partition_point(|&o| o < content_x - RESIZE_HANDLE_SIZE);
        let right = *offsets.get(edge)?;
        if edge == 0 || (right - content_x).abs() > RESIZE_HANDLE_SIZE {
            return None;
        }
        u32::try_from(edge - 1).ok()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, mods: Modifiers) {
        let hit = self.hit_test(x, y);
        if let Some(session) = self.editor.session() {
            if hit != HitTarget::Cell(session.row, session.col) {
                self.editor.cancel();
                self.damage.visible = true;
            }
        }
        let (rows, cols) = (self.geom.rows.len(), self.geom.columns.len());
        let changed = match hit {
            HitTarget::CornerHeader => self.selection.select_all(rows, cols),
            HitTarget::ColumnHeader(col) => self.selection.click_col_header(col, mods),
            HitTarget::RowHeader(row) => self.selection.click_row_header(row, mods),
            HitTarget::ColumnResize(col) => {
                if let Some(width) = self.geom.columns.width_of(col) {
                    self.gesture = Some(Gesture::Resize {
                        col,
                        origin_x: x,
                        origin_width: width,
                    });
                }
                false
            }
            HitTarget::Cell(row, col) => {
                let changed = self.selection.click_cell(row, col, mods);
                if self.selection.is_dragging() {
                    self.gesture = Some(Gesture::Select);
                }
                changed
            }
            HitTarget::None => false,
        };
        if changed {
            self.notify_selection();
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        match self.gesture {
            Some(Gesture::Resize {
                col,
                origin_x,
                origin_width,
            }) => {
                let before = self.geom.columns.width_of(col).unwrap_or(origin_width);
                match self.geom.columns.set_width(col, origin_width + (x - origin_x)) {
                    Ok(width) if (width - before).abs() > f64::EPSILON => {
                        self.scroll.refresh(&self.geom);
                        self.damage.structural = true;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::debug!(%err, "resize target vanished");
                        self.gesture = None;
                    }
                }
            }
            Some(Gesture::Select) => {
                let (row, col) = self.drag_target(x, y);
                if self.selection.drag_to(row, col) {
                    self.notify_selection();
                }
            }
            None => {}
        }
    }

    /// Cell under a drag point, clamped into the table so dragging past the
    /// body edge keeps extending.
    fn drag_target(&self, x: f64, y: f64) -> (u32, u32) {
        let body = self.body.borrow().view();
        let content_x = x - body.x + body.viewport.scroll_x;
        let content_y = y - body.y + body.viewport.scroll_y;
        let last_row = self.geom.rows.len().saturating_sub(1);
        let last_col = self.geom.columns.len().saturating_sub(1);
        let row = if content_y < 0.0 {
            0
        } else {
            self.geom.rows.row_at(content_y).unwrap_or(last_row)
        };
        let col = if content_x < 0.0 {
            0
        } else {
            self.geom.columns.column_at(content_x).unwrap_or(last_col)
        };
        (row, col)
    }

    pub fn pointer_up(&mut self) {
        self.gesture = None;
        self.selection.end_drag();
    }

    /// Double-click on a body cell opens an edit. Returns whether one opened.
    pub fn double_click(&mut self, x: f64, y: f64) -> bool {
        self.pointer_up();
        match self.hit_test(x, y) {
            HitTarget::Cell(row, col) => self.begin_edit(row, col),
            HitTarget::ColumnResize(col) => {
                if let Err(err) = self.fit_column(col) {
                    tracing::debug!(%err, "fit column failed");
                }
                false
            }
            _ => false,
        }
    }

    /// Apply a wheel delta. Returns whether the view scrolled.
    pub fn wheel(&mut self, dx: f64, dy: f64) -> bool {
        let moved = self.scroll.scroll_by(dx, dy, &self.geom);
        if moved {
            self.damage.visible = true;
            self.follow_edit();
        }
        moved
    }

    /// Handle a key press. Returns whether the key was consumed.
    ///
    /// While an edit is open, Enter and Tab commit (moving down or right),
    /// Escape cancels and Backspace edits the buffer. Otherwise keys
    /// navigate, Enter/F2 open an edit and a printable key starts an edit
    /// that replaces the cell's text.
    pub fn key_down(&mut self, key: Key, mods: Modifiers) -> Result<bool> {
        if self.editor.is_editing() {
            return self.edit_key(key, mods);
        }
        let (rows, cols) = (self.geom.rows.len(), self.geom.columns.len());
        if let Some(nav) = key.nav() {
            let page = self.geom.rows.page_size(self.body.borrow().viewport().height);
            if self.selection.navigate(nav, mods, rows, cols, page) {
                self.notify_selection();
            }
            if let Some((row, col)) = self.selection.cursor() {
                self.scroll_into_view(row, col);
            }
            return Ok(true);
        }
        let cursor = self.selection.cursor();
        let consumed = match (key, cursor) {
            (Key::Char('a' | 'A'), _) if mods.ctrl => {
                if self.selection.select_all(rows, cols) {
                    self.notify_selection();
                }
                true
            }
            (Key::Enter | Key::F2, Some((row, col))) => self.begin_edit(row, col),
            (Key::Backspace, Some((row, col))) => self.begin_edit_with(row, col, String::new()),
            (Key::Char(c), Some((row, col))) if !mods.ctrl => {
                self.begin_edit_with(row, col, c.to_string())
            }
            (Key::Tab, Some(_)) => {
                let nav = if mods.shift { Nav::Left } else { Nav::Right };
                self.move_cursor(nav);
                true
            }
            (Key::Escape, _) => self.clear_selection(),
            _ => false,
        };
        Ok(consumed)
    }

    fn edit_key(&mut self, key: Key, mods: Modifiers) -> Result<bool> {
        match key {
            Key::Enter | Key::Tab => {
                self.commit_edit()?;
                let nav = match (key, mods.shift) {
                    (Key::Tab, false) => Nav::Right,
                    (Key::Tab, true) => Nav::Left,
                    (_, false) => Nav::Down,
                    (_, true) => Nav::Up,
                };
                self.move_cursor(nav);
                Ok(true)
            }
            Key::Escape => {
                self.editor.cancel();
                self.damage.visible = true;
                Ok(true)
            }
            Key::Backspace => {
                self.editor.backspace();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn move_cursor(&mut self, nav: Nav) {
        let (rows, cols) = (self.geom.rows.len(), self.geom.columns.len());
        if self.selection.navigate(nav, Modifiers::NONE, rows, cols, 1) {
            self.notify_selection();
        }
        if let Some((row, col)) = self.selection.cursor() {
            self.scroll_into_view(row, col);
        }
    }

    /// Text typed while an edit is open.
    pub fn text_input(&mut self, text: &str) -> bool {
        if !self.editor.is_editing() {
            return false;
        }
        self.editor.push_str(text);
        true
    }

    /// The grid lost keyboard focus: any open edit is cancelled.
    pub fn focus_lost(&mut self) {
        self.pointer_up();
        if self.editor.cancel() {
            self.damage.visible = true;
        }
    }
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
    use test_case::test_case;

    use super::*;

    #[test_case("ArrowUp", Key::Up)]
    #[test_case("PageDown", Key::PageDown)]
    #[test_case("Esc", Key::Escape)]
    #[test_case("x", Key::Char('x'))]
    #[test_case("é", Key::Char('é'))]
    #[test_case("Shift", Key::Other)]
    #[test_case("", Key::Other)]
    fn test_key_from_dom(name: &str, expected: Key) {
        assert_eq!(Key::from_dom(name), expected);
    }
}
