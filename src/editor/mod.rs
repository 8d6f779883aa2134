//! In-place cell editing.
//!
//! At most one [`EditSession`] is live at a time. A session is bound to one
//! cell, owns the text buffer, and records where the editable surface sits
//! on screen. Commit parses the buffer per the column type and writes the
//! table; cancel (explicit or on focus loss) discards it.

#[cfg(target_arch = "wasm32")]
pub(crate) mod input;
pub mod parse;

use crate::error::{GridError, Result};
use crate::layout::CellRect;
use crate::types::{CellValue, FieldMode, Table};

pub use parse::{parse_for_column, parse_input};

/// The one live edit.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub row: u32,
    pub col: u32,
    /// Text being edited
    pub buffer: String,
    /// Surface-space rectangle of the editable surface
    pub placement: CellRect,
}

/// A successful commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedEdit {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
    pub previous: CellValue,
}

#[derive(Debug, Default)]
pub struct EditController {
    session: Option<EditSession>,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session on `(row, col)` with `initial` in the buffer.
    ///
    /// No-op (returns `false`) when the field is not editable or another
    /// session is already open.
    pub fn begin_edit(
        &mut self,
        row: u32,
        col: u32,
        mode: FieldMode,
        initial: String,
        placement: CellRect,
    ) -> bool {
        if !mode.is_editable() {
            tracing::debug!(row, col, ?mode, "edit refused: field not editable");
            return false;
        }
        if let Some(open) = &self.session {
            tracing::debug!(row, col, open_row = open.row, open_col = open.col, "edit refused: session open");
            return false;
        }
        tracing::debug!(row, col, "edit started");
        self.session = Some(EditSession {
            row,
            col,
            buffer: initial,
            placement,
        });
        true
    }

    /// Replace the buffer contents.
    pub fn set_buffer(&mut self, text: &str) {
        if let Some(session) = &mut self.session {
            session.buffer.clear();
            session.buffer.push_str(text);
        }
    }

    pub fn push_str(&mut self, text: &str) {
        if let Some(session) = &mut self.session {
            session.buffer.push_str(text);
        }
    }

    /// Remove the last char of the buffer.
    pub fn backspace(&mut self) {
        if let Some(session) = &mut self.session {
            session.buffer.pop();
        }
    }

    /// Move the editable surface (after scroll or resize).
    pub fn reposition(&mut self, placement: CellRect) {
        if let Some(session) = &mut self.session {
            session.placement = placement;
        }
    }

    /// Parse the buffer and write it into `table`.
    ///
    /// Returns `Ok(None)` when no session is open. On a parse failure the
    /// session stays open and the table is untouched.
    pub fn commit(&mut self, table: &mut Table) -> Result<Option<CommittedEdit>> {
        let Some(session) = &self.session else {
            return Ok(None);
        };
        let (row, col) = (session.row, session.col);
        let column = table.column(col).ok_or(GridError::CellOutOfRange { row, col })?;
        let value = parse_for_column(row, col, column, &session.buffer)?;
        let previous = table.set_cell(row, col, value.clone())?;
        self.session = None;
        tracing::debug!(row, col, ?value, "edit committed");
        Ok(Some(CommittedEdit {
            row,
            col,
            value,
            previous,
        }))
    }

    /// Discard the buffer and close the session. Returns whether one was open.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                tracing::debug!(row = session.row, col = session.col, "edit cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel the session if its cell no longer exists.
    pub fn cancel_if_outside(&mut self, rows: u32, cols: u32) -> bool {
        match &self.session {
            Some(s) if s.row >= rows || s.col >= cols => self.cancel(),
            _ => false,
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
    use super::*;
    use crate::types::Column;

    fn placement() -> CellRect {
        CellRect {
            x: 0.0,
            y: 0.0,
            width: 60.0,
            height: 20.0,
        }
    }

    fn table() -> Table {
        Table::new(vec![
            Column::ints("n", [1, 2, 3]),
            Column::texts("s", ["a", "b", "c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_session() {
        let mut editor = EditController::new();
        assert!(editor.begin_edit(0, 0, FieldMode::Editable, "1".into(), placement()));
        assert!(!editor.begin_edit(1, 0, FieldMode::Editable, "2".into(), placement()));
        assert_eq!(editor.session().unwrap().row, 0);
    }

    #[test]
    fn test_read_only_and_disabled_refuse() {
        let mut editor = EditController::new();
        assert!(!editor.begin_edit(0, 0, FieldMode::ReadOnly, String::new(), placement()));
        assert!(!editor.begin_edit(0, 0, FieldMode::Disabled, String::new(), placement()));
        assert!(!editor.is_editing());
    }

    #[test]
    fn test_commit_writes_and_closes() {
        let mut t = table();
        let mut editor = EditController::new();
        editor.begin_edit(1, 0, FieldMode::Editable, "2".into(), placement());
        editor.set_buffer("40");
        editor.push_str("2");
        editor.backspace();
        let done = editor.commit(&mut t).unwrap().unwrap();
        assert_eq!(done.value, CellValue::Int(40));
        assert_eq!(done.previous, CellValue::Int(2));
        assert_eq!(t.cell(1, 0), Some(&CellValue::Int(40)));
        assert!(!editor.is_editing());
        assert!(editor.commit(&mut t).unwrap().is_none());
    }

    #[test]
    fn test_failed_commit_keeps_session() {
        let mut t = table();
        let mut editor = EditController::new();
        editor.begin_edit(2, 0, FieldMode::Editable, "12.5".into(), placement());
        assert!(matches!(
            editor.commit(&mut t),
            Err(GridError::EditValidation { .. })
        ));
        assert!(editor.is_editing());
        assert_eq!(t.cell(2, 0), Some(&CellValue::Int(3)));
    }

    #[test]
    fn test_cancel_if_outside() {
        let mut editor = EditController::new();
        editor.begin_edit(2, 1, FieldMode::Editable, String::new(), placement());
        assert!(!editor.cancel_if_outside(3, 2));
        assert!(editor.cancel_if_outside(3, 1));
        assert!(!editor.cancel());
    }
}
