//! Column and row geometry bundled together, plus cell rectangles.

use super::{ColumnLayout, RowLayout};
use crate::error::{GridError, Result};
use crate::types::{GridOptions, Table};

/// Rectangle of a cell in content (unscrolled) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellRect {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Layout state shared by the body and the header strips.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub columns: ColumnLayout,
    pub rows: RowLayout,
}

impl Geometry {
    /// Build geometry for `table` from the grid options.
    pub fn for_table(table: &Table, options: &GridOptions) -> Self {
        Self {
            columns: ColumnLayout::new(
                table.column_count(),
                options.default_col_width,
                options.min_col_width,
                options.max_col_width,
            ),
            rows: RowLayout::new(table.row_count(), options.row_height),
        }
    }

    /// Bring the layouts in line with the table shape (recompute, not recreate).
    pub fn sync_shape(&mut self, table: &Table) {
        self.columns.resize(table.column_count());
        self.rows.set_len(table.row_count());
    }

    /// Verify the layouts describe `table`'s shape.
    pub fn check(&self, table: &Table) -> Result<()> {
        if self.rows.len() == table.row_count() && self.columns.len() == table.column_count() {
            return Ok(());
        }
        Err(GridError::Geometry {
            layout_rows: self.rows.len(),
            layout_cols: self.columns.len(),
            table_rows: table.row_count(),
            table_cols: table.column_count(),
        })
    }

    /// Content-space rectangle of `(row, col)`.
    pub fn cell_rect(&self, row: u32, col: u32) -> Option<CellRect> {
        if row >= self.rows.len() {
            return None;
        }
        Some(CellRect {
            x: self.columns.offset_of(col)?,
            y: self.rows.offset_of(row),
            width: self.columns.width_of(col)?,
            height: self.rows.row_height(),
        })
    }

    /// Cell under a content-space point.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(u32, u32)> {
        Some((self.rows.row_at(y)?, self.columns.column_at(x)?))
    }

    pub fn total_width(&self) -> f64 {
        self.columns.total_width()
    }

    pub fn total_height(&self) -> f64 {
        self.rows.total_height()
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

    #[test]
    fn test_cell_rect() {
        let table = Table::new(vec![Column::ints("a", 0..10), Column::ints("b", 0..10)]).unwrap();
        let geom = Geometry::for_table(&table, &GridOptions::default());
        let rect = geom.cell_rect(2, 1).unwrap();
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (60.0, 40.0, 60.0, 20.0));
        assert!(geom.cell_rect(10, 0).is_none());
        assert!(geom.cell_rect(0, 2).is_none());
        assert_eq!(geom.cell_at(61.0, 41.0), Some((2, 1)));
    }

    #[test]
    fn test_check_and_sync_shape() {
        let mut table = Table::new(vec![Column::ints("a", 0..4)]).unwrap();
        let mut geom = Geometry::for_table(&table, &GridOptions::default());
        assert!(geom.check(&table).is_ok());

        table.push_column(Column::ints("b", 0..4)).unwrap();
        assert!(matches!(
            geom.check(&table),
            Err(GridError::Geometry {
                layout_cols: 1,
                table_cols: 2,
                ..
            })
        ));
        geom.sync_shape(&table);
        assert!(geom.check(&table).is_ok());
    }
}
