//! Contracts for the collaborators that sit around the grid.
//!
//! Classifier runners read table contents through [`ColumnSource`]; the
//! relational store behind the application's dialogs is reached through
//! [`Store`]. The grid engine itself never persists anything.

use serde_json::Value;

use crate::error::Result;
use crate::types::{CellValue, Table};

/// A column addressed by position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey<'a> {
    Index(u32),
    Name(&'a str),
}

impl From<u32> for ColumnKey<'_> {
    fn from(i: u32) -> Self {
        Self::Index(i)
    }
}

impl<'a> From<&'a str> for ColumnKey<'a> {
    fn from(s: &'a str) -> Self {
        Self::Name(s)
    }
}

/// Read-only column access used by model runners.
pub trait ColumnSource {
    /// Raw values of a column.
    fn column_as_array(&self, key: ColumnKey<'_>) -> Option<&[CellValue]>;

    /// Numeric view of a column; non-numeric or missing cells become `None`.
    fn column_as_f64(&self, key: ColumnKey<'_>) -> Option<Vec<Option<f64>>> {
        self.column_as_array(key)
            .map(|values| values.iter().map(CellValue::as_f64).collect())
    }
}

impl ColumnSource for Table {
    fn column_as_array(&self, key: ColumnKey<'_>) -> Option<&[CellValue]> {
        let index = match key {
            ColumnKey::Index(i) => i,
            ColumnKey::Name(name) => self.column_index(name)?,
        };
        self.column(index).map(|c| c.values())
    }
}

/// Statement-level access to the application's relational store.
pub trait Store {
    /// Run a query and return its rows.
    fn query(&mut self, statement: &str, params: &[Value]) -> Result<Vec<Vec<Value>>>;

    /// Run a statement and return the id of the last inserted row.
    fn execute(&mut self, statement: &str, params: &[Value]) -> Result<i64>;
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
    fn test_column_lookup_by_index_and_name() {
        let table = Table::new(vec![
            Column::texts("species", ["setosa", "virginica"]),
            Column::floats("petal_length", [1.4, 5.1]),
        ])
        .unwrap();

        let by_name = table.column_as_array("petal_length".into()).unwrap();
        let by_index = table.column_as_array(1_u32.into()).unwrap();
        assert_eq!(by_name, by_index);
        assert!(table.column_as_array("missing".into()).is_none());
        assert!(table.column_as_array(7_u32.into()).is_none());
    }

    #[test]
    fn test_numeric_view() {
        let table = Table::new(vec![
            Column::ints("k", [1, 2]),
            Column::texts("s", ["x", "y"]),
        ])
        .unwrap();
        assert_eq!(
            table.column_as_f64("k".into()),
            Some(vec![Some(1.0), Some(2.0)])
        );
        assert_eq!(table.column_as_f64("s".into()), Some(vec![None, None]));
    }
}
