//! In-memory table model: ordered, named, typed columns of equal length.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// A table shared between the grid and the collaborators that mutate it.
pub type SharedTable = Rc<RefCell<Table>>;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
}

impl ColumnType {
    /// Whether values of this type are numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Whether `value` may be stored in a column of this type.
    pub fn accepts(self, value: &CellValue) -> bool {
        matches!(
            (self, value),
            (_, CellValue::Missing)
                | (Self::Int, CellValue::Int(_))
                | (Self::Float, CellValue::Float(_))
                | (Self::Bool, CellValue::Bool(_))
                | (Self::Text, CellValue::Text(_))
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value (renders empty).
    #[default]
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Missing values and NaN floats both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if !f.is_nan() => Some(*f),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: ColumnType,
    values: Vec<CellValue>,
}

impl Column {
    /// Create a column, rejecting values that do not match `dtype`.
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<CellValue>) -> Result<Self> {
        let name = name.into();
        if values.iter().any(|v| !dtype.accepts(v)) {
            return Err(GridError::TypeMismatch {
                column: name,
                expected: dtype,
            });
        }
        Ok(Self {
            name,
            dtype,
            values,
        })
    }

    pub fn ints(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::collect_values(name, ColumnType::Int, values.into_iter().map(CellValue::Int))
    }

    pub fn floats(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::collect_values(
            name,
            ColumnType::Float,
            values.into_iter().map(CellValue::Float),
        )
    }

    pub fn bools(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Self::collect_values(name, ColumnType::Bool, values.into_iter().map(CellValue::Bool))
    }

    pub fn texts<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::collect_values(
            name,
            ColumnType::Text,
            values.into_iter().map(|s| CellValue::Text(s.into())),
        )
    }

    fn collect_values(
        name: impl Into<String>,
        dtype: ColumnType,
        values: impl Iterator<Item = CellValue>,
    ) -> Self {
        Self {
            name: name.into(),
            dtype,
            values: values.collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rename the column (column colour overrides are keyed by name).
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// JSON form of a column: `{"name": "x", "type": "float", "values": [1.5, null]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub dtype: ColumnType,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
}

impl ColumnSpec {
    /// Convert to a typed column; `null` becomes [`CellValue::Missing`].
    pub fn into_column(self) -> Result<Column> {
        let dtype = self.dtype;
        let mut values = Vec::with_capacity(self.values.len());
        for raw in &self.values {
            let value = json_cell(raw, dtype).ok_or_else(|| GridError::TypeMismatch {
                column: self.name.clone(),
                expected: dtype,
            })?;
            values.push(value);
        }
        Column::new(self.name, dtype, values)
    }
}

fn json_cell(raw: &serde_json::Value, dtype: ColumnType) -> Option<CellValue> {
    use serde_json::Value;
    Some(match (dtype, raw) {
        (_, Value::Null) => CellValue::Missing,
        (ColumnType::Int, Value::Number(n)) => CellValue::Int(n.as_i64()?),
        (ColumnType::Float, Value::Number(n)) => CellValue::Float(n.as_f64()?),
        (ColumnType::Bool, Value::Bool(b)) => CellValue::Bool(*b),
        (ColumnType::Text, Value::String(s)) => CellValue::Text(s.clone()),
        (ColumnType::Text, Value::Number(n)) => CellValue::Text(n.to_string()),
        (ColumnType::Text, Value::Bool(b)) => CellValue::Text(b.to_string()),
        _ => return None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TableDoc {
    Wrapped { columns: Vec<ColumnSpec> },
    Bare(Vec<ColumnSpec>),
}

/// Ordered sequence of columns sharing one row count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Build a table; every column must have the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, Column::len);
        for column in &columns {
            if column.len() != rows {
                return Err(GridError::ColumnLength {
                    column: column.name.clone(),
                    len: column.len(),
                    expected: rows,
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Build a table from column specs.
    pub fn from_specs(specs: Vec<ColumnSpec>) -> Result<Self> {
        let columns = specs
            .into_iter()
            .map(ColumnSpec::into_column)
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    /// Parse `{"columns": [...]}` or a bare array of column specs.
    pub fn from_json(text: &str) -> Result<Self> {
        let specs = match serde_json::from_str(text)? {
            TableDoc::Wrapped { columns } | TableDoc::Bare(columns) => columns,
        };
        Self::from_specs(specs)
    }

    /// Wrap the table for sharing with a grid.
    pub fn into_shared(self) -> SharedTable {
        Rc::new(RefCell::new(self))
    }

    /// Number of rows (R).
    pub fn row_count(&self) -> u32 {
        u32::try_from(self.rows).unwrap_or(u32::MAX)
    }

    /// Number of columns (C).
    pub fn column_count(&self) -> u32 {
        u32::try_from(self.columns.len()).unwrap_or(u32::MAX)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, col: u32) -> Option<&Column> {
        self.columns.get(col as usize)
    }

    pub fn column_mut(&mut self, col: u32) -> Option<&mut Column> {
        self.columns.get_mut(col as usize)
    }

    /// Index of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<u32> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.column(col)?.values.get(row as usize)
    }

    /// Overwrite one cell, returning the previous value.
    pub fn set_cell(&mut self, row: u32, col: u32, value: CellValue) -> Result<CellValue> {
        let column = self
            .columns
            .get_mut(col as usize)
            .ok_or(GridError::CellOutOfRange { row, col })?;
        if !column.dtype.accepts(&value) {
            return Err(GridError::TypeMismatch {
                column: column.name.clone(),
                expected: column.dtype,
            });
        }
        let slot = column
            .values
            .get_mut(row as usize)
            .ok_or(GridError::CellOutOfRange { row, col })?;
        Ok(std::mem::replace(slot, value))
    }

    /// Append a column. An empty table adopts the column's length.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        let at = self.column_count();
        self.insert_column(at, column)
    }

    /// Insert a column at `at` (clamped to the end).
    pub fn insert_column(&mut self, at: u32, column: Column) -> Result<()> {
        if self.columns.is_empty() {
            self.rows = column.len();
        } else if column.len() != self.rows {
            return Err(GridError::ColumnLength {
                column: column.name,
                len: column.values.len(),
                expected: self.rows,
            });
        }
        let at = (at as usize).min(self.columns.len());
        self.columns.insert(at, column);
        Ok(())
    }

    pub fn remove_column(&mut self, col: u32) -> Result<Column> {
        if col as usize >= self.columns.len() {
            return Err(GridError::ColumnOutOfRange {
                col,
                count: self.column_count(),
            });
        }
        let removed = self.columns.remove(col as usize);
        if self.columns.is_empty() {
            self.rows = 0;
        }
        Ok(removed)
    }

    /// Append one row; `values` must hold one value per column.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(GridError::Other(format!(
                "row has {} values, table has {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        for (column, value) in self.columns.iter().zip(&values) {
            if !column.dtype.accepts(value) {
                return Err(GridError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.dtype,
                });
            }
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.values.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    pub fn remove_row(&mut self, row: u32) -> Result<Vec<CellValue>> {
        if row as usize >= self.rows {
            return Err(GridError::CellOutOfRange { row, col: 0 });
        }
        let removed = self
            .columns
            .iter_mut()
            .map(|c| c.values.remove(row as usize))
            .collect();
        self.rows -= 1;
        Ok(removed)
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

    fn sample() -> Table {
        Table::new(vec![
            Column::ints("id", [1, 2, 3]),
            Column::floats("score", [0.5, 1.25, f64::NAN]),
            Column::texts("label", ["a", "b", "c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape() {
        let t = sample();
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.column_count(), 3);
        assert_eq!(t.column_index("label"), Some(2));
        assert_eq!(t.cell(1, 0), Some(&CellValue::Int(2)));
        assert!(t.cell(3, 0).is_none());
        assert!(t.cell(2, 1).unwrap().is_missing());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Table::new(vec![Column::ints("a", [1, 2]), Column::ints("b", [1])]);
        assert!(matches!(err, Err(GridError::ColumnLength { len: 1, .. })));

        let mut t = sample();
        let err = t.push_column(Column::bools("flag", [true]));
        assert!(matches!(err, Err(GridError::ColumnLength { .. })));
        assert_eq!(t.column_count(), 3);
    }

    #[test]
    fn test_set_cell_type_checked() {
        let mut t = sample();
        let old = t.set_cell(0, 0, CellValue::Int(10)).unwrap();
        assert_eq!(old, CellValue::Int(1));
        assert!(matches!(
            t.set_cell(0, 0, CellValue::Text("x".into())),
            Err(GridError::TypeMismatch { .. })
        ));
        assert!(t.set_cell(0, 0, CellValue::Missing).is_ok());
        assert!(matches!(
            t.set_cell(9, 0, CellValue::Int(1)),
            Err(GridError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rows_and_columns_mutation() {
        let mut t = sample();
        t.push_row(vec![
            CellValue::Int(4),
            CellValue::Float(2.0),
            CellValue::Text("d".into()),
        ])
        .unwrap();
        assert_eq!(t.row_count(), 4);
        let removed = t.remove_row(0).unwrap();
        assert_eq!(removed[0], CellValue::Int(1));
        assert_eq!(t.row_count(), 3);

        t.remove_column(1).unwrap();
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["id", "label"]);
        t.remove_column(0).unwrap();
        t.remove_column(0).unwrap();
        assert_eq!(t.row_count(), 0);
        t.push_column(Column::bools("flag", [true, false])).unwrap();
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn test_from_json() {
        let t = Table::from_json(
            r#"{"columns": [
                {"name": "n", "type": "int", "values": [1, null, 3]},
                {"name": "label", "type": "text", "values": ["a", 2, true]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(t.row_count(), 3);
        assert!(t.cell(1, 0).unwrap().is_missing());
        assert_eq!(t.cell(1, 1), Some(&CellValue::Text("2".into())));

        let bare = Table::from_json(r#"[{"name": "b", "type": "bool", "values": [true]}]"#).unwrap();
        assert_eq!(bare.cell(0, 0), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_from_json_rejects_wrong_types() {
        let err = Table::from_json(r#"[{"name": "n", "type": "int", "values": [1.5]}]"#);
        assert!(matches!(err, Err(GridError::TypeMismatch { .. })));
        let ragged = Table::from_json(
            r#"[{"name": "a", "type": "int", "values": [1]}, {"name": "b", "type": "int", "values": []}]"#,
        );
        assert!(matches!(ragged, Err(GridError::ColumnLength { .. })));
    }
}
