//! Structured error types for datagrid.
//!
//! Only `Geometry`, `EditValidation` and the construction/configuration
//! variants ever reach a caller. `SelectionRange` and `RenderInvariant` are
//! built so they can be logged with a consistent message; the engine recovers
//! from both by clamping.

use crate::types::ColumnType;

/// All errors that can occur in the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Column/row layout disagrees with the table shape.
    #[error(
        "geometry mismatch: layout is {layout_rows}x{layout_cols}, table is {table_rows}x{table_cols}"
    )]
    Geometry {
        layout_rows: u32,
        layout_cols: u32,
        table_rows: u32,
        table_cols: u32,
    },

    /// Edit buffer could not be coerced to the column type.
    #[error("cannot parse {input:?} as {expected} for column '{column}' (row {row})")]
    EditValidation {
        row: u32,
        col: u32,
        column: String,
        expected: ColumnType,
        input: String,
    },

    /// Selection referenced rows/columns that no longer exist.
    #[error("selection index {index} outside {limit} {axis}")]
    SelectionRange {
        axis: &'static str,
        index: u32,
        limit: u32,
    },

    /// Visible range fell outside `[0, R] x [0, C]`.
    #[error("visible range rows {row_start}..{row_end}, cols {col_start}..{col_end} outside {rows}x{cols}")]
    RenderInvariant {
        row_start: u32,
        row_end: u32,
        col_start: u32,
        col_end: u32,
        rows: u32,
        cols: u32,
    },

    /// Column index past the end of the table or layout.
    #[error("column {col} out of range (have {count})")]
    ColumnOutOfRange { col: u32, count: u32 },

    /// Cell coordinate past the end of the table.
    #[error("cell ({row}, {col}) out of range")]
    CellOutOfRange { row: u32, col: u32 },

    /// A column does not have the table's row count.
    #[error("column '{column}' has {len} values, expected {expected}")]
    ColumnLength {
        column: String,
        len: usize,
        expected: usize,
    },

    /// Value variant does not match the declared column type.
    #[error("column '{column}' holds {expected} values")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
    },

    /// Invalid grid options or theme.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
