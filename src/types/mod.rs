//! Core data types shared by layout, rendering and interaction.

mod selection;
mod style;
mod table;

pub use selection::{CellRange, Selection};
pub use style::{FieldMode, GridConfig, GridOptions, TextAlign, Theme, MAX_PRECISION};
pub use table::{CellValue, Column, ColumnSpec, ColumnType, SharedTable, Table};
