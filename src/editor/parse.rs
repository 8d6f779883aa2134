//! Edit buffer parsing.
//!
//! Coerces the text typed into the inline editor to the column's type:
//! - Empty or whitespace → `Missing` (any column type)
//! - `int` → an `i64` literal
//! - `float` → any `f64` literal (`nan`, `inf` included)
//! - `bool` → `true/false/yes/no/1/0`, case-insensitive
//! - `text` → the buffer verbatim

use crate::error::{GridError, Result};
use crate::types::{CellValue, Column, ColumnType};

/// Parse `input` as a value of `dtype`; `None` when it cannot be coerced.
pub fn parse_input(input: &str, dtype: ColumnType) -> Option<CellValue> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(CellValue::Missing);
    }
    match dtype {
        ColumnType::Int => trimmed.parse::<i64>().ok().map(CellValue::Int),
        ColumnType::Float => trimmed.parse::<f64>().ok().map(CellValue::Float),
        ColumnType::Bool => parse_bool(trimmed).map(CellValue::Bool),
        ColumnType::Text => Some(CellValue::Text(input.to_string())),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    const TRUE: [&str; 3] = ["true", "yes", "1"];
    const FALSE: [&str; 3] = ["false", "no", "0"];
    if TRUE.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if FALSE.iter().any(|f| value.eq_ignore_ascii_case(f)) {
        Some(false)
    } else {
        None
    }
}

/// Parse the buffer for cell `(row, col)` of `column`.
pub fn parse_for_column(row: u32, col: u32, column: &Column, input: &str) -> Result<CellValue> {
    parse_input(input, column.dtype()).ok_or_else(|| GridError::EditValidation {
        row,
        col,
        column: column.name().to_string(),
        expected: column.dtype(),
        input: input.to_string(),
    })
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
    use test_case::test_case;

    #[test_case("42", ColumnType::Int, Some(CellValue::Int(42)) ; "int")]
    #[test_case(" -7 ", ColumnType::Int, Some(CellValue::Int(-7)) ; "int trimmed")]
    #[test_case("12.5", ColumnType::Int, None ; "int rejects decimal")]
    #[test_case("12.5", ColumnType::Float, Some(CellValue::Float(12.5)) ; "float")]
    #[test_case("1e3", ColumnType::Float, Some(CellValue::Float(1000.0)) ; "float exponent")]
    #[test_case("abc", ColumnType::Float, None ; "float rejects text")]
    #[test_case("Yes", ColumnType::Bool, Some(CellValue::Bool(true)) ; "bool yes")]
    #[test_case("0", ColumnType::Bool, Some(CellValue::Bool(false)) ; "bool zero")]
    #[test_case("maybe", ColumnType::Bool, None ; "bool rejects")]
    #[test_case("  ", ColumnType::Int, Some(CellValue::Missing) ; "blank is missing")]
    #[test_case(" hi ", ColumnType::Text, Some(CellValue::Text(" hi ".into())) ; "text verbatim")]
    fn test_parse_input(input: &str, dtype: ColumnType, expected: Option<CellValue>) {
        assert_eq!(parse_input(input, dtype), expected);
    }

    #[test]
    fn test_parse_for_column_reports_context() {
        let column = Column::ints("age", [1, 2]);
        let err = parse_for_column(1, 3, &column, "12.5").unwrap_err();
        match err {
            GridError::EditValidation {
                row,
                col,
                column,
                expected,
                input,
            } => {
                assert_eq!((row, col), (1, 3));
                assert_eq!(column, "age");
                assert_eq!(expected, ColumnType::Int);
                assert_eq!(input, "12.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
