//! Minimal CSV/TSV reader that produces a typed [`Table`].
//!
//! The first line holds the column names. Each column's type is inferred
//! from its non-empty fields: all integers → `Int`, all numbers → `Float`,
//! all `true`/`false` → `Bool`, anything else → `Text`. Empty fields are
//! missing values.

use crate::error::{GridError, Result};
use crate::types::{CellValue, Column, ColumnType, Table};

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Tab for `.tsv`/`.tab` paths, comma otherwise.
    pub fn for_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".tsv") || lower.ends_with(".tab") {
            Self::Tab
        } else {
            Self::Comma
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// Parse delimited text into a table.
pub fn parse_delimited(text: &str, delim: Delimiter) -> Result<Table> {
    let sep = delim.as_char();
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return Ok(Table::default());
    };
    let names: Vec<String> = split_csv_line(header, sep)
        .into_iter()
        .map(|n| n.trim().to_string())
        .collect();

    let mut fields: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for (line_no, line) in lines.enumerate() {
        let row = split_csv_line(line, sep);
        if row.len() != names.len() {
            tracing::debug!(
                line = line_no + 2,
                got = row.len(),
                expected = names.len(),
                "ragged row padded or truncated"
            );
        }
        let mut row = row.into_iter();
        for column in &mut fields {
            column.push(row.next().map(|f| f.trim().to_string()).unwrap_or_default());
        }
    }

    let columns = names
        .into_iter()
        .zip(fields)
        .map(|(name, raw)| typed_column(name, &raw))
        .collect::<Result<Vec<_>>>()?;
    Table::new(columns)
}

/// Parse CSV text.
pub fn parse_csv(text: &str) -> Result<Table> {
    parse_delimited(text, Delimiter::Comma)
}

fn typed_column(name: String, raw: &[String]) -> Result<Column> {
    let dtype = infer_type(raw);
    let values = raw
        .iter()
        .map(|field| convert(field, dtype))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| GridError::TypeMismatch {
            column: name.clone(),
            expected: dtype,
        })?;
    Column::new(name, dtype, values)
}

fn infer_type(raw: &[String]) -> ColumnType {
    let mut present = raw.iter().filter(|f| !f.is_empty()).peekable();
    if present.peek().is_none() {
        return ColumnType::Text;
    }
    let present: Vec<&String> = present.collect();
    if present.iter().all(|f| f.parse::<i64>().is_ok()) {
        ColumnType::Int
    } else if present.iter().all(|f| f.parse::<f64>().is_ok()) {
        ColumnType::Float
    } else if present.iter().all(|f| parse_bool(f).is_some()) {
        ColumnType::Bool
    } else {
        ColumnType::Text
    }
}

fn parse_bool(field: &str) -> Option<bool> {
    if field.eq_ignore_ascii_case("true") {
        Some(true)
    } else if field.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn convert(field: &str, dtype: ColumnType) -> Option<CellValue> {
    if field.is_empty() {
        return Some(CellValue::Missing);
    }
    Some(match dtype {
        ColumnType::Int => CellValue::Int(field.parse().ok()?),
        ColumnType::Float => CellValue::Float(field.parse().ok()?),
        ColumnType::Bool => CellValue::Bool(parse_bool(field)?),
        ColumnType::Text => CellValue::Text(field.to_string()),
    })
}

/// Split a line on `sep`, honouring double-quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_infers_types() {
        let table = parse_csv("name,age,score,member\nAlice,30,1.5,true\nBob,,2,FALSE").unwrap();
        assert_eq!(table.row_count(), 2);
        let types: Vec<ColumnType> = table.columns().iter().map(Column::dtype).collect();
        assert_eq!(
            types,
            [ColumnType::Text, ColumnType::Int, ColumnType::Float, ColumnType::Bool]
        );
        assert!(table.cell(1, 1).unwrap().is_missing());
        assert_eq!(table.cell(1, 2), Some(&CellValue::Float(2.0)));
        assert_eq!(table.cell(1, 3), Some(&CellValue::Bool(false)));
    }

    #[test]
    fn test_parse_tsv() {
        let table = parse_delimited("A\tB\n1\t2", Delimiter::Tab).unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(table.cell(0, 1), Some(&CellValue::Int(2)));
        assert_eq!(Delimiter::for_path("data/Iris.TSV"), Delimiter::Tab);
    }

    #[test]
    fn test_quoted_csv() {
        let table = parse_csv("text,n\n\"Hello, World\",42\n\"She said \"\"hi\"\"\",0").unwrap();
        assert_eq!(table.cell(0, 0), Some(&CellValue::Text("Hello, World".into())));
        assert_eq!(table.cell(1, 0), Some(&CellValue::Text("She said \"hi\"".into())));
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let table = parse_csv("a,b\n1\n2,3,4").unwrap();
        assert_eq!(table.row_count(), 2);
        assert!(table.cell(0, 1).unwrap().is_missing());
        assert_eq!(table.cell(1, 1), Some(&CellValue::Int(3)));
    }

    #[test]
    fn test_empty_csv() {
        let table = parse_csv("").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }
}
