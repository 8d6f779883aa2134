//! Selection states over the grid and the normalized cell block they use.

use std::collections::BTreeSet;

use serde::Serialize;

/// A rectangular block of cells, always normalized so `r0 <= r1` and `c0 <= c1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRange {
    pub r0: u32,
    pub c0: u32,
    pub r1: u32,
    pub c1: u32,
}

impl CellRange {
    /// Build a range from any two corners.
    pub fn new(r0: u32, c0: u32, r1: u32, c1: u32) -> Self {
        Self {
            r0: r0.min(r1),
            c0: c0.min(c1),
            r1: r0.max(r1),
            c1: c0.max(c1),
        }
    }

    /// Range spanning two cells given as `(row, col)`.
    pub fn spanning(a: (u32, u32), b: (u32, u32)) -> Self {
        Self::new(a.0, a.1, b.0, b.1)
    }

    /// Re-normalize; a no-op on an already normalized range.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(self.r0, self.c0, self.r1, self.c1)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.r0..=self.r1).contains(&row) && (self.c0..=self.c1).contains(&col)
    }

    pub fn contains_row(&self, row: u32) -> bool {
        (self.r0..=self.r1).contains(&row)
    }

    pub fn contains_col(&self, col: u32) -> bool {
        (self.c0..=self.c1).contains(&col)
    }
}

/// Which cells, rows or columns are selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    None,
    Cell { row: u32, col: u32 },
    Rows(BTreeSet<u32>),
    Cols(BTreeSet<u32>),
    Rect(CellRange),
}

impl Selection {
    pub fn cell(row: u32, col: u32) -> Self {
        Self::Cell { row, col }
    }

    pub fn rect(r0: u32, c0: u32, r1: u32, c1: u32) -> Self {
        Self::Rect(CellRange::new(r0, c0, r1, c1))
    }

    pub fn rows(rows: impl IntoIterator<Item = u32>) -> Self {
        Self::Rows(rows.into_iter().collect())
    }

    pub fn cols(cols: impl IntoIterator<Item = u32>) -> Self {
        Self::Cols(cols.into_iter().collect())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether the body cell `(row, col)` is part of the selection.
    pub fn contains(&self, row: u32, col: u32) -> bool {
        match self {
            Self::None => false,
            Self::Cell { row: r, col: c } => *r == row && *c == col,
            Self::Rows(rows) => rows.contains(&row),
            Self::Cols(cols) => cols.contains(&col),
            Self::Rect(range) => range.contains(row, col),
        }
    }

    /// Whether the row header for `row` should be highlighted.
    pub fn touches_row(&self, row: u32) -> bool {
        match self {
            Self::None | Self::Cols(_) => false,
            Self::Cell { row: r, .. } => *r == row,
            Self::Rows(rows) => rows.contains(&row),
            Self::Rect(range) => range.contains_row(row),
        }
    }

    /// Whether the column header for `col` should be highlighted.
    pub fn touches_col(&self, col: u32) -> bool {
        match self {
            Self::None | Self::Rows(_) => false,
            Self::Cell { col: c, .. } => *c == col,
            Self::Cols(cols) => cols.contains(&col),
            Self::Rect(range) => range.contains_col(col),
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

    #[test]
    fn test_range_normalizes_any_corners() {
        let r = CellRange::new(3, 4, 1, 2);
        assert_eq!((r.r0, r.c0, r.r1, r.c1), (1, 2, 3, 4));
        assert_eq!(r.normalized(), r);
        assert_eq!(CellRange::spanning((3, 2), (1, 4)), r);
    }

    #[test]
    fn test_header_touches() {
        let sel = Selection::rect(1, 1, 2, 3);
        assert!(sel.touches_row(2));
        assert!(!sel.touches_row(3));
        assert!(sel.touches_col(3));
        assert!(!Selection::rows([1]).touches_col(0));
        assert!(Selection::cols([5]).contains(99, 5));
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Selection::cell(3, 2)).unwrap();
        assert_eq!(json, r#"{"kind":"cell","value":{"row":3,"col":2}}"#);
        let json = serde_json::to_string(&Selection::cols([2])).unwrap();
        assert_eq!(json, r#"{"kind":"cols","value":[2]}"#);
    }
}
