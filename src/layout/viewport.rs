//! Viewport state and visible-range derivation.

use std::ops::Range;

use serde::Serialize;

use super::Geometry;
use crate::error::GridError;

/// Half-open block of row and column indices intersecting a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRange {
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
}

impl VisibleRange {
    pub fn rows(&self) -> Range<u32> {
        self.row_start..self.row_end
    }

    pub fn cols(&self) -> Range<u32> {
        self.col_start..self.col_end
    }

    pub fn is_empty(&self) -> bool {
        self.row_start >= self.row_end || self.col_start >= self.col_end
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.rows().contains(&row) && self.cols().contains(&col)
    }

    /// Number of cells inside the range.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.row_end.saturating_sub(self.row_start))
            * u64::from(self.col_end.saturating_sub(self.col_start))
    }

    /// Clamp into `[0, rows] x [0, cols]`, logging any violation.
    #[must_use]
    pub fn sanitized(self, rows: u32, cols: u32) -> Self {
        let row_end = self.row_end.min(rows);
        let col_end = self.col_end.min(cols);
        let fixed = Self {
            row_start: self.row_start.min(row_end),
            row_end,
            col_start: self.col_start.min(col_end),
            col_end,
        };
        if fixed != self {
            let violation = GridError::RenderInvariant {
                row_start: self.row_start,
                row_end: self.row_end,
                col_start: self.col_start,
                col_end: self.col_end,
                rows,
                cols,
            };
            tracing::warn!(%violation, "clamped visible range");
        }
        fixed
    }
}

/// Viewport state: scroll offset plus the pixel size of the visible area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in content coordinates
    pub scroll_x: f64,
    /// Vertical scroll position in content coordinates
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Largest scroll offsets that still keep content under the viewport.
    pub fn max_scroll(&self, geom: &Geometry) -> (f64, f64) {
        (
            (geom.total_width() - self.width).max(0.0),
            (geom.total_height() - self.height).max(0.0),
        )
    }

    /// Clamp the scroll offset to `[0, max_scroll]` on both axes.
    pub fn clamp_scroll(&mut self, geom: &Geometry) {
        let (max_x, max_y) = self.max_scroll(geom);
        self.scroll_x = clamp_axis(self.scroll_x, max_x);
        self.scroll_y = clamp_axis(self.scroll_y, max_y);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Rows and columns whose pixel span intersects the viewport.
    ///
    /// Rows are computed arithmetically from the uniform height, columns by
    /// binary search over the offset array.
    pub fn visible_range(&self, geom: &Geometry) -> VisibleRange {
        let rows = geom.rows.len();
        let cols = geom.columns.len();

        let (row_start, row_end) = if rows == 0 || self.height <= 0.0 {
            let start = index_floor(self.scroll_y / geom.rows.row_height(), rows);
            (start, start)
        } else {
            let h = geom.rows.row_height();
            (
                index_floor(self.scroll_y / h, rows),
                index_ceil((self.scroll_y + self.height) / h, rows),
            )
        };

        let col_start = geom.columns.column_at(self.scroll_x).unwrap_or(cols);
        let col_end = if self.width <= 0.0 {
            col_start
        } else {
            // Columns whose left edge lies before the right side of the viewport
            let right = self.scroll_x + self.width;
            let offsets = geom.columns.offsets();
            let lefts = offsets.get(..offsets.len().saturating_sub(1)).unwrap_or(&[]);
            u32::try_from(lefts.partition_point(|&o| o < right)).unwrap_or(cols)
        };

        VisibleRange {
            row_start,
            row_end,
            col_start,
            col_end,
        }
        .sanitized(rows, cols)
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn index_floor(value: f64, limit: u32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    // Saturating float-to-int cast, then clamp
    (value.floor() as u32).min(limit)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn index_ceil(value: f64, limit: u32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    (value.ceil() as u32).min(limit)
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
    use crate::layout::{ColumnLayout, RowLayout};

    fn geometry(rows: u32, widths: &[f64]) -> Geometry {
        Geometry {
            columns: ColumnLayout::from_widths(widths, 30.0, 300.0),
            rows: RowLayout::new(rows, 20.0),
        }
    }

    #[test]
    fn test_rows_from_top() {
        let geom = geometry(150, &[60.0; 5]);
        let vp = Viewport::new(300.0, 200.0);
        let range = vp.visible_range(&geom);
        assert_eq!(range.rows(), 0..10);
        assert_eq!(range.cols(), 0..5);
    }

    #[test]
    fn test_partial_rows_included() {
        let geom = geometry(150, &[60.0; 5]);
        let mut vp = Viewport::new(300.0, 200.0);
        vp.scroll_y = 25.0;
        assert_eq!(vp.visible_range(&geom).rows(), 1..12);
    }

    #[test]
    fn test_cols_exclude_edge_column() {
        let geom = geometry(10, &[60.0, 60.0, 60.0, 60.0]);
        let mut vp = Viewport::new(120.0, 100.0);
        assert_eq!(vp.visible_range(&geom).cols(), 0..2);
        vp.scroll_x = 30.0;
        assert_eq!(vp.visible_range(&geom).cols(), 0..3);
    }

    #[test]
    fn test_empty_table_and_zero_viewport() {
        let geom = geometry(0, &[]);
        let range = Viewport::new(100.0, 100.0).visible_range(&geom);
        assert!(range.is_empty());
        assert_eq!(range, VisibleRange::default());

        let geom = geometry(10, &[60.0]);
        let range = Viewport::new(0.0, 0.0).visible_range(&geom);
        assert!(range.is_empty());
    }

    #[test]
    fn test_sanitized_clamps() {
        let bad = VisibleRange {
            row_start: 8,
            row_end: 40,
            col_start: 6,
            col_end: 9,
        };
        let fixed = bad.sanitized(20, 5);
        assert_eq!(fixed.rows(), 8..20);
        assert_eq!(fixed.cols(), 5..5);
    }

    #[test]
    fn test_clamp_scroll_floors_at_zero() {
        let geom = geometry(5, &[60.0]);
        let mut vp = Viewport::new(400.0, 400.0);
        vp.scroll_x = 50.0;
        vp.scroll_y = -10.0;
        vp.clamp_scroll(&geom);
        assert_eq!((vp.scroll_x, vp.scroll_y), (0.0, 0.0));

        let geom = geometry(100, &[60.0; 10]);
        vp.scroll_x = 10_000.0;
        vp.scroll_y = 10_000.0;
        vp.clamp_scroll(&geom);
        assert_eq!((vp.scroll_x, vp.scroll_y), (200.0, 1600.0));
    }
}
