//! Per-column widths and cumulative offsets.
//!
//! Offsets are kept alongside widths so that `offset_of` is O(1) and
//! `column_at` is a binary search over a monotonic array.

use crate::error::{GridError, Result};

/// Column geometry for a table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// Column widths after clamping
    widths: Vec<f64>,
    /// Cumulative positions (`offsets[i]` = x of column i's left edge; last = total width)
    offsets: Vec<f64>,
    min_width: f64,
    max_width: f64,
    /// Width given to columns created by `new` or `resize`
    default_width: f64,
}

impl ColumnLayout {
    /// Create `count` columns of `default_width` (clamped).
    pub fn new(count: u32, default_width: f64, min_width: f64, max_width: f64) -> Self {
        let mut layout = Self {
            widths: Vec::new(),
            offsets: vec![0.0],
            min_width,
            max_width,
            default_width,
        };
        layout.default_width = layout.clamp(default_width);
        layout.resize(count);
        layout
    }

    /// Create a layout from explicit widths (each clamped).
    pub fn from_widths(widths: &[f64], min_width: f64, max_width: f64) -> Self {
        let mut layout = Self {
            widths: Vec::with_capacity(widths.len()),
            offsets: Vec::with_capacity(widths.len() + 1),
            min_width,
            max_width,
            default_width: min_width,
        };
        layout.widths = widths.iter().map(|&w| layout.clamp(w)).collect();
        layout.recompute_from(0);
        layout
    }

    /// Clamp a requested width into `[min_width, max_width]`.
    pub fn clamp(&self, px: f64) -> f64 {
        if px.is_nan() {
            return self.min_width;
        }
        px.clamp(self.min_width, self.max_width)
    }

    /// Set the width of `col`, returning the applied (clamped) width.
    ///
    /// Offsets are recomputed for `col..C` only.
    pub fn set_width(&mut self, col: u32, px: f64) -> Result<f64> {
        let width = self.clamp(px);
        let count = self.len();
        let slot = self
            .widths
            .get_mut(col as usize)
            .ok_or(GridError::ColumnOutOfRange { col, count })?;
        *slot = width;
        self.recompute_from(col as usize);
        Ok(width)
    }

    /// Size `col` to fit content of `content_px` plus padding on both sides.
    pub fn fit_width(&mut self, col: u32, content_px: f64, inset: f64) -> Result<f64> {
        self.set_width(col, content_px + 2.0 * inset)
    }

    /// Change the column count, keeping the widths of surviving columns.
    pub fn resize(&mut self, count: u32) {
        let old = self.widths.len();
        self.widths.resize(count as usize, self.default_width);
        self.recompute_from(old.min(count as usize));
    }

    fn recompute_from(&mut self, col: usize) {
        self.offsets.truncate(col + 1);
        if self.offsets.is_empty() {
            self.offsets.push(0.0);
        }
        let mut x = self.offsets.last().copied().unwrap_or(0.0);
        for w in self.widths.iter().skip(col) {
            x += w;
            self.offsets.push(x);
        }
    }

    /// Left edge of `col`; `offset_of(len())` is the total width.
    pub fn offset_of(&self, col: u32) -> Option<f64> {
        self.offsets.get(col as usize).copied()
    }

    pub fn width_of(&self, col: u32) -> Option<f64> {
        self.widths.get(col as usize).copied()
    }

    /// Find the column whose `[offset, offset + width)` contains `x` (binary search).
    ///
    /// Returns `None` for negative x and at or past the total width.
    pub fn column_at(&self, x: f64) -> Option<u32> {
        if x.is_nan() || x < 0.0 || x >= self.total_width() {
            return None;
        }
        let idx = self.offsets.partition_point(|&o| o <= x);
        u32::try_from(idx.checked_sub(1)?).ok()
    }

    /// Sum of all column widths.
    pub fn total_width(&self) -> f64 {
        self.offsets.last().copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> u32 {
        u32::try_from(self.widths.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    pub fn max_width(&self) -> f64 {
        self.max_width
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
    fn test_basic_layout() {
        let layout = ColumnLayout::new(5, 60.0, 30.0, 300.0);
        assert_eq!(layout.len(), 5);
        assert_eq!(layout.total_width(), 300.0);
        assert_eq!(layout.offset_of(2), Some(120.0));
        assert_eq!(layout.offset_of(5), Some(300.0));
        assert_eq!(layout.offset_of(6), None);
    }

    #[test]
    fn test_default_width_is_clamped() {
        let layout = ColumnLayout::new(2, 10.0, 30.0, 300.0);
        assert_eq!(layout.widths(), &[30.0, 30.0]);
    }

    #[test]
    fn test_col_at_x() {
        let layout = ColumnLayout::from_widths(&[60.0, 100.0, 40.0], 30.0, 300.0);
        assert_eq!(layout.column_at(0.0), Some(0));
        assert_eq!(layout.column_at(59.9), Some(0));
        assert_eq!(layout.column_at(60.0), Some(1));
        assert_eq!(layout.column_at(199.0), Some(2));
        assert_eq!(layout.column_at(200.0), None);
        assert_eq!(layout.column_at(-1.0), None);
        assert_eq!(layout.column_at(f64::NAN), None);
    }

    #[test]
    fn test_set_width_recomputes_tail() {
        let mut layout = ColumnLayout::from_widths(&[60.0, 60.0, 60.0], 30.0, 300.0);
        assert_eq!(layout.set_width(1, 500.0).unwrap(), 300.0);
        assert_eq!(&layout.offsets()[..3], &[0.0, 60.0, 360.0]);
        assert_eq!(layout.total_width(), 420.0);

        assert_eq!(layout.set_width(0, 1.0).unwrap(), 30.0);
        assert_eq!(layout.offsets(), &[0.0, 30.0, 330.0, 390.0]);

        assert!(matches!(
            layout.set_width(3, 50.0),
            Err(GridError::ColumnOutOfRange { col: 3, count: 3 })
        ));
    }

    #[test]
    fn test_resize_keeps_surviving_widths() {
        let mut layout = ColumnLayout::new(3, 60.0, 30.0, 300.0);
        layout.set_width(0, 100.0).unwrap();
        layout.resize(2);
        assert_eq!(layout.widths(), &[100.0, 60.0]);
        assert_eq!(layout.total_width(), 160.0);
        layout.resize(4);
        assert_eq!(layout.widths(), &[100.0, 60.0, 60.0, 60.0]);
        assert_eq!(layout.offsets(), &[0.0, 100.0, 160.0, 220.0, 280.0]);
        layout.resize(0);
        assert!(layout.is_empty());
        assert_eq!(layout.total_width(), 0.0);
        assert_eq!(layout.column_at(0.0), None);
    }

    #[test]
    fn test_fit_width_adds_inset() {
        let mut layout = ColumnLayout::new(1, 60.0, 30.0, 300.0);
        assert_eq!(layout.fit_width(0, 80.0, 2.0).unwrap(), 84.0);
        assert_eq!(layout.fit_width(0, 1000.0, 2.0).unwrap(), 300.0);
    }
}
