//! Uniform-height row geometry.

/// Row geometry: every row has the same height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    row_height: f64,
    count: u32,
}

impl RowLayout {
    pub fn new(count: u32, row_height: f64) -> Self {
        Self { row_height, count }
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn set_len(&mut self, count: u32) {
        self.count = count;
    }

    /// Top edge of `row` (valid for `row == len()` as the bottom edge).
    pub fn offset_of(&self, row: u32) -> f64 {
        f64::from(row) * self.row_height
    }

    /// Row containing `y`, or `None` outside `[0, total_height)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn row_at(&self, y: f64) -> Option<u32> {
        if y.is_nan() || y < 0.0 || y >= self.total_height() {
            return None;
        }
        // y is within [0, count * height) so the quotient fits in u32
        Some(((y / self.row_height).floor() as u32).min(self.count.saturating_sub(1)))
    }

    pub fn total_height(&self) -> f64 {
        f64::from(self.count) * self.row_height
    }

    /// Whole rows that fit in `height` pixels (at least one).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn page_size(&self, height: f64) -> u32 {
        if height.is_nan() || height <= self.row_height {
            return 1;
        }
        ((height / self.row_height).floor() as u32).max(1)
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
    fn test_row_at_y() {
        let rows = RowLayout::new(10, 20.0);
        assert_eq!(rows.row_at(0.0), Some(0));
        assert_eq!(rows.row_at(10.0), Some(0));
        assert_eq!(rows.row_at(20.0), Some(1));
        assert_eq!(rows.row_at(50.0), Some(2));
        assert_eq!(rows.row_at(199.9), Some(9));
        assert_eq!(rows.row_at(200.0), None);
        assert_eq!(rows.row_at(-0.5), None);
    }

    #[test]
    fn test_offsets_and_total() {
        let rows = RowLayout::new(150, 20.0);
        assert_eq!(rows.offset_of(3), 60.0);
        assert_eq!(rows.total_height(), 3000.0);
        assert!(RowLayout::new(0, 20.0).row_at(0.0).is_none());
    }

    #[test]
    fn test_page_size() {
        let rows = RowLayout::new(150, 20.0);
        assert_eq!(rows.page_size(200.0), 10);
        assert_eq!(rows.page_size(215.0), 10);
        assert_eq!(rows.page_size(5.0), 1);
    }
}
