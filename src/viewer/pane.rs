//! Scrolling panes: the body and the two header strips.
//!
//! Each pane owns its own [`Viewport`] and recomputes its own
//! [`VisibleRange`] whenever the shared scroll offset changes, following the
//! offset only along its [`ScrollAxis`].

use crate::layout::{Geometry, Viewport, VisibleRange};
use crate::render::PaneView;

/// Axes along which a pane follows the shared scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    Both,
    X,
    Y,
    None,
}

/// Receives scroll offsets from the [`ScrollCoordinator`](super::scroll::ScrollCoordinator).
pub trait ScrollListener {
    fn on_scroll(&mut self, scroll_x: f64, scroll_y: f64, geom: &Geometry);
}

#[derive(Debug, Clone)]
pub struct Pane {
    name: &'static str,
    axis: ScrollAxis,
    x: f64,
    y: f64,
    viewport: Viewport,
    range: VisibleRange,
}

impl Pane {
    pub fn new(name: &'static str, axis: ScrollAxis, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name,
            axis,
            x,
            y,
            viewport: Viewport::new(width, height),
            range: VisibleRange::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn axis(&self) -> ScrollAxis {
        self.axis
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn range(&self) -> VisibleRange {
        self.range
    }

    /// Move or resize the pane on the surface.
    pub fn set_frame(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.x = x;
        self.y = y;
        self.viewport.resize(width, height);
    }

    /// Recompute the visible range from the current viewport.
    pub fn recompute(&mut self, geom: &Geometry) -> VisibleRange {
        self.range = self.viewport.visible_range(geom);
        self.range
    }

    pub fn view(&self) -> PaneView {
        PaneView {
            x: self.x,
            y: self.y,
            viewport: self.viewport,
            range: self.range,
        }
    }
}

impl ScrollListener for Pane {
    fn on_scroll(&mut self, scroll_x: f64, scroll_y: f64, geom: &Geometry) {
        match self.axis {
            ScrollAxis::Both => {
                self.viewport.scroll_x = scroll_x;
                self.viewport.scroll_y = scroll_y;
            }
            ScrollAxis::X => self.viewport.scroll_x = scroll_x,
            ScrollAxis::Y => self.viewport.scroll_y = scroll_y,
            ScrollAxis::None => {}
        }
        self.recompute(geom);
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
    use crate::layout::{ColumnLayout, RowLayout};

    #[test]
    fn test_axis_filtering() {
        let geom = Geometry {
            columns: ColumnLayout::new(20, 60.0, 30.0, 300.0),
            rows: RowLayout::new(100, 20.0),
        };
        let mut header = Pane::new("columns", ScrollAxis::X, 50.0, 0.0, 300.0, 25.0);
        header.on_scroll(120.0, 400.0, &geom);
        assert_eq!(header.viewport().scroll_x, 120.0);
        assert_eq!(header.viewport().scroll_y, 0.0);
        assert_eq!(header.range().cols(), 2..7);

        let mut rows = Pane::new("rows", ScrollAxis::Y, 0.0, 25.0, 50.0, 200.0);
        rows.on_scroll(120.0, 400.0, &geom);
        assert_eq!(rows.viewport().scroll_x, 0.0);
        assert_eq!(rows.range().rows(), 20..30);
    }
}
