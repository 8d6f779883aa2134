//! Single source of truth for the scroll offset.
//!
//! The coordinator holds only `Weak` references to the panes it notifies;
//! panes never hold the coordinator.

use std::cell::RefCell;
use std::rc::Weak;

use super::pane::ScrollListener;
use crate::layout::Geometry;

pub struct ScrollCoordinator {
    scroll_x: f64,
    scroll_y: f64,
    /// Size of the body area the content scrolls under
    view_width: f64,
    view_height: f64,
    listeners: Vec<Weak<RefCell<dyn ScrollListener>>>,
}

impl ScrollCoordinator {
    pub fn new(view_width: f64, view_height: f64) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            view_width: view_width.max(0.0),
            view_height: view_height.max(0.0),
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Weak<RefCell<dyn ScrollListener>>) {
        self.listeners.push(listener);
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn set_view_size(&mut self, width: f64, height: f64) {
        self.view_width = width.max(0.0);
        self.view_height = height.max(0.0);
    }

    /// `[0, max(0, total - view)]` on each axis.
    pub fn max_scroll(&self, geom: &Geometry) -> (f64, f64) {
        (
            (geom.total_width() - self.view_width).max(0.0),
            (geom.total_height() - self.view_height).max(0.0),
        )
    }

    /// Clamp and apply an absolute offset; notifies only on change.
    pub fn set_scroll(&mut self, scroll_x: f64, scroll_y: f64, geom: &Geometry) -> bool {
        let (max_x, max_y) = self.max_scroll(geom);
        let new_x = clamp_axis(scroll_x, max_x);
        let new_y = clamp_axis(scroll_y, max_y);
        let dx = new_x - self.scroll_x;
        let dy = new_y - self.scroll_y;
        if dx.abs() <= f64::EPSILON && dy.abs() <= f64::EPSILON {
            return false;
        }
        self.scroll_x = new_x;
        self.scroll_y = new_y;
        tracing::trace!(x = new_x, y = new_y, "scroll");
        self.broadcast(geom);
        true
    }

    /// Apply a wheel delta.
    pub fn scroll_by(&mut self, dx: f64, dy: f64, geom: &Geometry) -> bool {
        self.set_scroll(self.scroll_x + dx, self.scroll_y + dy, geom)
    }

    /// Re-clamp after a geometry or size change and notify every pane
    /// unconditionally so each recomputes its visible range.
    pub fn refresh(&mut self, geom: &Geometry) {
        let (max_x, max_y) = self.max_scroll(geom);
        self.scroll_x = clamp_axis(self.scroll_x, max_x);
        self.scroll_y = clamp_axis(self.scroll_y, max_y);
        self.broadcast(geom);
    }

    /// Number of panes still alive.
    pub fn listener_count(&self) -> usize {
        self.listeners.iter().filter(|l| l.strong_count() > 0).count()
    }

    fn broadcast(&mut self, geom: &Geometry) {
        let (x, y) = (self.scroll_x, self.scroll_y);
        self.listeners.retain(|weak| match weak.upgrade() {
            Some(listener) => {
                listener.borrow_mut().on_scroll(x, y, geom);
                true
            }
            None => false,
        });
    }
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, max)
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
    use std::rc::Rc;

    use super::*;
    use crate::layout::{ColumnLayout, RowLayout};
    use crate::viewer::pane::{Pane, ScrollAxis};

    fn geometry() -> Geometry {
        Geometry {
            columns: ColumnLayout::new(10, 60.0, 30.0, 300.0),
            rows: RowLayout::new(150, 20.0),
        }
    }

    #[test]
    fn test_clamps_and_propagates() {
        let geom = geometry();
        let body = Rc::new(RefCell::new(Pane::new("body", ScrollAxis::Both, 0.0, 0.0, 300.0, 200.0)));
        let header = Rc::new(RefCell::new(Pane::new("cols", ScrollAxis::X, 0.0, 0.0, 300.0, 25.0)));
        let mut scroll = ScrollCoordinator::new(300.0, 200.0);
        let listener_body: Rc<RefCell<dyn ScrollListener>> = Rc::<RefCell<Pane>>::clone(&body);
        let listener_header: Rc<RefCell<dyn ScrollListener>> = Rc::<RefCell<Pane>>::clone(&header);
        scroll.subscribe(Rc::downgrade(&listener_body));
        scroll.subscribe(Rc::downgrade(&listener_header));

        assert!(scroll.set_scroll(1e9, -5.0, &geom));
        assert_eq!(scroll.offset(), (300.0, 0.0));
        assert_eq!(body.borrow().viewport().scroll_x, 300.0);
        assert_eq!(header.borrow().viewport().scroll_x, 300.0);

        assert!(!scroll.set_scroll(300.0, 0.0, &geom));
        assert!(scroll.scroll_by(0.0, 10_000.0, &geom));
        assert_eq!(scroll.offset().1, 2800.0);
        assert_eq!(header.borrow().viewport().scroll_y, 0.0);
    }

    #[test]
    fn test_dropped_panes_are_pruned() {
        let geom = geometry();
        let mut scroll = ScrollCoordinator::new(300.0, 200.0);
        {
            let pane = Rc::new(RefCell::new(Pane::new("tmp", ScrollAxis::Both, 0.0, 0.0, 1.0, 1.0)));
            let listener: Rc<RefCell<dyn ScrollListener>> = Rc::<RefCell<Pane>>::clone(&pane);
            scroll.subscribe(Rc::downgrade(&listener));
            assert_eq!(scroll.listener_count(), 1);
        }
        scroll.refresh(&geom);
        assert_eq!(scroll.listener_count(), 0);
    }

    #[test]
    fn test_small_content_floors_at_zero() {
        let geom = Geometry {
            columns: ColumnLayout::new(2, 60.0, 30.0, 300.0),
            rows: RowLayout::new(3, 20.0),
        };
        let mut scroll = ScrollCoordinator::new(300.0, 200.0);
        assert!(!scroll.set_scroll(50.0, 50.0, &geom));
        assert_eq!(scroll.offset(), (0.0, 0.0));
    }
}
