//! Layout engine for cell positions and viewport management.
//!
//! This module handles:
//! - Column widths with cumulative offsets and binary-search lookup
//! - Uniform row geometry
//! - Viewport state and the visible row/column range

mod columns;
mod geometry;
mod rows;
mod viewport;

pub use columns::ColumnLayout;
pub use geometry::{CellRect, Geometry};
pub use rows::RowLayout;
pub use viewport::{Viewport, VisibleRange};
