//! datagrid - virtualized, editable table grid
//!
//! Renders a large two-dimensional table through a drawing surface,
//! touching only the rows and columns inside the viewport:
//! - Column and row headers scrolled in lockstep with the body
//! - Cell, row, column and block selection
//! - In-place editing with per-column field modes
//! - Canvas 2D in the browser via WebAssembly, a recording surface natively
//!
//! # Usage (Rust)
//!
//! ```
//! use datagrid::{create_grid, Column, GridOptions, RecordingSurface, Table, Theme};
//!
//! let table = Table::new(vec![Column::ints("id", 0..1000)]).unwrap().into_shared();
//! let mut grid = create_grid(
//!     table,
//!     400.0,
//!     300.0,
//!     GridOptions::default(),
//!     Theme::default(),
//!     RecordingSurface::new(400.0, 300.0),
//! )
//! .unwrap();
//! grid.wheel(0.0, 500.0);
//! let stats = grid.render_frame().unwrap();
//! assert_eq!(grid.visible_range().row_start, 25);
//! assert!(stats.cells_drawn > 0);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { JsGrid } from 'datagrid';
//! await init();
//! const grid = new JsGrid(canvas, devicePixelRatio, columns, config, container);
//! grid.render();
//! ```

pub mod collab;
pub mod csv;
pub mod editor;
pub mod error;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use collab::{ColumnKey, ColumnSource, Store};
pub use error::{GridError, Result};
pub use layout::{Geometry, VisibleRange};
pub use render::{DrawOp, DrawSurface, RecordingSurface, RenderKind, RenderStats};
pub use types::*;
#[cfg(target_arch = "wasm32")]
pub use viewer::JsGrid;
pub use viewer::{create_grid, GridView, HitTarget, Key, Modifiers};

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
