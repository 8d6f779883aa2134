//! `GridView`: the composition root.
//!
//! Owns the table reference, layouts, panes, controllers and the drawing
//! surface. Every state change only marks [`Damage`]; [`GridView::render_frame`]
//! performs at most one redraw per call and picks the cheapest kind that
//! covers the damage.
//!
//! Surface layout:
//!
//! ```text
//! +--------+---------------------+
//! | corner | column header (x)   |
//! +--------+---------------------+
//! | row    | body (x, y)         |
//! | header |                     |
//! | (y)    |                     |
//! +--------+---------------------+
//! ```

mod events;
mod pane;
mod scroll;
mod selection;
#[cfg(target_arch = "wasm32")]
mod wasm;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub use events::{HitTarget, Key, Modifiers, RESIZE_HANDLE_SIZE};
pub use pane::{Pane, ScrollAxis, ScrollListener};
pub use scroll::ScrollCoordinator;
pub use selection::{Nav, SelectionController};
#[cfg(target_arch = "wasm32")]
pub use wasm::JsGrid;

use crate::editor::{parse_for_column, EditController, EditSession};
use crate::error::{GridError, Result};
use crate::layout::{CellRect, Geometry, VisibleRange};
use crate::render::{
    format_cell, parse_color, CssColor, DrawSurface, GridRenderer, RenderKind, RenderParams,
    RenderStats,
};
use crate::types::{
    CellValue, FieldMode, GridOptions, Selection, SharedTable, Theme, MAX_PRECISION,
};

/// More pending single-cell refreshes than this become one visible redraw.
const MAX_CELL_DAMAGE: usize = 64;

type SelectionCallback = Box<dyn FnMut(&Selection)>;
type CommitCallback = Box<dyn FnMut(u32, u32, &CellValue)>;

/// Pending redraw work, folded into one render per frame.
#[derive(Debug, Default)]
struct Damage {
    structural: bool,
    visible: bool,
    cells: Vec<(u32, u32)>,
}

impl Damage {
    fn is_dirty(&self) -> bool {
        self.structural || self.visible || !self.cells.is_empty()
    }

    fn cell(&mut self, row: u32, col: u32) {
        if self.structural || self.visible {
            return;
        }
        if !self.cells.contains(&(row, col)) {
            self.cells.push((row, col));
        }
        if self.cells.len() > MAX_CELL_DAMAGE {
            self.cells.clear();
            self.visible = true;
        }
    }
}

/// An in-progress pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    /// Extending a block selection
    Select,
    /// Dragging a column header's right edge
    Resize {
        col: u32,
        origin_x: f64,
        origin_width: f64,
    },
}

/// Create a grid over `table`, drawing into `surface`.
///
/// Options and theme are validated up front; nothing is drawn until the
/// first [`GridView::render_frame`].
pub fn create_grid<S: DrawSurface>(
    table: SharedTable,
    width: f64,
    height: f64,
    options: GridOptions,
    theme: Theme,
    surface: S,
) -> Result<GridView<S>> {
    GridView::new(table, width, height, options, theme, surface)
}

pub struct GridView<S: DrawSurface> {
    table: SharedTable,
    options: GridOptions,
    theme: Theme,
    surface: S,
    geom: Geometry,
    scroll: ScrollCoordinator,
    body: Rc<RefCell<Pane>>,
    col_header: Rc<RefCell<Pane>>,
    row_header: Rc<RefCell<Pane>>,
    corner: Rc<RefCell<Pane>>,
    selection: SelectionController,
    editor: EditController,
    /// Per-field settings keyed by column name
    modes_by_name: HashMap<String, FieldMode>,
    colors_by_name: HashMap<String, CssColor>,
    /// Index-aligned views of the maps above
    field_modes: Vec<FieldMode>,
    column_colors: Vec<Option<CssColor>>,
    renderer: GridRenderer,
    damage: Damage,
    gesture: Option<Gesture>,
    on_selection_changed: Option<SelectionCallback>,
    on_cell_edit_committed: Option<CommitCallback>,
}

impl<S: DrawSurface> GridView<S> {
    fn new(
        table: SharedTable,
        width: f64,
        height: f64,
        options: GridOptions,
        theme: Theme,
        mut surface: S,
    ) -> Result<Self> {
        options.validate()?;
        theme.validate()?;
        if !(width.is_finite() && height.is_finite()) {
            return Err(GridError::Config(format!(
                "surface size must be finite, got {width}x{height}"
            )));
        }
        surface.resize(width.max(0.0), height.max(0.0));
        let geom = Geometry::for_table(&table.borrow(), &options);

        let corner = Rc::new(RefCell::new(Pane::new("corner", ScrollAxis::None, 0.0, 0.0, 0.0, 0.0)));
        let col_header = Rc::new(RefCell::new(Pane::new("columns", ScrollAxis::X, 0.0, 0.0, 0.0, 0.0)));
        let row_header = Rc::new(RefCell::new(Pane::new("rows", ScrollAxis::Y, 0.0, 0.0, 0.0, 0.0)));
        let body = Rc::new(RefCell::new(Pane::new("body", ScrollAxis::Both, 0.0, 0.0, 0.0, 0.0)));

        let mut scroll = ScrollCoordinator::new(0.0, 0.0);
        for pane in [&body, &col_header, &row_header, &corner] {
            let listener: Rc<RefCell<dyn ScrollListener>> = Rc::<RefCell<Pane>>::clone(pane);
            scroll.subscribe(Rc::downgrade(&listener));
        }

        let mut view = Self {
            table,
            options,
            theme,
            surface,
            geom,
            scroll,
            body,
            col_header,
            row_header,
            corner,
            selection: SelectionController::new(),
            editor: EditController::new(),
            modes_by_name: HashMap::new(),
            colors_by_name: HashMap::new(),
            field_modes: Vec::new(),
            column_colors: Vec::new(),
            renderer: GridRenderer::new(),
            damage: Damage {
                structural: true,
                ..Damage::default()
            },
            gesture: None,
            on_selection_changed: None,
            on_cell_edit_committed: None,
        };
        view.sync_columns();
        view.layout_panes();
        tracing::debug!(
            rows = view.geom.rows.len(),
            cols = view.geom.columns.len(),
            width,
            height,
            "grid created"
        );
        Ok(view)
    }

    // ---- outbound callbacks ----

    pub fn set_on_selection_changed(&mut self, callback: impl FnMut(&Selection) + 'static) {
        self.on_selection_changed = Some(Box::new(callback));
    }

    pub fn set_on_cell_edit_committed(
        &mut self,
        callback: impl FnMut(u32, u32, &CellValue) + 'static,
    ) {
        self.on_cell_edit_committed = Some(Box::new(callback));
    }

    // ---- inbound notifications ----

    /// The host swapped in a new table: fresh geometry, no selection, no edit.
    pub fn model_reset(&mut self, table: SharedTable) {
        self.table = table;
        self.geom = Geometry::for_table(&self.table.borrow(), &self.options);
        self.editor.cancel();
        self.gesture = None;
        self.sync_columns();
        self.scroll.set_scroll(0.0, 0.0, &self.geom);
        self.scroll.refresh(&self.geom);
        self.damage.structural = true;
        tracing::debug!(
            rows = self.geom.rows.len(),
            cols = self.geom.columns.len(),
            "model reset"
        );
        if self.selection.clear() {
            self.notify_selection();
        }
    }

    /// Columns were added, removed or reordered.
    pub fn model_columns_changed(&mut self) {
        self.resync_structure("columns changed");
    }

    /// Generic structural change (rows and/or columns).
    pub fn model_changed(&mut self) {
        self.resync_structure("model changed");
    }

    /// One cell's value changed in place.
    pub fn model_cell_changed(&mut self, row: u32, col: u32) {
        let in_sync = self.geom.check(&self.table.borrow()).is_ok();
        if in_sync {
            self.damage.cell(row, col);
        } else {
            self.resync_structure("cell changed with new shape");
        }
    }

    /// Parse `text` as the column's type, write it and queue a cell redraw.
    /// Hosts without direct table access mutate through this.
    pub fn set_cell_text(&mut self, row: u32, col: u32, text: &str) -> Result<CellValue> {
        let previous = {
            let mut table = self.table.borrow_mut();
            let value = match table.column(col) {
                Some(column) => parse_for_column(row, col, column, text)?,
                None => return Err(GridError::CellOutOfRange { row, col }),
            };
            table.set_cell(row, col, value)?
        };
        self.model_cell_changed(row, col);
        Ok(previous)
    }

    fn resync_structure(&mut self, reason: &'static str) {
        let (rows, cols) = {
            let table = self.table.borrow();
            self.geom.sync_shape(&table);
            (table.row_count(), table.column_count())
        };
        if self.editor.cancel_if_outside(rows, cols) {
            tracing::debug!(rows, cols, "edited cell removed");
        }
        if let Some(Gesture::Resize { col, .. }) = self.gesture {
            if col >= cols {
                self.gesture = None;
            }
        }
        self.sync_columns();
        self.scroll.refresh(&self.geom);
        self.damage.structural = true;
        tracing::debug!(rows, cols, reason, "structural reset");
        if self.selection.retain_within(rows, cols) {
            self.notify_selection();
        }
    }

    /// Rebuild the index-aligned per-column vectors from the name maps.
    fn sync_columns(&mut self) {
        let default_mode = self.options.default_field_mode();
        let table = self.table.borrow();
        self.field_modes = table
            .column_names()
            .map(|name| self.modes_by_name.get(name).copied().unwrap_or(default_mode))
            .collect();
        self.column_colors = table
            .column_names()
            .map(|name| self.colors_by_name.get(name).cloned())
            .collect();
    }

    // ---- configuration ----

    pub fn field_mode(&self, col: u32) -> Option<FieldMode> {
        self.field_modes.get(col as usize).copied()
    }

    /// Set the editability of one field. Closes an open edit on that column
    /// when it stops being editable.
    pub fn set_field_mode(&mut self, col: u32, mode: FieldMode) -> Result<()> {
        let name = self.column_name(col)?;
        self.modes_by_name.insert(name, mode);
        self.sync_columns();
        if let Some(session) = self.editor.session() {
            if session.col == col && !mode.is_editable() {
                self.editor.cancel();
            }
        }
        self.damage.visible = true;
        Ok(())
    }

    /// Colour a column's cells (`None` removes the override).
    pub fn set_column_color(&mut self, name: &str, color: Option<&str>) -> Result<()> {
        match color {
            Some(value) => {
                let parsed = parse_color(value)
                    .ok_or_else(|| GridError::Config(format!("invalid colour {value:?}")))?;
                self.colors_by_name.insert(name.to_string(), parsed);
            }
            None => {
                self.colors_by_name.remove(name);
            }
        }
        self.sync_columns();
        self.damage.visible = true;
        Ok(())
    }

    /// Change the float precision; forces a full redraw.
    pub fn set_precision(&mut self, precision: u8) -> Result<()> {
        if precision > MAX_PRECISION {
            return Err(GridError::Config(format!(
                "precision {precision} exceeds {MAX_PRECISION}"
            )));
        }
        if precision != self.options.precision {
            self.options.precision = precision;
            self.damage.structural = true;
        }
        Ok(())
    }

    /// Resize a column (clamped); returns the applied width.
    pub fn set_column_width(&mut self, col: u32, px: f64) -> Result<f64> {
        let width = self.geom.columns.set_width(col, px)?;
        self.scroll.refresh(&self.geom);
        self.damage.structural = true;
        Ok(width)
    }

    /// Size a column to its widest visible value or its name.
    pub fn fit_column(&mut self, col: u32) -> Result<f64> {
        let content = {
            let table = self.table.borrow();
            let column = table.column(col).ok_or(GridError::ColumnOutOfRange {
                col,
                count: table.column_count(),
            })?;
            let mut widest = self.surface.measure_text(column.name(), &self.theme.header_font);
            for row in self.body.borrow().range().rows() {
                if let Some(value) = table.cell(row, col) {
                    let text = format_cell(value, column.dtype(), self.options.precision);
                    widest = widest.max(self.surface.measure_text(&text, &self.theme.font));
                }
            }
            widest
        };
        let width = self.geom.columns.fit_width(col, content, self.theme.cell_inset)?;
        self.scroll.refresh(&self.geom);
        self.damage.structural = true;
        Ok(width)
    }

    // ---- scrolling ----

    /// Scroll to an absolute offset (clamped). Returns whether it moved.
    pub fn set_scroll(&mut self, x: f64, y: f64) -> bool {
        let moved = self.scroll.set_scroll(x, y, &self.geom);
        if moved {
            self.damage.visible = true;
        }
        moved
    }

    pub fn scroll_offset(&self) -> (f64, f64) {
        self.scroll.offset()
    }

    /// Scroll the minimum amount needed to show `(row, col)` in the body.
    pub fn scroll_into_view(&mut self, row: u32, col: u32) -> bool {
        let Some(rect) = self.geom.cell_rect(row, col) else {
            return false;
        };
        let viewport = *self.body.borrow().viewport();
        let (mut x, mut y) = self.scroll.offset();
        if rect.x < x {
            x = rect.x;
        } else if rect.right() > x + viewport.width {
            x = (rect.right() - viewport.width).min(rect.x);
        }
        if rect.y < y {
            y = rect.y;
        } else if rect.bottom() > y + viewport.height {
            y = (rect.bottom() - viewport.height).min(rect.y);
        }
        self.set_scroll(x, y)
    }

    // ---- editing ----

    /// Open an edit on `(row, col)` seeded with the cell's current text.
    pub fn begin_edit(&mut self, row: u32, col: u32) -> bool {
        let initial = {
            let table = self.table.borrow();
            match (table.column(col), table.cell(row, col)) {
                (Some(column), Some(value)) => format_cell(value, column.dtype(), 0).into_owned(),
                _ => return false,
            }
        };
        self.begin_edit_with(row, col, initial)
    }

    fn begin_edit_with(&mut self, row: u32, col: u32, initial: String) -> bool {
        let Some(placement) = self.edit_placement(row, col) else {
            return false;
        };
        let mode = self.field_modes.get(col as usize).copied().unwrap_or_default();
        if !mode.is_editable() || self.editor.is_editing() {
            return false;
        }
        self.scroll_into_view(row, col);
        let placement = self.edit_placement(row, col).unwrap_or(placement);
        self.editor.begin_edit(row, col, mode, initial, placement)
    }

    /// Commit the open edit. A parse failure leaves the session open and
    /// the table untouched.
    pub fn commit_edit(&mut self) -> Result<bool> {
        let committed = {
            let mut table = self.table.borrow_mut();
            self.editor.commit(&mut table)?
        };
        let Some(done) = committed else {
            return Ok(false);
        };
        self.damage.cell(done.row, done.col);
        if let Some(callback) = self.on_cell_edit_committed.as_mut() {
            callback(done.row, done.col, &done.value);
        }
        Ok(true)
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.editor.cancel()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.session()
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_editing()
    }

    /// Replace the open session's text (host-side input widgets).
    pub fn set_edit_buffer(&mut self, text: &str) {
        self.editor.set_buffer(text);
    }

    /// Surface rectangle of `(row, col)` in the body pane.
    pub fn edit_placement(&self, row: u32, col: u32) -> Option<CellRect> {
        let rect = self.geom.cell_rect(row, col)?;
        let view = self.body.borrow().view();
        Some(CellRect {
            x: view.screen_x(rect.x),
            y: view.screen_y(rect.y),
            ..rect
        })
    }

    fn follow_edit(&mut self) {
        let Some((row, col)) = self.editor.session().map(|s| (s.row, s.col)) else {
            return;
        };
        if let Some(placement) = self.edit_placement(row, col) {
            self.editor.reposition(placement);
        }
    }

    // ---- rendering ----

    /// Whether a call to [`GridView::render_frame`] would draw anything.
    pub fn needs_render(&self) -> bool {
        self.damage.is_dirty()
    }

    /// Force a full redraw on the next frame.
    pub fn invalidate(&mut self) {
        self.damage.structural = true;
    }

    /// Draw pending damage. Returns `None` when nothing was dirty.
    pub fn render_frame(&mut self) -> Option<RenderStats> {
        if !self.damage.is_dirty() {
            return None;
        }
        let check = self.geom.check(&self.table.borrow());
        if let Err(err) = check {
            tracing::warn!(%err, "layout out of sync with table");
            self.resync_structure("geometry mismatch");
        }
        self.follow_edit();

        let damage = std::mem::take(&mut self.damage);
        let table = self.table.borrow();
        let params = RenderParams {
            table: &table,
            geom: &self.geom,
            theme: &self.theme,
            precision: self.options.precision,
            selection: self.selection.selection(),
            cursor: self.selection.cursor(),
            field_modes: &self.field_modes,
            column_colors: &self.column_colors,
            body: self.body.borrow().view(),
            col_header: self.col_header.borrow().view(),
            row_header: self.row_header.borrow().view(),
            corner: self.corner.borrow().view(),
        };
        let stats = if damage.structural {
            self.renderer.render_structural(&mut self.surface, &params)
        } else if damage.visible {
            self.renderer.render_visible(&mut self.surface, &params)
        } else {
            let mut cells_drawn = 0;
            for &(row, col) in &damage.cells {
                cells_drawn += self.renderer.render_cell(&mut self.surface, &params, row, col).cells_drawn;
            }
            RenderStats {
                cells_drawn,
                kind: RenderKind::Cell,
            }
        };
        tracing::trace!(cells = stats.cells_drawn, kind = ?stats.kind, "frame");
        Some(stats)
    }

    // ---- sizing ----

    /// Resize the drawing surface and re-lay the panes.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.surface.resize(width.max(0.0), height.max(0.0));
        self.layout_panes();
        self.follow_edit();
        self.damage.structural = true;
    }

    /// Place the four panes on the surface and recompute every range.
    fn layout_panes(&mut self) {
        let width = self.surface.width();
        let height = self.surface.height();
        let header_w = self.options.row_header_width.min(width);
        let header_h = self.options.col_header_height.min(height);
        let body_w = (width - header_w).max(0.0);
        let body_h = (height - header_h).max(0.0);

        self.corner.borrow_mut().set_frame(0.0, 0.0, header_w, header_h);
        self.col_header.borrow_mut().set_frame(header_w, 0.0, body_w, header_h);
        self.row_header.borrow_mut().set_frame(0.0, header_h, header_w, body_h);
        self.body.borrow_mut().set_frame(header_w, header_h, body_w, body_h);
        self.scroll.set_view_size(body_w, body_h);
        self.scroll.refresh(&self.geom);
    }

    // ---- selection ----

    fn notify_selection(&mut self) {
        self.damage.visible = true;
        if let Some(callback) = self.on_selection_changed.as_mut() {
            callback(self.selection.selection());
        }
    }

    /// Clear the selection (host request).
    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.notify_selection();
        }
        changed
    }

    // ---- accessors ----

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    /// Current cell.
    pub fn cursor(&self) -> Option<(u32, u32)> {
        self.selection.cursor()
    }

    /// Body pane's visible range.
    pub fn visible_range(&self) -> VisibleRange {
        self.body.borrow().range()
    }

    pub fn column_header_range(&self) -> VisibleRange {
        self.col_header.borrow().range()
    }

    pub fn row_header_range(&self) -> VisibleRange {
        self.row_header.borrow().range()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geom
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn table(&self) -> SharedTable {
        Rc::clone(&self.table)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn column_name(&self, col: u32) -> Result<String> {
        let table = self.table.borrow();
        table
            .column(col)
            .map(|c| c.name().to_string())
            .ok_or(GridError::ColumnOutOfRange {
                col,
                count: table.column_count(),
            })
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
    use crate::render::RecordingSurface;
    use crate::types::{Column, Table};

    fn grid(rows: u32) -> GridView<RecordingSurface> {
        let table = Table::new(vec![
            Column::ints("id", (0..rows).map(i64::from)),
            Column::floats("x", (0..rows).map(|i| f64::from(i) / 4.0)),
        ])
        .unwrap()
        .into_shared();
        create_grid(
            table,
            350.0,
            225.0,
            GridOptions::default(),
            Theme::default(),
            RecordingSurface::new(0.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_pane_layout() {
        let view = grid(150);
        assert_eq!(view.surface().width(), 350.0);
        // body is 300x200 below the 25px header and right of the 50px header
        assert_eq!(view.visible_range().rows(), 0..10);
        assert_eq!(view.visible_range().cols(), 0..2);
        assert_eq!(view.row_header_range().rows(), 0..10);
        assert_eq!(view.column_header_range().cols(), 0..2);
    }

    #[test]
    fn test_single_redraw_per_frame() {
        let mut view = grid(150);
        assert!(view.needs_render());
        let stats = view.render_frame().unwrap();
        assert_eq!(stats.kind, RenderKind::Structural);
        assert_eq!(stats.cells_drawn, 20);
        assert!(view.render_frame().is_none());
    }

    #[test]
    fn test_cell_damage_collapses() {
        let mut damage = Damage::default();
        for row in 0..=64 {
            damage.cell(row, 0);
        }
        assert!(damage.visible);
        assert!(damage.cells.is_empty());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let table = Table::default().into_shared();
        let options = GridOptions {
            row_height: 0.0,
            ..GridOptions::default()
        };
        let result = create_grid(
            table,
            100.0,
            100.0,
            options,
            Theme::default(),
            RecordingSurface::new(0.0, 0.0),
        );
        assert!(matches!(result, Err(GridError::Config(_))));
    }

    #[test]
    fn test_precision_forces_structural() {
        let mut view = grid(3);
        view.render_frame();
        view.set_precision(2).unwrap();
        assert_eq!(view.render_frame().unwrap().kind, RenderKind::Structural);
        assert!(view.set_precision(40).is_err());
    }
}
