//! WebAssembly bindings: `JsGrid` wraps a [`GridView`] drawing into a
//! `<canvas>` and an `<input>` overlay for editing.
//!
//! The host page forwards DOM events (coordinates in CSS pixels relative to
//! the canvas) and calls `render()` from `requestAnimationFrame`.

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

use super::{create_grid, GridView, Key, Modifiers};
use crate::csv::parse_csv;
use crate::editor::input::InputOverlay;
use crate::render::{CanvasSurface, DrawSurface};
use crate::types::{ColumnSpec, GridConfig, SharedTable, Table};

#[wasm_bindgen]
pub struct JsGrid {
    view: GridView<CanvasSurface>,
    overlay: InputOverlay,
    /// Edit session shown by the overlay, if any
    shown: Option<(u32, u32)>,
}

#[wasm_bindgen]
impl JsGrid {
    /// `columns` is an array of `{name, type, values}`; `config` is an
    /// optional `{options, theme}` object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        dpr: f64,
        columns: JsValue,
        config: JsValue,
        container: Option<HtmlElement>,
    ) -> Result<JsGrid, JsValue> {
        console_error_panic_hook::set_once();
        let specs: Vec<ColumnSpec> =
            serde_wasm_bindgen::from_value(columns).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let table = Table::from_specs(specs)?.into_shared();
        Self::with_table(canvas, dpr, table, config, container)
    }

    /// Build a grid from CSV text.
    #[wasm_bindgen(js_name = fromCsv)]
    pub fn from_csv(
        canvas: HtmlCanvasElement,
        dpr: f64,
        text: &str,
        config: JsValue,
        container: Option<HtmlElement>,
    ) -> Result<JsGrid, JsValue> {
        console_error_panic_hook::set_once();
        let table = parse_csv(text)?.into_shared();
        Self::with_table(canvas, dpr, table, config, container)
    }

    fn with_table(
        canvas: HtmlCanvasElement,
        dpr: f64,
        table: SharedTable,
        config: JsValue,
        container: Option<HtmlElement>,
    ) -> Result<JsGrid, JsValue> {
        let config: GridConfig = if config.is_undefined() || config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let surface = CanvasSurface::new(canvas, dpr)?;
        let (width, height) = (surface.width(), surface.height());
        let view = create_grid(table, width, height, config.options, config.theme, surface)?;
        Ok(JsGrid {
            view,
            overlay: InputOverlay::new(container),
            shown: None,
        })
    }

    /// Draw pending damage; returns `{cellsDrawn, kind}` or `undefined`.
    pub fn render(&mut self) -> Result<JsValue, JsValue> {
        let stats = self.view.render_frame();
        self.sync_overlay();
        match stats {
            Some(stats) => serde_wasm_bindgen::to_value(&stats).map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = needsRender)]
    pub fn needs_render(&self) -> bool {
        self.view.needs_render()
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.view.resize(width, height);
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool) {
        self.view.pointer_down(x, y, Modifiers::new(shift, ctrl));
        self.sync_overlay();
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.view.pointer_move(x, y);
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.view.pointer_up();
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, x: f64, y: f64) -> bool {
        let opened = self.view.double_click(x, y);
        self.sync_overlay();
        opened
    }

    pub fn wheel(&mut self, dx: f64, dy: f64) -> bool {
        let moved = self.view.wheel(dx, dy);
        self.sync_overlay();
        moved
    }

    /// Forward a `keydown`; returns whether the grid consumed it.
    ///
    /// While editing, the overlay's text is copied into the session before
    /// the key is handled so Enter commits what the user typed.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str, shift: bool, ctrl: bool) -> Result<bool, JsValue> {
        let key = Key::from_dom(key);
        if self.view.is_editing() {
            if !matches!(key, Key::Enter | Key::Tab | Key::Escape) {
                // the input element handles its own text
                return Ok(false);
            }
            if let Some(text) = self.overlay.value() {
                self.view.set_edit_buffer(&text);
            }
        }
        let consumed = self.view.key_down(key, Modifiers::new(shift, ctrl))?;
        self.sync_overlay();
        Ok(consumed)
    }

    #[wasm_bindgen(js_name = focusLost)]
    pub fn focus_lost(&mut self) {
        self.view.focus_lost();
        self.sync_overlay();
    }

    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&mut self) -> Result<bool, JsValue> {
        if let Some(text) = self.overlay.value() {
            self.view.set_edit_buffer(&text);
        }
        let done = self.view.commit_edit()?;
        self.sync_overlay();
        Ok(done)
    }

    #[wasm_bindgen(js_name = cancelEdit)]
    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.view.cancel_edit();
        self.sync_overlay();
        cancelled
    }

    /// Replace the table (a reload); selection and edit are reset.
    #[wasm_bindgen(js_name = modelReset)]
    pub fn model_reset(&mut self, columns: JsValue) -> Result<(), JsValue> {
        let specs: Vec<ColumnSpec> =
            serde_wasm_bindgen::from_value(columns).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let table = Table::from_specs(specs)?.into_shared();
        self.view.model_reset(table);
        self.sync_overlay();
        Ok(())
    }

    #[wasm_bindgen(js_name = modelChanged)]
    pub fn model_changed(&mut self) {
        self.view.model_changed();
        self.sync_overlay();
    }

    #[wasm_bindgen(js_name = modelColumnsChanged)]
    pub fn model_columns_changed(&mut self) {
        self.view.model_columns_changed();
        self.sync_overlay();
    }

    #[wasm_bindgen(js_name = modelCellChanged)]
    pub fn model_cell_changed(&mut self, row: u32, col: u32) {
        self.view.model_cell_changed(row, col);
    }

    /// Parse `text` as the column's type and store it in `(row, col)`.
    #[wasm_bindgen(js_name = setCell)]
    pub fn set_cell(&mut self, row: u32, col: u32, text: &str) -> Result<(), JsValue> {
        self.view.set_cell_text(row, col, text)?;
        Ok(())
    }

    /// Insert a `{name, type, values}` column at `at`.
    #[wasm_bindgen(js_name = insertColumn)]
    pub fn insert_column(&mut self, at: u32, column: JsValue) -> Result<(), JsValue> {
        let spec: ColumnSpec =
            serde_wasm_bindgen::from_value(column).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let column = spec.into_column()?;
        self.view.table().borrow_mut().insert_column(at, column)?;
        self.model_columns_changed();
        Ok(())
    }

    #[wasm_bindgen(js_name = removeColumn)]
    pub fn remove_column(&mut self, col: u32) -> Result<(), JsValue> {
        self.view.table().borrow_mut().remove_column(col)?;
        self.model_columns_changed();
        Ok(())
    }

    #[wasm_bindgen(js_name = removeRow)]
    pub fn remove_row(&mut self, row: u32) -> Result<(), JsValue> {
        self.view.table().borrow_mut().remove_row(row)?;
        self.model_changed();
        Ok(())
    }

    /// Text typed into the grid while an edit is open.
    #[wasm_bindgen(js_name = textInput)]
    pub fn text_input(&mut self, text: &str) -> bool {
        let taken = self.view.text_input(text);
        if taken {
            // the overlay is rebuilt from the session buffer
            self.shown = None;
            self.sync_overlay();
        }
        taken
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) -> bool {
        self.view.clear_selection()
    }

    #[wasm_bindgen(js_name = setScroll)]
    pub fn set_scroll(&mut self, x: f64, y: f64) -> bool {
        let moved = self.view.set_scroll(x, y);
        self.sync_overlay();
        moved
    }

    #[wasm_bindgen(js_name = scrollOffset)]
    pub fn scroll_offset(&self) -> Vec<f64> {
        let (x, y) = self.view.scroll_offset();
        vec![x, y]
    }

    #[wasm_bindgen(js_name = contentSize)]
    pub fn content_size(&self) -> Vec<f64> {
        let geom = self.view.geometry();
        vec![geom.total_width(), geom.total_height()]
    }

    /// `{rowStart, rowEnd, colStart, colEnd}` of the body pane.
    #[wasm_bindgen(js_name = visibleRange)]
    pub fn visible_range(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.view.visible_range())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn selection(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.view.selection())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = setColumnColor)]
    pub fn set_column_color(&mut self, name: &str, color: Option<String>) -> Result<(), JsValue> {
        self.view.set_column_color(name, color.as_deref())?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setPrecision)]
    pub fn set_precision(&mut self, precision: u8) -> Result<(), JsValue> {
        self.view.set_precision(precision)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setColumnWidth)]
    pub fn set_column_width(&mut self, col: u32, width: f64) -> Result<f64, JsValue> {
        Ok(self.view.set_column_width(col, width)?)
    }

    /// `mode` is `"editable"`, `"readOnly"` or `"disabled"`.
    #[wasm_bindgen(js_name = setFieldMode)]
    pub fn set_field_mode(&mut self, col: u32, mode: JsValue) -> Result<(), JsValue> {
        let mode = serde_wasm_bindgen::from_value(mode).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.view.set_field_mode(col, mode)?;
        self.sync_overlay();
        Ok(())
    }

    /// `callback(selection)` after every selection change.
    #[wasm_bindgen(js_name = onSelectionChanged)]
    pub fn on_selection_changed(&mut self, callback: Function) {
        self.view.set_on_selection_changed(move |selection| {
            match serde_wasm_bindgen::to_value(selection) {
                Ok(value) => {
                    if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                        tracing::warn!(?err, "selection callback threw");
                    }
                }
                Err(err) => tracing::warn!(%err, "selection not serializable"),
            }
        });
    }

    /// `callback(row, col, value)` after every successful commit.
    #[wasm_bindgen(js_name = onCellEditCommitted)]
    pub fn on_cell_edit_committed(&mut self, callback: Function) {
        self.view.set_on_cell_edit_committed(move |row, col, value| {
            let value = serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL);
            if let Err(err) = callback.call3(&JsValue::NULL, &row.into(), &col.into(), &value) {
                tracing::warn!(?err, row, col, "commit callback threw");
            }
        });
    }

    /// Show, move or hide the overlay to match the edit session.
    fn sync_overlay(&mut self) {
        match self.view.edit_session() {
            Some(session) => {
                let cell = (session.row, session.col);
                if self.shown == Some(cell) {
                    self.overlay.reposition(&session.placement);
                } else {
                    let theme = self.view.theme();
                    self.overlay
                        .show(&session.placement, &session.buffer, &theme.font, &theme.entry_background);
                    self.shown = Some(cell);
                }
            }
            None => {
                if self.shown.take().is_some() {
                    self.overlay.hide();
                }
            }
        }
    }
}
