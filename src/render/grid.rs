//! Grid renderer: body cells, header strips and overlays.
//!
//! Only the cells inside each pane's [`VisibleRange`](crate::layout::VisibleRange)
//! are touched. Body draw order, bottom to top:
//!
//! 1. cell backgrounds
//! 2. per-column colour overrides
//! 3. grid lines
//! 4. text
//! 5. selection fill and outline
//! 6. current-cell outline

use serde::Serialize;

use super::backend::{DrawSurface, PaneView, RenderParams};
use super::cache::{MeasureCache, TEXT_MEASURE_CACHE_CAP};
use super::colors::{overlay, text_on};
use super::format::format_cell;
use super::headers;
use super::selection::{selection_rects, BandKind, SelectionRect};
use crate::layout::CellRect;
use crate::types::{FieldMode, Selection, TextAlign, Theme};

/// Opacity of selection fills drawn above text.
const SELECTION_ALPHA: f64 = 0.6;

/// Which kind of redraw produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderKind {
    /// Whole surface cleared and every pane redrawn
    Structural,
    /// Every pane redrawn over its own background
    Visible,
    /// One body cell redrawn inside its own clip
    Cell,
}

/// Per-frame counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStats {
    /// Body cells whose content was drawn
    pub cells_drawn: u64,
    pub kind: RenderKind,
}

/// Stateful renderer; holds the text measurement cache across frames.
pub struct GridRenderer {
    measure: MeasureCache,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GridRenderer {
    pub fn new() -> Self {
        Self {
            measure: MeasureCache::new(TEXT_MEASURE_CACHE_CAP),
        }
    }

    /// Clear the surface and redraw every pane.
    pub fn render_structural(
        &mut self,
        surface: &mut dyn DrawSurface,
        params: &RenderParams,
    ) -> RenderStats {
        surface.clear(&params.theme.background);
        let cells_drawn = self.render_panes(surface, params);
        RenderStats {
            cells_drawn,
            kind: RenderKind::Structural,
        }
    }

    /// Redraw every pane without clearing the surface first.
    pub fn render_visible(
        &mut self,
        surface: &mut dyn DrawSurface,
        params: &RenderParams,
    ) -> RenderStats {
        let cells_drawn = self.render_panes(surface, params);
        RenderStats {
            cells_drawn,
            kind: RenderKind::Visible,
        }
    }

    /// Redraw a single body cell, clipped to its visible rectangle.
    ///
    /// Nothing is drawn when the cell is outside the body's visible range.
    pub fn render_cell(
        &mut self,
        surface: &mut dyn DrawSurface,
        params: &RenderParams,
        row: u32,
        col: u32,
    ) -> RenderStats {
        let mut stats = RenderStats {
            cells_drawn: 0,
            kind: RenderKind::Cell,
        };
        let body = &params.body;
        if !body.range.contains(row, col) {
            return stats;
        }
        let Some(rect) = params.geom.cell_rect(row, col) else {
            return stats;
        };
        let theme = params.theme;
        let sx = body.screen_x(rect.x);
        let sy = body.screen_y(rect.y);

        // clip to the part of the cell inside the body pane
        let left = sx.max(body.x);
        let top = sy.max(body.y);
        let right = (sx + rect.width).min(body.x + body.viewport.width);
        let bottom = (sy + rect.height).min(body.y + body.viewport.height);
        if right <= left || bottom <= top {
            return stats;
        }
        surface.clip_rect(left, top, right - left, bottom - top);

        surface.fill_rect(sx, sy, rect.width, rect.height, &theme.cell_background);
        if let Some(color) = params.column_color(col) {
            surface.fill_rect(sx, sy, rect.width, rect.height, color);
        }
        surface.stroke_rect(sx, sy, rect.width, rect.height, theme.line_width, &theme.grid_color);
        self.draw_cell_text(surface, params, row, col, sx, sy, &rect);

        if let Some(kind) = band_kind(params.selection, row, col) {
            surface.fill_rect(sx, sy, rect.width, rect.height, &band_color(theme, kind));
        }
        if let Selection::Rect(block) = params.selection {
            if block.contains(row, col) {
                let edges = SelectionRect {
                    kind: BandKind::Block,
                    x: sx,
                    y: sy,
                    w: rect.width,
                    h: rect.height,
                    draw_top: row == block.r0,
                    draw_bottom: row == block.r1,
                    draw_left: col == block.c0,
                    draw_right: col == block.c1,
                };
                outline_edges(surface, theme, &edges);
            }
        }
        if params.cursor == Some((row, col)) {
            surface.stroke_rect(
                sx,
                sy,
                rect.width,
                rect.height,
                theme.outline_width,
                &theme.box_outline_color,
            );
        }
        surface.reset_clip();

        stats.cells_drawn = 1;
        stats
    }

    fn render_panes(&mut self, surface: &mut dyn DrawSurface, params: &RenderParams) -> u64 {
        let cells = self.render_body(surface, params);
        headers::render_column_headers(surface, &mut self.measure, params);
        headers::render_row_headers(surface, &mut self.measure, params);
        headers::render_corner(surface, params);
        tracing::trace!(cells, "rendered panes");
        cells
    }

    fn render_body(&mut self, surface: &mut dyn DrawSurface, params: &RenderParams) -> u64 {
        let body = &params.body;
        let range = body.range;
        let theme = params.theme;
        let geom = params.geom;

        body.clip(surface);
        surface.fill_rect(
            body.x,
            body.y,
            body.viewport.width,
            body.viewport.height,
            &theme.background,
        );
        if range.is_empty() {
            surface.reset_clip();
            return 0;
        }

        let x0 = geom.columns.offset_of(range.col_start).unwrap_or(0.0);
        let x1 = geom.columns.offset_of(range.col_end).unwrap_or(x0);
        let y0 = geom.rows.offset_of(range.row_start);
        let y1 = geom.rows.offset_of(range.row_end);

        // 1. backgrounds
        surface.fill_rect(
            body.screen_x(x0),
            body.screen_y(y0),
            x1 - x0,
            y1 - y0,
            &theme.cell_background,
        );

        // 2. column colour overrides
        for col in range.cols() {
            if let Some(color) = params.column_color(col) {
                let cx = geom.columns.offset_of(col).unwrap_or(0.0);
                let cw = geom.columns.width_of(col).unwrap_or(0.0);
                surface.fill_rect(body.screen_x(cx), body.screen_y(y0), cw, y1 - y0, color);
            }
        }

        // 3. grid lines
        draw_grid_lines(surface, params, x0, x1, y0, y1);

        // 4. text
        let mut cells = 0_u64;
        for col in range.cols() {
            for row in range.rows() {
                let Some(rect) = geom.cell_rect(row, col) else {
                    continue;
                };
                let sx = body.screen_x(rect.x);
                let sy = body.screen_y(rect.y);
                self.draw_cell_text(surface, params, row, col, sx, sy, &rect);
                cells += 1;
            }
        }

        // 5. selection
        let rects = selection_rects(params.selection, &range, geom);
        for rect in &rects {
            surface.fill_rect(
                body.screen_x(rect.x),
                body.screen_y(rect.y),
                rect.w,
                rect.h,
                &band_color(theme, rect.kind),
            );
        }
        for rect in rects.iter().filter(|r| r.kind == BandKind::Block) {
            let on_screen = SelectionRect {
                x: body.screen_x(rect.x),
                y: body.screen_y(rect.y),
                ..*rect
            };
            outline_edges(surface, theme, &on_screen);
        }

        // 6. current cell
        if let Some((row, col)) = params.cursor.filter(|&(r, c)| range.contains(r, c)) {
            if let Some(rect) = geom.cell_rect(row, col) {
                surface.stroke_rect(
                    body.screen_x(rect.x),
                    body.screen_y(rect.y),
                    rect.width,
                    rect.height,
                    theme.outline_width,
                    &theme.box_outline_color,
                );
            }
        }

        surface.reset_clip();
        cells
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_cell_text(
        &mut self,
        surface: &mut dyn DrawSurface,
        params: &RenderParams,
        row: u32,
        col: u32,
        sx: f64,
        sy: f64,
        rect: &CellRect,
    ) {
        let Some(column) = params.table.column(col) else {
            return;
        };
        let Some(value) = column.values().get(row as usize) else {
            return;
        };
        let text = format_cell(value, column.dtype(), params.precision);
        if text.is_empty() {
            return;
        }
        let theme = params.theme;
        let inset = theme.cell_inset;
        let fitted = self
            .measure
            .fit(surface, &theme.font, &text, rect.width - 2.0 * inset);
        if fitted.is_empty() {
            return;
        }
        let color = if params.field_mode(col) == FieldMode::Disabled {
            theme.disabled_text_color.clone()
        } else if let Some(bg) = params.column_color(col) {
            text_on(bg, &theme.text_color)
        } else {
            theme.text_color.clone()
        };
        let x = match theme.text_align {
            TextAlign::Left => sx + inset,
            TextAlign::Center => sx + rect.width / 2.0,
            TextAlign::Right => sx + rect.width - inset,
        };
        surface.text(
            x,
            sy + rect.height / 2.0,
            &fitted,
            &theme.font,
            &color,
            theme.text_align,
        );
    }
}

/// Band colour of a body cell, if the selection fills it.
fn band_kind(selection: &Selection, row: u32, col: u32) -> Option<BandKind> {
    match selection {
        Selection::Rows(rows) if rows.contains(&row) => Some(BandKind::Rows),
        Selection::Cols(cols) if cols.contains(&col) => Some(BandKind::Cols),
        Selection::Rect(block) if block.contains(row, col) => Some(BandKind::Block),
        _ => None,
    }
}

fn band_color(theme: &Theme, kind: BandKind) -> String {
    let base = match kind {
        BandKind::Rows => &theme.row_selected_color,
        BandKind::Cols => &theme.col_selected_color,
        BandKind::Block => &theme.multiple_selection_color,
    };
    overlay(base, SELECTION_ALPHA)
}

fn outline_edges(surface: &mut dyn DrawSurface, theme: &Theme, rect: &SelectionRect) {
    let (x, y, w, h) = (rect.x, rect.y, rect.w, rect.h);
    let width = theme.outline_width;
    let color = &theme.box_outline_color;
    if rect.draw_top {
        surface.line(x, y, x + w, y, width, color);
    }
    if rect.draw_bottom {
        surface.line(x, y + h, x + w, y + h, width, color);
    }
    if rect.draw_left {
        surface.line(x, y, x, y + h, width, color);
    }
    if rect.draw_right {
        surface.line(x + w, y, x + w, y + h, width, color);
    }
}

fn draw_grid_lines(
    surface: &mut dyn DrawSurface,
    params: &RenderParams,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
) {
    let body: &PaneView = &params.body;
    let theme = params.theme;
    let range = body.range;
    let (left, right) = (body.screen_x(x0), body.screen_x(x1));
    let (top, bottom) = (body.screen_y(y0), body.screen_y(y1));

    for row in range.row_start..=range.row_end {
        let y = body.screen_y(params.geom.rows.offset_of(row));
        surface.line(left, y, right, y, theme.line_width, &theme.grid_color);
    }
    for col in range.col_start..=range.col_end {
        if let Some(cx) = params.geom.columns.offset_of(col) {
            let x = body.screen_x(cx);
            surface.line(x, top, x, bottom, theme.line_width, &theme.grid_color);
        }
    }
}
