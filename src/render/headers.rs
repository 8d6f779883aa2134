//! Header strip rendering.
//!
//! - Column header: column names, scrolled horizontally with the body
//! - Row header: 0-based row indices, scrolled vertically with the body
//! - Corner (index header): fixed; clicking it selects everything
//!
//! Headers of rows/columns touched by the selection are highlighted.

use super::backend::{DrawSurface, RenderParams};
use super::cache::MeasureCache;
use crate::types::TextAlign;

/// Render the column header strip.
pub fn render_column_headers(
    surface: &mut dyn DrawSurface,
    measure: &mut MeasureCache,
    params: &RenderParams,
) {
    let pane = &params.col_header;
    let theme = params.theme;
    if pane.viewport.width <= 0.0 || pane.viewport.height <= 0.0 {
        return;
    }
    let height = pane.viewport.height;

    pane.clip(surface);
    surface.fill_rect(pane.x, pane.y, pane.viewport.width, height, &theme.header_background);

    for col in pane.range.cols() {
        let (Some(cx), Some(width), Some(column)) = (
            params.geom.columns.offset_of(col),
            params.geom.columns.width_of(col),
            params.table.column(col),
        ) else {
            continue;
        };
        let x = pane.screen_x(cx);
        let selected = params.selection.touches_col(col);
        if selected {
            surface.fill_rect(x, pane.y, width, height, &theme.header_selected_background);
        }
        let color = if selected {
            &theme.header_selected_text_color
        } else {
            &theme.header_text_color
        };
        let label = measure.fit(
            surface,
            &theme.header_font,
            column.name(),
            width - 2.0 * theme.cell_inset,
        );
        if !label.is_empty() {
            surface.text(
                x + width / 2.0,
                pane.y + height / 2.0,
                &label,
                &theme.header_font,
                color,
                TextAlign::Center,
            );
        }
        // right-edge divider doubles as the resize handle
        surface.line(
            x + width,
            pane.y,
            x + width,
            pane.y + height,
            theme.line_width,
            &theme.header_border_color,
        );
    }
    surface.line(
        pane.x,
        pane.y + height,
        pane.x + pane.viewport.width,
        pane.y + height,
        theme.line_width,
        &theme.header_border_color,
    );
    surface.reset_clip();
}

/// Render the row header strip.
pub fn render_row_headers(
    surface: &mut dyn DrawSurface,
    measure: &mut MeasureCache,
    params: &RenderParams,
) {
    let pane = &params.row_header;
    let theme = params.theme;
    if pane.viewport.width <= 0.0 || pane.viewport.height <= 0.0 {
        return;
    }
    let width = pane.viewport.width;
    let row_height = params.geom.rows.row_height();

    pane.clip(surface);
    surface.fill_rect(pane.x, pane.y, width, pane.viewport.height, &theme.header_background);

    for row in pane.range.rows() {
        let y = pane.screen_y(params.geom.rows.offset_of(row));
        let selected = params.selection.touches_row(row);
        if selected {
            surface.fill_rect(pane.x, y, width, row_height, &theme.header_selected_background);
        }
        let color = if selected {
            &theme.header_selected_text_color
        } else {
            &theme.header_text_color
        };
        let label = row.to_string();
        let label = measure.fit(surface, &theme.header_font, &label, width - 2.0 * theme.cell_inset);
        if !label.is_empty() {
            surface.text(
                pane.x + width / 2.0,
                y + row_height / 2.0,
                &label,
                &theme.header_font,
                color,
                TextAlign::Center,
            );
        }
        surface.line(
            pane.x,
            y + row_height,
            pane.x + width,
            y + row_height,
            theme.line_width,
            &theme.header_border_color,
        );
    }
    surface.line(
        pane.x + width,
        pane.y,
        pane.x + width,
        pane.y + pane.viewport.height,
        theme.line_width,
        &theme.header_border_color,
    );
    surface.reset_clip();
}

/// Render the corner above the row header.
pub fn render_corner(surface: &mut dyn DrawSurface, params: &RenderParams) {
    let pane = &params.corner;
    let theme = params.theme;
    if pane.viewport.width <= 0.0 || pane.viewport.height <= 0.0 {
        return;
    }
    surface.fill_rect(
        pane.x,
        pane.y,
        pane.viewport.width,
        pane.viewport.height,
        &theme.header_background,
    );
    surface.stroke_rect(
        pane.x,
        pane.y,
        pane.viewport.width,
        pane.viewport.height,
        theme.line_width,
        &theme.header_border_color,
    );
}
