//! Drawing surface trait for pluggable rendering targets.
//!
//! The grid renderer only ever talks to a [`DrawSurface`]; the Canvas 2D
//! surface (wasm32) and the recording surface (native, tests, CLI) can be
//! used interchangeably.

use super::colors::CssColor;
use crate::layout::{Geometry, Viewport, VisibleRange};
use crate::types::{FieldMode, Selection, Table, TextAlign, Theme};

/// Primitive drawing operations needed by the grid renderer.
///
/// Text is positioned by its anchor point: `x` is interpreted per `align`
/// and `y` is the vertical middle of the line.
pub trait DrawSurface {
    /// Surface width in CSS pixels
    fn width(&self) -> f64;

    /// Surface height in CSS pixels
    fn height(&self) -> f64;

    /// Resize the surface
    fn resize(&mut self, width: f64, height: f64);

    /// Fill the whole surface with `color`
    fn clear(&mut self, color: &str);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, line_width: f64, color: &str);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: &str);

    #[allow(clippy::too_many_arguments)]
    fn text(&mut self, x: f64, y: f64, text: &str, font: &str, color: &str, align: TextAlign);

    /// Advance width of `text` rendered in `font`
    fn measure_text(&mut self, text: &str, font: &str) -> f64;

    /// Restrict drawing to a rectangle until [`DrawSurface::reset_clip`]
    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn reset_clip(&mut self);
}

/// Snap a coordinate to the pixel centre so 1px lines stay crisp.
pub fn crisp(x: f64) -> f64 {
    x.floor() + 0.5
}

/// Where a pane sits on the surface and what part of the content it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneView {
    /// Left edge on the surface
    pub x: f64,
    /// Top edge on the surface
    pub y: f64,
    pub viewport: Viewport,
    pub range: VisibleRange,
}

impl PaneView {
    /// Content x to surface x
    pub fn screen_x(&self, content_x: f64) -> f64 {
        self.x + content_x - self.viewport.scroll_x
    }

    /// Content y to surface y
    pub fn screen_y(&self, content_y: f64) -> f64 {
        self.y + content_y - self.viewport.scroll_y
    }

    /// Whether a surface point falls inside the pane.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x + self.viewport.width
            && y < self.y + self.viewport.height
    }

    pub fn clip(&self, surface: &mut dyn DrawSurface) {
        surface.clip_rect(self.x, self.y, self.viewport.width, self.viewport.height);
    }
}

/// Everything a frame needs, borrowed from the grid view.
pub struct RenderParams<'a> {
    pub table: &'a Table,
    pub geom: &'a Geometry,
    pub theme: &'a Theme,
    pub precision: u8,
    pub selection: &'a Selection,
    /// Current cell (drawn with the topmost outline)
    pub cursor: Option<(u32, u32)>,
    /// Edit mode per column index
    pub field_modes: &'a [FieldMode],
    /// Background override per column index
    pub column_colors: &'a [Option<CssColor>],
    pub body: PaneView,
    pub col_header: PaneView,
    pub row_header: PaneView,
    pub corner: PaneView,
}

impl RenderParams<'_> {
    pub fn field_mode(&self, col: u32) -> FieldMode {
        self.field_modes
            .get(col as usize)
            .copied()
            .unwrap_or_default()
    }

    pub fn column_color(&self, col: u32) -> Option<&str> {
        self.column_colors
            .get(col as usize)
            .and_then(|c| c.as_deref())
    }
}
