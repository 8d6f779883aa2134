//! Canvas 2D drawing surface.
//!
//! Implements [`DrawSurface`] on top of the HTML Canvas 2D API via web-sys.
//! All coordinates are logical (CSS) pixels; the context is scaled by the
//! device pixel ratio on resize.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::backend::{crisp, DrawSurface};
use crate::error::Result;
use crate::types::TextAlign;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
    dpr: f64,
    clipped: bool,
}

impl CanvasSurface {
    /// Create a surface from an HtmlCanvasElement
    pub fn new(canvas: HtmlCanvasElement, dpr: f64) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        let dpr = if dpr > 0.0 { dpr } else { 1.0 };
        let width = f64::from(canvas.width()) / dpr;
        let height = f64::from(canvas.height()) / dpr;
        ctx.set_text_baseline("middle");

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr,
            clipped: false,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);

        // Buffer size in physical pixels; values are non-negative and small
        self.canvas.set_width((self.width * self.dpr).round() as u32);
        self.canvas.set_height((self.height * self.dpr).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", self.width));
        let _ = style.set_property("height", &format!("{}px", self.height));

        // Resizing resets the context state
        let _ = self.ctx.scale(self.dpr, self.dpr);
        self.ctx.set_text_baseline("middle");
        self.clipped = false;
    }

    fn clear(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, line_width: f64, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(crisp(x), crisp(y), w, h);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: &str) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.move_to(crisp(x1), crisp(y1));
        self.ctx.line_to(crisp(x2), crisp(y2));
        self.ctx.stroke();
    }

    fn text(&mut self, x: f64, y: f64, text: &str, font: &str, color: &str, align: TextAlign) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        let _ = self.ctx.fill_text(text, x, y);
    }

    fn measure_text(&mut self, text: &str, font: &str) -> f64 {
        self.ctx.set_font(font);
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0)
    }

    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if self.clipped {
            self.ctx.restore();
        }
        self.ctx.save();
        self.ctx.begin_path();
        self.ctx.rect(x, y, w, h);
        self.ctx.clip();
        self.clipped = true;
    }

    fn reset_clip(&mut self) {
        if self.clipped {
            self.ctx.restore();
            self.clipped = false;
        }
    }
}
