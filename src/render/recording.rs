//! Display-list surface for headless rendering.
//!
//! Every call is appended to an op list which tests and the CLI inspect.
//! Text is measured with a fixed advance per char.

use serde::Serialize;

use super::backend::DrawSurface;
use crate::types::TextAlign;

/// Default advance per character used by [`RecordingSurface::measure_text`].
pub const DEFAULT_CHAR_WIDTH: f64 = 7.0;

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Clear {
        color: String,
    },
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: String,
    },
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        line_width: f64,
        color: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        line_width: f64,
        color: String,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font: String,
        color: String,
        align: TextAlign,
    },
    Clip {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
    },
    ResetClip,
}

/// Surface that records draw calls instead of rasterising them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    char_width: f64,
    ops: Vec<DrawOp>,
    measure_calls: usize,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_char_width(width, height, DEFAULT_CHAR_WIDTH)
    }

    pub fn with_char_width(width: f64, height: f64, char_width: f64) -> Self {
        Self {
            width,
            height,
            char_width,
            ops: Vec::new(),
            measure_calls: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Take the recorded ops, leaving the list empty.
    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// All text strings drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Filled rectangles of the given colour.
    pub fn fills_with(&self, color: &str) -> Vec<&DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { color: c, .. } if c == color))
            .collect()
    }

    /// Number of `measure_text` calls that reached this surface.
    pub fn measure_calls(&self) -> usize {
        self.measure_calls
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self, color: &str) {
        self.ops.push(DrawOp::Clear {
            color: color.to_string(),
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, line_width: f64, color: &str) {
        self.ops.push(DrawOp::StrokeRect {
            x,
            y,
            w,
            h,
            line_width,
            color: color.to_string(),
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: &str) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            line_width,
            color: color.to_string(),
        });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, font: &str, color: &str, align: TextAlign) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            text: text.to_string(),
            font: font.to_string(),
            color: color.to_string(),
            align,
        });
    }

    fn measure_text(&mut self, text: &str, _font: &str) -> f64 {
        self.measure_calls += 1;
        text.chars().count() as f64 * self.char_width
    }

    fn clip_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::Clip { x, y, w, h });
    }

    fn reset_clip(&mut self) {
        self.ops.push(DrawOp::ResetClip);
    }
}
