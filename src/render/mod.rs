//! Rendering engine with pluggable drawing surfaces.
//!
//! This module provides:
//! - The `DrawSurface` trait and the per-frame `RenderParams`
//! - Canvas 2D surface (wasm32) and a recording surface (native)
//! - Body, header and selection drawing for the visible range only
//! - Cell value formatting and colour helpers

pub mod backend;
pub mod cache;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod colors;
pub mod format;
pub mod grid;
pub mod headers;
pub mod recording;
pub mod selection;

pub use backend::{DrawSurface, PaneView, RenderParams};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use colors::{parse_color, CssColor, Rgb};
pub use format::{format_cell, format_float};
pub use grid::{GridRenderer, RenderKind, RenderStats};
pub use recording::{DrawOp, RecordingSurface};
