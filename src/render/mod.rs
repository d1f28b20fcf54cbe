//! Windowed body rendering.
//!
//! This module provides:
//! - The windowed renderer producing visible and span-overlay rows
//! - The imperative scroll handle shared with the table and the wasm viewer

mod window;

pub use window::{
    ExtraSpanRow, PaintItem, RenderOutput, RenderedRow, ScrollHandle, WindowedRenderer,
};
