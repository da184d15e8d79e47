//! RGBA topomap rasterization
//!
//! Paints interpolated scalp maps into owned pixel buffers. Frames are
//! plain RGBA8 byte vectors so the embedding tier can hand them to any
//! canvas-like surface without holding a reference back into this crate.

pub mod colormap;
pub mod painter;

pub use colormap::Colormap;
pub use painter::{ColorbarLayout, Frame, Rect, TopomapPainter};
