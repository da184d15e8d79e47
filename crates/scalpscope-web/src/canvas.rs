//! Canvas hand-off
//!
//! Wraps the two canvas flavors a host may supply and copies rendered
//! frames into them. Pixel data is handed over by value through an
//! `ImageData`; no reference into the frame survives the call.

use scalpscope_core::render::Frame;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, ImageData, OffscreenCanvas,
    OffscreenCanvasRenderingContext2d,
};

const LABEL_FONT: &str = "10px monospace";
const LABEL_COLOR: &str = "#212121";

/// A host-owned drawing surface.
pub(crate) enum CanvasTarget {
    /// An on-DOM `<canvas>` element
    Html(HtmlCanvasElement),
    /// An `OffscreenCanvas`, e.g. from a worker
    Offscreen(OffscreenCanvas),
}

enum Context2d {
    Html(CanvasRenderingContext2d),
    Offscreen(OffscreenCanvasRenderingContext2d),
}

impl CanvasTarget {
    /// Accept either canvas flavor from an untyped host value.
    ///
    /// Anything else is logged to the console and reported as an error.
    pub fn from_js(value: JsValue) -> Result<Self, JsValue> {
        let value = match value.dyn_into::<HtmlCanvasElement>() {
            Ok(canvas) => return Ok(Self::Html(canvas)),
            Err(other) => other,
        };
        match value.dyn_into::<OffscreenCanvas>() {
            Ok(canvas) => Ok(Self::Offscreen(canvas)),
            Err(other) => {
                web_sys::console::error_2(
                    &JsValue::from_str("canvas: unsupported target"),
                    &other,
                );
                Err(JsValue::from_str(
                    "canvas: expected HtmlCanvasElement or OffscreenCanvas",
                ))
            }
        }
    }

    /// Copy a rendered frame into the canvas at the origin.
    pub fn put_frame(&self, frame: &Frame) -> Result<(), JsValue> {
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(frame.pixels()),
            frame.width(),
            frame.height(),
        )?;
        match self.context()? {
            Context2d::Html(ctx) => ctx.put_image_data(&image, 0.0, 0.0),
            Context2d::Offscreen(ctx) => ctx.put_image_data(&image, 0.0, 0.0),
        }
    }

    /// Draw one text label over the current canvas content.
    pub fn fill_label(&self, text: &str, x: f64, y: f64) -> Result<(), JsValue> {
        match self.context()? {
            Context2d::Html(ctx) => {
                ctx.set_fill_style_str(LABEL_COLOR);
                ctx.set_font(LABEL_FONT);
                ctx.fill_text(text, x, y)
            }
            Context2d::Offscreen(ctx) => {
                ctx.set_fill_style_str(LABEL_COLOR);
                ctx.set_font(LABEL_FONT);
                ctx.fill_text(text, x, y)
            }
        }
    }

    fn context(&self) -> Result<Context2d, JsValue> {
        match self {
            Self::Html(canvas) => {
                let ctx = canvas
                    .get_context("2d")?
                    .ok_or_else(|| JsValue::from_str("canvas: no 2d context"))?
                    .dyn_into::<CanvasRenderingContext2d>()?;
                Ok(Context2d::Html(ctx))
            }
            Self::Offscreen(canvas) => {
                let ctx = canvas
                    .get_context("2d")?
                    .ok_or_else(|| JsValue::from_str("canvas: no 2d context"))?
                    .dyn_into::<OffscreenCanvasRenderingContext2d>()?;
                Ok(Context2d::Offscreen(ctx))
            }
        }
    }
}
