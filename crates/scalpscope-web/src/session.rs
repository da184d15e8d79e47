//! Topomap session bindings
//!
//! One [`TopomapSession`] per client. The host drives the controller
//! through typed setters and reads back JSON or rendered canvas pixels;
//! required ordering is enforced by the core state machine, and
//! out-of-order calls raise exceptions whose message names the missing
//! precondition.

use scalpscope_core::error::SessionError;
use scalpscope_core::montage::Montage;
use scalpscope_core::render::Colormap;
use scalpscope_core::session::{DrawParams, TopomapController};
use scalpscope_core::types::{FrameSize, SeriesMode};
use wasm_bindgen::prelude::*;

use crate::canvas::CanvasTarget;

/// Names accepted by `set_montage`, as a JSON array.
#[wasm_bindgen]
pub fn list_montages() -> String {
    serde_json::to_string(&Montage::builtin_names()).unwrap_or_else(|_| String::from("[]"))
}

/// Browser-facing topomap session: core controller plus the two output
/// canvases.
#[wasm_bindgen]
pub struct TopomapSession {
    controller: TopomapController,
    topomap_canvas: Option<CanvasTarget>,
    series_canvas: Option<CanvasTarget>,
}

#[wasm_bindgen]
impl TopomapSession {
    /// Create an uninitialized session.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            controller: TopomapController::new(),
            topomap_canvas: None,
            series_canvas: None,
        }
    }

    /// Select a standard montage by name (e.g. `"standard_1020"`).
    pub fn set_montage(&mut self, montage: &str) -> Result<(), JsValue> {
        self.controller.set_montage(montage).map_err(session_error)
    }

    /// Store channel names (a JSON array of strings) and the sampling
    /// frequency in Hz.
    pub fn set_channels(&mut self, channels: &str, sfreq: f64) -> Result<(), JsValue> {
        let names: Vec<String> = serde_json::from_str(channels)
            .map_err(|e| JsValue::from_str(&format!("channels: invalid JSON: {e}")))?;
        self.controller
            .set_channels(names, sfreq)
            .map_err(session_error)
    }

    /// Attach evoked data as a flattened channels x times buffer.
    pub fn set_data(
        &mut self,
        data: &[f64],
        n_channels: usize,
        n_times: usize,
    ) -> Result<(), JsValue> {
        self.controller
            .set_data(data.to_vec(), n_channels, n_times)
            .map_err(session_error)
    }

    /// Store the output canvases for the main topomap and the series.
    ///
    /// Accepts `HtmlCanvasElement` or `OffscreenCanvas` for either slot.
    pub fn set_canvas(
        &mut self,
        topomap_canvas: JsValue,
        series_canvas: JsValue,
    ) -> Result<(), JsValue> {
        self.topomap_canvas = Some(CanvasTarget::from_js(topomap_canvas)?);
        self.series_canvas = Some(CanvasTarget::from_js(series_canvas)?);
        Ok(())
    }

    /// Store output frame sizes in pixels.
    pub fn set_resolution(
        &mut self,
        topomap_width: u32,
        topomap_height: u32,
        series_width: u32,
        series_height: u32,
    ) {
        self.controller.set_resolution(
            FrameSize::new(topomap_width, topomap_height),
            FrameSize::new(series_width, series_height),
        );
    }

    /// Select the rendering colormap (`"coolwarm"`, `"viridis"`,
    /// `"plasma"`).
    pub fn set_colormap(&mut self, name: &str) -> Result<(), JsValue> {
        let colormap = Colormap::parse(name)
            .ok_or_else(|| JsValue::from_str(&format!("colormap: unknown name {name}")))?;
        self.controller.set_colormap(colormap);
        Ok(())
    }

    /// Channel names as a JSON array; `"[]"` before channel info is set.
    pub fn list_channels(&self) -> String {
        serde_json::to_string(self.controller.list_channels())
            .unwrap_or_else(|_| String::from("[]"))
    }

    /// Render the topomap at `cursor_time` into the topomap canvas and,
    /// for a non-zero `span_ms`, the averaged map (`mode == "avg"`) or the
    /// 3x3 propagation grid into the series canvas.
    ///
    /// `channel_indices` selects channels highlighted on the main map;
    /// `colorbar` toggles the colorbar and its labels.
    pub fn draw_canvas(
        &mut self,
        cursor_time: f64,
        span_ms: f64,
        mode: &str,
        channel_indices: &[u32],
        colorbar: bool,
    ) -> Result<(), JsValue> {
        let params = DrawParams {
            cursor_time,
            span_ms,
            mode: SeriesMode::parse(mode),
            mask: channel_indices.iter().map(|&i| i as usize).collect(),
            colorbar,
        };
        let output = self.controller.render(&params).map_err(session_error)?;

        let topomap_canvas = self
            .topomap_canvas
            .as_ref()
            .ok_or_else(|| JsValue::from_str("canvas: topomap canvas not set"))?;
        topomap_canvas.put_frame(&output.main)?;
        if let Some(layout) = output.colorbar {
            let x = f64::from(layout.x);
            let y = f64::from(layout.y);
            let height = f64::from(layout.height);
            topomap_canvas.fill_label(&format!("{:.0}", layout.vmax), x, y - 5.0)?;
            topomap_canvas.fill_label(&format!("{:.0}", layout.vmin), x, y + height + 12.0)?;
            topomap_canvas.fill_label("\u{b5}V", x + 2.0, y + height / 2.0)?;
        }

        if let Some(series) = &output.series {
            let series_canvas = self
                .series_canvas
                .as_ref()
                .ok_or_else(|| JsValue::from_str("canvas: series canvas not set"))?;
            series_canvas.put_frame(series)?;
        }
        Ok(())
    }
}

impl Default for TopomapSession {
    fn default() -> Self {
        Self::new()
    }
}

fn session_error(e: SessionError) -> JsValue {
    JsValue::from_str(&e.to_string())
}
