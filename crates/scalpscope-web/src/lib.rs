//! ScalpScope Web - browser bindings for EEG analysis and topomap rendering
//!
//! WASM entry points for a JavaScript host: spectral analysis over
//! flattened channel buffers with JSON string results, and a per-session
//! topomap controller that rasterizes scalp maps into host-owned canvases.
//!
//! All analysis and rendering lives in `scalpscope-core`; this crate only
//! marshals parameters across the JS boundary, serializes results, and
//! hands pixel buffers to canvas 2D contexts.

mod canvas;
mod session;
mod spectral;

pub use session::{list_montages, TopomapSession};
pub use spectral::{psd_band_powers, psd_squared_fft, psd_welch};

use wasm_bindgen::prelude::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
