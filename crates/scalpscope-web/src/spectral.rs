//! Spectral analysis entry points
//!
//! Channel data crosses the boundary as one flattened channels-major
//! `Float64Array` plus its layout; results go back as JSON strings.

use scalpscope_core::error::SpectralError;
use scalpscope_core::spectral;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Welch result wire format: one shared frequency vector, one coefficient
/// sequence per channel.
#[derive(Serialize)]
struct WelchResult {
    fs: Vec<f64>,
    channels: Vec<Vec<f64>>,
}

/// Per-channel squared-FFT wire format.
#[derive(Serialize)]
struct FftResult {
    coeffs: Vec<f64>,
    frequencies: Vec<f64>,
}

/// Welch power spectral density of every channel.
///
/// `data` holds `num_channels * points_per_channel` samples, channel by
/// channel; `fs` is the shared sampling frequency in Hz. Returns a JSON
/// string `{"fs": [...], "channels": [[...], ...]}`.
#[wasm_bindgen]
pub fn psd_welch(
    data: &[f64],
    num_channels: usize,
    points_per_channel: usize,
    fs: f64,
) -> Result<String, JsValue> {
    let (freqs, channels) =
        spectral::welch_psd_channels(data, num_channels, points_per_channel, fs)
            .map_err(spectral_error)?;
    to_json(&WelchResult { fs: freqs, channels })
}

/// Squared FFT coefficients of every channel.
///
/// `sample_rates` carries one sampling frequency per channel; a positive
/// `win_len` truncates each channel to its first `fs * win_len` samples.
/// Returns a JSON array of `{"coeffs": [...], "frequencies": [...]}`.
#[wasm_bindgen]
pub fn psd_squared_fft(
    data: &[f64],
    num_channels: usize,
    points_per_channel: usize,
    sample_rates: &[f64],
    win_len: f64,
) -> Result<String, JsValue> {
    let spectra = spectral::squared_fft_channels(
        data,
        num_channels,
        points_per_channel,
        sample_rates,
        win_len,
    )
    .map_err(spectral_error)?;
    let results: Vec<FftResult> = spectra
        .into_iter()
        .map(|(frequencies, coeffs)| FftResult { coeffs, frequencies })
        .collect();
    to_json(&results)
}

/// Absolute EEG band powers of every channel, from the Welch PSD.
///
/// Returns a JSON array with one `{"delta": ..., "theta": ..., ...}`
/// object per channel.
#[wasm_bindgen]
pub fn psd_band_powers(
    data: &[f64],
    num_channels: usize,
    points_per_channel: usize,
    fs: f64,
) -> Result<String, JsValue> {
    let (freqs, channels) =
        spectral::welch_psd_channels(data, num_channels, points_per_channel, fs)
            .map_err(spectral_error)?;
    let powers: Vec<_> = channels
        .iter()
        .map(|psd| spectral::band_powers(&freqs, psd))
        .collect();
    to_json(&powers)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("serialize: {e}")))
}

fn spectral_error(e: SpectralError) -> JsValue {
    JsValue::from_str(&format!("spectral: {e}"))
}
