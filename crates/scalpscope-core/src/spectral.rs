//! Spectral estimation over EEG channel data
//!
//! Welch's method, the periodogram, and squared FFT coefficients. The
//! transform itself is delegated to `rustfft`; this module only windows,
//! detrends, folds to one-sided spectra, and applies density scaling.
//!
//! All estimators return `(frequencies, coefficients)` pairs of equal
//! length, with frequency bins non-negative and strictly increasing.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::SpectralError;
use crate::types::{BandPowers, EegBand};

/// Welch segment length in seconds (Hamming window of `fs * 2` samples).
pub const WELCH_WINDOW_S: f64 = 2.0;

// ============================================================================
// Estimators
// ============================================================================

/// Welch power spectral density of one channel.
///
/// Segments the signal with a 2-second Hamming window at 50% overlap,
/// removes each segment's mean, and averages the one-sided density-scaled
/// periodograms. The window shrinks to the signal length when the signal is
/// shorter than 2 seconds.
///
/// # Errors
///
/// [`SpectralError::EmptySignal`] for an empty signal,
/// [`SpectralError::InvalidSamplingFrequency`] for a non-positive or
/// non-finite `fs`.
pub fn welch_psd(signal: &[f64], fs: f64) -> Result<(Vec<f64>, Vec<f64>), SpectralError> {
    check_fs(fs)?;
    if signal.is_empty() {
        return Err(SpectralError::EmptySignal);
    }

    let nperseg = ((fs * WELCH_WINDOW_S).round() as usize)
        .clamp(1, signal.len());
    let window = hamming_window(nperseg);
    Ok(windowed_density_psd(signal, fs, &window, nperseg / 2))
}

/// Periodogram power spectral density of one channel.
///
/// A single rectangular-window segment spanning the whole signal, mean
/// removed, density scaling.
///
/// # Errors
///
/// Same conditions as [`welch_psd`].
pub fn periodogram(signal: &[f64], fs: f64) -> Result<(Vec<f64>, Vec<f64>), SpectralError> {
    check_fs(fs)?;
    if signal.is_empty() {
        return Err(SpectralError::EmptySignal);
    }

    let window = vec![1.0; signal.len()];
    Ok(windowed_density_psd(signal, fs, &window, 0))
}

/// Magnitude-squared one-sided FFT coefficients of one channel.
///
/// When `win_len` is positive the signal is first truncated to its leading
/// `fs * win_len` samples. No window function and no detrending are applied;
/// the coefficients are raw `|X_k|^2`.
///
/// # Errors
///
/// Same conditions as [`welch_psd`]; truncation to zero samples is reported
/// as an empty signal.
pub fn squared_fft(
    signal: &[f64],
    fs: f64,
    win_len: f64,
) -> Result<(Vec<f64>, Vec<f64>), SpectralError> {
    check_fs(fs)?;

    let signal = if win_len > 0.0 {
        let take = ((fs * win_len) as usize).min(signal.len());
        &signal[..take]
    } else {
        signal
    };
    if signal.is_empty() {
        return Err(SpectralError::EmptySignal);
    }

    let n = signal.len();
    let mut buffer: Vec<Complex<f64>> =
        signal.iter().map(|&s| Complex::new(s, 0.0)).collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut scratch = vec![Complex::default(); fft.get_inplace_scratch_len()];
    fft.process_with_scratch(&mut buffer, &mut scratch);

    let n_freqs = n / 2 + 1;
    let coeffs = buffer[..n_freqs].iter().map(Complex::norm_sqr).collect();
    let freqs = bin_frequencies(n_freqs, fs, n);
    Ok((freqs, coeffs))
}

// ============================================================================
// Multi-Channel Drivers
// ============================================================================

/// Welch PSD of every channel in a flattened channels-major buffer.
///
/// Returns the shared frequency vector (all channels use the same sampling
/// frequency) and one coefficient vector per channel, in input order.
///
/// # Errors
///
/// [`SpectralError::ChannelLayout`] when `data` does not split into the
/// stated shape, plus the per-channel conditions of [`welch_psd`].
pub fn welch_psd_channels(
    data: &[f64],
    n_channels: usize,
    points_per_channel: usize,
    fs: f64,
) -> Result<(Vec<f64>, Vec<Vec<f64>>), SpectralError> {
    let mut freqs = Vec::new();
    let mut channels = Vec::with_capacity(n_channels);
    for signal in split_channels(data, n_channels, points_per_channel)? {
        let (f, psd) = welch_psd(signal, fs)?;
        freqs = f;
        channels.push(psd);
    }
    Ok((freqs, channels))
}

/// Squared FFT coefficients of every channel, with per-channel sampling
/// rates.
///
/// Each channel yields its own `(frequencies, coefficients)` pair since the
/// rates may differ.
///
/// # Errors
///
/// [`SpectralError::SampleRateCount`] when `sample_rates` does not carry one
/// rate per channel, plus the conditions of [`squared_fft`].
pub fn squared_fft_channels(
    data: &[f64],
    n_channels: usize,
    points_per_channel: usize,
    sample_rates: &[f64],
    win_len: f64,
) -> Result<Vec<(Vec<f64>, Vec<f64>)>, SpectralError> {
    if sample_rates.len() != n_channels {
        return Err(SpectralError::SampleRateCount {
            expected: n_channels,
            got: sample_rates.len(),
        });
    }

    split_channels(data, n_channels, points_per_channel)?
        .zip(sample_rates)
        .map(|(signal, &fs)| squared_fft(signal, fs, win_len))
        .collect()
}

// ============================================================================
// Band Powers
// ============================================================================

/// Power integrated over `[low_hz, high_hz)` from a density PSD.
#[must_use]
pub fn band_power(freqs: &[f64], psd: &[f64], low_hz: f64, high_hz: f64) -> f64 {
    let df = match freqs {
        [first, second, ..] => second - first,
        _ => return 0.0,
    };
    freqs
        .iter()
        .zip(psd)
        .filter(|(&f, _)| f >= low_hz && f < high_hz)
        .map(|(_, &p)| p * df)
        .sum()
}

/// Absolute power in every standard EEG band.
#[must_use]
pub fn band_powers(freqs: &[f64], psd: &[f64]) -> BandPowers {
    let power = |band: EegBand| {
        let (low, high) = band.range_hz();
        band_power(freqs, psd, low, high)
    };
    BandPowers {
        delta: power(EegBand::Delta),
        theta: power(EegBand::Theta),
        alpha: power(EegBand::Alpha),
        beta: power(EegBand::Beta),
        gamma: power(EegBand::Gamma),
    }
}

// ============================================================================
// Internals
// ============================================================================

fn check_fs(fs: f64) -> Result<(), SpectralError> {
    if fs.is_finite() && fs > 0.0 {
        Ok(())
    } else {
        Err(SpectralError::InvalidSamplingFrequency { fs })
    }
}

/// Symmetric Hamming window coefficients
fn hamming_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|i| 0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / denom).cos())
        .collect()
}

fn bin_frequencies(n_freqs: usize, fs: f64, n: usize) -> Vec<f64> {
    (0..n_freqs).map(|k| k as f64 * fs / n as f64).collect()
}

/// Segment-averaged one-sided density PSD over a windowed signal.
///
/// Shared core of [`welch_psd`] and [`periodogram`]: each segment has its
/// mean removed and the window applied before the transform; non-DC,
/// non-Nyquist bins are doubled to fold the two-sided spectrum.
fn windowed_density_psd(
    signal: &[f64],
    fs: f64,
    window: &[f64],
    noverlap: usize,
) -> (Vec<f64>, Vec<f64>) {
    let nperseg = window.len();
    let step = (nperseg - noverlap).max(1);
    let n_freqs = nperseg / 2 + 1;

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(nperseg);
    let mut scratch = vec![Complex::default(); fft.get_inplace_scratch_len()];
    let mut buffer = vec![Complex::default(); nperseg];
    let mut acc = vec![0.0; n_freqs];
    let mut n_segments = 0usize;

    let mut start = 0;
    while start + nperseg <= signal.len() {
        let segment = &signal[start..start + nperseg];
        let mean = segment.iter().sum::<f64>() / nperseg as f64;
        for (slot, (&s, &w)) in buffer.iter_mut().zip(segment.iter().zip(window)) {
            *slot = Complex::new((s - mean) * w, 0.0);
        }
        fft.process_with_scratch(&mut buffer, &mut scratch);
        for (slot, c) in acc.iter_mut().zip(&buffer[..n_freqs]) {
            *slot += c.norm_sqr();
        }
        n_segments += 1;
        start += step;
    }

    let win_sumsq: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (fs * win_sumsq * n_segments.max(1) as f64);
    let mut psd: Vec<f64> = acc.iter().map(|a| a * scale).collect();
    // Fold the negative frequencies in; DC has no mirror, nor does Nyquist
    // when the segment length is even.
    let fold_end = if nperseg % 2 == 0 { n_freqs - 1 } else { n_freqs };
    for p in &mut psd[1..fold_end] {
        *p *= 2.0;
    }

    (bin_frequencies(n_freqs, fs, nperseg), psd)
}

fn split_channels(
    data: &[f64],
    n_channels: usize,
    points_per_channel: usize,
) -> Result<impl Iterator<Item = &[f64]>, SpectralError> {
    if n_channels.checked_mul(points_per_channel) != Some(data.len()) {
        return Err(SpectralError::ChannelLayout {
            len: data.len(),
            n_channels,
            points: points_per_channel,
        });
    }
    if points_per_channel == 0 && n_channels > 0 {
        return Err(SpectralError::EmptySignal);
    }
    Ok(data.chunks_exact(points_per_channel.max(1)).take(n_channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq_hz * i as f64 / fs).sin())
            .collect()
    }

    fn peak_frequency(freqs: &[f64], psd: &[f64]) -> f64 {
        let (idx, _) = psd
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        freqs[idx]
    }

    #[test]
    fn test_welch_output_lengths_match() {
        let signal = sine(10.0, 128.0, 512);
        let (freqs, psd) = welch_psd(&signal, 128.0).unwrap();
        // 2 s window at 128 Hz -> 256-point segments -> 129 one-sided bins
        assert_eq!(freqs.len(), 129);
        assert_eq!(psd.len(), freqs.len());
    }

    #[test]
    fn test_welch_frequencies_increase() {
        let signal = sine(4.0, 100.0, 1000);
        let (freqs, _) = welch_psd(&signal, 100.0).unwrap();
        assert!(freqs[0] >= 0.0);
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_welch_peak_at_sine_frequency() {
        let signal = sine(10.0, 256.0, 2048);
        let (freqs, psd) = welch_psd(&signal, 256.0).unwrap();
        assert!((peak_frequency(&freqs, &psd) - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_welch_density_integrates_to_signal_power() {
        // A unit sine carries power 1/2; the density integral should land
        // close to it.
        let signal = sine(16.0, 256.0, 4096);
        let (freqs, psd) = welch_psd(&signal, 256.0).unwrap();
        let df = freqs[1] - freqs[0];
        let total: f64 = psd.iter().map(|p| p * df).sum();
        assert!((total - 0.5).abs() < 0.05, "total = {total}");
    }

    #[test]
    fn test_welch_short_signal_shrinks_window() {
        let signal = sine(5.0, 256.0, 100);
        let (freqs, psd) = welch_psd(&signal, 256.0).unwrap();
        assert_eq!(freqs.len(), 51);
        assert_eq!(psd.len(), 51);
    }

    #[test]
    fn test_welch_rejects_bad_input() {
        assert_eq!(welch_psd(&[], 256.0), Err(SpectralError::EmptySignal));
        assert!(matches!(
            welch_psd(&[1.0, 2.0], 0.0),
            Err(SpectralError::InvalidSamplingFrequency { .. })
        ));
        assert!(matches!(
            welch_psd(&[1.0, 2.0], f64::NAN),
            Err(SpectralError::InvalidSamplingFrequency { .. })
        ));
    }

    #[test]
    fn test_welch_zero_signal_is_zero() {
        let (_, psd) = welch_psd(&vec![0.0; 1024], 256.0).unwrap();
        assert!(psd.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_periodogram_spans_whole_signal() {
        let signal = sine(20.0, 200.0, 400);
        let (freqs, psd) = periodogram(&signal, 200.0).unwrap();
        assert_eq!(freqs.len(), 201);
        assert!((peak_frequency(&freqs, &psd) - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_squared_fft_lengths_and_bins() {
        let signal = sine(10.0, 256.0, 256);
        let (freqs, coeffs) = squared_fft(&signal, 256.0, 0.0).unwrap();
        assert_eq!(freqs.len(), 129);
        assert_eq!(coeffs.len(), freqs.len());
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[128] - 128.0).abs() < 1e-9);
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_squared_fft_truncates_to_window() {
        let signal = sine(10.0, 256.0, 512);
        // 0.5 s at 256 Hz keeps 128 samples -> 65 bins
        let (freqs, coeffs) = squared_fft(&signal, 256.0, 0.5).unwrap();
        assert_eq!(freqs.len(), 65);
        assert_eq!(coeffs.len(), 65);
    }

    #[test]
    fn test_squared_fft_coeffs_nonnegative() {
        let signal = sine(7.0, 128.0, 300);
        let (_, coeffs) = squared_fft(&signal, 128.0, 0.0).unwrap();
        assert!(coeffs.iter().all(|&c| c >= 0.0));
    }

    #[test]
    fn test_channel_driver_preserves_order_and_count() {
        let fs = 128.0;
        let mut data = sine(8.0, fs, 512);
        data.extend(sine(24.0, fs, 512));
        let (freqs, channels) = welch_psd_channels(&data, 2, 512, fs).unwrap();
        assert_eq!(channels.len(), 2);
        assert!((peak_frequency(&freqs, &channels[0]) - 8.0).abs() < 0.5);
        assert!((peak_frequency(&freqs, &channels[1]) - 24.0).abs() < 0.5);
    }

    #[test]
    fn test_channel_driver_rejects_bad_layout() {
        assert!(matches!(
            welch_psd_channels(&[0.0; 10], 3, 4, 100.0),
            Err(SpectralError::ChannelLayout { .. })
        ));
    }

    #[test]
    fn test_channel_driver_empty_input() {
        let (freqs, channels) = welch_psd_channels(&[], 0, 0, 100.0).unwrap();
        assert!(freqs.is_empty());
        assert!(channels.is_empty());
    }

    #[test]
    fn test_squared_fft_channels_per_channel_rates() {
        let mut data = sine(5.0, 100.0, 200);
        data.extend(sine(5.0, 200.0, 200));
        let spectra = squared_fft_channels(&data, 2, 200, &[100.0, 200.0], 0.0).unwrap();
        assert_eq!(spectra.len(), 2);
        // Same bin count, different frequency axes
        assert_eq!(spectra[0].0.len(), spectra[1].0.len());
        assert!((spectra[0].0[100] - 50.0).abs() < 1e-9);
        assert!((spectra[1].0[100] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_squared_fft_channels_rate_count_checked() {
        assert!(matches!(
            squared_fft_channels(&[0.0; 100], 2, 50, &[100.0], 0.0),
            Err(SpectralError::SampleRateCount { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_band_power_integration() {
        // Flat density of 1 over 0..100 Hz at 1 Hz resolution: alpha spans
        // [8, 13) -> five bins.
        let freqs: Vec<f64> = (0..=100).map(f64::from).collect();
        let psd = vec![1.0; freqs.len()];
        assert!((band_power(&freqs, &psd, 8.0, 13.0) - 5.0).abs() < 1e-9);

        let powers = band_powers(&freqs, &psd);
        assert!((powers.alpha - 5.0).abs() < 1e-9);
        assert!((powers.beta - 17.0).abs() < 1e-9);
    }
}
