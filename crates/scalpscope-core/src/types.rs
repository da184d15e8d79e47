//! Core types shared across the spectral and topomap tiers
//!
//! This module provides:
//! - Channel metadata ([`ChannelInfo`], [`ChannelKind`])
//! - Output frame dimensions ([`FrameSize`])
//! - Propagation series modes ([`SeriesMode`])
//! - Standard EEG frequency bands ([`EegBand`]) and band powers

use serde::{Deserialize, Serialize};

// ============================================================================
// Channel Metadata
// ============================================================================

/// Kind of biosignal a channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    /// Electroencephalography (scalp potential)
    Eeg,
    /// Electrooculography (eye movement)
    Eog,
    /// Electromyography (muscle activity)
    Emg,
    /// Anything else (not positioned on the scalp)
    Misc,
}

impl ChannelKind {
    /// Lowercase kind name as used in host-facing metadata
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eeg => "eeg",
            Self::Eog => "eog",
            Self::Emg => "emg",
            Self::Misc => "misc",
        }
    }
}

/// Channel names plus sampling frequency for one recording.
///
/// All channels share the sampling frequency and kind; per-channel rates only
/// occur on the squared-FFT path, which carries them separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel names in recording order
    pub ch_names: Vec<String>,
    /// Sampling frequency in Hz
    pub sfreq: f64,
    /// Signal kind of every channel
    pub kind: ChannelKind,
}

impl ChannelInfo {
    /// Create channel info for EEG channels.
    #[must_use]
    pub fn eeg(ch_names: Vec<String>, sfreq: f64) -> Self {
        Self {
            ch_names,
            sfreq,
            kind: ChannelKind::Eeg,
        }
    }

    /// Number of channels
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.ch_names.len()
    }
}

// ============================================================================
// Rendering Parameters
// ============================================================================

/// Output frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl FrameSize {
    /// Create a frame size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count
    #[must_use]
    pub const fn pixels(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for FrameSize {
    // 640x480 keeps the frame sizes untouched hosts saw from the default
    // 6.4" x 4.8" figure at 100 px/inch.
    fn default() -> Self {
        Self::new(640, 480)
    }
}

/// How the propagation series frame is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesMode {
    /// One topomap averaged over the span window
    Average,
    /// 3x3 grid of topomaps at successive offsets across the span
    #[default]
    Propagation,
}

impl SeriesMode {
    /// Parse a host-supplied mode string.
    ///
    /// `"avg"` selects [`SeriesMode::Average`]; anything else falls through
    /// to the propagation grid, matching the permissive host contract.
    #[must_use]
    pub fn parse(mode: &str) -> Self {
        if mode.eq_ignore_ascii_case("avg") {
            Self::Average
        } else {
            Self::Propagation
        }
    }
}

// ============================================================================
// EEG Bands
// ============================================================================

/// Standard EEG frequency bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EegBand {
    /// Delta: 0.5-4 Hz (deep sleep)
    Delta,
    /// Theta: 4-8 Hz (drowsiness, memory)
    Theta,
    /// Alpha: 8-13 Hz (relaxed, eyes closed)
    Alpha,
    /// Beta: 13-30 Hz (active thinking)
    Beta,
    /// Gamma: 30-100 Hz (cognitive processing)
    Gamma,
}

impl EegBand {
    /// All bands in ascending frequency order
    pub const ALL: [Self; 5] = [Self::Delta, Self::Theta, Self::Alpha, Self::Beta, Self::Gamma];

    /// Frequency range for this band (low, high) in Hz
    #[inline]
    #[must_use]
    pub const fn range_hz(self) -> (f64, f64) {
        match self {
            Self::Delta => (0.5, 4.0),
            Self::Theta => (4.0, 8.0),
            Self::Alpha => (8.0, 13.0),
            Self::Beta => (13.0, 30.0),
            Self::Gamma => (30.0, 100.0),
        }
    }

    /// Band name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Delta => "delta",
            Self::Theta => "theta",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Gamma => "gamma",
        }
    }
}

/// Absolute power per standard EEG band, integrated from a density PSD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BandPowers {
    /// Delta band power
    pub delta: f64,
    /// Theta band power
    pub theta: f64,
    /// Alpha band power
    pub alpha: f64,
    /// Beta band power
    pub beta: f64,
    /// Gamma band power
    pub gamma: f64,
}

impl BandPowers {
    /// Total power across all bands
    #[must_use]
    pub fn total(&self) -> f64 {
        self.delta + self.theta + self.alpha + self.beta + self.gamma
    }

    /// Powers normalized to the total (all zero when total power is zero)
    #[must_use]
    pub fn relative(&self) -> Self {
        let total = self.total();
        if total > 0.0 {
            Self {
                delta: self.delta / total,
                theta: self.theta / total,
                alpha: self.alpha / total,
                beta: self.beta / total,
                gamma: self.gamma / total,
            }
        } else {
            Self::default()
        }
    }
}
