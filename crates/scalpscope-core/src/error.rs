//! Error types for the spectral, montage, and session tiers
//!
//! Session failures are split into two kinds: a missing precondition (the
//! host called operations out of order) and internal failures (bad
//! dimensions, unresolvable channels). Hosts can branch on the kind instead
//! of guessing which of several requirements was unmet.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which required session field was missing when an operation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precondition {
    /// `set_montage` has not been called yet
    MontageNotSet,
    /// `set_channels` has not been called yet
    ChannelsNotSet,
    /// `set_data` has not been called yet
    DataNotSet,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MontageNotSet => write!(f, "montage not set"),
            Self::ChannelsNotSet => write!(f, "channel info not set"),
            Self::DataNotSet => write!(f, "evoked data not set"),
        }
    }
}

/// Errors from the spectral estimators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    /// Input signal contains no samples
    #[error("empty signal")]
    EmptySignal,
    /// Sampling frequency must be positive and finite
    #[error("invalid sampling frequency: {fs} Hz")]
    InvalidSamplingFrequency {
        /// The rejected frequency
        fs: f64,
    },
    /// Flattened buffer does not split into the stated channel layout
    #[error("{len} samples do not split into {n_channels} channels of {points} points")]
    ChannelLayout {
        /// Total samples supplied
        len: usize,
        /// Stated channel count
        n_channels: usize,
        /// Stated points per channel
        points: usize,
    },
    /// One sampling rate per channel is required
    #[error("expected {expected} per-channel sampling rates, got {got}")]
    SampleRateCount {
        /// Number of channels
        expected: usize,
        /// Number of rates supplied
        got: usize,
    },
}

/// Errors from montage construction and channel resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MontageError {
    /// Not one of the built-in standard montages
    #[error("unknown montage: {0}")]
    UnknownMontage(String),
    /// Channel name has no position in the active montage
    #[error("channel {name} is not in montage {montage}")]
    UnknownChannel {
        /// The unresolvable channel name
        name: String,
        /// The active montage name
        montage: String,
    },
}

/// Errors from the topomap session controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// An operation ran before its required state was established
    #[error("precondition: {0}")]
    Precondition(Precondition),
    /// Montage construction or channel resolution failed
    #[error("montage: {0}")]
    Montage(#[from] MontageError),
    /// Sampling frequency must be positive and finite
    #[error("invalid sampling rate: {sfreq} Hz")]
    InvalidSamplingRate {
        /// The rejected rate
        sfreq: f64,
    },
    /// The channel name list was empty
    #[error("no channels given")]
    NoChannels,
    /// Data row count does not match the stored channel info
    #[error("data has {n_channels} channels, channel info has {expected}")]
    ChannelCountMismatch {
        /// Channels in the stored info
        expected: usize,
        /// Channels in the supplied data
        n_channels: usize,
    },
    /// Flattened data length does not match the stated shape
    #[error("{len} samples do not fill {n_channels} x {n_times}")]
    DataLength {
        /// Total samples supplied
        len: usize,
        /// Stated channel count
        n_channels: usize,
        /// Stated samples per channel
        n_times: usize,
    },
    /// Data must contain at least one sample per channel
    #[error("empty data")]
    EmptyData,
}

impl SessionError {
    /// True when the failure is a missing precondition rather than an
    /// internal error.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}
