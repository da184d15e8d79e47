//! ScalpScope Core - EEG spectral estimation and scalp topomap rendering
//!
//! This crate provides the analysis and rendering engine behind the ScalpScope
//! browser tools. It is pure Rust with no browser types, so everything here is
//! testable natively; the `scalpscope-web` crate wraps it for WebAssembly
//! hosts.
//!
//! # Modules
//!
//! - [`types`]: Channel info, frame sizes, EEG bands, band powers
//! - [`error`]: Error types for spectral, montage, and session tiers
//! - [`spectral`]: Welch PSD, periodogram, and squared-FFT estimators
//! - [`montage`]: Standard 10-20/10-10 electrode layouts and 2-D projection
//! - [`evoked`]: Time-locked multi-channel data container
//! - [`render`]: RGBA topomap rasterization (single, averaged, series grid)
//! - [`session`]: Per-client topomap session state machine
//!
//! # Example
//!
//! ```rust
//! use scalpscope_core::session::{DrawParams, TopomapController};
//! use scalpscope_core::types::SeriesMode;
//!
//! let mut session = TopomapController::new();
//! session.set_montage("standard_1020").unwrap();
//! session
//!     .set_channels(vec!["Fp1".into(), "Cz".into(), "O2".into()], 256.0)
//!     .unwrap();
//! session.set_data(vec![0.0; 3 * 256], 3, 256).unwrap();
//!
//! let params = DrawParams {
//!     cursor_time: 0.5,
//!     span_ms: 0.0,
//!     mode: SeriesMode::Average,
//!     mask: vec![],
//!     colorbar: false,
//! };
//! let output = session.render(&params).unwrap();
//! assert!(output.series.is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod error;
pub mod evoked;
pub mod montage;
pub mod render;
pub mod session;
pub mod spectral;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{MontageError, Precondition, SessionError, SpectralError};
pub use evoked::Evoked;
pub use montage::Montage;
pub use render::{Colormap, Frame};
pub use session::{DrawParams, RenderOutput, TopomapController};
pub use types::{BandPowers, ChannelInfo, ChannelKind, EegBand, FrameSize, SeriesMode};
