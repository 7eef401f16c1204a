//! Lightwave Analysis - audio in, per-band light intensities out
//!
//! This crate is the host-side signal path. Each stage is usable on its own,
//! and [`Analyzer`] strings them together:
//!
//! - [`window`] - [`WindowAccumulator`] collects samples into fixed windows
//! - [`fft`] - [`SpectralTransform`] applies a Hann window and a real FFT
//! - [`band`] - [`Band`] ranges and the peak-per-band [`BandMapper`]
//! - [`loudness`] - [`LoudnessNormalizer`] maps peaks to 0-255 through decibels
//! - [`analyzer`] - [`Analyzer`], one intensity vector per completed window
//! - [`signal`] - deterministic test signals
//!
//! Nothing in the per-window path allocates: buffers are sized once at
//! construction, so the analyzer can run directly inside an audio callback.
//!
//! ## Example
//!
//! ```rust
//! use lightwave_analysis::{Analyzer, AnalyzerSettings, Band, signal};
//!
//! let settings = AnalyzerSettings::default();
//! let bands = vec![Band::new(0.0, 400.0), Band::new(400.0, 4000.0)];
//! let mut analyzer = Analyzer::new(settings, bands)?;
//!
//! let tone = signal::sine(1000.0, settings.sample_rate, settings.window_size, 0.5);
//! let mut frames = Vec::new();
//! analyzer.push(&tone, |intensities| frames.push(intensities.to_vec()));
//!
//! assert_eq!(frames.len(), 1);
//! assert!(frames[0][1] > frames[0][0]);
//! # Ok::<(), lightwave_analysis::AnalysisError>(())
//! ```

pub mod analyzer;
pub mod band;
pub mod fft;
pub mod loudness;
pub mod signal;
pub mod window;

mod error;

pub use analyzer::{Analyzer, AnalyzerSettings};
pub use band::{Band, BandMapper, DEFAULT_BANDS};
pub use error::AnalysisError;
pub use fft::{SpectralTransform, Window};
pub use loudness::{EPSILON, LoudnessNormalizer};
pub use window::WindowAccumulator;

/// Convenience result type for analysis construction.
pub type Result<T> = std::result::Result<T, AnalysisError>;
