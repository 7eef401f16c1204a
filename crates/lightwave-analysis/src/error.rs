//! Error types for analysis construction.

use thiserror::Error;

/// Rejected analysis parameters.
///
/// Only construction can fail. Once built, every stage accepts any input and
/// degrades to zero intensity on numeric edge cases.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Window length is not a power of two or is too short to analyse.
    #[error("window size {0} must be a power of two and at least 2")]
    InvalidWindowSize(usize),

    /// Sample rate is zero, negative or not finite.
    #[error("sample rate {0} Hz must be positive and finite")]
    InvalidSampleRate(f32),

    /// The decibel floor is not below the ceiling.
    #[error("decibel range [{min_db}, {max_db}] is empty")]
    InvalidDecibelRange {
        /// Floor (maps to intensity 0).
        min_db: f32,
        /// Ceiling (maps to intensity 255).
        max_db: f32,
    },

    /// No bands were configured.
    #[error("at least one band is required")]
    NoBands,
}
