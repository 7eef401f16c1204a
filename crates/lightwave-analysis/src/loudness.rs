//! Peak magnitude to 8-bit intensity through a clamped decibel scale.

use crate::{AnalysisError, Result};

/// Offset added before the logarithm so a silent band maps to a finite level.
pub const EPSILON: f32 = 1e-6;

/// Maps band peaks onto `0..=255` through a decibel window.
///
/// The peak is converted with `20 * log10(peak + EPSILON)`, clamped into
/// `[min_db, max_db]` and scaled linearly so `min_db` lands on 0 and `max_db`
/// on 255. The fractional part is truncated.
///
/// ```rust
/// use lightwave_analysis::LoudnessNormalizer;
///
/// let loudness = LoudnessNormalizer::default(); // -50 dB .. 0 dB
/// assert_eq!(loudness.intensity(0.0), 0);
/// assert_eq!(loudness.intensity(0.5), 224); // about -6 dB
/// assert_eq!(loudness.intensity(1.0), 255);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoudnessNormalizer {
    min_db: f32,
    max_db: f32,
}

impl Default for LoudnessNormalizer {
    fn default() -> Self {
        Self {
            min_db: -50.0,
            max_db: 0.0,
        }
    }
}

impl LoudnessNormalizer {
    /// Create a normalizer for the window `[min_db, max_db]`.
    pub fn new(min_db: f32, max_db: f32) -> Result<Self> {
        if !(min_db.is_finite() && max_db.is_finite()) || min_db >= max_db {
            return Err(AnalysisError::InvalidDecibelRange { min_db, max_db });
        }
        Ok(Self { min_db, max_db })
    }

    /// Floor of the window (intensity 0).
    pub fn min_db(&self) -> f32 {
        self.min_db
    }

    /// Ceiling of the window (intensity 255).
    pub fn max_db(&self) -> f32 {
        self.max_db
    }

    /// Convert a linear magnitude to decibels.
    #[inline]
    pub fn to_db(peak: f32) -> f32 {
        20.0 * (peak + EPSILON).log10()
    }

    /// Intensity for a band peak.
    #[inline]
    pub fn intensity(&self, peak: f32) -> u8 {
        let db = Self::to_db(peak).clamp(self.min_db, self.max_db);
        let scaled = (db - self.min_db) / (self.max_db - self.min_db) * 255.0;
        // Float-to-int `as` saturates and sends NaN to 0.
        scaled as u8
    }

    /// Intensity for a band peak after a linear sensitivity gain.
    #[inline]
    pub fn intensity_with_gain(&self, peak: f32, sensitivity: f32) -> u8 {
        self.intensity(peak * sensitivity)
    }
}
