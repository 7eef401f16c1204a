//! Rig validation.
//!
//! Every rule is checked and all failures are reported together, so a user
//! editing a rig file sees the whole list at once.
//!
//! ```rust
//! use lightwave_config::{RigConfig, ValidationError, validate_rig};
//!
//! let mut rig = RigConfig::default();
//! assert!(validate_rig(&rig).is_ok());
//!
//! rig.analysis.window_size = 1000;
//! assert_eq!(validate_rig(&rig), Err(ValidationError::WindowSize(1000)));
//! ```

use lightwave_protocol::BAND_COUNT;
use thiserror::Error;

use crate::rig::RigConfig;

/// Smallest analysis window accepted.
pub const MIN_WINDOW_SIZE: usize = 64;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Window is not a power of two or is too short.
    #[error("window size {0} must be a power of two of at least 64")]
    WindowSize(usize),

    /// Requested sample rate is zero.
    #[error("sample rate must be positive")]
    SampleRate,

    /// Decibel floor is not below the ceiling.
    #[error("min_db {min_db} must be below max_db {max_db}")]
    DecibelRange {
        /// Configured floor.
        min_db: f32,
        /// Configured ceiling.
        max_db: f32,
    },

    /// Band edges are negative, inverted or not finite.
    #[error("band {index}: range [{min_hz}, {max_hz}) Hz is empty or negative")]
    BandRange {
        /// Band position (0-based).
        index: usize,
        /// Configured lower edge.
        min_hz: f32,
        /// Configured upper edge.
        max_hz: f32,
    },

    /// Band gain is not a positive finite number.
    #[error("band {index}: sensitivity {value} must be positive")]
    Sensitivity {
        /// Band position (0-based).
        index: usize,
        /// Configured gain.
        value: f32,
    },

    /// The controller firmware is built for a fixed band count.
    #[error("{found} bands configured but the controller expects {expected}")]
    BandCount {
        /// Band count compiled into the protocol.
        expected: usize,
        /// Bands in the file.
        found: usize,
    },

    /// Each band needs exactly one output pin.
    #[error("{pins} pins configured for {bands} bands")]
    PinCount {
        /// Bands in the file.
        bands: usize,
        /// Pins in the file.
        pins: usize,
    },

    /// Fade interval is zero.
    #[error("fade interval must be positive")]
    FadeInterval,

    /// Baud rate is zero.
    #[error("baud rate must be positive")]
    BaudRate,

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check every rule against `rig`.
pub fn validate_rig(rig: &RigConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    let window = rig.analysis.window_size;
    if window < MIN_WINDOW_SIZE || !window.is_power_of_two() {
        errors.push(ValidationError::WindowSize(window));
    }
    if rig.audio.sample_rate == Some(0) {
        errors.push(ValidationError::SampleRate);
    }

    let (min_db, max_db) = (rig.analysis.min_db, rig.analysis.max_db);
    if !(min_db.is_finite() && max_db.is_finite()) || min_db >= max_db {
        errors.push(ValidationError::DecibelRange { min_db, max_db });
    }

    for (index, band) in rig.bands.iter().enumerate() {
        let finite = band.min_hz.is_finite() && band.max_hz.is_finite();
        if !finite || band.min_hz < 0.0 || band.min_hz >= band.max_hz {
            errors.push(ValidationError::BandRange {
                index,
                min_hz: band.min_hz,
                max_hz: band.max_hz,
            });
        }
        if !(band.sensitivity.is_finite() && band.sensitivity > 0.0) {
            errors.push(ValidationError::Sensitivity {
                index,
                value: band.sensitivity,
            });
        }
    }

    if rig.bands.len() != BAND_COUNT {
        errors.push(ValidationError::BandCount {
            expected: BAND_COUNT,
            found: rig.bands.len(),
        });
    }
    if rig.controller.pins.len() != rig.bands.len() {
        errors.push(ValidationError::PinCount {
            bands: rig.bands.len(),
            pins: rig.controller.pins.len(),
        });
    }
    if rig.controller.fade_interval_ms == 0 {
        errors.push(ValidationError::FadeInterval);
    }
    if rig.serial.baud_rate == 0 {
        errors.push(ValidationError::BaudRate);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BandConfig;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_rig(&RigConfig::default()), Ok(()));
    }

    #[test]
    fn window_must_be_power_of_two_and_large_enough() {
        for (size, ok) in [(32, false), (64, true), (100, false), (4096, true), (0, false)] {
            let mut rig = RigConfig::default();
            rig.analysis.window_size = size;
            assert_eq!(validate_rig(&rig).is_ok(), ok, "window {size}");
        }
    }

    #[test]
    fn inverted_band_and_bad_gain() {
        let mut rig = RigConfig::default();
        rig.bands[1] = BandConfig {
            min_hz: 400.0,
            max_hz: 150.0,
            sensitivity: 0.0,
        };
        assert_eq!(
            validate_rig(&rig),
            Err(ValidationError::Multiple(vec![
                ValidationError::BandRange {
                    index: 1,
                    min_hz: 400.0,
                    max_hz: 150.0
                },
                ValidationError::Sensitivity {
                    index: 1,
                    value: 0.0
                },
            ]))
        );
    }

    #[test]
    fn band_and_pin_counts() {
        let mut rig = RigConfig::default();
        rig.bands.pop();
        let err = validate_rig(&rig).unwrap_err();
        let ValidationError::Multiple(errors) = err else {
            panic!("expected both count errors, got {err}");
        };
        assert!(errors.contains(&ValidationError::BandCount {
            expected: BAND_COUNT,
            found: BAND_COUNT - 1
        }));
        assert!(errors.contains(&ValidationError::PinCount {
            bands: BAND_COUNT - 1,
            pins: BAND_COUNT
        }));
    }

    #[test]
    fn zero_timing_values() {
        let mut rig = RigConfig::default();
        rig.controller.fade_interval_ms = 0;
        assert_eq!(validate_rig(&rig), Err(ValidationError::FadeInterval));

        let mut rig = RigConfig::default();
        rig.serial.baud_rate = 0;
        assert_eq!(validate_rig(&rig), Err(ValidationError::BaudRate));

        let mut rig = RigConfig::default();
        rig.audio.sample_rate = Some(0);
        assert_eq!(validate_rig(&rig), Err(ValidationError::SampleRate));
    }

    #[test]
    fn multiple_display_joins_messages() {
        let err = ValidationError::Multiple(vec![ValidationError::FadeInterval, ValidationError::BaudRate]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: fade interval must be positive; baud rate must be positive"
        );
    }
}
