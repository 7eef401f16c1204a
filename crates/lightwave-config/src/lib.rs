//! Rig configuration for Lightwave.
//!
//! A rig file describes one installation: where audio comes from, how it is
//! split into bands, which serial port reaches the controller and which pins
//! the controller drives.
//!
//! # Features
//!
//! - **Rig files**: load and save [`RigConfig`] as TOML
//! - **Validation**: [`validate_rig`] reports every problem at once
//! - **Paths**: the platform default rig location
//!
//! # Example
//!
//! ```rust,no_run
//! use lightwave_config::{RigConfig, paths};
//!
//! // Explicit file, else the default location, else built-in defaults
//! let mut rig = RigConfig::load_or_default(None)?;
//!
//! rig.serial.port = Some("/dev/ttyACM0".to_string());
//! rig.bands[0].sensitivity = 1.5;
//! rig.save(paths::default_rig_path())?;
//! # Ok::<(), lightwave_config::ConfigError>(())
//! ```

mod error;
mod rig;

/// Platform-specific configuration paths.
pub mod paths;

/// Rig validation.
pub mod validation;

pub use error::ConfigError;
pub use paths::{default_rig_path, user_config_dir};
pub use rig::{
    AnalysisConfig, AudioConfig, BandConfig, CaptureSource, ControllerConfig, DEFAULT_PINS,
    DEFAULT_SAMPLE_RATE, RigConfig, SerialConfig,
};
pub use validation::{ValidationError, ValidationResult, validate_rig};
