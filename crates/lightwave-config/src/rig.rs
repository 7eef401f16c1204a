//! The rig file: everything that describes one installation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use lightwave_analysis::{AnalyzerSettings, Band, DEFAULT_BANDS};
use lightwave_protocol::{BAND_COUNT, BAUD_RATE, DEFAULT_FADE_INTERVAL, LinkSettings, Millis};

use crate::error::ConfigError;
use crate::validation::validate_rig;

/// Sample rate assumed when no device reports one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Pins of the stock six-channel controller, in band order.
pub const DEFAULT_PINS: [u8; BAND_COUNT] = [3, 5, 6, 9, 10, 11];

/// Complete rig configuration.
///
/// Every field has a default reproducing the stock rig, so an empty file (or
/// no file) is a working configuration.
///
/// # TOML Format
///
/// ```toml
/// [audio]
/// source = "loopback"
/// device = "Speakers"
///
/// [analysis]
/// window_size = 4096
/// min_db = -50.0
/// max_db = 0.0
/// suppress_silence = true
///
/// [serial]
/// port = "COM3"
/// baud_rate = 115200
/// settle_ms = 2000
///
/// [controller]
/// fade_interval_ms = 10
/// pins = [3, 5, 6, 9, 10, 11]
///
/// [[bands]]
/// min_hz = 0.0
/// max_hz = 150.0
/// sensitivity = 1.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RigConfig {
    /// Capture settings.
    pub audio: AudioConfig,
    /// Window and loudness settings.
    pub analysis: AnalysisConfig,
    /// Serial link to the controller.
    pub serial: SerialConfig,
    /// Controller layout and fade timing.
    pub controller: ControllerConfig,
    /// Frequency bands in channel order.
    pub bands: Vec<BandConfig>,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            analysis: AnalysisConfig::default(),
            serial: SerialConfig::default(),
            controller: ControllerConfig::default(),
            bands: DEFAULT_BANDS.iter().map(BandConfig::from).collect(),
        }
    }
}

/// Which stream to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    /// System output, captured as loopback.
    #[default]
    Loopback,
    /// A capture device.
    Input,
}

/// `[audio]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// Loopback or input capture.
    pub source: CaptureSource,
    /// Device name substring; system default if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Requested sample rate; the device's mix format if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    /// Preferred callback size in frames; host default if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer_size: Option<u32>,
}

/// `[analysis]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Samples per FFT window.
    pub window_size: usize,
    /// Level mapped to intensity 0.
    pub min_db: f32,
    /// Level mapped to intensity 255.
    pub max_db: f32,
    /// Skip transmitting all-zero windows.
    pub suppress_silence: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let settings = AnalyzerSettings::default();
        Self {
            window_size: settings.window_size,
            min_db: settings.min_db,
            max_db: settings.max_db,
            suppress_silence: true,
        }
    }
}

/// `[serial]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    /// Port path or name; analysis runs untransmitted if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Line rate.
    pub baud_rate: u32,
    /// Wait after opening the port while the controller resets.
    pub settle_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: BAUD_RATE,
            settle_ms: 2000,
        }
    }
}

/// `[controller]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Half-life of the fade.
    pub fade_interval_ms: u64,
    /// Output pin per band, in band order.
    pub pins: Vec<u8>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fade_interval_ms: DEFAULT_FADE_INTERVAL.as_millis(),
            pins: DEFAULT_PINS.to_vec(),
        }
    }
}

/// One `[[bands]]` entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BandConfig {
    /// Lower edge in Hz (inclusive).
    pub min_hz: f32,
    /// Upper edge in Hz (exclusive).
    pub max_hz: f32,
    /// Linear gain before the decibel mapping.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

fn default_sensitivity() -> f32 {
    1.0
}

impl From<&Band> for BandConfig {
    fn from(band: &Band) -> Self {
        Self {
            min_hz: band.min_hz,
            max_hz: band.max_hz,
            sensitivity: band.sensitivity,
        }
    }
}

impl From<BandConfig> for Band {
    fn from(band: BandConfig) -> Self {
        Band::new(band.min_hz, band.max_hz).with_sensitivity(band.sensitivity)
    }
}

impl RigConfig {
    /// Load and validate a rig file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a rig from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let rig: RigConfig = toml::from_str(toml_str)?;
        rig.validate()?;
        Ok(rig)
    }

    /// Load the rig at `explicit`, else the default location, else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match crate::paths::resolve_rig_path(explicit) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save the rig to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the rig to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every rule; see [`validate_rig`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rig(self)?;
        Ok(())
    }

    /// Analyzer settings for a stream at `sample_rate` Hz.
    pub fn analyzer_settings(&self, sample_rate: u32) -> AnalyzerSettings {
        AnalyzerSettings {
            sample_rate: sample_rate as f32,
            window_size: self.analysis.window_size,
            min_db: self.analysis.min_db,
            max_db: self.analysis.max_db,
        }
    }

    /// Bands in channel order.
    pub fn analysis_bands(&self) -> Vec<Band> {
        self.bands.iter().copied().map(Band::from).collect()
    }

    /// Serial line parameters.
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings::with_baud_rate(self.serial.baud_rate)
    }

    /// Controller pins as a fixed array, if the count matches the protocol.
    pub fn pins(&self) -> Option<[u8; BAND_COUNT]> {
        self.controller.pins.as_slice().try_into().ok()
    }

    /// Controller fade interval.
    pub fn fade_interval(&self) -> Millis {
        Millis::from_millis(self.controller.fade_interval_ms)
    }
}
