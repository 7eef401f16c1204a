//! Shared helpers for CLI commands.

use anyhow::Context;
use clap::Args;
use lightwave_config::{CaptureSource, RigConfig};
use std::path::Path;

/// Flags that override rig file values.
#[derive(Args, Debug, Default, Clone)]
pub struct RigOverrides {
    /// Serial port of the controller (e.g. COM3, /dev/ttyACM0)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Capture device name, matched as a case-insensitive substring
    #[arg(short, long)]
    pub device: Option<String>,

    /// Capture from an input device instead of system output
    #[arg(long)]
    pub input: bool,

    /// Transmit silent windows instead of skipping them
    #[arg(long)]
    pub no_suppress_silence: bool,
}

impl RigOverrides {
    /// Apply the flags that were given.
    pub fn apply(&self, rig: &mut RigConfig) {
        if let Some(port) = &self.port {
            rig.serial.port = Some(port.clone());
        }
        if let Some(device) = &self.device {
            rig.audio.device = Some(device.clone());
        }
        if self.input {
            rig.audio.source = CaptureSource::Input;
        }
        if self.no_suppress_silence {
            rig.analysis.suppress_silence = false;
        }
    }
}

/// Load the rig, apply overrides and validate the result.
pub fn load_rig(config: Option<&Path>, overrides: &RigOverrides) -> anyhow::Result<RigConfig> {
    let mut rig = RigConfig::load_or_default(config).context("failed to load rig configuration")?;
    overrides.apply(&mut rig);
    rig.validate()?;
    Ok(rig)
}
