//! Device enumeration on the default cpal host.

use cpal::Device;
use cpal::traits::{DeviceTrait, HostTrait};

use crate::{Error, Result};

/// Fallback when a device will not report its mix format.
const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Extract device name via `description()` (cpal 0.17+).
pub(crate) fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio device information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Whether the device can be captured from directly.
    pub is_input: bool,
    /// Whether the device plays audio, making it a loopback source.
    pub is_output: bool,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

impl AudioDevice {
    fn describe(device: &Device) -> Option<Self> {
        let name = device_name(device).ok()?;
        let input = device.default_input_config().ok();
        let output = device.default_output_config().ok();
        let default_sample_rate = output
            .as_ref()
            .or(input.as_ref())
            .map_or(FALLBACK_SAMPLE_RATE, |c| c.sample_rate());

        Some(Self {
            name,
            is_input: input.is_some(),
            is_output: output.is_some(),
            default_sample_rate,
        })
    }
}

/// List every device on the default host.
///
/// A device that both captures and plays appears once.
pub fn list_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let mut devices: Vec<AudioDevice> = Vec::new();

    let inputs = host.input_devices().map_err(|e| Error::Stream(e.to_string()))?;
    let outputs = host.output_devices().map_err(|e| Error::Stream(e.to_string()))?;

    for device in inputs.chain(outputs) {
        if let Some(info) = AudioDevice::describe(&device)
            && !devices.iter().any(|d| d.name == info.name)
        {
            devices.push(info);
        }
    }

    Ok(devices)
}

/// Default `(input, output)` devices, if the host has them.
pub fn default_devices() -> Result<(Option<AudioDevice>, Option<AudioDevice>)> {
    let host = cpal::default_host();
    let input = host.default_input_device().and_then(|d| AudioDevice::describe(&d));
    let output = host.default_output_device().and_then(|d| AudioDevice::describe(&d));
    Ok((input, output))
}
