//! cpal-based capture backend.
//!
//! [`CpalBackend`] wraps the platform's default cpal host (WASAPI, CoreAudio,
//! ALSA). Loopback capture opens an input stream on an *output* device, which
//! WASAPI services as a loopback of whatever that device is playing. Hosts
//! without loopback support reject the stream at build time; use
//! [`AudioSource::Input`] with a virtual loopback device there.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Host, SampleFormat};

use crate::backend::{
    AudioBackend, AudioSource, CaptureConfig, ErrorCallback, InputCallback, StreamFormat,
    StreamHandle,
};
use crate::devices::device_name;
use crate::{AudioDevice, Error, Result};

/// cpal-based capture backend.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a backend on the platform's default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    /// Find a device by case-insensitive name substring, or the default one.
    ///
    /// Loopback searches output devices, input capture searches input devices.
    fn find_device(&self, source: AudioSource, name: Option<&str>) -> Result<cpal::Device> {
        let Some(search) = name else {
            let device = match source {
                AudioSource::Loopback => self.host.default_output_device(),
                AudioSource::Input => self.host.default_input_device(),
            };
            return device.ok_or(Error::NoDevice);
        };

        let search_lower = search.to_lowercase();
        let devices = match source {
            AudioSource::Loopback => self.host.output_devices().map(|d| d.collect::<Vec<_>>()),
            AudioSource::Input => self.host.input_devices().map(|d| d.collect::<Vec<_>>()),
        }
        .map_err(|e| Error::Stream(e.to_string()))?;

        devices
            .into_iter()
            .find(|device| {
                device_name(device).is_ok_and(|n| n.to_lowercase().contains(&search_lower))
            })
            .ok_or_else(|| {
                Error::DeviceNotFound(format!("no {source} device matching '{search}'"))
            })
    }

    /// The device's own mix format for the given source.
    fn default_config(
        device: &cpal::Device,
        source: AudioSource,
    ) -> Result<cpal::SupportedStreamConfig> {
        let supported = match source {
            AudioSource::Loopback => device.default_output_config(),
            AudioSource::Input => device.default_input_config(),
        };
        supported.map_err(|e| Error::Stream(e.to_string()))
    }

    fn stream_config(
        config: &CaptureConfig,
        supported: &cpal::SupportedStreamConfig,
    ) -> cpal::StreamConfig {
        cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: config.sample_rate.unwrap_or(supported.sample_rate()),
            buffer_size: config
                .buffer_size
                .map_or(cpal::BufferSize::Default, cpal::BufferSize::Fixed),
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn list_devices(&self) -> Result<Vec<AudioDevice>> {
        crate::devices::list_devices()
    }

    fn capture_format(&self, config: &CaptureConfig) -> Result<StreamFormat> {
        let device = self.find_device(config.source, config.device_name.as_deref())?;
        let supported = Self::default_config(&device, config.source)?;
        let stream_config = Self::stream_config(config, &supported);
        Ok(StreamFormat {
            sample_rate: stream_config.sample_rate,
            channels: stream_config.channels,
        })
    }

    fn build_capture_stream(
        &self,
        config: &CaptureConfig,
        mut callback: InputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<StreamHandle> {
        let device = self.find_device(config.source, config.device_name.as_deref())?;
        let supported = Self::default_config(&device, config.source)?;
        let stream_config = Self::stream_config(config, &supported);

        let stream = match supported.sample_format() {
            SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| callback(data),
                move |err| error_callback(&err.to_string()),
                None,
            ),
            SampleFormat::I16 => {
                // Grows to the largest callback seen, then stays put.
                let mut converted: Vec<f32> = Vec::new();
                device.build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        converted.clear();
                        converted.extend(data.iter().map(|&s| f32::from(s) / 32768.0));
                        callback(&converted[..]);
                    },
                    move |err| error_callback(&err.to_string()),
                    None,
                )
            }
            other => return Err(Error::UnsupportedFormat(format!("{other:?}"))),
        }
        .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        let name = device_name(&device).unwrap_or_default();
        tracing::info!(
            source = %config.source,
            device = %name,
            channels = stream_config.channels,
            sample_rate = stream_config.sample_rate,
            "capture stream started"
        );

        Ok(StreamHandle::new(stream))
    }
}
