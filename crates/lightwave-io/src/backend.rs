//! Pluggable capture backend abstraction.
//!
//! [`AudioBackend`] keeps the analysis pipeline independent of the platform
//! audio API. [`CpalBackend`](crate::CpalBackend) is the desktop
//! implementation; tests and simulation drive [`Pipeline`](crate::Pipeline)
//! directly or through a mock backend.
//!
//! Callbacks are boxed closures so the trait stays object-safe, and streams
//! come back as a type-erased [`StreamHandle`] that stops capture on drop.

use crate::{AudioDevice, Result};

/// Where captured audio comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioSource {
    /// Whatever the system is playing, captured from an output device.
    #[default]
    Loopback,
    /// A capture device such as a microphone or line input.
    Input,
}

impl AudioSource {
    /// Lower-case name used in logs and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            AudioSource::Loopback => "loopback",
            AudioSource::Input => "input",
        }
    }
}

impl std::fmt::Display for AudioSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for opening a capture stream.
///
/// Fields left as `None` fall back to the device's own default mix format,
/// which is what loopback capture normally requires.
#[derive(Debug, Clone, Default)]
pub struct CaptureConfig {
    /// Loopback or input capture.
    pub source: AudioSource,
    /// Case-insensitive device name substring (system default if `None`).
    pub device_name: Option<String>,
    /// Requested sample rate in Hz.
    pub sample_rate: Option<u32>,
    /// Preferred buffer size in frames.
    pub buffer_size: Option<u32>,
}

/// Format a capture stream will deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channels per frame.
    pub channels: u16,
}

/// Type-erased stream handle.
///
/// The stream runs while this handle exists; dropping it stops capture.
pub struct StreamHandle {
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object, keeping it alive until drop.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Capture callback.
///
/// Runs on the backend's real-time thread with interleaved `f32` samples
/// (`[c0, c1, .., c0, c1, ..]`). It must not block; the only I/O allowed is
/// the best-effort transport write.
pub type InputCallback = Box<dyn FnMut(&[f32]) + Send>;

/// Error callback, called with a human-readable message.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// Pluggable capture backend.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g. "cpal", "mock").
    fn name(&self) -> &str;

    /// List all available audio devices.
    fn list_devices(&self) -> Result<Vec<AudioDevice>>;

    /// Resolve the format a stream built from `config` will deliver.
    ///
    /// The analyzer needs the sample rate and channel count before the
    /// stream starts, so callers query this first.
    fn capture_format(&self, config: &CaptureConfig) -> Result<StreamFormat>;

    /// Build and start a capture stream.
    ///
    /// `callback` is invoked per captured buffer; the returned handle keeps
    /// the stream alive.
    fn build_capture_stream(
        &self,
        config: &CaptureConfig,
        callback: InputCallback,
        error_callback: ErrorCallback,
    ) -> Result<StreamHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_loopback_on_default_device() {
        let config = CaptureConfig::default();
        assert_eq!(config.source, AudioSource::Loopback);
        assert!(config.device_name.is_none());
        assert!(config.sample_rate.is_none());
    }

    #[test]
    fn source_display() {
        assert_eq!(AudioSource::Loopback.to_string(), "loopback");
        assert_eq!(AudioSource::Input.to_string(), "input");
    }

    #[test]
    fn stream_handle_debug() {
        let handle = StreamHandle::new(42u32);
        assert!(format!("{handle:?}").contains("StreamHandle"));
    }
}
