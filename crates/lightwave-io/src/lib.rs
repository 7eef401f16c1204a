//! Host-side I/O for Lightwave.
//!
//! This crate connects the analysis stages to the outside world:
//!
//! - **Capture**: [`AudioBackend`] and its cpal implementation [`CpalBackend`]
//!   deliver interleaved `f32` batches from a loopback or input device
//! - **Transport**: [`Transport`] with [`SerialTransport`] for the controller
//!   link and [`MemoryTransport`] for tests and simulation
//! - **Emission**: [`PacketEmitter`] frames intensities, applies the silence
//!   policy and counts what happened to each window
//! - **Pipeline**: [`Pipeline`] is the context object owned by the capture
//!   callback; [`Pipeline::on_frames`] runs the whole chain synchronously
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lightwave_analysis::{Analyzer, AnalyzerSettings, DEFAULT_BANDS};
//! use lightwave_io::{
//!     AudioBackend, CaptureConfig, CpalBackend, PacketEmitter, Pipeline, SerialTransport,
//! };
//! use lightwave_protocol::LinkSettings;
//!
//! let backend = CpalBackend::new();
//! let config = CaptureConfig::default();
//! let format = backend.capture_format(&config)?;
//!
//! let settings = AnalyzerSettings {
//!     sample_rate: format.sample_rate as f32,
//!     ..AnalyzerSettings::default()
//! };
//! let analyzer = Analyzer::new(settings, DEFAULT_BANDS.to_vec())?;
//! let transport = SerialTransport::open("/dev/ttyACM0", LinkSettings::DEFAULT).ok();
//! let mut pipeline = Pipeline::new(analyzer, PacketEmitter::new(transport, true), format.channels);
//!
//! let _stream = backend.build_capture_stream(
//!     &config,
//!     Box::new(move |data: &[f32]| {
//!         pipeline.on_frames(data);
//!     }),
//!     Box::new(|err: &str| tracing::warn!(error = err, "capture error")),
//! )?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod cpal_backend;
mod devices;
mod emitter;
mod pipeline;
mod transport;

pub use backend::{
    AudioBackend, AudioSource, CaptureConfig, ErrorCallback, InputCallback, StreamFormat,
    StreamHandle,
};
pub use cpal_backend::CpalBackend;
pub use devices::{AudioDevice, default_devices, list_devices};
pub use emitter::{EmitterStats, Emission, PacketEmitter, StatsSnapshot};
pub use pipeline::Pipeline;
pub use transport::{MemoryTransport, SerialTransport, Transport};

/// Error types for capture and transport operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The serial link could not be opened.
    #[error("Transport error on {port}: {source}")]
    Transport {
        /// Port path as given.
        port: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for capture and transport operations.
pub type Result<T> = std::result::Result<T, Error>;
