//! Live capture command.

use super::common::{RigOverrides, load_rig};
use anyhow::Context;
use clap::Args;
use lightwave_analysis::Analyzer;
use lightwave_config::{CaptureSource, RigConfig};
use lightwave_io::{
    AudioBackend, AudioSource, CaptureConfig, CpalBackend, Error as IoError, PacketEmitter,
    Pipeline, SerialTransport,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    overrides: RigOverrides,

    /// Seconds between statistics log lines (0 disables them)
    #[arg(long, default_value = "5")]
    stats_interval: u64,
}

fn capture_config(rig: &RigConfig) -> CaptureConfig {
    CaptureConfig {
        source: match rig.audio.source {
            CaptureSource::Loopback => AudioSource::Loopback,
            CaptureSource::Input => AudioSource::Input,
        },
        device_name: rig.audio.device.clone(),
        sample_rate: rig.audio.sample_rate,
        buffer_size: rig.audio.buffer_size,
    }
}

/// Open the controller link, or run without one.
///
/// A missing or unopenable port is not fatal: analysis keeps running and
/// packets are counted as dropped.
fn open_transport(rig: &RigConfig) -> Option<SerialTransport> {
    let Some(port) = rig.serial.port.as_deref() else {
        tracing::warn!("no serial port configured, packets will be dropped");
        return None;
    };

    match SerialTransport::open(port, rig.link_settings()) {
        Ok(transport) => {
            tracing::info!(port, baud = rig.serial.baud_rate, "serial link open");
            if rig.serial.settle_ms > 0 {
                // Opening the port resets most boards; wait for the bootloader.
                tracing::debug!(ms = rig.serial.settle_ms, "waiting for controller reset");
                std::thread::sleep(Duration::from_millis(rig.serial.settle_ms));
            }
            Some(transport)
        }
        Err(e) => {
            tracing::warn!(error = %e, "serial link unavailable, continuing without it");
            None
        }
    }
}

fn device_hint(backend: &CpalBackend, source: AudioSource) -> String {
    let Ok(devices) = backend.list_devices() else {
        return String::new();
    };
    let names: Vec<_> = devices
        .iter()
        .filter(|d| match source {
            AudioSource::Loopback => d.is_output,
            AudioSource::Input => d.is_input,
        })
        .map(|d| d.name.as_str())
        .collect();
    if names.is_empty() {
        String::new()
    } else {
        format!("; available: {}", names.join(", "))
    }
}

pub fn run(args: RunArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let rig = load_rig(config, &args.overrides)?;
    let capture = capture_config(&rig);

    let backend = CpalBackend::new();
    let format = match backend.capture_format(&capture) {
        Ok(format) => format,
        Err(e @ IoError::DeviceNotFound(_)) => {
            let hint = device_hint(&backend, capture.source);
            return Err(anyhow::Error::new(e).context(format!("cannot open capture device{hint}")));
        }
        Err(e) => return Err(e).context("cannot open capture device"),
    };

    let analyzer = Analyzer::new(rig.analyzer_settings(format.sample_rate), rig.analysis_bands())
        .context("invalid analysis settings")?;
    let emitter = PacketEmitter::new(open_transport(&rig), rig.analysis.suppress_silence);
    let stats = Arc::clone(emitter.stats());
    let mut pipeline = Pipeline::new(analyzer, emitter, format.channels);

    println!(
        "Capturing {} audio at {} Hz, {} channel(s)",
        capture.source, format.sample_rate, format.channels
    );
    println!("  Window: {} samples", rig.analysis.window_size);
    match rig.serial.port.as_deref() {
        Some(port) => println!("  Port:   {port} @ {} baud", rig.serial.baud_rate),
        None => println!("  Port:   none"),
    }
    println!("\nPress Ctrl+C to stop...\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let stream = backend.build_capture_stream(
        &capture,
        Box::new(move |data: &[f32]| {
            pipeline.on_frames(data);
        }),
        Box::new(|err: &str| {
            tracing::error!(error = err, "capture stream error");
        }),
    )?;

    let interval = Duration::from_secs(args.stats_interval);
    let mut last_report = Instant::now();
    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(100));
        if !interval.is_zero() && last_report.elapsed() >= interval {
            tracing::debug!(stats = %stats.snapshot(), "emitter stats");
            last_report = Instant::now();
        }
    }

    drop(stream);
    tracing::info!(stats = %stats.snapshot(), "capture stopped");
    println!("Done!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_config_follows_rig() {
        let mut rig = RigConfig::default();
        rig.audio.source = CaptureSource::Input;
        rig.audio.device = Some("Line".into());
        rig.audio.buffer_size = Some(512);

        let capture = capture_config(&rig);
        assert_eq!(capture.source, AudioSource::Input);
        assert_eq!(capture.device_name.as_deref(), Some("Line"));
        assert_eq!(capture.sample_rate, None);
        assert_eq!(capture.buffer_size, Some(512));
    }

    #[test]
    fn missing_port_runs_without_transport() {
        let rig = RigConfig::default();
        assert!(open_transport(&rig).is_none());
    }

    #[test]
    fn unopenable_port_runs_without_transport() {
        let mut rig = RigConfig::default();
        rig.serial.port = Some("/nonexistent/lightwave/port".into());
        rig.serial.settle_ms = 0;
        assert!(open_transport(&rig).is_none());
    }
}
