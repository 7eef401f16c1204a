//! Offline simulation: synthetic audio through the full chain into an
//! in-process controller.

use super::common::{RigOverrides, load_rig};
use anyhow::Context;
use clap::{Args, ValueEnum};
use lightwave_analysis::{Analyzer, Band, signal};
use lightwave_config::{DEFAULT_SAMPLE_RATE, RigConfig};
use lightwave_io::{MemoryTransport, PacketEmitter, Pipeline, StatsSnapshot};
use lightwave_protocol::{BAND_COUNT, Controller, Millis, OutputDriver};
use std::collections::VecDeque;
use std::path::Path;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Test signal to feed the analyzer
    #[arg(short, long, value_enum, default_value = "sweep")]
    signal: SignalKind,

    /// Tone frequency in Hz
    #[arg(short, long, default_value = "1000")]
    frequency: f32,

    /// Signal duration in seconds
    #[arg(long, default_value = "2.0")]
    seconds: f32,

    /// Silence appended after the signal, in seconds
    #[arg(long, default_value = "0.5")]
    silence: f32,

    /// Peak amplitude (0.0 to 1.0)
    #[arg(short, long, default_value = "0.5")]
    amplitude: f32,

    /// Frames per simulated capture callback
    #[arg(short, long, default_value = "512")]
    batch: usize,

    /// Transmit silent windows instead of skipping them
    #[arg(long)]
    no_suppress_silence: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SignalKind {
    /// Logarithmic sweep from 20 Hz to 20 kHz
    Sweep,
    /// Steady sine at --frequency
    Tone,
}

/// Parameters of one simulation run.
#[derive(Clone, Copy, Debug)]
pub struct Scenario {
    pub signal: SignalKind,
    pub frequency: f32,
    pub seconds: f32,
    pub silence: f32,
    pub amplitude: f32,
    pub batch: usize,
}

/// What one controller channel did during the run.
#[derive(Clone, Copy, Debug)]
pub struct ChannelReport {
    pub band: Band,
    pub pin: u8,
    pub peak: u8,
    pub last: u8,
    pub writes: u64,
}

/// Outcome of a simulation run.
#[derive(Debug)]
pub struct SimulationReport {
    pub sample_rate: u32,
    pub stats: StatsSnapshot,
    pub frames: u32,
    pub resyncs: u32,
    pub bytes: usize,
    pub channels: Vec<ChannelReport>,
}

/// Output driver that records what the controller drives.
#[derive(Default)]
struct Recorder {
    peak: [u8; BAND_COUNT],
    last: [u8; BAND_COUNT],
    writes: [u64; BAND_COUNT],
}

impl OutputDriver for Recorder {
    fn set_output(&mut self, channel: usize, _pin: u8, value: u8) {
        self.peak[channel] = self.peak[channel].max(value);
        self.last[channel] = value;
        self.writes[channel] += 1;
    }
}

/// Run `scenario` through analyzer, emitter, wire bytes and controller.
///
/// The controller runs on a millisecond clock derived from the number of
/// samples fed so far, polled once per simulated millisecond.
pub fn simulate(rig: &RigConfig, scenario: &Scenario) -> anyhow::Result<SimulationReport> {
    let pins = rig
        .pins()
        .with_context(|| format!("rig must list {BAND_COUNT} controller pins"))?;
    let sample_rate = rig.audio.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
    let sr = sample_rate as f32;

    let signal_len = (scenario.seconds.max(0.0) * sr) as usize;
    let mut samples = match scenario.signal {
        SignalKind::Sweep => signal::sweep(20.0, 20_000.0, sr, signal_len, scenario.amplitude),
        SignalKind::Tone => signal::sine(scenario.frequency, sr, signal_len, scenario.amplitude),
    };
    samples.resize(signal_len + (scenario.silence.max(0.0) * sr) as usize, 0.0);

    let analyzer = Analyzer::new(rig.analyzer_settings(sample_rate), rig.analysis_bands())
        .context("invalid analysis settings")?;
    let emitter = PacketEmitter::new(Some(MemoryTransport::new()), rig.analysis.suppress_silence);
    let mut pipeline = Pipeline::new(analyzer, emitter, 1);

    let mut controller = Controller::<BAND_COUNT>::new(pins, rig.fade_interval(), Millis::ZERO);
    let mut wire = VecDeque::new();
    let mut recorder = Recorder::default();
    let mut bytes = 0;
    let mut fed = 0u64;
    let mut clock = 0u64;

    for batch in samples.chunks(scenario.batch.max(1)) {
        pipeline.on_frames(batch);
        if let Some(transport) = pipeline.emitter_mut().transport_mut() {
            let sent = transport.take();
            bytes += sent.len();
            wire.extend(sent);
        }

        fed += batch.len() as u64;
        let now = fed * 1000 / u64::from(sample_rate);
        while clock <= now {
            controller.poll(Millis::from_millis(clock), &mut wire, &mut recorder);
            clock += 1;
        }
    }

    let stats = pipeline.emitter().stats().snapshot();
    tracing::debug!(%stats, bytes, "simulation finished");

    let channels = rig
        .analysis_bands()
        .into_iter()
        .enumerate()
        .take(BAND_COUNT)
        .map(|(i, band)| ChannelReport {
            band,
            pin: pins[i],
            peak: recorder.peak[i],
            last: recorder.last[i],
            writes: recorder.writes[i],
        })
        .collect();

    Ok(SimulationReport {
        sample_rate,
        stats,
        frames: controller.decoder().frames(),
        resyncs: controller.decoder().resyncs(),
        bytes,
        channels,
    })
}

pub fn run(args: SimulateArgs, config: Option<&Path>) -> anyhow::Result<()> {
    let overrides = RigOverrides {
        no_suppress_silence: args.no_suppress_silence,
        ..RigOverrides::default()
    };
    let rig = load_rig(config, &overrides)?;
    let scenario = Scenario {
        signal: args.signal,
        frequency: args.frequency,
        seconds: args.seconds,
        silence: args.silence,
        amplitude: args.amplitude,
        batch: args.batch,
    };

    let report = simulate(&rig, &scenario)?;

    println!(
        "Simulated {:.2}s of {:?} + {:.2}s silence at {} Hz",
        scenario.seconds, scenario.signal, scenario.silence, report.sample_rate
    );
    println!("  Emitter: {}", report.stats);
    println!(
        "  Wire:    {} bytes, {} packets decoded, {} resyncs",
        report.bytes, report.frames, report.resyncs
    );
    println!();
    println!("  {:>16}  {:>4}  {:>4}  {:>5}  {:>6}", "band", "pin", "peak", "final", "writes");
    for channel in &report.channels {
        let band = format!("{:.0}-{:.0} Hz", channel.band.min_hz, channel.band.max_hz);
        println!(
            "  {band:>16}  {:>4}  {:>4}  {:>5}  {:>6}",
            channel.pin, channel.peak, channel.last, channel.writes
        );
    }
    Ok(())
}
