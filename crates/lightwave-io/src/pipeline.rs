//! The context object owned by the capture callback.

use lightwave_analysis::Analyzer;

use crate::emitter::{Emission, PacketEmitter};
use crate::transport::Transport;

/// Analyzer plus emitter, driven once per capture callback.
///
/// The capture backend moves the pipeline into its callback and calls
/// [`on_frames`](Self::on_frames) with each interleaved batch. Everything
/// runs synchronously on the capture thread: windowing, FFT, band mapping,
/// normalisation, framing and the best-effort write.
///
/// ```rust
/// use lightwave_analysis::{Analyzer, AnalyzerSettings, DEFAULT_BANDS, signal};
/// use lightwave_io::{MemoryTransport, PacketEmitter, Pipeline};
///
/// let settings = AnalyzerSettings { window_size: 1024, ..AnalyzerSettings::default() };
/// let analyzer = Analyzer::new(settings, DEFAULT_BANDS.to_vec())?;
/// let emitter = PacketEmitter::new(Some(MemoryTransport::new()), true);
/// let mut pipeline = Pipeline::new(analyzer, emitter, 1);
///
/// pipeline.on_frames(&signal::sine(1000.0, 44100.0, 1024, 0.5));
/// assert_eq!(pipeline.emitter().transport().unwrap().bytes().len(), 7);
/// # Ok::<(), lightwave_analysis::AnalysisError>(())
/// ```
#[derive(Debug)]
pub struct Pipeline<T> {
    analyzer: Analyzer,
    emitter: PacketEmitter<T>,
    channels: usize,
    last: Option<Emission>,
}

impl<T: Transport> Pipeline<T> {
    /// Build a pipeline for a stream carrying `channels` interleaved channels.
    ///
    /// Only channel 0 is analysed; a count of 0 is treated as mono.
    pub fn new(analyzer: Analyzer, emitter: PacketEmitter<T>, channels: u16) -> Self {
        Self {
            analyzer,
            emitter,
            channels: usize::from(channels.max(1)),
            last: None,
        }
    }

    /// Consume one capture batch, emitting a packet per completed window.
    ///
    /// Returns the number of windows completed.
    pub fn on_frames(&mut self, buffer: &[f32]) -> usize {
        let Self {
            analyzer,
            emitter,
            channels,
            last,
        } = self;

        analyzer.push_interleaved(buffer, *channels, |intensities| {
            let emission = emitter.emit(intensities);
            tracing::trace!(?intensities, ?emission, "window");
            *last = Some(emission);
        })
    }

    /// Outcome of the most recent window.
    pub fn last_emission(&self) -> Option<Emission> {
        self.last
    }

    /// The analyzer.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// The emitter.
    pub fn emitter(&self) -> &PacketEmitter<T> {
        &self.emitter
    }

    /// Mutable access to the emitter.
    pub fn emitter_mut(&mut self) -> &mut PacketEmitter<T> {
        &mut self.emitter
    }

    /// Split back into analyzer and emitter.
    pub fn into_parts(self) -> (Analyzer, PacketEmitter<T>) {
        (self.analyzer, self.emitter)
    }
}
