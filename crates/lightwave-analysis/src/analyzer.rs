//! Streaming analyzer: capture batches in, one intensity vector per window out.

use crate::band::{Band, BandMapper};
use crate::fft::SpectralTransform;
use crate::loudness::LoudnessNormalizer;
use crate::window::WindowAccumulator;
use crate::{AnalysisError, Result};

/// Parameters shared by every stage of the analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerSettings {
    /// Capture sample rate in Hz.
    pub sample_rate: f32,
    /// Samples per analysis window (power of two).
    pub window_size: usize,
    /// Level mapped to intensity 0.
    pub min_db: f32,
    /// Level mapped to intensity 255.
    pub max_db: f32,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            window_size: 4096,
            min_db: -50.0,
            max_db: 0.0,
        }
    }
}

/// Turns a stream of audio samples into per-band intensities.
///
/// Every time `window_size` samples have accumulated, the window is
/// Hann-weighted and transformed, each band's peak magnitude is scaled by its
/// sensitivity and mapped through the decibel window, and the callback is
/// handed one intensity per band in band order.
///
/// All buffers are allocated in [`new`](Self::new).
pub struct Analyzer {
    settings: AnalyzerSettings,
    accumulator: WindowAccumulator,
    transform: SpectralTransform,
    mapper: BandMapper,
    loudness: LoudnessNormalizer,
    peaks: Vec<f32>,
    intensities: Vec<u8>,
}

impl Analyzer {
    /// Build an analyzer for `bands` under `settings`.
    pub fn new(settings: AnalyzerSettings, bands: Vec<Band>) -> Result<Self> {
        if bands.is_empty() {
            return Err(AnalysisError::NoBands);
        }
        if !(settings.sample_rate.is_finite() && settings.sample_rate > 0.0) {
            return Err(AnalysisError::InvalidSampleRate(settings.sample_rate));
        }

        let transform = SpectralTransform::new(settings.window_size)?;
        let loudness = LoudnessNormalizer::new(settings.min_db, settings.max_db)?;
        let band_count = bands.len();
        let mapper = BandMapper::new(bands, settings.sample_rate, settings.window_size);

        Ok(Self {
            settings,
            accumulator: WindowAccumulator::new(settings.window_size),
            transform,
            mapper,
            loudness,
            peaks: vec![0.0; band_count],
            intensities: vec![0; band_count],
        })
    }

    /// Settings the analyzer was built with.
    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// Configured bands, in output order.
    pub fn bands(&self) -> &[Band] {
        self.mapper.bands()
    }

    /// Windows analysed so far.
    pub fn windows_completed(&self) -> u64 {
        self.accumulator.windows_completed()
    }

    /// Intensities from the most recent window (all zero before the first).
    pub fn last_intensities(&self) -> &[u8] {
        &self.intensities
    }

    /// Feed mono samples; `on_frame` runs once per completed window.
    ///
    /// Returns the number of windows completed by this batch.
    pub fn push<F>(&mut self, samples: &[f32], mut on_frame: F) -> usize
    where
        F: FnMut(&[u8]),
    {
        let Self {
            accumulator,
            transform,
            mapper,
            loudness,
            peaks,
            intensities,
            ..
        } = self;

        accumulator.push(samples, |window| {
            analyse(transform, mapper, loudness, peaks, intensities, window);
            on_frame(&intensities[..]);
        })
    }

    /// Feed interleaved samples; only channel 0 is analysed.
    pub fn push_interleaved<F>(&mut self, data: &[f32], channels: usize, mut on_frame: F) -> usize
    where
        F: FnMut(&[u8]),
    {
        let Self {
            accumulator,
            transform,
            mapper,
            loudness,
            peaks,
            intensities,
            ..
        } = self;

        accumulator.push_interleaved(data, channels, |window| {
            analyse(transform, mapper, loudness, peaks, intensities, window);
            on_frame(&intensities[..]);
        })
    }
}

fn analyse(
    transform: &mut SpectralTransform,
    mapper: &BandMapper,
    loudness: &LoudnessNormalizer,
    peaks: &mut [f32],
    intensities: &mut [u8],
    window: &mut [f32],
) {
    let magnitudes = transform.magnitudes(window);
    mapper.peaks(magnitudes, peaks);

    for ((level, &peak), band) in intensities.iter_mut().zip(peaks.iter()).zip(mapper.bands()) {
        *level = loudness.intensity_with_gain(peak, band.sensitivity);
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("settings", &self.settings)
            .field("bands", &self.mapper.bands().len())
            .field("windows_completed", &self.windows_completed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal;

    fn settings(window_size: usize) -> AnalyzerSettings {
        AnalyzerSettings {
            window_size,
            ..AnalyzerSettings::default()
        }
    }

    #[test]
    fn rejects_bad_construction() {
        assert_eq!(
            Analyzer::new(settings(1024), vec![]).unwrap_err(),
            AnalysisError::NoBands
        );
        let bands = vec![Band::new(0.0, 100.0)];
        assert!(matches!(
            Analyzer::new(settings(1000), bands.clone()),
            Err(AnalysisError::InvalidWindowSize(1000))
        ));
        let zero_rate = AnalyzerSettings {
            sample_rate: 0.0,
            ..settings(1024)
        };
        assert!(matches!(
            Analyzer::new(zero_rate, bands.clone()),
            Err(AnalysisError::InvalidSampleRate(_))
        ));
        let inverted = AnalyzerSettings {
            min_db: 0.0,
            max_db: -50.0,
            ..settings(1024)
        };
        assert!(matches!(
            Analyzer::new(inverted, bands),
            Err(AnalysisError::InvalidDecibelRange { .. })
        ));
    }

    #[test]
    fn one_frame_per_window() {
        let mut analyzer = Analyzer::new(settings(1024), vec![Band::new(0.0, 22050.0)]).unwrap();
        let mut frames = 0;
        analyzer.push(&vec![0.0; 1000], |_| frames += 1);
        assert_eq!(frames, 0);
        analyzer.push(&vec![0.0; 2100], |_| frames += 1);
        assert_eq!(frames, 3);
        assert_eq!(analyzer.windows_completed(), 3);
    }

    #[test]
    fn silence_maps_to_zero() {
        let mut analyzer = Analyzer::new(settings(1024), vec![Band::new(0.0, 22050.0)]).unwrap();
        let mut seen = Vec::new();
        analyzer.push(&vec![0.0; 1024], |frame| seen.extend_from_slice(frame));
        assert_eq!(seen, vec![0]);
    }

    #[test]
    fn sensitivity_raises_band_level() {
        let s = settings(2048);
        let tone = signal::sine(1000.0, s.sample_rate, s.window_size, 0.01);
        let plain = Band::new(500.0, 2000.0);

        let mut a = Analyzer::new(s, vec![plain]).unwrap();
        let mut b = Analyzer::new(s, vec![plain.with_sensitivity(8.0)]).unwrap();
        a.push(&tone, |_| {});
        b.push(&tone, |_| {});

        assert!(b.last_intensities()[0] > a.last_intensities()[0]);
    }

    #[test]
    fn interleaved_ignores_other_channels() {
        let s = settings(1024);
        let tone = signal::sine(440.0, s.sample_rate, s.window_size, 0.5);
        let loud_right = signal::sine(6000.0, s.sample_rate, s.window_size, 0.9);
        let stereo = signal::interleave(&[&tone, &loud_right]);

        let bands = vec![Band::new(300.0, 600.0), Band::new(5000.0, 7000.0)];
        let mut analyzer = Analyzer::new(s, bands).unwrap();
        assert_eq!(analyzer.push_interleaved(&stereo, 2, |_| {}), 1);

        let levels = analyzer.last_intensities();
        assert!(levels[0] > 150, "440 Hz band: {}", levels[0]);
        assert!(levels[1] < levels[0] / 2, "6 kHz band leaked: {}", levels[1]);
    }
}
