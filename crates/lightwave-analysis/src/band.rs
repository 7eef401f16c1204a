//! Frequency bands and peak-per-band reduction of a magnitude spectrum.

use std::ops::Range;

/// A half-open frequency range `[min_hz, max_hz)` driving one output channel.
///
/// `sensitivity` is a linear gain applied to the band's peak before it is
/// converted to decibels; 1.0 leaves it unchanged, 2.0 lifts it by about 6 dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// Lower edge in Hz (inclusive).
    pub min_hz: f32,
    /// Upper edge in Hz (exclusive).
    pub max_hz: f32,
    /// Gain applied to the band peak.
    pub sensitivity: f32,
}

impl Band {
    /// Create a band with unit sensitivity.
    pub const fn new(min_hz: f32, max_hz: f32) -> Self {
        Self {
            min_hz,
            max_hz,
            sensitivity: 1.0,
        }
    }

    /// Set the sensitivity gain.
    pub const fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Whether `freq_hz` falls inside the band.
    #[inline]
    pub fn contains(&self, freq_hz: f32) -> bool {
        freq_hz >= self.min_hz && freq_hz < self.max_hz
    }

    /// Get the bandwidth in Hz.
    pub fn bandwidth(&self) -> f32 {
        (self.max_hz - self.min_hz).max(0.0)
    }
}

/// The six-band split the stock controller is wired for, low to high.
pub const DEFAULT_BANDS: [Band; 6] = [
    Band::new(0.0, 150.0),
    Band::new(150.0, 400.0),
    Band::new(400.0, 1500.0),
    Band::new(1500.0, 4000.0),
    Band::new(4000.0, 8000.0),
    Band::new(8000.0, 22000.0),
];

/// Reduces a spectrum to one peak magnitude per band.
///
/// Bin ranges are resolved once at construction. Bands may overlap (both see
/// the shared bins) or leave gaps; a band covering no bin reports 0.
///
/// # Example
///
/// ```rust
/// use lightwave_analysis::{Band, BandMapper};
///
/// // 8-point FFT at 8 kHz: bins at 0, 1000, 2000, 3000, 4000 Hz
/// let mapper = BandMapper::new(vec![Band::new(500.0, 2500.0), Band::new(3000.0, 3100.0)], 8000.0, 8);
/// let mut peaks = [0.0; 2];
/// mapper.peaks(&[0.9, 0.2, 0.4, 0.1, 0.0], &mut peaks);
/// assert_eq!(peaks, [0.4, 0.1]);
/// ```
#[derive(Debug, Clone)]
pub struct BandMapper {
    bands: Vec<Band>,
    bins: Vec<Range<usize>>,
}

impl BandMapper {
    /// Resolve `bands` against an FFT of `fft_size` samples at `sample_rate`.
    pub fn new(bands: Vec<Band>, sample_rate: f32, fft_size: usize) -> Self {
        let bin_count = fft_size / 2 + 1;
        let bin_width = sample_rate / fft_size as f32;

        let bins = bands
            .iter()
            .map(|band| {
                let mut in_band = (0..bin_count).filter(|&k| band.contains(k as f32 * bin_width));
                match in_band.next() {
                    // Frequencies rise with k, so the matching bins are contiguous.
                    Some(first) => first..in_band.last().map_or(first + 1, |last| last + 1),
                    None => 0..0,
                }
            })
            .collect();

        Self { bands, bins }
    }

    /// The configured bands, in output order.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Whether no bands are configured.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Bin indices covered by band `index`.
    pub fn bin_range(&self, index: usize) -> Range<usize> {
        self.bins[index].clone()
    }

    /// Write the peak magnitude of each band into `out`.
    ///
    /// `magnitudes` is a spectrum from the transform this mapper was built
    /// for; `out` must have one slot per band. NaN bins never win the peak.
    pub fn peaks(&self, magnitudes: &[f32], out: &mut [f32]) {
        for (slot, range) in out.iter_mut().zip(&self.bins) {
            let end = range.end.min(magnitudes.len());
            let start = range.start.min(end);
            *slot = magnitudes[start..end].iter().fold(0.0, |peak, &m| if m > peak { m } else { peak });
        }
    }
}
