//! Windowed real-input FFT producing a normalised magnitude spectrum.

use rustfft::{Fft, FftPlanner, num_complex::Complex};
use std::f32::consts::PI;
use std::sync::Arc;

use crate::{AnalysisError, Result};

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Rectangular (no windowing)
    Rectangular,
    /// Hann window (raised cosine), symmetric form
    #[default]
    Hann,
}

impl Window {
    /// Apply window to a buffer
    pub fn apply(&self, buffer: &mut [f32]) {
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                let denom = (buffer.len().max(2) - 1) as f32;
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos());
                    *sample *= w;
                }
            }
        }
    }

    /// Get window coefficients
    pub fn coefficients(&self, size: usize) -> Vec<f32> {
        let mut coeffs = vec![1.0; size];
        self.apply(&mut coeffs);
        coeffs
    }
}

/// Hann-windowed FFT over a fixed window length.
///
/// Holds the FFT plan, the window table and every scratch buffer, so
/// [`magnitudes`](Self::magnitudes) does no allocation. Output bin `k` sits at
/// `k * sample_rate / size` Hz; there are `size / 2 + 1` bins from DC to
/// Nyquist, each magnitude divided by `size / 2`.
///
/// The same input always produces bit-identical output for a given size.
pub struct SpectralTransform {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
    size: usize,
}

impl SpectralTransform {
    /// Create a transform for windows of `size` samples (a power of two).
    pub fn new(size: usize) -> Result<Self> {
        Self::with_window(size, Window::Hann)
    }

    /// Create a transform with an explicit window function.
    pub fn with_window(size: usize, window: Window) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(AnalysisError::InvalidWindowSize(size));
        }

        let fft = FftPlanner::new().plan_fft_forward(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Ok(Self {
            fft,
            window: window.coefficients(size),
            buffer: vec![Complex::new(0.0, 0.0); size],
            scratch,
            magnitudes: vec![0.0; size / 2 + 1],
            size,
        })
    }

    /// Window length in samples.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of output bins (`size / 2 + 1`).
    pub fn bin_count(&self) -> usize {
        self.magnitudes.len()
    }

    /// Centre frequency of bin `k` in Hz.
    pub fn bin_frequency(&self, k: usize, sample_rate: f32) -> f32 {
        k as f32 * (sample_rate / self.size as f32)
    }

    /// Window `samples` in place and return the normalised magnitude spectrum.
    ///
    /// `samples` must hold exactly [`size`](Self::size) samples; it is
    /// consumed by the windowing and should be treated as scratch afterwards.
    pub fn magnitudes(&mut self, samples: &mut [f32]) -> &[f32] {
        assert_eq!(samples.len(), self.size, "window length must equal the FFT size");

        for ((sample, &w), slot) in samples.iter_mut().zip(&self.window).zip(&mut self.buffer) {
            *sample *= w;
            *slot = Complex::new(*sample, 0.0);
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        // DC and Nyquist come back with a zero imaginary part; norm() handles
        // them like any other bin.
        let scale = 1.0 / (self.size as f32 / 2.0);
        for (mag, c) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *mag = c.norm() * scale;
        }

        &self.magnitudes
    }
}

impl std::fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}
