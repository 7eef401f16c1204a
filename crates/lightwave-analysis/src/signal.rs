//! Deterministic test signals for simulation, tests and benchmarks.

use std::f32::consts::PI;

/// Generate `len` samples of a sine at `frequency` Hz.
pub fn sine(frequency: f32, sample_rate: f32, len: usize, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * frequency * i as f32 / sample_rate).sin())
        .collect()
}

/// Generate a logarithmic sine sweep from `start_hz` to `end_hz` over `len` samples.
pub fn sweep(start_hz: f32, end_hz: f32, sample_rate: f32, len: usize, amplitude: f32) -> Vec<f32> {
    if len == 0 {
        return Vec::new();
    }
    let duration = len as f32 / sample_rate;
    let ratio = (end_hz / start_hz).ln();
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let phase = 2.0 * PI * start_hz * duration / ratio * ((t / duration * ratio).exp() - 1.0);
            amplitude * phase.sin()
        })
        .collect()
}

/// Generate white noise with a fixed seed.
pub fn noise(len: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    // xorshift32 never leaves zero
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            amplitude * (state as i32 as f32) / (i32::MAX as f32)
        })
        .collect()
}

/// Interleave equally long channels into one buffer (`[l0, r0, l1, r1, ...]`).
///
/// The output is as long as the shortest channel times the channel count.
pub fn interleave(channels: &[&[f32]]) -> Vec<f32> {
    let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len());
    for i in 0..frames {
        out.extend(channels.iter().map(|c| c[i]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peaks_at_amplitude() {
        let s = sine(1000.0, 48000.0, 480, 0.3);
        let peak = s.iter().fold(0.0f32, |m, x| m.max(x.abs()));
        assert!((peak - 0.3).abs() < 1e-3);
    }

    #[test]
    fn sweep_stays_bounded() {
        let s = sweep(20.0, 20000.0, 44100.0, 44100, 0.5);
        assert_eq!(s.len(), 44100);
        assert!(s.iter().all(|x| x.abs() <= 0.5 + 1e-6));
        assert!(sweep(20.0, 200.0, 44100.0, 0, 1.0).is_empty());
    }

    #[test]
    fn noise_is_reproducible() {
        assert_eq!(noise(64, 1.0, 7), noise(64, 1.0, 7));
        assert_ne!(noise(64, 1.0, 7), noise(64, 1.0, 8));
    }

    #[test]
    fn interleave_truncates_to_shortest() {
        let out = interleave(&[&[1.0, 2.0, 3.0], &[-1.0, -2.0]]);
        assert_eq!(out, vec![1.0, -1.0, 2.0, -2.0]);
    }
}
