//! Fixed-size window accumulation from arbitrarily sized capture batches.

/// Collects samples into windows of exactly `size` samples.
///
/// Capture callbacks deliver whatever batch size the host chooses. The
/// accumulator copies them into one window buffer and hands the buffer out
/// each time it fills, so downstream analysis runs exactly once per `size`
/// samples no matter how batches line up. A batch that overruns the window
/// carries into the next one; nothing is dropped.
///
/// # Example
///
/// ```rust
/// use lightwave_analysis::WindowAccumulator;
///
/// let mut acc = WindowAccumulator::new(4);
/// let mut seen = Vec::new();
///
/// acc.push(&[1.0, 2.0, 3.0], |w| seen.push(w.to_vec()));
/// assert!(seen.is_empty());
///
/// acc.push(&[4.0, 5.0, 6.0, 7.0, 8.0, 9.0], |w| seen.push(w.to_vec()));
/// assert_eq!(seen, vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]]);
/// assert_eq!(acc.pending(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct WindowAccumulator {
    buffer: Vec<f32>,
    filled: usize,
    completed: u64,
}

impl WindowAccumulator {
    /// Creates an empty accumulator for windows of `size` samples.
    ///
    /// `size` must be non-zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "window size must be non-zero");
        Self {
            buffer: vec![0.0; size],
            filled: 0,
            completed: 0,
        }
    }

    /// Window length in samples.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Samples waiting in the partially filled window.
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Windows completed since creation.
    pub fn windows_completed(&self) -> u64 {
        self.completed
    }

    /// Discards the partial window.
    pub fn reset(&mut self) {
        self.filled = 0;
    }

    /// Appends a mono batch, calling `on_full` once per window completed.
    ///
    /// The window is lent mutably so the callee can transform it in place;
    /// its contents are overwritten by later samples. Returns the number of
    /// windows completed by this batch.
    pub fn push<F>(&mut self, samples: &[f32], mut on_full: F) -> usize
    where
        F: FnMut(&mut [f32]),
    {
        let size = self.buffer.len();
        let mut rest = samples;
        let mut completed = 0;

        while !rest.is_empty() {
            let take = (size - self.filled).min(rest.len());
            self.buffer[self.filled..self.filled + take].copy_from_slice(&rest[..take]);
            self.filled += take;
            rest = &rest[take..];

            if self.filled == size {
                on_full(&mut self.buffer);
                self.filled = 0;
                self.completed += 1;
                completed += 1;
            }
        }

        completed
    }

    /// Appends channel 0 of an interleaved batch.
    ///
    /// `data` holds frames of `channels` samples each; only the first sample
    /// of every frame is analysed. A trailing partial frame still contributes
    /// its first sample. `channels == 0` is treated as mono.
    pub fn push_interleaved<F>(&mut self, data: &[f32], channels: usize, mut on_full: F) -> usize
    where
        F: FnMut(&mut [f32]),
    {
        let stride = channels.max(1);
        if stride == 1 {
            return self.push(data, on_full);
        }

        let size = self.buffer.len();
        let mut completed = 0;

        for frame in data.chunks(stride) {
            self.buffer[self.filled] = frame[0];
            self.filled += 1;

            if self.filled == size {
                on_full(&mut self.buffer);
                self.filled = 0;
                self.completed += 1;
                completed += 1;
            }
        }

        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_of_window() {
        let mut acc = WindowAccumulator::new(8);
        let mut calls = 0;
        let n = acc.push(&[0.0; 24], |_| calls += 1);
        assert_eq!(n, 3);
        assert_eq!(calls, 3);
        assert_eq!(acc.pending(), 0);
        assert_eq!(acc.windows_completed(), 3);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut acc = WindowAccumulator::new(8);
        assert_eq!(acc.push(&[], |_| panic!("no window expected")), 0);
    }

    #[test]
    fn windows_preserve_sample_order_across_batches() {
        let mut acc = WindowAccumulator::new(3);
        let mut windows = Vec::new();
        for batch in [&[1.0][..], &[2.0, 3.0, 4.0, 5.0][..], &[6.0][..]] {
            acc.push(batch, |w| windows.push(w.to_vec()));
        }
        assert_eq!(windows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn interleaved_takes_first_channel() {
        let mut acc = WindowAccumulator::new(3);
        let mut windows = Vec::new();
        let stereo = [1.0, -1.0, 2.0, -2.0, 3.0, -3.0, 4.0, -4.0];
        acc.push_interleaved(&stereo, 2, |w| windows.push(w.to_vec()));
        assert_eq!(windows, vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(acc.pending(), 1);
    }

    #[test]
    fn zero_channels_is_mono() {
        let mut acc = WindowAccumulator::new(2);
        assert_eq!(acc.push_interleaved(&[1.0, 2.0], 0, |_| {}), 1);
    }

    #[test]
    fn reset_drops_partial_window() {
        let mut acc = WindowAccumulator::new(4);
        acc.push(&[1.0, 2.0], |_| {});
        acc.reset();
        assert_eq!(acc.pending(), 0);
    }
}
