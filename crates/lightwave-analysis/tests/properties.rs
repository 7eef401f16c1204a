//! Property-based tests for windowing and loudness mapping.

use lightwave_analysis::{
    Analyzer, AnalyzerSettings, Band, LoudnessNormalizer, WindowAccumulator, signal,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// However the capture host slices the stream, the accumulator emits the
    /// same windows in the same order and keeps the remainder pending.
    #[test]
    fn windows_independent_of_batching(
        len in 0usize..2000,
        cuts in prop::collection::vec(1usize..300, 1..40),
    ) {
        let input: Vec<f32> = (0..len).map(|i| i as f32).collect();

        let mut reference = WindowAccumulator::new(128);
        let mut expected = Vec::new();
        reference.push(&input, |w| expected.push(w.to_vec()));

        let mut acc = WindowAccumulator::new(128);
        let mut actual = Vec::new();
        let mut rest = &input[..];
        for &cut in cuts.iter().cycle() {
            if rest.is_empty() {
                break;
            }
            let (head, tail) = rest.split_at(cut.min(rest.len()));
            acc.push(head, |w| actual.push(w.to_vec()));
            rest = tail;
        }

        prop_assert_eq!(actual.len(), len / 128);
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(acc.pending(), len % 128);
    }

    /// Intensity never decreases as the peak grows, for any valid dB window.
    #[test]
    fn intensity_is_monotonic(
        min_db in -120.0f32..-1.0,
        span in 1.0f32..100.0,
        a in 0.0f32..4.0,
        b in 0.0f32..4.0,
    ) {
        let loudness = LoudnessNormalizer::new(min_db, min_db + span).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(loudness.intensity(lo) <= loudness.intensity(hi));
    }

    /// Any finite input yields one frame per window with one level per band.
    #[test]
    fn analyzer_frame_shape(
        amplitude in 0.0f32..2.0,
        seed in any::<u32>(),
        windows in 1usize..4,
    ) {
        let settings = AnalyzerSettings { window_size: 256, ..AnalyzerSettings::default() };
        let bands = vec![Band::new(0.0, 1000.0), Band::new(1000.0, 5000.0), Band::new(5000.0, 22050.0)];
        let mut analyzer = Analyzer::new(settings, bands).unwrap();

        let input = signal::noise(settings.window_size * windows, amplitude, seed);
        let mut frames = 0;
        let completed = analyzer.push(&input, |levels| {
            assert_eq!(levels.len(), 3);
            frames += 1;
        });
        prop_assert_eq!(completed, windows);
        prop_assert_eq!(frames, windows);
    }
}
