//! Criterion benchmarks for lightwave-analysis components
//!
//! Run with: cargo bench -p lightwave-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lightwave_analysis::{
    Analyzer, AnalyzerSettings, BandMapper, DEFAULT_BANDS, LoudnessNormalizer, SpectralTransform,
    signal,
};

const SAMPLE_RATE: f32 = 44100.0;

// ============================================================================
// Stage benchmarks
// ============================================================================

fn bench_spectral_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpectralTransform");

    for &size in &[512, 1024, 2048, 4096, 8192] {
        let mut transform = SpectralTransform::new(size).unwrap();
        let input = signal::sine(440.0, SAMPLE_RATE, size, 0.5);
        let mut window = input.clone();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                window.copy_from_slice(&input);
                black_box(transform.magnitudes(black_box(&mut window))[1])
            })
        });
    }

    group.finish();
}

fn bench_band_peaks(c: &mut Criterion) {
    let size = 4096;
    let mapper = BandMapper::new(DEFAULT_BANDS.to_vec(), SAMPLE_RATE, size);
    let magnitudes = signal::noise(size / 2 + 1, 1.0, 42);
    let mut peaks = [0.0; 6];

    c.bench_function("BandMapper_peaks_4096", |b| {
        b.iter(|| {
            mapper.peaks(black_box(&magnitudes), &mut peaks);
            black_box(peaks)
        })
    });
}

fn bench_loudness(c: &mut Criterion) {
    let loudness = LoudnessNormalizer::default();
    let peaks = signal::noise(1024, 1.0, 7);

    c.bench_function("LoudnessNormalizer_1024", |b| {
        b.iter(|| {
            let mut acc = 0u32;
            for &p in &peaks {
                acc += u32::from(loudness.intensity(black_box(p.abs())));
            }
            black_box(acc)
        })
    });
}

// ============================================================================
// Full analyzer
// ============================================================================

fn bench_analyzer_callback_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyzer_push");
    let settings = AnalyzerSettings::default();
    let input = signal::sweep(40.0, 16000.0, SAMPLE_RATE, settings.window_size * 4, 0.5);

    // Typical host callback sizes
    for &batch in &[128, 441, 512, 1024] {
        let mut analyzer = Analyzer::new(settings, DEFAULT_BANDS.to_vec()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(batch), &batch, |b, &batch| {
            b.iter(|| {
                let mut frames = 0;
                for chunk in input.chunks(batch) {
                    analyzer.push(black_box(chunk), |levels| {
                        black_box(levels);
                        frames += 1;
                    });
                }
                black_box(frames)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_spectral_transform,
    bench_band_peaks,
    bench_loudness,
    bench_analyzer_callback_sizes,
);

criterion_main!(benches);
