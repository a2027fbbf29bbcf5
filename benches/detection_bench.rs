use criterion::{criterion_group, criterion_main, Criterion};
use qrs_detector::{DetectorConfig, QrsDetector};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    // Roughly 30 seconds of ECG at 360 Hz with a beat every 400 samples.
    let beats = (1..26).map(|i| i * 400).collect::<Vec<_>>();
    let samples = helpers::synthetic_ecg(&beats, 11000);

    let detector = QrsDetector::new(DetectorConfig::default());
    c.bench_function("full detection pipeline over 11000 samples", |b| {
        b.iter(|| {
            let _ = detector.detect(black_box(&samples), black_box(360.0));
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

mod helpers {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Generates a flat signal with noise and one sharp spike per beat
    /// position.
    pub fn synthetic_ecg(beat_positions: &[usize], len: usize) -> Vec<f32> {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut samples = (0..len)
            .map(|_| rng.random_range(-0.01..0.01))
            .collect::<Vec<f32>>();
        for &position in beat_positions {
            assert!(position >= 2 && position + 2 < len);
            for (offset, amplitude) in [0.1_f32, 0.5, 1.0, -0.5, -0.15].into_iter().enumerate() {
                samples[position - 2 + offset] += amplitude;
            }
        }
        samples
    }
}
