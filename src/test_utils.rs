/*
MIT License

Copyright (c) 2024 Philipp Schuster

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Test helpers: synthetic ECG generation and on-disk fixtures.
//!
//! Real ECG recordings are too large to ship with the crate, so the tests
//! work on generated pulse trains with known beat positions. The spikes
//! are much sharper than everything around them, which is exactly the
//! property the detection pipeline keys on.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::path::PathBuf;

/// Amplitude shape of one synthetic QRS spike, centered on the beat
/// position. Sharp rise, sharp biphasic fall.
const QRS_SHAPE: [f32; 5] = [0.1, 0.5, 1.0, -0.5, -0.15];

/// Generates a synthetic ECG: a flat baseline with slow wander, a little
/// noise, and one sharp spike per entry of `beat_positions`.
///
/// Positions must leave room for the spike shape and should stay away
/// from the signal edges, where the filter transients live.
pub fn synthetic_ecg(beat_positions: &[usize], len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(0x5EED);

    let mut samples = (0..len)
        .map(|i| {
            // Baseline wander around 0.4 Hz at 360 Hz sampling, well below
            // the high-pass cutoff.
            let wander = 0.1 * libm::sinf(i as f32 * 0.007);
            wander + rng.random_range(-0.01..0.01)
        })
        .collect::<Vec<f32>>();

    for &position in beat_positions {
        assert!(position >= 2 && position + 2 < len, "spike out of bounds");
        for (offset, amplitude) in QRS_SHAPE.iter().enumerate() {
            samples[position - 2 + offset] += amplitude;
        }
    }

    samples
}

/// Returns the cargo target dir.
pub fn target_dir() -> PathBuf {
    // 1. Check if CARGO_TARGET_DIR is set
    if let Ok(dir) = std::env::var("CARGO_TARGET_DIR") {
        PathBuf::from(dir)
    } else {
        // 2. Fall back to default: go up from CARGO_MANIFEST_DIR
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        manifest_dir.join("target")
    }
}

/// Returns a directory within the cargo target dir to store test artifacts.
pub fn target_dir_test_artifacts() -> PathBuf {
    let mut path = target_dir();
    path.push("test_generated");
    std::fs::create_dir_all(&path).unwrap();
    path
}

/// Writes a record CSV in the layout the loader expects: two header rows,
/// then `timestamp,value` rows. Returns the file path.
pub fn write_record_csv(name: &str, samples: &[f32], sampling_rate_hz: f32) -> PathBuf {
    let mut path = target_dir_test_artifacts();
    path.push(format!("{name}.csv"));

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "'Elapsed time','V1'").unwrap();
    writeln!(file, "'seconds','mV'").unwrap();
    for (i, sample) in samples.iter().enumerate() {
        writeln!(file, "{:.6},{}", i as f32 / sampling_rate_hz, sample).unwrap();
    }
    path
}

/// Writes an annotation file in the layout the parser expects: one header
/// row, then one beat row per index. Returns the file path.
pub fn write_annotations(name: &str, beat_indices: &[usize]) -> PathBuf {
    let mut path = target_dir_test_artifacts();
    path.push(format!("{name}_annotations.txt"));

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "      Time   Sample #  Type  Sub Chan  Num").unwrap();
    for &index in beat_indices {
        writeln!(file, "   0:00.000   {index:8}     N    0    0    0").unwrap();
    }
    path
}

/// Writes a file that is not a valid record, for failure-isolation tests.
pub fn write_corrupt_record_csv(name: &str) -> PathBuf {
    let mut path = target_dir_test_artifacts();
    path.push(format!("{name}.csv"));
    std::fs::write(&path, "header\nheader\nthis,is\nnot,numeric\n").unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn synthetic_ecg_has_spikes_at_positions() {
        let samples = synthetic_ecg(&[100, 300], 400);
        assert_eq!(samples.len(), 400);
        // The spike clearly towers over baseline wander plus noise.
        check!(samples[100] > 0.8);
        check!(samples[300] > 0.8);
        check!(samples[200].abs() < 0.2);
    }

    #[test]
    fn synthetic_ecg_is_deterministic() {
        assert_eq!(synthetic_ecg(&[50], 200), synthetic_ecg(&[50], 200));
    }
}
