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

//! The sample-domain stages of the detection pipeline: differentiation,
//! squaring, moving-sum integration, and outlier clipping.
//!
//! Each stage consumes the previous stage's output in full and produces a
//! new signal. No stage reorders samples.

/// First difference of consecutive samples. Approximates the derivative
/// and emphasizes the steep slopes of the QRS complex.
///
/// The output is one sample shorter than the input.
pub(crate) fn differentiate(samples: &[f32]) -> Vec<f32> {
    debug_assert!(samples.len() >= 2);
    samples.windows(2).map(|pair| pair[1] - pair[0]).collect()
}

/// Squares every sample. All values become non-negative and larger slopes
/// are emphasized nonlinearly.
pub(crate) fn square(samples: &[f32]) -> Vec<f32> {
    samples.iter().map(|&sample| sample * sample).collect()
}

/// Moving-sum integration: convolution with a rectangular window of ones
/// in full mode. The output has `samples.len() + window - 1` entries and
/// approximates the energy in a sliding window around the QRS complex.
pub(crate) fn integrate(samples: &[f32], window: usize) -> Vec<f32> {
    debug_assert!(window >= 1);

    let out_len = samples.len() + window - 1;
    let mut out = Vec::with_capacity(out_len);
    let mut running_sum = 0.0;
    for k in 0..out_len {
        if k < samples.len() {
            running_sum += samples[k];
        }
        if k >= window {
            running_sum -= samples[k - window];
        }
        out.push(running_sum);
    }
    out
}

/// Mean and population standard deviation of the signal.
pub(crate) fn mean_and_std(samples: &[f32]) -> (f32, f32) {
    debug_assert!(!samples.is_empty());

    let n = samples.len() as f32;
    let mean = samples.iter().sum::<f32>() / n;
    let variance = samples
        .iter()
        .map(|&sample| {
            let diff = sample - mean;
            diff * diff
        })
        .sum::<f32>()
        / n;
    (mean, libm::sqrtf(variance))
}

/// Caps every sample exceeding `mean + z * std` to that value. Samples are
/// capped, not removed, so the signal length is unchanged. The returned
/// copy is only used to derive the peak threshold; peaks are still
/// extracted from the unclipped signal.
pub(crate) fn clip_outliers(samples: &[f32], z_score: f32) -> Vec<f32> {
    let (mean, std) = mean_and_std(samples);
    let cap = mean + z_score * std;
    samples
        .iter()
        .map(|&sample| if sample > cap { cap } else { sample })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use float_cmp::approx_eq;

    #[test]
    fn differentiate_is_first_difference() {
        let samples = [1.0, 4.0, 2.0, 2.0, -3.0];
        assert_eq!(differentiate(&samples), [3.0, -2.0, 0.0, -5.0]);
        assert_eq!(differentiate(&samples).len(), samples.len() - 1);
    }

    #[test]
    fn square_is_pointwise_and_non_negative() {
        let samples = [-2.0, 0.0, 0.5, 3.0];
        let squared = square(&samples);
        assert_eq!(squared, [4.0, 0.0, 0.25, 9.0]);
        check!(squared.iter().all(|&sample| sample >= 0.0));
    }

    #[test]
    fn integrate_matches_full_convolution() {
        // np.convolve([1, 2, 3], [1, 1]) == [1, 3, 5, 3]
        assert_eq!(integrate(&[1.0, 2.0, 3.0], 2), [1.0, 3.0, 5.0, 3.0]);
        // np.convolve([1, 1, 1], [1, 1, 1, 1]) == [1, 2, 3, 3, 2, 1]
        assert_eq!(
            integrate(&[1.0, 1.0, 1.0], 4),
            [1.0, 2.0, 3.0, 3.0, 2.0, 1.0]
        );
    }

    #[test]
    fn integrate_output_length() {
        let samples = vec![0.25; 1000];
        assert_eq!(integrate(&samples, 20).len(), 1019);
    }

    #[test]
    fn mean_and_std_on_known_values() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        check!(approx_eq!(f32, mean, 5.0, epsilon = 1e-6));
        check!(approx_eq!(f32, std, 2.0, epsilon = 1e-6));
    }

    #[test]
    fn clip_outliers_never_increases_samples() {
        let samples = [1.0, 1.0, 1.0, 1.0, 100.0];
        let clipped = clip_outliers(&samples, 1.4);
        assert_eq!(clipped.len(), samples.len());
        for (&original, &capped) in samples.iter().zip(clipped.iter()) {
            check!(capped <= original);
        }
        // The artifact must actually have been capped.
        check!(clipped[4] < 100.0);
    }

    #[test]
    fn clip_outliers_keeps_samples_below_cap() {
        let samples = [1.0, 2.0, 3.0, 2.0, 1.0];
        let (mean, std) = mean_and_std(&samples);
        let cap = mean + 1.4 * std;
        let clipped = clip_outliers(&samples, 1.4);
        for (&original, &capped) in samples.iter().zip(clipped.iter()) {
            if original <= cap {
                assert_eq!(original, capped);
            }
        }
    }
}
