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

//! Module for [`QrsDetector`].

use crate::filter::ZeroPhaseFilter;
use crate::local_maxima_iterator::{enforce_min_distance, LocalMaximaIterator};
use crate::record::EkgRecord;
use crate::{stages, DetectorConfig, Error};
use std::path::Path;

/// Result of a detection run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// The integrated signal the beats were extracted from. Useful for
    /// plotting and debugging; its index space is what [`Self::beats`]
    /// refers to.
    pub signal: Vec<f32>,
    /// Strictly increasing beat indices into [`Self::signal`]. No two
    /// entries are closer than the configured minimum peak distance.
    pub beats: Vec<usize>,
}

/// Locates QRS complexes in a complete, pre-recorded ECG signal.
///
/// The detector runs the classic Pan-Tompkins processing chain: a
/// zero-phase band-pass, differentiation, squaring and moving-sum
/// integration, followed by an adaptive threshold over the
/// outlier-clipped integrated signal and peak extraction with a
/// refractory distance.
///
/// A detector holds no state between runs; the same instance can process
/// any number of independent recordings.
///
/// ## Example
/// ```rust
/// use qrs_detector::{DetectorConfig, QrsDetector};
///
/// let detector = QrsDetector::new(DetectorConfig::default());
/// let samples: Vec<f32> = vec![0.0; 500 /* ... */];
/// let detection = detector.detect(&samples, 360.0).unwrap();
/// println!("found {} beats", detection.beats.len());
/// ```
#[derive(Debug, Clone)]
pub struct QrsDetector {
    config: DetectorConfig,
}

impl QrsDetector {
    /// Creates a new detector. Panics on a config that cannot describe a
    /// valid pipeline: an odd or zero filter order, a zero integration
    /// window, or a zero peak distance.
    pub fn new(config: DetectorConfig) -> Self {
        assert!(
            config.filter_order >= 2 && config.filter_order % 2 == 0,
            "filter order must be even and non-zero"
        );
        assert!(
            config.integration_window >= 1,
            "integration window must be non-zero"
        );
        assert!(
            config.min_peak_distance >= 1,
            "minimum peak distance must be non-zero"
        );
        Self { config }
    }

    /// The configuration the detector was created with.
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs the full detection pipeline over a raw signal.
    ///
    /// Returns the integrated signal and the beat indices into it.
    /// Fails fast with [`Error::InvalidSignal`] for a non-positive
    /// sampling rate or a signal shorter than the processing windows; no
    /// partial result is ever produced.
    pub fn detect(&self, samples: &[f32], sampling_rate_hz: f32) -> Result<Detection, Error> {
        if !(sampling_rate_hz.is_finite() && sampling_rate_hz > 0.0) {
            return Err(Error::InvalidSignal(format!(
                "sampling rate must be positive, got {sampling_rate_hz} Hz"
            )));
        }
        // The differentiated signal must still fill one integration
        // window, otherwise the moving sum and everything after it work
        // on padding only.
        if samples.len() <= self.config.integration_window {
            return Err(Error::InvalidSignal(format!(
                "signal of {} sample(s) is too short for an integration window of {}",
                samples.len(),
                self.config.integration_window
            )));
        }

        log::debug!(
            "detecting beats in {} samples at {} Hz",
            samples.len(),
            sampling_rate_hz
        );

        // Band-pass: low-pass then high-pass, both zero-phase.
        let lowpass = ZeroPhaseFilter::lowpass(
            sampling_rate_hz,
            self.config.high_cutoff_hz,
            self.config.filter_order,
        )?;
        let highpass = ZeroPhaseFilter::highpass(
            sampling_rate_hz,
            self.config.low_cutoff_hz,
            self.config.filter_order,
        )?;
        let bandpassed = highpass.apply(&lowpass.apply(samples));

        let differentiated = stages::differentiate(&bandpassed);
        let squared = stages::square(&differentiated);
        let integrated = stages::integrate(&squared, self.config.integration_window);

        // The threshold is derived from an outlier-clipped copy so that a
        // single artifact cannot push it above all regular beats. Peaks
        // are still extracted from the unclipped signal.
        let clipped = stages::clip_outliers(&integrated, self.config.outlier_z_score);
        let clipped_max = clipped.iter().copied().fold(f32::MIN, f32::max);
        let height = clipped_max * self.config.threshold_fraction;
        log::debug!("peak acceptance threshold: {height}");

        let candidates = LocalMaximaIterator::new(&integrated, height).collect::<Vec<_>>();
        let beats = enforce_min_distance(&candidates, self.config.min_peak_distance);

        Ok(Detection {
            signal: integrated,
            beats,
        })
    }

    /// Loads an ECG record from a CSV file and runs [`Self::detect`] on
    /// its first signal channel.
    ///
    /// An empty path yields an empty [`Detection`] without touching the
    /// filesystem. This mirrors how batch drivers probe optional inputs.
    pub fn detect_in_file<P: AsRef<Path>>(&self, path: P) -> Result<Detection, Error> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Ok(Detection::default());
        }

        let record = EkgRecord::from_file(path)?;
        let sampling_rate_hz = record.sampling_rate_hz()?;
        let samples = record.channel(0).ok_or_else(|| {
            Error::InvalidSignal("record contains no signal channels".to_string())
        })?;
        self.detect(samples, sampling_rate_hz)
    }
}
