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

//! Module for [`ZeroPhaseFilter`].

use crate::Error;
use biquad::{Biquad, Coefficients, DirectForm1, Errors, Hertz, Type};
use core::f32::consts::PI;

/// A Butterworth low- or high-pass filter of even order, applied forward
/// and then backward over the signal (filtfilt).
///
/// The forward pass shifts every frequency component in time; running the
/// same filter again over the reversed output cancels that shift exactly.
/// Zero phase matters here: the later outlier and threshold steps work
/// with fixed sample distances and would misalign with the original
/// timing otherwise.
///
/// The filter is realized as a cascade of second-order sections with the
/// Butterworth pole quality factors, so an order of 4 means two biquad
/// stages per pass.
#[derive(Debug, Clone)]
pub(crate) struct ZeroPhaseFilter {
    sections: Vec<Coefficients<f32>>,
}

impl ZeroPhaseFilter {
    /// Creates a low-pass filter with the given cutoff.
    pub fn lowpass(sampling_rate_hz: f32, cutoff_hz: f32, order: usize) -> Result<Self, Error> {
        Self::new(Type::LowPass, sampling_rate_hz, cutoff_hz, order)
    }

    /// Creates a high-pass filter with the given cutoff.
    pub fn highpass(sampling_rate_hz: f32, cutoff_hz: f32, order: usize) -> Result<Self, Error> {
        Self::new(Type::HighPass, sampling_rate_hz, cutoff_hz, order)
    }

    fn new(
        filter_type: Type<f32>,
        sampling_rate_hz: f32,
        cutoff_hz: f32,
        order: usize,
    ) -> Result<Self, Error> {
        assert!(order >= 2 && order % 2 == 0, "filter order must be even");

        let fs = hertz(sampling_rate_hz)?;
        let f0 = hertz(cutoff_hz)?;

        let sections = butterworth_cascade_qs(order)
            .into_iter()
            .map(|q| {
                Coefficients::<f32>::from_params(filter_type, fs, f0, q).map_err(|err| {
                    Error::InvalidSignal(format!(
                        "cannot design filter with cutoff {} Hz at sampling rate {} Hz: {}",
                        cutoff_hz,
                        sampling_rate_hz,
                        describe_biquad_error(err)
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { sections })
    }

    /// Runs the filter cascade forward over the samples, then backward
    /// over the intermediate result. Each pass starts from zeroed filter
    /// state. The output has the same length as the input.
    pub fn apply(&self, samples: &[f32]) -> Vec<f32> {
        let forward = self.run_cascade(samples.iter().copied());
        let mut output = self.run_cascade(forward.iter().rev().copied());
        output.reverse();
        output
    }

    fn run_cascade(&self, samples: impl Iterator<Item = f32>) -> Vec<f32> {
        let mut stages = self
            .sections
            .iter()
            .map(|&coefficients| DirectForm1::<f32>::new(coefficients))
            .collect::<Vec<_>>();
        samples
            .map(|sample| {
                stages
                    .iter_mut()
                    .fold(sample, |value, stage| stage.run(value))
            })
            .collect()
    }
}

fn hertz(value: f32) -> Result<Hertz<f32>, Error> {
    Hertz::<f32>::from_hz(value).map_err(|err| {
        Error::InvalidSignal(format!(
            "{} Hz is not a valid frequency: {}",
            value,
            describe_biquad_error(err)
        ))
    })
}

fn describe_biquad_error(err: Errors) -> &'static str {
    match err {
        Errors::OutsideNyquist => "cutoff is at or above the Nyquist frequency",
        Errors::NegativeQ => "negative quality factor",
        Errors::NegativeFrequency => "frequency is not positive",
    }
}

/// Quality factors of the second-order sections that make up an even-order
/// Butterworth filter: `1 / (2 * cos((2k + 1) * pi / (2 * order)))`.
///
/// For order 4 this yields the canonical pair 0.5412 and 1.3066.
fn butterworth_cascade_qs(order: usize) -> Vec<f32> {
    debug_assert!(order >= 2 && order % 2 == 0);
    (0..order / 2)
        .map(|k| {
            let pole_angle = PI * (2 * k + 1) as f32 / (2.0 * order as f32);
            1.0 / (2.0 * libm::cosf(pole_angle))
        })
        .collect()
}
