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

//! qrs-detector locates heartbeats (QRS complexes) in pre-recorded ECG
//! recordings and scores the detections against ground-truth annotations.
//!
//! # Detection
//!
//! [`QrsDetector`] runs the classic multi-stage chain over a complete
//! signal:
//!
//! 1. zero-phase Butterworth band-pass (low-pass, then high-pass),
//! 2. differentiation,
//! 3. squaring,
//! 4. moving-sum integration,
//! 5. adaptive threshold over an outlier-clipped copy,
//! 6. peak extraction with a refractory minimum distance.
//!
//! The result is the integrated signal plus a strictly increasing list of
//! beat indices into it. All tuning constants live in
//! [`DetectorConfig`].
//!
//! # Scoring
//!
//! [`match_detections`] partitions a detection set and an annotation set
//! into matched pairs, false positives and false negatives;
//! [`DetectionStats`] derives the F1 score from that partition.
//! [`evaluate_records`] drives both over a whole directory of recordings,
//! isolating failures per record.
//!
//! Input is always a complete, pre-recorded signal. There is no streaming
//! mode and no state kept between runs.

mod annotations;
mod batch;
mod config;
mod detector;
mod error;
mod filter;
mod local_maxima_iterator;
mod matching;
mod record;
mod stages;

#[cfg(test)]
mod test_utils;

pub use annotations::{load_annotations, parse_annotations};
pub use batch::{evaluate_records, BatchReport, RecordEvaluation};
pub use config::{
    DetectorConfig, MatchConfig, DEFAULT_FILTER_ORDER, DEFAULT_HIGH_CUTOFF_HZ,
    DEFAULT_INTEGRATION_WINDOW, DEFAULT_LOW_CUTOFF_HZ, DEFAULT_MATCH_TOLERANCE,
    DEFAULT_MIN_PEAK_DISTANCE, DEFAULT_OUTLIER_Z_SCORE, DEFAULT_THRESHOLD_FRACTION,
};
pub use detector::{Detection, QrsDetector};
pub use error::Error;
pub use local_maxima_iterator::{LocalMaximaIterator, PeakInfo};
pub use matching::{match_detections, DetectionStats, MatchResult};
pub use record::EkgRecord;
