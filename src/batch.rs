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

//! Evaluation of the detector over a whole set of recordings.
//!
//! Each record is one `<stem>.csv` signal file plus a
//! `<stem>_annotations.txt` ground-truth file in the same directory. Runs
//! are independent; a record that fails to load or process is collected
//! as a failure and must never abort the remaining records.

use crate::annotations::load_annotations;
use crate::matching::{match_detections, DetectionStats};
use crate::{Error, MatchConfig, QrsDetector};
use std::path::Path;

/// Score of one successfully evaluated record.
#[derive(Debug, Clone)]
pub struct RecordEvaluation {
    /// The record's file stem, e.g. `mitdb_100`.
    pub stem: String,
    /// Number of detected beats.
    pub beat_count: usize,
    /// TP/FP/FN of the detection against the record's annotations.
    pub stats: DetectionStats,
}

/// Outcome of a batch run: the per-record scores plus the records that
/// failed, with the error that stopped each of them.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub evaluations: Vec<RecordEvaluation>,
    pub failures: Vec<(String, Error)>,
}

impl BatchReport {
    /// Mean F1 score over the successfully evaluated records, or `None`
    /// if there were none.
    pub fn mean_f1(&self) -> Option<f32> {
        if self.evaluations.is_empty() {
            return None;
        }
        let sum: f32 = self
            .evaluations
            .iter()
            .map(|evaluation| evaluation.stats.f1_score())
            .sum();
        Some(sum / self.evaluations.len() as f32)
    }
}

/// Runs detection and scoring for every record stem, isolating failures
/// per record.
pub fn evaluate_records<S: AsRef<str>>(
    data_dir: &Path,
    stems: &[S],
    detector: &QrsDetector,
    match_config: &MatchConfig,
) -> BatchReport {
    let mut report = BatchReport::default();

    for stem in stems {
        let stem = stem.as_ref();
        match evaluate_record(data_dir, stem, detector, match_config) {
            Ok(evaluation) => report.evaluations.push(evaluation),
            Err(err) => {
                log::warn!("record '{stem}' failed: {err}");
                report.failures.push((stem.to_string(), err));
            }
        }
    }

    report
}

fn evaluate_record(
    data_dir: &Path,
    stem: &str,
    detector: &QrsDetector,
    match_config: &MatchConfig,
) -> Result<RecordEvaluation, Error> {
    let signal_path = data_dir.join(format!("{stem}.csv"));
    let annotation_path = data_dir.join(format!("{stem}_annotations.txt"));

    let detection = detector.detect_in_file(&signal_path)?;
    let annotations = load_annotations(&annotation_path)?;

    let result = match_detections(&detection.beats, &annotations, match_config);
    Ok(RecordEvaluation {
        stem: stem.to_string(),
        beat_count: detection.beats.len(),
        stats: DetectionStats::from(&result),
    })
}
