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

//! Module for [`match_detections`] and [`DetectionStats`].

use crate::MatchConfig;

/// Partition of a detection set and an annotation set into matched pairs,
/// unmatched detections (false positives) and unmatched annotations
/// (false negatives).
///
/// Every detection and every annotation appears in exactly one of the
/// three lists, and matched pairs are one-to-one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// `(detection, annotation)` pairs, in increasing detection order.
    pub matched: Vec<(usize, usize)>,
    /// Detections without an annotation within tolerance.
    pub unmatched_detections: Vec<usize>,
    /// Annotations no detection was matched to.
    pub unmatched_annotations: Vec<usize>,
}

/// Matches detected beat indices against ground-truth annotations.
///
/// Greedy nearest-neighbor, single pass: each detection, in increasing
/// order, is matched to the closest annotation within the tolerance
/// window that no earlier detection has consumed. Equidistant candidates
/// resolve to the earlier annotation. Whatever annotations remain
/// afterwards are the false negatives.
///
/// Both inputs must be strictly increasing, as produced by the detector
/// and the annotation loader.
pub fn match_detections(
    detections: &[usize],
    annotations: &[usize],
    config: &MatchConfig,
) -> MatchResult {
    debug_assert!(detections.windows(2).all(|pair| pair[0] < pair[1]));
    debug_assert!(annotations.windows(2).all(|pair| pair[0] < pair[1]));

    let tolerance = config.tolerance;
    let mut consumed = vec![false; annotations.len()];
    let mut result = MatchResult::default();

    for &detection in detections {
        let nearest = nearest_free_annotation(annotations, &consumed, detection, tolerance);
        match nearest {
            Some(annotation_index) => {
                consumed[annotation_index] = true;
                result
                    .matched
                    .push((detection, annotations[annotation_index]));
            }
            None => result.unmatched_detections.push(detection),
        }
    }

    result.unmatched_annotations = annotations
        .iter()
        .zip(consumed)
        .filter_map(|(&annotation, used)| (!used).then_some(annotation))
        .collect();

    result
}

/// Index of the closest not-yet-consumed annotation within `tolerance`
/// samples of `detection`, or `None`. Ties resolve to the earlier
/// annotation.
fn nearest_free_annotation(
    annotations: &[usize],
    consumed: &[bool],
    detection: usize,
    tolerance: usize,
) -> Option<usize> {
    // First annotation at or after the detection.
    let split = annotations.partition_point(|&annotation| annotation < detection);

    let mut best: Option<(usize, usize)> = None;
    let mut consider = |index: usize| {
        if consumed[index] {
            return;
        }
        let distance = annotations[index].abs_diff(detection);
        if distance > tolerance {
            return;
        }
        let closer = match best {
            // Strictly closer wins; on equal distance the candidate seen
            // first keeps its spot.
            Some((_, best_distance)) => distance < best_distance,
            None => true,
        };
        if closer {
            best = Some((index, distance));
        }
    };

    // Candidates below the detection, nearest first. Considering these
    // before the upper half makes an equidistant pair resolve to the
    // lower, i.e. earlier, annotation.
    for index in (0..split).rev() {
        if annotations[index] + tolerance < detection {
            break;
        }
        consider(index);
    }
    // Candidates at or above the detection.
    for index in split..annotations.len() {
        if annotations[index] > detection + tolerance {
            break;
        }
        consider(index);
    }
    best.map(|(index, _)| index)
}

/// Detection quality derived from a [`MatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionStats {
    /// Detections with a matching annotation.
    pub true_positives: usize,
    /// Detections without a matching annotation.
    pub false_positives: usize,
    /// Annotations without a matching detection.
    pub false_negatives: usize,
}

impl DetectionStats {
    /// The F1 score `TP / (TP + 0.5 * (FP + FN))`, or `0.0` when the
    /// denominator is zero.
    pub fn f1_score(&self) -> f32 {
        let denominator = self.true_positives as f32
            + 0.5 * (self.false_positives + self.false_negatives) as f32;
        if denominator == 0.0 {
            0.0
        } else {
            self.true_positives as f32 / denominator
        }
    }
}

impl From<&MatchResult> for DetectionStats {
    fn from(result: &MatchResult) -> Self {
        Self {
            true_positives: result.matched.len(),
            false_positives: result.unmatched_detections.len(),
            false_negatives: result.unmatched_annotations.len(),
        }
    }
}
