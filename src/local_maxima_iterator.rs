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

//! Module for [`LocalMaximaIterator`].

/// A local maximum of a signal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PeakInfo {
    /// Sample index of the maximum.
    pub index: usize,
    /// Value of the signal at that index.
    pub value: f32,
}

/// Iterates the local maxima of a signal that reach a minimum height.
///
/// A local maximum is a sample that is strictly greater than both of its
/// neighbors. The first and last sample of the signal can therefore never
/// be a maximum. The iterator makes no distance guarantees between the
/// yielded peaks; the detector thins them out afterwards.
#[derive(Debug, Clone)]
pub struct LocalMaximaIterator<'a> {
    index: usize,
    signal: &'a [f32],
    min_height: f32,
}

impl<'a> LocalMaximaIterator<'a> {
    pub fn new(signal: &'a [f32], min_height: f32) -> Self {
        Self {
            // A maximum needs a left neighbor.
            index: 1,
            signal,
            min_height,
        }
    }
}

impl Iterator for LocalMaximaIterator<'_> {
    type Item = PeakInfo;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.index + 1 < self.signal.len() {
            let index = self.index;
            self.index += 1;

            let value = self.signal[index];
            let is_maximum = self.signal[index - 1] < value && value > self.signal[index + 1];
            if is_maximum && value >= self.min_height {
                return Some(PeakInfo { index, value });
            }
        }
        None
    }
}

/// Thins out candidate peaks so that no two survivors are closer than
/// `distance` samples. When candidates collide, the tallest one wins and
/// all shorter ones inside its exclusion window are discarded. Ties go to
/// the earlier peak.
///
/// The candidates must be ordered by increasing index. The surviving
/// indices are returned in increasing order.
pub(crate) fn enforce_min_distance(candidates: &[PeakInfo], distance: usize) -> Vec<usize> {
    debug_assert!(distance >= 1);
    debug_assert!(candidates.windows(2).all(|pair| pair[0].index < pair[1].index));

    // Visit candidates from tallest to shortest so that a discarded peak
    // can never shadow a taller one.
    let mut by_height: Vec<usize> = (0..candidates.len()).collect();
    by_height.sort_by(|&a, &b| {
        candidates[b]
            .value
            .total_cmp(&candidates[a].value)
            .then_with(|| candidates[a].index.cmp(&candidates[b].index))
    });

    let mut keep = vec![true; candidates.len()];
    for i in by_height {
        if !keep[i] {
            continue;
        }
        let position = candidates[i].index;
        for j in (0..i).rev() {
            if position - candidates[j].index >= distance {
                break;
            }
            keep[j] = false;
        }
        for j in i + 1..candidates.len() {
            if candidates[j].index - position >= distance {
                break;
            }
            keep[j] = false;
        }
    }

    candidates
        .iter()
        .zip(keep)
        .filter_map(|(peak, kept)| kept.then_some(peak.index))
        .collect()
}
