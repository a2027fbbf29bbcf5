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

//! Parsing of ground-truth beat annotations.
//!
//! Annotation files are whitespace-delimited text in the layout of the
//! usual `rdann -v` dumps: one header row, then one row per annotation
//! with the elapsed time in column 0, the sample index in column 1 and
//! the annotation symbol in column 2.

use crate::Error;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Annotation symbols that mark an actual heartbeat. Everything else
/// (rhythm changes, signal-quality markers, waveform boundaries) is not a
/// beat and must not take part in detection scoring.
const BEAT_SYMBOLS: &[&str] = &[
    "N", "L", "R", "B", "A", "a", "J", "S", "V", "r", "F", "e", "j", "n", "E", "/", "f", "Q", "?",
];

/// Reads a beat annotation file into a strictly increasing list of sample
/// indices.
///
/// See [`parse_annotations`] for the normalization rules.
pub fn load_annotations<P: AsRef<Path>>(path: P) -> Result<Vec<usize>, Error> {
    let path = path.as_ref();
    let source_name = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|err| Error::data_format(&source_name, err.to_string()))?;
    parse_annotations(file, &source_name)
}

/// Parses beat annotations from any reader. `source_name` is only used in
/// log and error messages.
///
/// Normalization is explicit and lossy on purpose:
/// - rows with a non-beat symbol are dropped,
/// - rows with fewer than three columns or a sample field that does not
///   parse as an integer are skipped with a warning instead of aborting
///   the whole run,
/// - the result is sorted and deduplicated, so the returned list is
///   strictly increasing even for unordered input.
pub fn parse_annotations<R: Read>(reader: R, source_name: &str) -> Result<Vec<usize>, Error> {
    let mut indices = Vec::new();

    for (line_index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|err| Error::data_format(source_name, err.to_string()))?;
        // The first row names the columns.
        if line_index == 0 {
            continue;
        }
        let mut columns = line.split_whitespace();
        let (Some(_time), Some(sample), Some(symbol)) =
            (columns.next(), columns.next(), columns.next())
        else {
            if !line.trim().is_empty() {
                log::warn!(
                    "{}: skipping malformed annotation row {}: '{}'",
                    source_name,
                    line_index + 1,
                    line.trim()
                );
            }
            continue;
        };

        if !BEAT_SYMBOLS.contains(&symbol) {
            log::debug!(
                "{}: row {} carries non-beat symbol '{}'",
                source_name,
                line_index + 1,
                symbol
            );
            continue;
        }

        match sample.parse::<usize>() {
            Ok(index) => indices.push(index),
            Err(_) => log::warn!(
                "{}: skipping annotation row {} with non-numeric sample '{}'",
                source_name,
                line_index + 1,
                sample
            ),
        }
    }

    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}
