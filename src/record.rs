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

//! Module for [`EkgRecord`].

use crate::Error;
use std::io::Read;
use std::path::Path;

/// Number of leading rows of the sample table that carry column names and
/// units instead of data.
const HEADER_ROWS: usize = 2;

/// A loaded ECG recording: a timestamp vector plus one or more signal
/// channels of the same length.
///
/// A record is read-only once loaded. All processing stages work on copies
/// of a channel and never mutate the record itself.
#[derive(Debug, Clone)]
pub struct EkgRecord {
    timestamps: Vec<f32>,
    channels: Vec<Vec<f32>>,
}

impl EkgRecord {
    /// Reads a record from a CSV file.
    ///
    /// The expected layout is comma-delimited with two header rows:
    /// column 0 holds timestamps in seconds, every further column is one
    /// signal channel.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = std::fs::File::open(path)
            .map_err(|err| Error::data_format(&source_name, err.to_string()))?;
        Self::from_reader(file, &source_name)
    }

    /// Reads a record in the CSV layout described on [`Self::from_file`]
    /// from any reader. `source_name` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut timestamps = Vec::new();
        let mut channels: Vec<Vec<f32>> = Vec::new();

        for (row_index, row) in csv_reader.records().enumerate() {
            let row = row.map_err(|err| Error::data_format(source_name, err.to_string()))?;
            if row_index < HEADER_ROWS {
                continue;
            }
            let line = row
                .position()
                .map(|position| position.line())
                .unwrap_or(row_index as u64 + 1);

            if row.len() < 2 {
                return Err(Error::data_format(
                    source_name,
                    format!("line {line}: expected a timestamp and at least one signal column"),
                ));
            }
            if channels.is_empty() {
                channels = vec![Vec::new(); row.len() - 1];
            } else if row.len() - 1 != channels.len() {
                return Err(Error::data_format(
                    source_name,
                    format!(
                        "line {line}: expected {} columns, found {}",
                        channels.len() + 1,
                        row.len()
                    ),
                ));
            }

            let mut fields = row.iter().map(|field| {
                field.parse::<f32>().map_err(|_| {
                    Error::data_format(
                        source_name,
                        format!("line {line}: non-numeric field '{field}'"),
                    )
                })
            });
            // Cannot be empty, the length was checked above.
            timestamps.push(fields.next().unwrap()?);
            for channel in channels.iter_mut() {
                channel.push(fields.next().unwrap()?);
            }
        }

        Ok(Self {
            timestamps,
            channels,
        })
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns true if the record holds no samples.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of signal channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Access to one signal channel. Channel 0 is the first value column
    /// of the source table.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// The timestamps in seconds, one per sample.
    pub fn timestamps(&self) -> &[f32] {
        &self.timestamps
    }

    /// Derives the sampling rate as the reciprocal of the mean delta
    /// between consecutive timestamps.
    ///
    /// Fails if the record holds fewer than two samples or if the mean
    /// delta is not a positive finite number, which happens for
    /// non-monotonic timestamps. This is checked here, before any
    /// filtering is attempted.
    pub fn sampling_rate_hz(&self) -> Result<f32, Error> {
        if self.timestamps.len() < 2 {
            return Err(Error::InvalidSignal(format!(
                "cannot derive a sampling rate from {} timestamp(s)",
                self.timestamps.len()
            )));
        }

        let delta_sum: f32 = self
            .timestamps
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .sum();
        let mean_delta = delta_sum / (self.timestamps.len() - 1) as f32;

        if !(mean_delta.is_finite() && mean_delta > 0.0) {
            return Err(Error::InvalidSignal(format!(
                "timestamps yield a mean sample delta of {mean_delta} s; are they monotonic?"
            )));
        }
        Ok(1.0 / mean_delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use float_cmp::approx_eq;

    const SIMPLE_RECORD: &str = "\
'Elapsed time','MLII','V1'
'seconds','mV','mV'
0.000,-0.145,-0.065
0.004,-0.145,-0.065
0.008,-0.145,-0.080
0.012,-0.145,-0.085
0.016,-0.160,-0.090
";

    #[test]
    fn parses_simple_record() {
        let record = EkgRecord::from_reader(SIMPLE_RECORD.as_bytes(), "<test>").unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record.channel_count(), 2);
        assert_eq!(record.channel(0).unwrap()[0], -0.145);
        assert_eq!(record.channel(1).unwrap()[2], -0.080);
        assert_eq!(record.channel(2), None);
        assert_eq!(record.timestamps()[4], 0.016);
    }

    #[test]
    fn sampling_rate_from_mean_timestamp_delta() {
        let record = EkgRecord::from_reader(SIMPLE_RECORD.as_bytes(), "<test>").unwrap();
        // 4 ms between samples is 250 Hz.
        check!(approx_eq!(
            f32,
            record.sampling_rate_hz().unwrap(),
            250.0,
            epsilon = 0.1
        ));
    }

    #[test]
    fn non_monotonic_timestamps_are_rejected() {
        let csv = "\
h1,a
h2,b
0.016,1.0
0.012,1.0
0.008,1.0
";
        let record = EkgRecord::from_reader(csv.as_bytes(), "<test>").unwrap();
        check!(matches!(
            record.sampling_rate_hz(),
            Err(Error::InvalidSignal(_))
        ));
    }

    #[test]
    fn single_sample_has_no_sampling_rate() {
        let csv = "h1,a\nh2,b\n0.0,1.0\n";
        let record = EkgRecord::from_reader(csv.as_bytes(), "<test>").unwrap();
        check!(matches!(
            record.sampling_rate_hz(),
            Err(Error::InvalidSignal(_))
        ));
    }

    #[test]
    fn non_numeric_field_is_a_data_format_error() {
        let csv = "h1,a\nh2,b\n0.0,1.0\n0.004,oops\n";
        let result = EkgRecord::from_reader(csv.as_bytes(), "<test>");
        check!(matches!(result, Err(Error::DataFormat { .. })));
    }

    #[test]
    fn inconsistent_column_count_is_a_data_format_error() {
        let csv = "h1,a\nh2,b\n0.0,1.0\n0.004,1.0,2.0\n";
        let result = EkgRecord::from_reader(csv.as_bytes(), "<test>");
        check!(matches!(result, Err(Error::DataFormat { .. })));
    }

    #[test]
    fn missing_file_is_a_data_format_error() {
        let result = EkgRecord::from_file("/definitely/not/here.csv");
        check!(matches!(result, Err(Error::DataFormat { .. })));
    }

    #[test]
    fn empty_input_yields_empty_record() {
        let record = EkgRecord::from_reader("h1,a\nh2,b\n".as_bytes(), "<test>").unwrap();
        check!(record.is_empty());
        assert_eq!(record.channel_count(), 0);
    }
}
