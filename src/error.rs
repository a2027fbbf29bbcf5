//! Module for [`Error`].

use thiserror::Error;

/// Errors that abort a detection run.
///
/// The crate fails fast: a stage that cannot produce a meaningful result
/// returns an error instead of a partially computed or garbage detection
/// set.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file could not be read or its contents are not in the
    /// expected format.
    #[error("data format error in {source_name}: {reason}")]
    DataFormat {
        /// Name of the input the error was found in, typically a file path.
        source_name: String,
        /// What exactly was wrong.
        reason: String,
    },
    /// The signal is unusable for detection: empty, shorter than a
    /// processing window, or with a non-positive sampling rate.
    #[error("invalid signal: {0}")]
    InvalidSignal(String),
}

impl Error {
    pub(crate) fn data_format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataFormat {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
