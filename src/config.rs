//! Module for [`DetectorConfig`] and [`MatchConfig`].

/// Default order of the Butterworth low- and high-pass filters.
pub const DEFAULT_FILTER_ORDER: usize = 4;

/// Default cutoff frequency of the high-pass half of the band-pass. This
/// removes baseline wander and the P/T waves, which live well below the
/// QRS complex.
pub const DEFAULT_LOW_CUTOFF_HZ: f32 = 5.0;

/// Default cutoff frequency of the low-pass half of the band-pass. This
/// removes high-frequency noise such as powerline interference and muscle
/// artifacts.
pub const DEFAULT_HIGH_CUTOFF_HZ: f32 = 123.0;

/// Default width of the moving-sum integration window in samples. This
/// roughly matches the width of a QRS complex at common ECG sampling
/// rates.
pub const DEFAULT_INTEGRATION_WINDOW: usize = 20;

/// Default z-score above which integrated samples are clipped before the
/// threshold is derived. Clipping prevents a single huge artifact from
/// pushing the threshold above all regular beats.
pub const DEFAULT_OUTLIER_Z_SCORE: f32 = 1.4;

/// Default fraction of the clipped signal's maximum that becomes the peak
/// acceptance threshold.
pub const DEFAULT_THRESHOLD_FRACTION: f32 = 0.35;

/// Default minimum horizontal distance between two accepted peaks in
/// samples. Acts as a refractory period: two physiological beats cannot be
/// closer than this.
pub const DEFAULT_MIN_PEAK_DISTANCE: usize = 150;

/// Default tolerance window in samples when matching detections against
/// annotations.
pub const DEFAULT_MATCH_TOLERANCE: usize = 150;

/// Tuning parameters of the [`QrsDetector`] pipeline.
///
/// The defaults are the values the pipeline was tuned with against the
/// MIT-BIH arrhythmia records. They are a good starting point for ECG
/// data sampled in the 250..=500 Hz range.
///
/// [`QrsDetector`]: crate::QrsDetector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Order of the Butterworth filters. Must be even and non-zero, as
    /// the filters are realized as a cascade of second-order sections.
    pub filter_order: usize,
    /// Cutoff frequency of the high-pass filter in Hz.
    pub low_cutoff_hz: f32,
    /// Cutoff frequency of the low-pass filter in Hz. Must be below the
    /// Nyquist frequency of the processed signal.
    pub high_cutoff_hz: f32,
    /// Width of the moving-sum integration window in samples.
    pub integration_window: usize,
    /// z-score for outlier clipping before threshold derivation.
    pub outlier_z_score: f32,
    /// Fraction of the clipped maximum that becomes the peak threshold.
    pub threshold_fraction: f32,
    /// Minimum distance between accepted peaks in samples.
    pub min_peak_distance: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            filter_order: DEFAULT_FILTER_ORDER,
            low_cutoff_hz: DEFAULT_LOW_CUTOFF_HZ,
            high_cutoff_hz: DEFAULT_HIGH_CUTOFF_HZ,
            integration_window: DEFAULT_INTEGRATION_WINDOW,
            outlier_z_score: DEFAULT_OUTLIER_Z_SCORE,
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
            min_peak_distance: DEFAULT_MIN_PEAK_DISTANCE,
        }
    }
}

/// Parameters of the detection-to-annotation matching step.
///
/// The tolerance of the reference annotation tooling is not publicly
/// documented, hence this is explicit configuration rather than a
/// hard-coded constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// A detection within this many samples of an annotation may be
    /// matched to it.
    pub tolerance: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_MATCH_TOLERANCE,
        }
    }
}
