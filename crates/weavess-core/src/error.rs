//! Waveform construction error types

use thiserror::Error;

/// Errors raised while constructing waveform data
///
/// Lookup misses and degenerate render inputs are not errors: they surface as
/// `None` and empty buffers respectively.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveformError {
    /// End time precedes start time
    #[error("Invalid time range: end {end}s is before start {start}s")]
    InvalidTimeRange { start: f64, end: f64 },

    /// Sample rate is zero, negative or not finite
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),
}

/// Result type for waveform construction
pub type WaveformResult<T> = Result<T, WaveformError>;
