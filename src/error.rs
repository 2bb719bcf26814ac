//! Error types for the conversion pipeline

use std::fmt;

/// Errors that can occur while converting a file
///
/// Every variant describes a deterministic failure of one input file; none of
/// them is transient, so callers never retry.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Invalid input parameters (filter order, configuration, ...)
    InvalidInput(String),

    /// Filter cutoff is not strictly between 0 and the Nyquist frequency
    InvalidCutoff {
        /// Requested cutoff in Hz
        cutoff_hz: f64,
        /// Sample rate the filter was designed for
        sample_rate_hz: f64,
    },

    /// Decimation step would be below 1 (the pipeline only downsamples)
    UnsupportedRateRatio {
        /// Rate of the incoming buffer
        source_rate_hz: f64,
        /// Requested output rate
        target_rate_hz: f64,
    },

    /// No sample exceeds the silence threshold
    AllSilent {
        /// Threshold that was applied
        threshold: f32,
    },

    /// Quantization requested for a depth other than 8, 12 or 16 bits
    UnsupportedBitDepth(u32),

    /// Audio decoding error
    DecodeError(String),

    /// Error while writing an output artifact
    ExportError(String),
}

impl PipelineError {
    /// Short, stable name of the error kind (used in batch logs and reports)
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::InvalidInput(_) => "InvalidInput",
            PipelineError::InvalidCutoff { .. } => "InvalidCutoff",
            PipelineError::UnsupportedRateRatio { .. } => "UnsupportedRateRatio",
            PipelineError::AllSilent { .. } => "AllSilent",
            PipelineError::UnsupportedBitDepth(_) => "UnsupportedBitDepth",
            PipelineError::DecodeError(_) => "DecodeError",
            PipelineError::ExportError(_) => "ExportError",
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PipelineError::InvalidCutoff {
                cutoff_hz,
                sample_rate_hz,
            } => write!(
                f,
                "Invalid cutoff: {} Hz is outside (0, {}) Hz for a {} Hz sample rate",
                cutoff_hz,
                0.5 * sample_rate_hz,
                sample_rate_hz
            ),
            PipelineError::UnsupportedRateRatio {
                source_rate_hz,
                target_rate_hz,
            } => write!(
                f,
                "Unsupported rate ratio: cannot decimate {} Hz to {} Hz",
                source_rate_hz, target_rate_hz
            ),
            PipelineError::AllSilent { threshold } => write!(
                f,
                "Audio is entirely silent: no sample exceeds {}",
                threshold
            ),
            PipelineError::UnsupportedBitDepth(depth) => write!(
                f,
                "Unsupported bit depth: {} (expected 8, 12 or 16)",
                depth
            ),
            PipelineError::DecodeError(msg) => write!(f, "Decoding error: {}", msg),
            PipelineError::ExportError(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::ExportError(err.to_string())
    }
}

impl From<hound::Error> for PipelineError {
    fn from(err: hound::Error) -> Self {
        PipelineError::ExportError(err.to_string())
    }
}

impl From<symphonia::core::errors::Error> for PipelineError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        PipelineError::DecodeError(err.to_string())
    }
}
