//! Configuration parameters for batch conversion

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encoding::BitDepth;
use crate::error::PipelineError;
use crate::io::discovery::{InputFilter, DEFAULT_EDITED_MARKER, DEFAULT_EXTENSION};
use crate::preprocessing::anti_alias::MAX_ORDER;
use crate::preprocessing::resample::DecimationPolicy;
use crate::preprocessing::silence::{SilenceTrimmer, DEFAULT_THRESHOLD};

/// What the batch driver does when one file fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing file; no header/source artifacts are written
    #[default]
    Abort,
    /// Log the file path and error kind, leave the file out of the totals and continue
    Skip,
}

/// Conversion configuration parameters
///
/// Every field has a default, so a JSON config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // Resampling
    /// Output sample rate in Hz (default: 16000.0)
    pub target_rate_hz: f64,

    /// Anti-alias cutoff as a fraction of the output rate (default: 0.5)
    /// The filter is designed at the input rate with cutoff `cutoff_ratio * target_rate_hz`
    pub cutoff_ratio: f64,

    /// Butterworth order (default: 2)
    pub filter_order: usize,

    /// Decimation step formula (default: Nearest)
    pub decimation: DecimationPolicy,

    // Trimming
    /// Silence threshold, linear amplitude (default: 0.01)
    pub silence_threshold: f32,

    /// Fail on files with no sample above the threshold (default: true)
    pub reject_silent: bool,

    // Encoding
    /// Output bit depth: 8, 12 or 16 (default: 12)
    pub bit_depth: BitDepth,

    // Discovery
    /// Input file-name suffix (default: ".wav")
    pub extension: String,

    /// Marker for generated files; skipped on input, appended on output (default: "-edited")
    pub edited_marker: String,

    // Export
    /// Directory for the header/source artifacts (default: ".")
    pub output_dir: PathBuf,

    /// Base name of the header/source artifacts (default: "sound")
    pub artifact_name: String,

    /// Write `<stem><marker>.wav` next to each input (default: true)
    pub write_wav: bool,

    /// Write `<stem><marker>.bin` next to each input (default: false)
    pub write_raw: bool,

    // Batch
    /// Per-file failure handling (default: Abort)
    pub failure_policy: FailurePolicy,

    /// Worker threads; None uses available CPUs minus one (default: None)
    pub jobs: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_rate_hz: 16000.0,
            cutoff_ratio: 0.5,
            filter_order: 2,
            decimation: DecimationPolicy::Nearest,
            silence_threshold: DEFAULT_THRESHOLD,
            reject_silent: true,
            bit_depth: BitDepth::Depth12,
            extension: DEFAULT_EXTENSION.to_string(),
            edited_marker: DEFAULT_EDITED_MARKER.to_string(),
            output_dir: PathBuf::from("."),
            artifact_name: "sound".to_string(),
            write_wav: true,
            write_raw: false,
            failure_policy: FailurePolicy::Abort,
            jobs: None,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            PipelineError::InvalidInput(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            PipelineError::InvalidInput(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    /// Check parameter ranges that do not depend on the input files
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.target_rate_hz.is_finite() && self.target_rate_hz > 0.0) {
            return Err(PipelineError::InvalidInput(format!(
                "Target rate must be positive, got {}",
                self.target_rate_hz
            )));
        }
        if !(self.cutoff_ratio.is_finite() && self.cutoff_ratio > 0.0) {
            return Err(PipelineError::InvalidInput(format!(
                "Cutoff ratio must be positive, got {}",
                self.cutoff_ratio
            )));
        }
        if self.filter_order == 0 || self.filter_order > MAX_ORDER {
            return Err(PipelineError::InvalidInput(format!(
                "Filter order must be in 1..={}, got {}",
                MAX_ORDER, self.filter_order
            )));
        }
        if !(self.silence_threshold.is_finite() && self.silence_threshold >= 0.0) {
            return Err(PipelineError::InvalidInput(format!(
                "Silence threshold must be >= 0, got {}",
                self.silence_threshold
            )));
        }
        if self.extension.is_empty() || self.artifact_name.is_empty() {
            return Err(PipelineError::InvalidInput(
                "Extension and artifact name must not be empty".to_string(),
            ));
        }
        if self.jobs == Some(0) {
            return Err(PipelineError::InvalidInput("Jobs must be > 0".to_string()));
        }
        Ok(())
    }

    /// Anti-alias cutoff in Hz
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_ratio * self.target_rate_hz
    }

    /// Silence trimmer for these settings
    pub fn trimmer(&self) -> SilenceTrimmer {
        SilenceTrimmer {
            threshold: self.silence_threshold,
            reject_silent: self.reject_silent,
        }
    }

    /// Input filter for these settings
    pub fn input_filter(&self) -> InputFilter {
        InputFilter {
            extension: self.extension.clone(),
            edited_marker: self.edited_marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cutoff_hz(), 8000.0);
        assert_eq!(config.bit_depth, BitDepth::Depth12);
    }

    #[test]
    fn test_partial_json() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"bit_depth": 8, "decimation": "nearest_minus_one", "failure_policy": "skip"}"#)
                .unwrap();
        assert_eq!(config.bit_depth, BitDepth::Depth8);
        assert_eq!(config.decimation, DecimationPolicy::NearestMinusOne);
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.target_rate_hz, 16000.0);
    }

    #[test]
    fn test_json_rejects_bad_depth() {
        let result: Result<PipelineConfig, _> = serde_json::from_str(r#"{"bit_depth": 10}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = PipelineConfig {
            filter_order: 4,
            jobs: Some(2),
            ..PipelineConfig::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(PipelineConfig::from_json_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            PipelineConfig { target_rate_hz: 0.0, ..Default::default() },
            PipelineConfig { filter_order: 0, ..Default::default() },
            PipelineConfig { silence_threshold: -1.0, ..Default::default() },
            PipelineConfig { jobs: Some(0), ..Default::default() },
            PipelineConfig { artifact_name: String::new(), ..Default::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be invalid", config);
        }
    }
}
