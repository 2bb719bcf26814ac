//! Silence trimming utilities
//!
//! Cuts the leading and trailing runs whose magnitude does not exceed a
//! threshold, then pads the kept region with one zero sample on each side so
//! playback starts and ends at rest.

use crate::error::PipelineError;
use crate::io::sample_buffer::SampleBuffer;

/// Default trim threshold (linear amplitude)
pub const DEFAULT_THRESHOLD: f32 = 0.01;

/// Silence trimming configuration
#[derive(Debug, Clone)]
pub struct SilenceTrimmer {
    /// A sample is kept-worthy when `|x| > threshold` (default: 0.01)
    pub threshold: f32,

    /// Fail with `AllSilent` when nothing exceeds the threshold (default: true)
    ///
    /// When false, an all-silent buffer trims down to the two guard samples.
    pub reject_silent: bool,
}

impl Default for SilenceTrimmer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            reject_silent: true,
        }
    }
}

impl SilenceTrimmer {
    /// Trim a buffer with this configuration
    pub fn apply(&self, buffer: &SampleBuffer) -> Result<SampleBuffer, PipelineError> {
        match trim(buffer, self.threshold) {
            Err(PipelineError::AllSilent { .. }) if !self.reject_silent => {
                log::warn!(
                    "No sample above {} in {} samples, keeping guard samples only",
                    self.threshold,
                    buffer.len()
                );
                Ok(buffer.with_samples(vec![0.0, 0.0]))
            }
            other => other,
        }
    }
}

/// Locate the region to keep as a half-open range `[start, end)`
///
/// Returns `None` when no sample exceeds the threshold.
pub fn active_range(samples: &[f32], threshold: f32) -> Option<(usize, usize)> {
    let start = samples.iter().position(|&x| x.abs() > threshold)?;
    let last = samples.iter().rposition(|&x| x.abs() > threshold)?;
    Some((start, last + 1))
}

/// Trim leading and trailing silence and add boundary guard samples
///
/// # Arguments
///
/// * `buffer` - Mono samples
/// * `threshold` - Linear amplitude; samples with `|x| <= threshold` count as silence
///
/// # Returns
///
/// `[0.0] ++ samples[start..end] ++ [0.0]` at the same sample rate
///
/// # Errors
///
/// Returns `PipelineError::AllSilent` if no sample exceeds the threshold
/// (including an empty buffer).
pub fn trim(buffer: &SampleBuffer, threshold: f32) -> Result<SampleBuffer, PipelineError> {
    let (start, end) =
        active_range(&buffer.samples, threshold).ok_or(PipelineError::AllSilent { threshold })?;

    log::debug!(
        "Trimming {} samples to [{}, {}) at threshold {}",
        buffer.len(),
        start,
        end,
        threshold
    );

    let mut samples = Vec::with_capacity(end - start + 2);
    samples.push(0.0);
    samples.extend_from_slice(&buffer.samples[start..end]);
    samples.push(0.0);

    Ok(buffer.with_samples(samples))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_example() {
        let buffer = SampleBuffer::new(vec![0.0, 0.0, 0.02, 0.5, 0.02, 0.0, 0.0], 16000);
        let out = trim(&buffer, 0.01).unwrap();
        assert_eq!(out.samples, vec![0.0, 0.02, 0.5, 0.02, 0.0]);
        assert_eq!(out.sample_rate, 16000);
    }

    #[test]
    fn test_all_silent() {
        let buffer = SampleBuffer::new(vec![0.0; 4], 16000);
        assert_eq!(
            trim(&buffer, 0.01),
            Err(PipelineError::AllSilent { threshold: 0.01 })
        );
        assert!(trim(&SampleBuffer::new(vec![], 16000), 0.01).is_err());
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactly at threshold counts as silence
        let buffer = SampleBuffer::new(vec![0.25, 0.5, -0.25], 8000);
        let out = trim(&buffer, 0.25).unwrap();
        assert_eq!(out.samples, vec![0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_negative_samples_count() {
        let buffer = SampleBuffer::new(vec![0.001, -0.3, 0.0, 0.2, -0.005], 8000);
        let out = trim(&buffer, 0.01).unwrap();
        assert_eq!(out.samples, vec![0.0, -0.3, 0.0, 0.2, 0.0]);
    }

    #[test]
    fn test_guards_added_without_trimming() {
        let buffer = SampleBuffer::new(vec![0.5, 0.5], 8000);
        let out = trim(&buffer, 0.01).unwrap();
        assert_eq!(out.samples, vec![0.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_trimmer_can_keep_silent_buffers() {
        let trimmer = SilenceTrimmer {
            threshold: 0.01,
            reject_silent: false,
        };
        let out = trimmer
            .apply(&SampleBuffer::new(vec![0.0; 10], 8000))
            .unwrap();
        assert_eq!(out.samples, vec![0.0, 0.0]);

        let strict = SilenceTrimmer::default();
        assert!(strict.apply(&SampleBuffer::new(vec![0.0; 10], 8000)).is_err());
    }
}
