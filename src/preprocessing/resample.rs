//! Integer-step decimation
//!
//! Keeps every `step`-th sample. No filtering happens here: run the buffer
//! through [`anti_alias`](super::anti_alias) first.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::io::sample_buffer::SampleBuffer;

/// How the decimation step is derived from the rate ratio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimationPolicy {
    /// `step = round(source / target)`
    #[default]
    Nearest,
    /// `step = round(source / target) - 1`
    NearestMinusOne,
}

impl DecimationPolicy {
    /// Decimation step for a rate pair (may be below 1 for unsupported ratios)
    pub fn step(&self, source_rate_hz: f64, target_rate_hz: f64) -> i64 {
        let nearest = (source_rate_hz / target_rate_hz).round() as i64;
        match self {
            DecimationPolicy::Nearest => nearest,
            DecimationPolicy::NearestMinusOne => nearest - 1,
        }
    }
}

/// Decimate a buffer to a lower sample rate
///
/// # Arguments
///
/// * `buffer` - Pre-filtered mono buffer
/// * `target_rate_hz` - Output sample rate; becomes the declared rate of the result
/// * `policy` - Step formula
///
/// # Returns
///
/// Samples at indices `0, step, 2*step, ...`
///
/// # Errors
///
/// Returns `PipelineError::UnsupportedRateRatio` if the target rate is not a
/// positive finite number, exceeds the source rate, or the step is below 1.
pub fn decimate(
    buffer: &SampleBuffer,
    target_rate_hz: f64,
    policy: DecimationPolicy,
) -> Result<SampleBuffer, PipelineError> {
    let source_rate_hz = buffer.sample_rate as f64;
    let unsupported = || PipelineError::UnsupportedRateRatio {
        source_rate_hz,
        target_rate_hz,
    };

    if !(target_rate_hz.is_finite() && target_rate_hz > 0.0) || target_rate_hz > source_rate_hz {
        return Err(unsupported());
    }

    let step = policy.step(source_rate_hz, target_rate_hz);
    if step < 1 {
        return Err(unsupported());
    }

    log::debug!(
        "Decimating {} samples from {} Hz to {} Hz (step={}, {:?})",
        buffer.len(),
        source_rate_hz,
        target_rate_hz,
        step,
        policy
    );

    let samples = buffer
        .samples
        .iter()
        .step_by(step as usize)
        .copied()
        .collect();

    Ok(SampleBuffer::new(samples, target_rate_hz.round() as u32))
}
