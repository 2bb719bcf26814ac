//! # pcm-embed
//!
//! Batch conditioning of recorded audio for firmware playback: recorded WAV
//! files are reduced to mono, low-pass filtered, decimated, trimmed of
//! leading/trailing silence and quantized to fixed point, then written back as
//! WAV files and as C arrays ready to link into a firmware image.
//!
//! ## Features
//!
//! - **Decoding**: unsigned 8-bit and signed 16-bit PCM via Symphonia, any channel count
//! - **Anti-aliasing**: Butterworth low-pass of configurable order
//! - **Decimation**: integer-step downsampling with a selectable step policy
//! - **Trimming**: threshold-based silence removal with guard samples
//! - **Encoding**: 8-bit unsigned, 12-bit (in a 16-bit container) or 16-bit signed
//! - **Export**: WAV, C header/source arrays, raw binary
//!
//! ## Quick Start
//!
//! ```no_run
//! use pcm_embed::{condition_audio, PipelineConfig, SampleBuffer};
//!
//! // Mono, f32, normalized samples
//! let buffer = SampleBuffer::new(vec![0.0f32; 48000], 48000);
//!
//! let fixed = condition_audio(&buffer, &PipelineConfig::default())?;
//! println!("{} samples at {} Hz", fixed.len(), fixed.sample_rate);
//! # Ok::<(), pcm_embed::PipelineError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Decoder → AntiAliasFilter → Resampler → SilenceTrimmer → Quantizer → Exporters
//! ```
//!
//! [`batch::run_batch`] runs this chain over a directory tree.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod config;
pub mod encoding;
pub mod error;
pub mod export;
pub mod io;
pub mod preprocessing;

// Re-export main types
pub use batch::{run_batch, BatchReport, BatchTotals, ExportRecord};
pub use config::{FailurePolicy, PipelineConfig};
pub use encoding::{BitDepth, FixedPointBuffer};
pub use error::PipelineError;
pub use io::sample_buffer::SampleBuffer;

use preprocessing::{anti_alias, resample};

/// Condition one decoded buffer
///
/// Runs the anti-alias filter, decimation, silence trimming and quantization
/// with the given configuration.
///
/// # Arguments
///
/// * `buffer` - Mono samples, normalized to [-1.0, 1.0]
/// * `config` - Conversion parameters
///
/// # Returns
///
/// Quantized samples at `config.target_rate_hz`
///
/// # Errors
///
/// - `PipelineError::InvalidCutoff` if the cutoff is not below the input's Nyquist frequency
/// - `PipelineError::UnsupportedRateRatio` if the input rate is below the target rate
/// - `PipelineError::AllSilent` if nothing exceeds the silence threshold
///
/// # Example
///
/// ```
/// use pcm_embed::{condition_audio, PipelineConfig, SampleBuffer};
///
/// let tone: Vec<f32> = (0..3200)
///     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 32000.0).sin())
///     .collect();
/// let fixed = condition_audio(&SampleBuffer::new(tone, 32000), &PipelineConfig::default())?;
/// assert_eq!(fixed.sample_rate, 16000);
/// # Ok::<(), pcm_embed::PipelineError>(())
/// ```
pub fn condition_audio(
    buffer: &SampleBuffer,
    config: &PipelineConfig,
) -> Result<FixedPointBuffer, PipelineError> {
    log::debug!(
        "Conditioning {} samples at {} Hz",
        buffer.len(),
        buffer.sample_rate
    );

    if buffer.sample_rate == 0 {
        return Err(PipelineError::InvalidInput("Invalid sample rate".to_string()));
    }

    let coeffs = anti_alias::design(
        config.cutoff_hz(),
        buffer.sample_rate as f64,
        config.filter_order,
    )?;
    let filtered = anti_alias::apply(&coeffs, buffer);
    let decimated = resample::decimate(&filtered, config.target_rate_hz, config.decimation)?;
    let trimmed = config.trimmer().apply(&decimated)?;

    Ok(encoding::quantize(&trimmed, config.bit_depth))
}
