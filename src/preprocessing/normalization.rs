//! PCM normalization utilities
//!
//! Maps integer PCM samples to unit-range floats. The mapping depends on the
//! source sample format, which is decided once per file from the container's
//! declared bit width and signedness:
//! - Signed 16-bit: `x / 2^15`
//! - Unsigned 8-bit: `(x - 127) / 127`, clamped to [-1.0, 1.0]
//!
//! # Example
//!
//! ```
//! use pcm_embed::preprocessing::normalization::SourceFormat;
//!
//! let format = SourceFormat::from_container(16, true)?;
//! assert_eq!(format.normalize(-32768), -1.0);
//! # Ok::<(), pcm_embed::PipelineError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Full-scale divisor for signed 16-bit PCM
const S16_SCALE: f32 = 32768.0;

/// Center (and half-range) of unsigned 8-bit PCM
const U8_CENTER: f32 = 127.0;

/// Sample format of a decoded source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Unsigned 8-bit PCM (silence at 127/128)
    U8,
    /// Signed 16-bit PCM
    S16,
}

impl SourceFormat {
    /// Determine the format from a container's bit width and signedness
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::DecodeError` for anything other than unsigned
    /// 8-bit or signed 16-bit.
    pub fn from_container(bits_per_sample: u32, signed: bool) -> Result<Self, PipelineError> {
        match (bits_per_sample, signed) {
            (8, false) => Ok(SourceFormat::U8),
            (16, true) => Ok(SourceFormat::S16),
            _ => Err(PipelineError::DecodeError(format!(
                "Unsupported source sample format: {}-bit {}",
                bits_per_sample,
                if signed { "signed" } else { "unsigned" }
            ))),
        }
    }

    /// Bit width of one stored sample
    pub fn bits(&self) -> u32 {
        match self {
            SourceFormat::U8 => 8,
            SourceFormat::S16 => 16,
        }
    }

    /// Normalize one raw PCM value to [-1.0, 1.0]
    pub fn normalize(&self, raw: i32) -> f32 {
        match self {
            SourceFormat::U8 => ((raw as f32 - U8_CENTER) / U8_CENTER).clamp(-1.0, 1.0),
            SourceFormat::S16 => raw as f32 / S16_SCALE,
        }
    }
}

/// Normalize one plane of unsigned 8-bit samples
pub fn normalize_u8(samples: &[u8]) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| SourceFormat::U8.normalize(s as i32))
        .collect()
}

/// Normalize one plane of signed 16-bit samples
pub fn normalize_s16(samples: &[i16]) -> Vec<f32> {
    samples
        .iter()
        .map(|&s| SourceFormat::S16.normalize(s as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_container() {
        assert_eq!(SourceFormat::from_container(8, false).unwrap(), SourceFormat::U8);
        assert_eq!(SourceFormat::from_container(16, true).unwrap(), SourceFormat::S16);
        assert!(SourceFormat::from_container(24, true).is_err());
        assert!(SourceFormat::from_container(8, true).is_err());
    }

    #[test]
    fn test_s16_range() {
        let normalized = normalize_s16(&[i16::MIN, 0, 16384, i16::MAX]);
        assert_eq!(normalized[0], -1.0);
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[2], 0.5);
        assert!(normalized[3] < 1.0 && normalized[3] > 0.9999);
    }

    #[test]
    fn test_u8_recenters() {
        let normalized = normalize_u8(&[0, 127, 254, 255]);
        assert_eq!(normalized[0], -1.0);
        assert_eq!(normalized[1], 0.0);
        assert_eq!(normalized[2], 1.0);
        // 255 would land slightly above full scale
        assert_eq!(normalized[3], 1.0);
    }
}
