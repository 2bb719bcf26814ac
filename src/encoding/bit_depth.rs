//! Output bit depths and their fixed-point encodings

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Full-scale multiplier for signed 16-bit output (2^15 - 1)
const S16_FULL_SCALE: f32 = 32767.0;

/// Full-scale multiplier and offset for unsigned 8-bit output (2^7 - 1)
const U8_FULL_SCALE: f32 = 127.0;

/// Low bits cleared by the 12-bit encoding
const DEPTH12_DROPPED_BITS: u32 = 4;

/// Fixed-point output format
///
/// Each variant owns its encode rule, container width and C element type, so
/// the WAV, C-array and raw exporters cannot disagree on the encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BitDepth {
    /// Unsigned 8-bit, zero at 127, one byte per sample
    Depth8,
    /// 12 significant bits left-justified in a signed 16-bit container (low nibble zero)
    Depth12,
    /// Signed 16-bit
    Depth16,
}

impl BitDepth {
    /// Effective bit depth
    pub fn bits(&self) -> u32 {
        match self {
            BitDepth::Depth8 => 8,
            BitDepth::Depth12 => 12,
            BitDepth::Depth16 => 16,
        }
    }

    /// Storage width of one value in bits
    pub fn container_width(&self) -> u32 {
        match self {
            BitDepth::Depth8 => 8,
            BitDepth::Depth12 | BitDepth::Depth16 => 16,
        }
    }

    /// Storage width of one value in bytes
    pub fn container_bytes(&self) -> usize {
        self.container_width() as usize / 8
    }

    /// C element type used for embedded arrays
    pub fn c_type(&self) -> &'static str {
        if self.bits() > 8 {
            "uint16_t"
        } else {
            "uint8_t"
        }
    }

    /// Encode one normalized sample into its container word
    ///
    /// Input is clamped to [-1.0, 1.0]. 12- and 16-bit results are the two's
    /// complement bit pattern of the signed value.
    pub fn encode(&self, sample: f32) -> u16 {
        let sample = sample.clamp(-1.0, 1.0);
        match self {
            BitDepth::Depth8 => ((sample * U8_FULL_SCALE).round() + U8_FULL_SCALE) as u16,
            BitDepth::Depth12 => {
                let value = (sample * S16_FULL_SCALE).round() as i16;
                ((value >> DEPTH12_DROPPED_BITS) << DEPTH12_DROPPED_BITS) as u16
            }
            BitDepth::Depth16 => (sample * S16_FULL_SCALE).round() as i16 as u16,
        }
    }

    /// Map a container word back to a normalized sample
    pub fn decode(&self, value: u16) -> f32 {
        match self {
            BitDepth::Depth8 => (value as f32 - U8_FULL_SCALE) / U8_FULL_SCALE,
            BitDepth::Depth12 | BitDepth::Depth16 => value as i16 as f32 / S16_FULL_SCALE,
        }
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = PipelineError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(BitDepth::Depth8),
            12 => Ok(BitDepth::Depth12),
            16 => Ok(BitDepth::Depth16),
            other => Err(PipelineError::UnsupportedBitDepth(other)),
        }
    }
}

impl From<BitDepth> for u32 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}
