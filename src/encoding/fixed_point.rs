//! Fixed-point sample buffers

use crate::encoding::bit_depth::BitDepth;
use crate::error::PipelineError;
use crate::io::sample_buffer::SampleBuffer;

/// Quantized samples ready for export
///
/// `values` hold container words: 0..=254 for [`BitDepth::Depth8`], the two's
/// complement bit pattern of the signed value for 12 and 16 bits. Created once
/// per file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPointBuffer {
    /// Encoding of `values`
    pub depth: BitDepth,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Container words in temporal order
    pub values: Vec<u16>,
}

impl FixedPointBuffer {
    /// Storage width of one value in bits
    pub fn container_width(&self) -> u32 {
        self.depth.container_width()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values as signed 16-bit samples (meaningful for 12- and 16-bit depths)
    pub fn as_i16(&self) -> impl Iterator<Item = i16> + '_ {
        self.values.iter().map(|&v| v as i16)
    }

    /// Canonical byte layout: one byte per value for 8-bit, little-endian words otherwise
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self.depth.container_bytes() {
            1 => self.values.iter().map(|&v| v as u8).collect(),
            _ => self.values.iter().flat_map(|v| v.to_le_bytes()).collect(),
        }
    }

    /// Decode back to a normalized buffer
    pub fn to_sample_buffer(&self) -> SampleBuffer {
        SampleBuffer::new(
            self.values.iter().map(|&v| self.depth.decode(v)).collect(),
            self.sample_rate,
        )
    }
}

/// Quantize a normalized buffer to fixed point
///
/// # Arguments
///
/// * `buffer` - Samples in [-1.0, 1.0] (values outside are clamped)
/// * `depth` - Output encoding
pub fn quantize(buffer: &SampleBuffer, depth: BitDepth) -> FixedPointBuffer {
    let clipped = buffer.samples.iter().filter(|x| x.abs() > 1.0).count();
    if clipped > 0 {
        log::warn!("Clamping {} samples outside [-1, 1] before quantization", clipped);
    }

    log::debug!(
        "Quantizing {} samples to {} bits ({}-bit container)",
        buffer.len(),
        depth.bits(),
        depth.container_width()
    );

    FixedPointBuffer {
        depth,
        sample_rate: buffer.sample_rate,
        values: buffer.samples.iter().map(|&s| depth.encode(s)).collect(),
    }
}

/// Quantize with a raw bit-depth number
///
/// # Errors
///
/// Returns `PipelineError::UnsupportedBitDepth` unless `bits` is 8, 12 or 16.
pub fn quantize_bits(buffer: &SampleBuffer, bits: u32) -> Result<FixedPointBuffer, PipelineError> {
    Ok(quantize(buffer, BitDepth::try_from(bits)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_12bit() {
        let buffer = SampleBuffer::new(vec![1.0, 0.0, -0.5], 16000);
        let fixed = quantize_bits(&buffer, 12).unwrap();
        assert_eq!(fixed.values[0], 32752);
        assert_eq!(fixed.values[1], 0);
        assert_eq!(fixed.container_width(), 16);
        assert_eq!(fixed.sample_rate, 16000);
    }

    #[test]
    fn test_quantize_8bit() {
        let buffer = SampleBuffer::new(vec![-1.0, 1.0], 16000);
        let fixed = quantize_bits(&buffer, 8).unwrap();
        assert_eq!(fixed.values, vec![0, 254]);
        assert_eq!(fixed.to_le_bytes(), vec![0, 254]);
    }

    #[test]
    fn test_unsupported_depth() {
        let buffer = SampleBuffer::new(vec![0.0], 16000);
        for bits in [0, 1, 7, 10, 24, 32] {
            assert_eq!(
                quantize_bits(&buffer, bits),
                Err(PipelineError::UnsupportedBitDepth(bits))
            );
        }
    }

    #[test]
    fn test_le_bytes_16bit() {
        let buffer = SampleBuffer::new(vec![1.0, -1.0], 16000);
        let fixed = quantize(&buffer, BitDepth::Depth16);
        assert_eq!(fixed.to_le_bytes(), vec![0xFF, 0x7F, 0x01, 0x80]);
        assert_eq!(fixed.as_i16().collect::<Vec<_>>(), vec![32767, -32767]);
    }

    #[test]
    fn test_values_fit_depth() {
        let samples: Vec<f32> = (0..=200).map(|i| i as f32 / 100.0 - 1.0).collect();
        let buffer = SampleBuffer::new(samples, 16000);
        let eight = quantize(&buffer, BitDepth::Depth8);
        assert!(eight.values.iter().all(|&v| v <= 254));
        let twelve = quantize(&buffer, BitDepth::Depth12);
        assert!(twelve.values.iter().all(|&v| v & 0xF == 0));
    }
}
