//! WAV export using hound

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::encoding::FixedPointBuffer;
use crate::error::PipelineError;

/// Write a quantized buffer as a mono PCM WAV file
///
/// 8-bit buffers become unsigned 8-bit PCM whose bytes equal `values`;
/// 12- and 16-bit buffers become signed 16-bit little-endian PCM carrying the
/// same bit patterns.
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &FixedPointBuffer) -> Result<(), PipelineError> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate,
        bits_per_sample: buffer.container_width() as u16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| {
        PipelineError::ExportError(format!("Cannot create {}: {}", path.display(), e))
    })?;

    if buffer.depth.container_bytes() == 1 {
        // hound offsets 8-bit samples by 128 on write
        for &value in &buffer.values {
            writer.write_sample((value as i16 - 128) as i8)?;
        }
    } else {
        for sample in buffer.as_i16() {
            writer.write_sample(sample)?;
        }
    }

    writer.finalize()?;
    log::debug!(
        "Wrote {} samples ({}-bit) to {}",
        buffer.len(),
        buffer.container_width(),
        path.display()
    );
    Ok(())
}
