//! Raw binary export

use std::fs;
use std::path::Path;

use crate::encoding::FixedPointBuffer;
use crate::error::PipelineError;

/// Write the canonical little-endian byte layout of a buffer
///
/// The blob holds no header; its layout is [`FixedPointBuffer::to_le_bytes`].
pub fn write_raw<P: AsRef<Path>>(path: P, buffer: &FixedPointBuffer) -> Result<(), PipelineError> {
    let path = path.as_ref();
    let bytes = buffer.to_le_bytes();
    fs::write(path, &bytes).map_err(|e| {
        PipelineError::ExportError(format!("Cannot write {}: {}", path.display(), e))
    })?;
    log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
