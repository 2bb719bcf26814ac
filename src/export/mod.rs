//! Output writers
//!
//! All writers consume the same [`FixedPointBuffer`](crate::encoding::FixedPointBuffer):
//! - WAV file (playable check of the conditioned audio)
//! - C header/source arrays for firmware
//! - Raw little-endian binary blob

use std::path::{Path, PathBuf};

pub mod c_source;
pub mod raw;
pub mod wav;

/// Path of a generated sibling file: `<dir>/<stem><marker>.<extension>`
pub fn edited_path<P: AsRef<Path>>(source: P, marker: &str, extension: &str) -> PathBuf {
    let source = source.as_ref();
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{}{}.{}", stem, marker, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edited_path() {
        assert_eq!(
            edited_path("sound/voice/hello.wav", "-edited", "wav"),
            PathBuf::from("sound/voice/hello-edited.wav")
        );
        assert_eq!(
            edited_path("hello.wav", "-edited", "bin"),
            PathBuf::from("hello-edited.bin")
        );
    }
}
