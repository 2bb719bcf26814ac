//! Embeddable C source export
//!
//! Each processed file contributes a size constant and an `extern` declaration
//! to the header and an array literal to the source file. The header lists
//! every `#define` before every `extern`.
//!
//! # Example
//!
//! ```
//! use pcm_embed::encoding::{BitDepth, FixedPointBuffer};
//! use pcm_embed::export::c_source::SourceBlocks;
//!
//! let fixed = FixedPointBuffer { depth: BitDepth::Depth8, sample_rate: 16000, values: vec![127, 200] };
//! let blocks = SourceBlocks::new("sound/beep.wav", &fixed);
//! assert_eq!(blocks.define, "#define SOUND_BEEP_SIZE 2");
//! assert_eq!(blocks.extern_decl, "extern const uint8_t sound_beep[SOUND_BEEP_SIZE];");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::encoding::FixedPointBuffer;
use crate::error::PipelineError;

/// Derive a C identifier from a file path
///
/// The extension is stripped, then path separators and any other character
/// that is not valid in an identifier become `_`. A leading digit gets a `_`
/// prefix.
pub fn symbol_name<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let stem = path.with_extension("");
    let mut name: String = stem
        .to_string_lossy()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Path used for naming an input found under `root`
///
/// Relative to the parent of `root`, so `sound/a.wav` keeps its `sound/`
/// prefix wherever the tree lives. A root without a final component (`.`,
/// `/`) names inputs relative to the root itself.
pub fn symbol_path(root: &Path, path: &Path) -> PathBuf {
    let base = match (root.file_name(), root.parent()) {
        (Some(_), Some(parent)) => parent,
        _ => root,
    };
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}

/// Fail if two inputs map to the same C identifier
///
/// `paths` are the naming paths (see [`symbol_path`]) in discovery order.
///
/// # Errors
///
/// Returns `PipelineError::ExportError` naming both colliding paths.
pub fn check_unique_symbols<'a, I>(paths: I) -> Result<(), PipelineError>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for path in paths {
        let name = symbol_name(path);
        if let Some(first) = seen.get(&name) {
            return Err(PipelineError::ExportError(format!(
                "{} and {} both map to C symbol `{}`",
                first.display(),
                path.display(),
                name
            )));
        }
        seen.insert(name, path);
    }
    Ok(())
}

/// Header and source text contributed by one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlocks {
    /// `#define NAME_SIZE n`
    pub define: String,
    /// `extern const T name[NAME_SIZE];`
    pub extern_decl: String,
    /// `const T name[NAME_SIZE] = {...};`
    pub definition: String,
}

impl SourceBlocks {
    /// Render all three lines for a quantized buffer
    pub fn new<P: AsRef<Path>>(source_path: P, buffer: &FixedPointBuffer) -> Self {
        let name = symbol_name(source_path);
        let size_const = format!("{}_SIZE", name.to_uppercase());
        let c_type = buffer.depth.c_type();

        let values = buffer
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            define: format!("#define {} {}", size_const, buffer.len()),
            extern_decl: format!("extern const {} {}[{}];", c_type, name, size_const),
            definition: format!("const {} {}[{}] = {{{}}};", c_type, name, size_const, values),
        }
    }
}

/// Render the complete header file: all defines, a blank line, all externs
pub fn render_header(blocks: &[SourceBlocks]) -> String {
    let mut header = String::from("#pragma once\n\n#include <stdint.h>\n\n");
    for block in blocks {
        header.push_str(&block.define);
        header.push('\n');
    }
    header.push('\n');
    for block in blocks {
        header.push_str(&block.extern_decl);
        header.push('\n');
    }
    header
}

/// Render the complete source file
pub fn render_source(header_file_name: &str, blocks: &[SourceBlocks]) -> String {
    let mut source = format!("#include \"{}\"\n", header_file_name);
    for block in blocks {
        source.push('\n');
        source.push_str(&block.definition);
        source.push('\n');
    }
    source
}

/// Write `<name>.h` and `<name>.c` into `dir`
///
/// # Returns
///
/// Paths of the header and source file
pub fn write_sources<P: AsRef<Path>>(
    dir: P,
    artifact_name: &str,
    blocks: &[SourceBlocks],
) -> Result<(PathBuf, PathBuf), PipelineError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let header_name = format!("{}.h", artifact_name);
    let header_path = dir.join(&header_name);
    let source_path = dir.join(format!("{}.c", artifact_name));

    fs::write(&header_path, render_header(blocks))?;
    fs::write(&source_path, render_source(&header_name, blocks))?;

    log::info!(
        "Wrote {} arrays to {} and {}",
        blocks.len(),
        header_path.display(),
        source_path.display()
    );
    Ok((header_path, source_path))
}
