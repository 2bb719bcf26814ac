//! Recursive input discovery

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Default input extension
pub const DEFAULT_EXTENSION: &str = ".wav";

/// Default marker carried by generated files; inputs containing it are skipped
pub const DEFAULT_EDITED_MARKER: &str = "-edited";

/// Which files count as pipeline inputs
#[derive(Debug, Clone)]
pub struct InputFilter {
    /// Required file-name suffix (case-sensitive)
    pub extension: String,
    /// File names containing this are treated as previous outputs
    pub edited_marker: String,
}

impl Default for InputFilter {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            edited_marker: DEFAULT_EDITED_MARKER.to_string(),
        }
    }
}

impl InputFilter {
    /// Check a bare file name
    pub fn accepts(&self, file_name: &str) -> bool {
        file_name.len() > self.extension.len()
            && file_name.ends_with(&self.extension)
            && (self.edited_marker.is_empty() || !file_name.contains(&self.edited_marker))
    }
}

fn walk(dir: &Path, filter: &InputFilter, found: &mut Vec<PathBuf>) -> Result<(), PipelineError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        PipelineError::DecodeError(format!("Cannot read directory {}: {}", dir.display(), e))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| PipelineError::DecodeError(e.to_string()))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, filter, found)?;
        } else if entry.file_name().to_str().is_some_and(|name| filter.accepts(name)) {
            found.push(path);
        }
    }
    Ok(())
}

/// Find input files under `root`, recursively
///
/// # Returns
///
/// Matching paths, sorted lexicographically
///
/// # Errors
///
/// Returns `PipelineError::DecodeError` if a directory cannot be read.
pub fn find_inputs<P: AsRef<Path>>(
    root: P,
    filter: &InputFilter,
) -> Result<Vec<PathBuf>, PipelineError> {
    let root = root.as_ref();
    let mut found = Vec::new();
    walk(root, filter, &mut found)?;
    found.sort();

    log::info!(
        "Found {} input files under {}",
        found.len(),
        root.display()
    );
    Ok(found)
}
