//! Batch driver
//!
//! Runs the per-file pipeline over every discovered input in two phases.
//! Decoding and conditioning have no side effects, so they run in parallel
//! on a rayon pool. Exporting then walks the results in discovery order, one
//! file at a time, so under [`FailurePolicy::Abort`] nothing is written for
//! files after the first failure.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::batch::report::{BatchReport, ExportRecord, SkippedFile};
use crate::config::{FailurePolicy, PipelineConfig};
use crate::condition_audio;
use crate::encoding::FixedPointBuffer;
use crate::error::PipelineError;
use crate::export::c_source::{check_unique_symbols, symbol_path, write_sources, SourceBlocks};
use crate::export::edited_path;
use crate::export::raw::write_raw;
use crate::export::wav::write_wav;
use crate::io::decoder::decode_audio;
use crate::io::discovery::find_inputs;

/// A decoded and conditioned file, not yet written anywhere
#[derive(Debug, Clone)]
pub struct ConditionedFile {
    /// Input file
    pub source_path: PathBuf,
    /// Samples after decoding (before filtering/decimation)
    pub original_sample_count: usize,
    /// Quantized output
    pub fixed: FixedPointBuffer,
}

/// Outputs of one successfully converted file
#[derive(Debug, Clone)]
pub struct FileOutput {
    /// Sample counts
    pub record: ExportRecord,
    /// Header and source text for the embedded array
    pub blocks: SourceBlocks,
}

/// Default worker count: available CPU threads minus one, at least one
pub fn default_jobs() -> usize {
    let n = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

/// Decode, condition and quantize one file
///
/// Touches nothing on disk besides reading the input.
pub fn condition_file(path: &Path, config: &PipelineConfig) -> Result<ConditionedFile, PipelineError> {
    let decoded = decode_audio(path)?;
    let fixed = condition_audio(&decoded.buffer, config)?;

    log::debug!(
        "{}: {} -> {} samples ({:?} source, {} ch)",
        path.display(),
        decoded.buffer.len(),
        fixed.len(),
        decoded.format,
        decoded.channels
    );

    Ok(ConditionedFile {
        source_path: path.to_path_buf(),
        original_sample_count: decoded.buffer.len(),
        fixed,
    })
}

/// Write the per-file WAV/raw artifacts of a conditioned file
///
/// `naming_path` is the path the C symbol is derived from (see
/// [`symbol_path`]). Returns the text blocks for the shared header/source.
pub fn export_file(
    file: &ConditionedFile,
    naming_path: &Path,
    config: &PipelineConfig,
) -> Result<FileOutput, PipelineError> {
    let path = &file.source_path;
    if config.write_wav {
        write_wav(edited_path(path, &config.edited_marker, "wav"), &file.fixed)?;
    }
    if config.write_raw {
        write_raw(edited_path(path, &config.edited_marker, "bin"), &file.fixed)?;
    }

    log::info!(
        "{}: {} -> {} samples",
        path.display(),
        file.original_sample_count,
        file.fixed.len()
    );

    Ok(FileOutput {
        record: ExportRecord {
            source_path: path.clone(),
            original_sample_count: file.original_sample_count,
            trimmed_sample_count: file.fixed.len(),
        },
        blocks: SourceBlocks::new(naming_path, &file.fixed),
    })
}

/// Convert every input under `root`
///
/// C symbols are named from each input's path relative to the parent of
/// `root`, so `sound/a.wav` becomes `sound_a` wherever `sound/` lives.
///
/// # Returns
///
/// `BatchReport` with per-file records, skipped files, totals and the paths
/// of the generated header/source files
///
/// # Errors
///
/// - Configuration or discovery errors
/// - `PipelineError::ExportError` if two inputs map to the same C symbol;
///   checked before any file is processed
/// - Under [`FailurePolicy::Abort`], the error of the first failing file in
///   discovery order; files after it are not exported and the header/source
///   files are not written
pub fn run_batch<P: AsRef<Path>>(
    root: P,
    config: &PipelineConfig,
) -> Result<BatchReport, PipelineError> {
    config.validate()?;

    let root = root.as_ref();
    let inputs = find_inputs(root, &config.input_filter())?;
    let naming: Vec<PathBuf> = inputs.iter().map(|p| symbol_path(root, p)).collect();
    check_unique_symbols(naming.iter().map(|p| p.as_path()))?;

    let jobs = config.jobs.unwrap_or_else(default_jobs);
    log::info!("Batch: {} files, jobs={}", inputs.len(), jobs);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| PipelineError::InvalidInput(format!("Cannot build thread pool: {}", e)))?;

    let conditioned: Vec<Result<ConditionedFile, PipelineError>> = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| condition_file(path, config))
            .collect()
    });

    let mut outputs = Vec::with_capacity(inputs.len());
    let mut skipped = Vec::new();
    for ((path, naming_path), result) in inputs.iter().zip(naming.iter()).zip(conditioned) {
        match result.and_then(|file| export_file(&file, naming_path, config)) {
            Ok(output) => outputs.push(output),
            Err(e) => match config.failure_policy {
                FailurePolicy::Abort => {
                    log::error!("{}: {} ({})", path.display(), e, e.kind());
                    return Err(e);
                }
                FailurePolicy::Skip => {
                    log::warn!("Skipping {}: {} ({})", path.display(), e, e.kind());
                    skipped.push(SkippedFile {
                        source_path: path.clone(),
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });
                }
            },
        }
    }

    let blocks: Vec<SourceBlocks> = outputs.iter().map(|o| o.blocks.clone()).collect();
    let (header_path, source_path) =
        write_sources(&config.output_dir, &config.artifact_name, &blocks)?;

    let records = outputs.into_iter().map(|o| o.record).collect();
    let mut report = BatchReport::from_records(records, skipped);
    report.header_path = Some(header_path);
    report.source_path = Some(source_path);

    log::info!(
        "Done: ok={} skipped={} compression={}%",
        report.totals.files,
        report.skipped.len(),
        report.totals.compression_percent()
    );
    Ok(report)
}
