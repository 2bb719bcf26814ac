//! Batch processing and reporting
//!
//! - Batch driver (discovery, parallel per-file conversion, export)
//! - Per-file records, totals and the printed summary

pub mod driver;
pub mod report;

pub use driver::{condition_file, export_file, run_batch, ConditionedFile, FileOutput};
pub use report::{BatchReport, BatchTotals, ExportRecord, SkippedFile};
