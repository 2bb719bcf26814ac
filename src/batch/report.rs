//! Batch result types and summary formatting

use std::fmt::Write as _;
use std::iter::Sum;
use std::ops::Add;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Bytes per sample used for the size figures in the summary
pub const REPORT_BYTES_PER_SAMPLE: usize = 2;

/// Per-file outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Input file
    pub source_path: PathBuf,
    /// Samples after decoding (before filtering/decimation)
    pub original_sample_count: usize,
    /// Samples written (after trimming, guard samples included)
    pub trimmed_sample_count: usize,
}

/// Aggregate sample counts over a batch
///
/// Built by summing per-file values; there is no shared accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Files included in the totals
    pub files: usize,
    /// Sum of original sample counts
    pub original_samples: usize,
    /// Sum of trimmed sample counts
    pub trimmed_samples: usize,
}

impl BatchTotals {
    /// Totals contributed by a single file
    pub fn from_record(record: &ExportRecord) -> Self {
        Self {
            files: 1,
            original_samples: record.original_sample_count,
            trimmed_samples: record.trimmed_sample_count,
        }
    }

    /// Original size in bytes
    pub fn original_bytes(&self) -> usize {
        REPORT_BYTES_PER_SAMPLE * self.original_samples
    }

    /// Trimmed size in bytes
    pub fn trimmed_bytes(&self) -> usize {
        REPORT_BYTES_PER_SAMPLE * self.trimmed_samples
    }

    /// Size reduction in percent: `100 - round(100 * trimmed / original)`
    ///
    /// Zero for an empty batch. Can be negative when output exceeds input.
    pub fn compression_percent(&self) -> i64 {
        if self.original_samples == 0 {
            return 0;
        }
        let ratio = self.trimmed_samples as f64 / self.original_samples as f64;
        100 - (100.0 * ratio).round() as i64
    }
}

impl Add for BatchTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            files: self.files + other.files,
            original_samples: self.original_samples + other.original_samples,
            trimmed_samples: self.trimmed_samples + other.trimmed_samples,
        }
    }
}

impl Sum for BatchTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> FromIterator<&'a ExportRecord> for BatchTotals {
    fn from_iter<I: IntoIterator<Item = &'a ExportRecord>>(iter: I) -> Self {
        iter.into_iter().map(BatchTotals::from_record).sum()
    }
}

/// A file left out under the skip policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Input file
    pub source_path: PathBuf,
    /// Error kind (e.g. "AllSilent")
    pub kind: String,
    /// Full error message
    pub message: String,
}

/// Everything a batch run produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Successfully converted files, in discovery order
    pub records: Vec<ExportRecord>,
    /// Files skipped because of errors
    pub skipped: Vec<SkippedFile>,
    /// Sum over `records`
    pub totals: BatchTotals,
    /// Generated header file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_path: Option<PathBuf>,
    /// Generated source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl BatchReport {
    /// Build a report from per-file records
    pub fn from_records(records: Vec<ExportRecord>, skipped: Vec<SkippedFile>) -> Self {
        let totals = records.iter().collect();
        Self {
            records,
            skipped,
            totals,
            header_path: None,
            source_path: None,
        }
    }

    /// Human-readable summary: one line per file, then the totals
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            let _ = writeln!(
                out,
                "{}: {:10}     edit {:10}",
                record.source_path.display(),
                record.original_sample_count,
                record.trimmed_sample_count
            );
        }
        for skipped in &self.skipped {
            let _ = writeln!(
                out,
                "{}: skipped ({})",
                skipped.source_path.display(),
                skipped.kind
            );
        }

        let totals = &self.totals;
        let _ = writeln!(out, "{}", "=".repeat(67));
        let _ = writeln!(
            out,
            "size     : {:>10} samples -> {:>10} B",
            group_thousands(totals.original_samples),
            group_thousands(totals.original_bytes())
        );
        let _ = writeln!(
            out,
            "size_edit: {:>10} samples -> {:>10} B",
            group_thousands(totals.trimmed_samples),
            group_thousands(totals.trimmed_bytes())
        );
        let _ = writeln!(out, "compression: {:>8} %", totals.compression_percent());
        out
    }
}

/// Format an integer with `,` thousands separators
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, original: usize, trimmed: usize) -> ExportRecord {
        ExportRecord {
            source_path: PathBuf::from(path),
            original_sample_count: original,
            trimmed_sample_count: trimmed,
        }
    }

    #[test]
    fn test_totals_three_files() {
        let records = vec![
            record("sound/a.wav", 48000, 9000),
            record("sound/b.wav", 96000, 20000),
            record("sound/c.wav", 32000, 7000),
        ];
        let report = BatchReport::from_records(records, vec![]);
        assert_eq!(report.totals.files, 3);
        assert_eq!(report.totals.original_samples, 176000);
        assert_eq!(report.totals.trimmed_samples, 36000);
        assert_eq!(report.totals.original_bytes(), 352000);
        // 100 * 36000 / 176000 = 20.45 -> 20
        assert_eq!(report.totals.compression_percent(), 80);
    }

    #[test]
    fn test_empty_batch() {
        let totals = BatchTotals::default();
        assert_eq!(totals.compression_percent(), 0);
    }

    #[test]
    fn test_sum_is_order_independent() {
        let a = BatchTotals::from_record(&record("a", 10, 4));
        let b = BatchTotals::from_record(&record("b", 30, 6));
        assert_eq!(a + b, b + a);
        assert_eq!(vec![a, b].into_iter().sum::<BatchTotals>().original_samples, 40);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_summary_lines() {
        let report = BatchReport::from_records(vec![record("sound/a.wav", 1000, 250)], vec![]);
        let summary = report.summary();
        assert!(summary.starts_with("sound/a.wav:       1000     edit        250\n"));
        assert!(summary.contains("size     :      1,000 samples ->      2,000 B"));
        assert!(summary.contains("compression:       75 %"));
    }

    #[test]
    fn test_report_serializes() {
        let report = BatchReport::from_records(vec![record("a.wav", 10, 5)], vec![]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"trimmed_sample_count\":5"));
        assert!(!json.contains("header_path"));
    }
}
