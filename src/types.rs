//! Result types shared by the engine, the reporter, and the JSON report.

use crate::imaging::{TransformApplied, reduction_percent};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why one file could not be processed. Never aborts the batch.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum FileError {
    /// Unreadable file or undecodable data.
    #[error("{0}")]
    Decode(String),
    /// Encoder failure or output write failure.
    #[error("{0}")]
    Encode(String),
    /// Empty file, or an image with a zero dimension.
    #[error("{0}")]
    DegenerateInput(String),
}

/// What happened to a `.png` source during a fit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The source was overwritten with the fitted image.
    Rewritten,
    /// The source already held exactly these bytes.
    Unchanged,
}

/// A successfully optimized file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    /// Source file name as discovered.
    pub source: String,
    /// Output file name (stem + mapped extension).
    pub output_name: String,
    pub output_path: PathBuf,
    pub original_size: u64,
    pub new_size: u64,
    pub applied: TransformApplied,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sync: Option<SyncOutcome>,
}

impl FileReport {
    /// Percent smaller than the source. Negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.original_size, self.new_size).unwrap_or(0.0)
    }
}

/// A file that failed, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    pub file_name: String,
    pub error: FileError,
}

/// Outcome for exactly one discovered file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessingResult {
    Success(FileReport),
    Failure(FileFailure),
}

impl ProcessingResult {
    pub fn file_name(&self) -> &str {
        match self {
            Self::Success(report) => &report.source,
            Self::Failure(failure) => &failure.file_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Everything a run produced, in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub results: Vec<ProcessingResult>,
}

impl BatchReport {
    pub fn found(&self) -> usize {
        self.results.len()
    }

    pub fn successes(&self) -> impl Iterator<Item = &FileReport> {
        self.results.iter().filter_map(|r| match r {
            ProcessingResult::Success(report) => Some(report),
            ProcessingResult::Failure(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileFailure> {
        self.results.iter().filter_map(|r| match r {
            ProcessingResult::Failure(failure) => Some(failure),
            ProcessingResult::Success(_) => None,
        })
    }

    pub fn succeeded(&self) -> usize {
        self.successes().count()
    }

    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// Total source bytes of the successful files.
    pub fn original_bytes(&self) -> u64 {
        self.successes().map(|r| r.original_size).sum()
    }

    /// Total output bytes of the successful files.
    pub fn new_bytes(&self) -> u64 {
        self.successes().map(|r| r.new_size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(name: &str, original: u64, new: u64) -> ProcessingResult {
        ProcessingResult::Success(FileReport {
            source: name.to_string(),
            output_name: name.to_string(),
            output_path: PathBuf::from(name),
            original_size: original,
            new_size: new,
            applied: TransformApplied::Unchanged {
                width: 1,
                height: 1,
            },
            source_sync: None,
        })
    }

    fn failure(name: &str) -> ProcessingResult {
        ProcessingResult::Failure(FileFailure {
            file_name: name.to_string(),
            error: FileError::Decode("bad".into()),
        })
    }

    #[test]
    fn batch_totals_skip_failures() {
        let report = BatchReport {
            source_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("out"),
            results: vec![success("a", 1000, 400), failure("b"), success("c", 500, 100)],
        };
        assert_eq!(report.found(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.original_bytes(), 1500);
        assert_eq!(report.new_bytes(), 500);
    }

    #[test]
    fn file_report_reduction() {
        let ProcessingResult::Success(report) = success("a", 1000, 250) else {
            unreachable!()
        };
        assert_eq!(report.reduction_percent(), 75.0);
    }

    #[test]
    fn result_serializes_with_status_tag() {
        let json = serde_json::to_value(failure("x.png")).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["file_name"], "x.png");
        assert_eq!(json["error"]["kind"], "decode");
        assert_eq!(json["error"]["message"], "bad");
    }
}
