//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! Created output directory: photos/optimized_images
//! Found 2 images to process...
//! Copying a.png (already small enough)...
//! Saved: a.jpg (61.3KB) - Reduced by 82.4%
//! Resizing b.jpg...
//! Saved: b.jpg (402.9KB) - Reduced by 71.0%
//! Processed 2 of 2 images (0 failed), 1736.4KB → 464.2KB
//! Done! Check the 'photos/optimized_images' directory.
//! ```
//!
//! Fit runs announce the target instead and leave out the reduction, since
//! an exact-size output can be larger than its source:
//!
//! ```text
//! Fitting a.png to 1024x1024...
//! Saved: a.jpg (88.0KB)
//! Updated source: a.png
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::config::ArgumentError;
use crate::imaging::TransformApplied;
use crate::process::ProcessEvent;
use crate::types::{BatchReport, FileReport, ProcessingResult, SyncOutcome};
use std::path::Path;

/// Bytes as kibibytes with one decimal, e.g. `61.3`.
fn kb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0)
}

fn saved_line(report: &FileReport) -> String {
    let size = kb(report.new_size);
    match report.applied {
        TransformApplied::Fitted { .. } => format!("Saved: {} ({size}KB)", report.output_name),
        _ => format!(
            "Saved: {} ({size}KB) - Reduced by {:.1}%",
            report.output_name,
            report.reduction_percent()
        ),
    }
}

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::OutputDirCreated { path } => {
            vec![format!("Created output directory: {}", path.display())]
        }
        ProcessEvent::Discovered { count } => {
            vec![format!("Found {count} images to process...")]
        }
        ProcessEvent::Transformed { file_name, applied } => {
            let line = match applied {
                TransformApplied::Resized { .. } => format!("Resizing {file_name}..."),
                TransformApplied::Unchanged { .. } => {
                    format!("Copying {file_name} (already small enough)...")
                }
                TransformApplied::Fitted { width, height } => {
                    format!("Fitting {file_name} to {width}x{height}...")
                }
            };
            vec![line]
        }
        ProcessEvent::Finished(ProcessingResult::Success(report)) => {
            let mut lines = vec![saved_line(report)];
            if report.source_sync == Some(SyncOutcome::Rewritten) {
                lines.push(format!("Updated source: {}", report.source));
            }
            lines
        }
        ProcessEvent::Finished(ProcessingResult::Failure(failure)) => {
            vec![format!(
                "Error processing {}: {}",
                failure.file_name, failure.error
            )]
        }
    }
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{line}");
    }
}

/// Totals plus the completion banner.
pub fn format_summary(report: &BatchReport) -> Vec<String> {
    vec![
        format!(
            "Processed {} of {} images ({} failed), {}KB \u{2192} {}KB",
            report.succeeded(),
            report.found(),
            report.failed(),
            kb(report.original_bytes()),
            kb(report.new_bytes()),
        ),
        format_done(&report.output_dir),
    ]
}

pub fn print_summary(report: &BatchReport) {
    for line in format_summary(report) {
        println!("{line}");
    }
}

fn format_done(output_dir: &Path) -> String {
    format!("Done! Check the '{}' directory.", output_dir.display())
}

pub fn format_argument_warning(error: &ArgumentError) -> String {
    format!("Warning: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileError, FileFailure};
    use std::path::PathBuf;

    fn file_report(applied: TransformApplied, original: u64, new: u64) -> FileReport {
        FileReport {
            source: "b.png".to_string(),
            output_name: "b.jpg".to_string(),
            output_path: PathBuf::from("out/b.jpg"),
            original_size: original,
            new_size: new,
            applied,
            source_sync: None,
        }
    }

    #[test]
    fn kb_uses_1024_and_one_decimal() {
        assert_eq!(kb(0), "0.0");
        assert_eq!(kb(1024), "1.0");
        assert_eq!(kb(1536), "1.5");
        assert_eq!(kb(62771), "61.3");
    }

    // =========================================================================
    // Process event formatting
    // =========================================================================

    #[test]
    fn format_created_and_found() {
        let created = ProcessEvent::OutputDirCreated {
            path: PathBuf::from("photos/optimized_images"),
        };
        assert_eq!(
            format_process_event(&created),
            vec!["Created output directory: photos/optimized_images"]
        );
        assert_eq!(
            format_process_event(&ProcessEvent::Discovered { count: 3 }),
            vec!["Found 3 images to process..."]
        );
    }

    #[test]
    fn format_transform_lines() {
        let event = |applied| ProcessEvent::Transformed {
            file_name: "a.png".to_string(),
            applied,
        };
        assert_eq!(
            format_process_event(&event(TransformApplied::Resized {
                width: 2048,
                height: 1024
            })),
            vec!["Resizing a.png..."]
        );
        assert_eq!(
            format_process_event(&event(TransformApplied::Unchanged {
                width: 500,
                height: 1000
            })),
            vec!["Copying a.png (already small enough)..."]
        );
        assert_eq!(
            format_process_event(&event(TransformApplied::Fitted {
                width: 1024,
                height: 768
            })),
            vec!["Fitting a.png to 1024x768..."]
        );
    }

    #[test]
    fn format_saved_with_reduction() {
        let report = file_report(
            TransformApplied::Resized {
                width: 10,
                height: 10,
            },
            4096,
            1024,
        );
        let lines = format_process_event(&ProcessEvent::Finished(ProcessingResult::Success(report)));
        assert_eq!(lines, vec!["Saved: b.jpg (1.0KB) - Reduced by 75.0%"]);
    }

    #[test]
    fn format_saved_negative_reduction() {
        let report = file_report(
            TransformApplied::Unchanged {
                width: 10,
                height: 10,
            },
            1000,
            1500,
        );
        let lines = format_process_event(&ProcessEvent::Finished(ProcessingResult::Success(report)));
        assert_eq!(lines, vec!["Saved: b.jpg (1.5KB) - Reduced by -50.0%"]);
    }

    #[test]
    fn format_saved_fit_omits_reduction_and_reports_sync() {
        let mut report = file_report(
            TransformApplied::Fitted {
                width: 10,
                height: 10,
            },
            4096,
            2048,
        );
        report.source_sync = Some(SyncOutcome::Rewritten);
        let lines = format_process_event(&ProcessEvent::Finished(ProcessingResult::Success(report)));
        assert_eq!(lines, vec!["Saved: b.jpg (2.0KB)", "Updated source: b.png"]);
    }

    #[test]
    fn format_unchanged_sync_is_silent() {
        let mut report = file_report(
            TransformApplied::Fitted {
                width: 10,
                height: 10,
            },
            4096,
            2048,
        );
        report.source_sync = Some(SyncOutcome::Unchanged);
        let lines = format_process_event(&ProcessEvent::Finished(ProcessingResult::Success(report)));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn format_failure() {
        let failure = ProcessingResult::Failure(FileFailure {
            file_name: "broken.png".to_string(),
            error: FileError::Decode("decode failed: bad header".into()),
        });
        assert_eq!(
            format_process_event(&ProcessEvent::Finished(failure)),
            vec!["Error processing broken.png: decode failed: bad header"]
        );
    }

    // =========================================================================
    // Summary
    // =========================================================================

    #[test]
    fn format_summary_counts_and_banner() {
        let report = BatchReport {
            source_dir: PathBuf::from("photos"),
            output_dir: PathBuf::from("photos/optimized_images"),
            results: vec![
                ProcessingResult::Success(file_report(
                    TransformApplied::Resized {
                        width: 1,
                        height: 1,
                    },
                    4096,
                    1024,
                )),
                ProcessingResult::Failure(FileFailure {
                    file_name: "x.png".to_string(),
                    error: FileError::DegenerateInput("file is empty".into()),
                }),
            ],
        };
        assert_eq!(
            format_summary(&report),
            vec![
                "Processed 1 of 2 images (1 failed), 4.0KB \u{2192} 1.0KB".to_string(),
                "Done! Check the 'photos/optimized_images' directory.".to_string(),
            ]
        );
    }

    #[test]
    fn format_summary_empty_run() {
        let report = BatchReport {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("./optimized_images"),
            results: vec![],
        };
        assert_eq!(
            format_summary(&report)[0],
            "Processed 0 of 0 images (0 failed), 0.0KB \u{2192} 0.0KB"
        );
    }

    #[test]
    fn format_argument_warning_includes_default() {
        let err = ArgumentError {
            name: "max_width",
            value: "abc".to_string(),
            default: 2048,
        };
        assert_eq!(
            format_argument_warning(&err),
            "Warning: invalid max_width 'abc', using default 2048"
        );
    }
}
