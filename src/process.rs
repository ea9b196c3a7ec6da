//! The transform engine.
//!
//! Takes the entries found by [`discovery`](crate::discovery) and runs each
//! one through decode → color normalization → geometric policy → encode →
//! write, producing exactly one [`ProcessingResult`] per entry.
//!
//! ## Output
//!
//! ```text
//! photos/
//! ├── a.png                      # 500x1000
//! ├── b.jpg                      # 4000x2000
//! └── optimized_images/
//!     ├── a.jpg                  # downscale: unchanged 500x1000 / fit: 1024x1024
//!     └── b.jpg                  # downscale: 2048x1024        / fit: 1024x1024
//! ```
//!
//! Output names keep the source stem and swap the extension for the target
//! codec, so `b.png` and `b.tiff` both land on `b.jpg`; the later one wins.
//!
//! ## Fault isolation
//!
//! Every per-file error is caught at the file boundary and turned into a
//! [`ProcessingResult::Failure`]. Only a missing source directory or an
//! output directory that cannot be created stop a run.
//!
//! ## PNG source sync
//!
//! Fit runs also rewrite `.png` sources in place with the fitted image (see
//! [`sync_source_if_png`]). This is a second write, separate from the output
//! directory, for pages that reference the source files directly. It mutates
//! the user's input, so it can be turned off with `sync_png_sources = false`.
//!
//! Processing is strictly sequential; each file is fully written before the
//! next one is read.

use crate::discovery::{self, DiscoveryError, SourceEntry, default_extensions};
use crate::imaging::{
    EncodeSpec, ImageAsset, ImageBackend, OutputFormat, RustBackend, SourceFormat,
    TransformApplied, TransformPolicy, apply_policy, normalize_color,
};
use crate::types::{
    BatchReport, FileError, FileFailure, FileReport, ProcessingResult, SyncOutcome,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default output directory name, created inside the source directory.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "optimized_images";

/// Conditions that stop a whole run.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub policy: TransformPolicy,
    pub encode: EncodeSpec,
    /// Lowercase extensions without dots.
    pub extensions: Vec<String>,
    /// Rewrite `.png` sources in place during fit runs.
    pub sync_png_sources: bool,
}

impl RunRequest {
    /// A request with the stock defaults: output in `source/optimized_images`,
    /// the default extension list for the codec, PNG sync on for fit runs.
    pub fn new(source_dir: impl Into<PathBuf>, policy: TransformPolicy, encode: EncodeSpec) -> Self {
        let source_dir = source_dir.into();
        Self {
            output_dir: default_output_dir(&source_dir),
            extensions: default_extensions(encode.format),
            sync_png_sources: policy.is_fit_exact(),
            source_dir,
            policy,
            encode,
        }
    }
}

pub fn default_output_dir(source_dir: &Path) -> PathBuf {
    source_dir.join(DEFAULT_OUTPUT_DIR_NAME)
}

/// Progress notifications sent while a run is in flight.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    OutputDirCreated { path: PathBuf },
    Discovered { count: usize },
    Transformed { file_name: String, applied: TransformApplied },
    Finished(ProcessingResult),
}

fn emit(events: Option<&Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is listening
        tx.send(event).ok();
    }
}

/// Optimize a directory with the pure Rust backend.
pub fn optimize(
    request: &RunRequest,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, RunError> {
    run(&RustBackend::new(), request, events)
}

/// Optimize a directory using a specific backend (allows testing with mocks).
pub fn run(
    backend: &impl ImageBackend,
    request: &RunRequest,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, RunError> {
    let events = events.as_ref();

    if !request.source_dir.is_dir() {
        return Err(DiscoveryError::NotADirectory(request.source_dir.clone()).into());
    }

    let existed = request.output_dir.is_dir();
    fs::create_dir_all(&request.output_dir).map_err(|source| RunError::OutputDir {
        path: request.output_dir.clone(),
        source,
    })?;
    if !existed {
        emit(
            events,
            ProcessEvent::OutputDirCreated {
                path: request.output_dir.clone(),
            },
        );
    }

    let entries = discovery::discover(&request.source_dir, &request.extensions)?;
    info!(
        count = entries.len(),
        source = %request.source_dir.display(),
        "discovered images"
    );
    emit(
        events,
        ProcessEvent::Discovered {
            count: entries.len(),
        },
    );

    let results = entries
        .iter()
        .map(|entry| {
            let result = process_entry(backend, entry, request, events);
            emit(events, ProcessEvent::Finished(result.clone()));
            result
        })
        .collect();

    Ok(BatchReport {
        source_dir: request.source_dir.clone(),
        output_dir: request.output_dir.clone(),
        results,
    })
}

/// Process one entry. Never fails: errors become [`ProcessingResult::Failure`].
pub fn process_entry(
    backend: &impl ImageBackend,
    entry: &SourceEntry,
    request: &RunRequest,
    events: Option<&Sender<ProcessEvent>>,
) -> ProcessingResult {
    match transform_entry(backend, entry, request, events) {
        Ok(report) => {
            debug!(
                file = %entry.file_name,
                original = report.original_size,
                new = report.new_size,
                "saved"
            );
            ProcessingResult::Success(report)
        }
        Err(error) => {
            warn!(file = %entry.file_name, %error, "failed to process");
            ProcessingResult::Failure(FileFailure {
                file_name: entry.file_name.clone(),
                error,
            })
        }
    }
}

fn transform_entry(
    backend: &impl ImageBackend,
    entry: &SourceEntry,
    request: &RunRequest,
    events: Option<&Sender<ProcessEvent>>,
) -> Result<FileReport, FileError> {
    let original_size = fs::metadata(&entry.path)
        .map_err(|e| FileError::Decode(format!("cannot read file: {e}")))?
        .len();
    if original_size == 0 {
        return Err(FileError::DegenerateInput("file is empty".into()));
    }

    let bytes =
        fs::read(&entry.path).map_err(|e| FileError::Decode(format!("cannot read file: {e}")))?;
    let asset = backend
        .decode(&bytes, entry.format)
        .map_err(|e| FileError::Decode(e.to_string()))?;
    drop(bytes);

    let (width, height) = asset.dimensions();
    if width == 0 || height == 0 {
        return Err(FileError::DegenerateInput(format!(
            "image has zero size ({width}x{height})"
        )));
    }

    let asset = normalize_color(asset, &[request.encode.format]);

    let (asset, applied) = apply_policy(backend, asset, request.policy);
    emit(
        events,
        ProcessEvent::Transformed {
            file_name: entry.file_name.clone(),
            applied,
        },
    );

    let encoded = backend
        .encode(&asset, &request.encode)
        .map_err(|e| FileError::Encode(e.to_string()))?;

    let output_name = format!("{}.{}", entry.stem(), request.encode.format.extension());
    let output_path = request.output_dir.join(&output_name);
    fs::write(&output_path, &encoded).map_err(|e| {
        FileError::Encode(format!("cannot write {}: {e}", output_path.display()))
    })?;

    let source_sync = if request.sync_png_sources {
        sync_source_if_png(backend, entry, request.policy, &asset)?
    } else {
        None
    };

    Ok(FileReport {
        source: entry.file_name.clone(),
        output_name,
        output_path,
        original_size,
        new_size: encoded.len() as u64,
        applied,
        source_sync,
    })
}

fn wants_source_sync(entry: &SourceEntry, policy: TransformPolicy) -> bool {
    policy.is_fit_exact() && entry.format == SourceFormat::Png
}

/// Overwrite a `.png` source with the fitted image, encoded as PNG.
///
/// Only applies to fit runs over PNG sources; returns `Ok(None)` otherwise.
/// This writes to the *input* directory, outside the output directory, so
/// that consumers linking the original path see the fitted version. The file
/// is left untouched when it already holds identical bytes, which makes a
/// repeated run over an already-synced source a no-op.
///
/// The PNG is written as opaque truecolor; `asset` itself is not modified, so
/// a WebP output of the same run keeps its alpha.
pub fn sync_source_if_png(
    backend: &impl ImageBackend,
    entry: &SourceEntry,
    policy: TransformPolicy,
    asset: &ImageAsset,
) -> Result<Option<SyncOutcome>, FileError> {
    if !wants_source_sync(entry, policy) {
        return Ok(None);
    }

    let opaque = normalize_color(asset.clone(), &[OutputFormat::Png]);
    let png = backend
        .encode(&opaque, &EncodeSpec::png())
        .map_err(|e| FileError::Encode(e.to_string()))?;

    if fs::read(&entry.path).is_ok_and(|current| current == png) {
        debug!(file = %entry.file_name, "source already in sync");
        return Ok(Some(SyncOutcome::Unchanged));
    }

    fs::write(&entry.path, &png).map_err(|e| {
        FileError::Encode(format!("cannot update source {}: {e}", entry.path.display()))
    })?;
    info!(file = %entry.file_name, "rewrote source png");
    Ok(Some(SyncOutcome::Rewritten))
}
