//! Source file discovery.
//!
//! Lists the images directly inside the source directory. Only the top level
//! is read; subdirectories (including an output directory nested inside the
//! source) are never entered or returned.
//!
//! A file qualifies when its lowercased name ends with `.{ext}` for one of the
//! allowed extensions and it is a regular file when listed. The extension is
//! mapped once to a [`SourceFormat`], so later stages dispatch on an enum and
//! never compare strings again.
//!
//! Entries are sorted by file name, so two runs over the same directory
//! process files in the same order.

use crate::imaging::{OutputFormat, SourceFormat};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Source directory not found: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to list source directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Extensions accepted when the config doesn't list its own.
const BASE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp"];

/// Default allow-list for a target codec. WEBP runs also re-encode WebP inputs.
pub fn default_extensions(target: OutputFormat) -> Vec<String> {
    let mut exts: Vec<String> = BASE_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    if target == OutputFormat::Webp {
        exts.push("webp".to_string());
    }
    exts
}

/// One image found in the source directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceEntry {
    pub path: PathBuf,
    /// File name as listed (original case).
    pub file_name: String,
    /// Matched extension, lowercase, without the dot.
    pub extension: String,
    pub format: SourceFormat,
}

impl SourceEntry {
    /// File name without its extension, as used for output naming.
    ///
    /// A name that is only the extension (`.png`) keeps the whole name as
    /// its stem, so it maps to `.png.jpg` rather than a bare `.jpg`.
    pub fn stem(&self) -> &str {
        let cut = self.file_name.len() - self.extension.len() - 1;
        if cut == 0 {
            &self.file_name
        } else {
            &self.file_name[..cut]
        }
    }
}

/// Match a file name against the allow-list, returning the matched extension.
fn match_extension<'a>(file_name: &str, extensions: &'a [String]) -> Option<&'a str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    extensions
        .iter()
        .find(|allowed| allowed.eq_ignore_ascii_case(ext))
        .map(String::as_str)
}

/// List the images in `source_dir` whose extension is in `extensions`.
///
/// `extensions` must be lowercase and without dots. An empty result is fine.
pub fn discover(source_dir: &Path, extensions: &[String]) -> Result<Vec<SourceEntry>, DiscoveryError> {
    if !source_dir.is_dir() {
        return Err(DiscoveryError::NotADirectory(source_dir.to_path_buf()));
    }

    let mut entries = Vec::new();

    for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !path.is_file() {
            continue;
        }

        let Some(ext) = match_extension(&file_name, extensions) else {
            debug!(file = %file_name, "skipping non-image");
            continue;
        };
        let Some(format) = SourceFormat::from_extension(ext) else {
            continue;
        };

        entries.push(SourceEntry {
            path: path.to_path_buf(),
            file_name,
            extension: ext.to_string(),
            format,
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}
