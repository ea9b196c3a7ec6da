//! Optimizer configuration.
//!
//! Handles loading, validating, and merging `imgshrink.toml`. Stock defaults
//! are overridden by a config file in the source directory (or one passed
//! with `--config`), and command-line values override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir_name = "optimized_images"  # Created inside the source directory
//!
//! [discovery]
//! extensions = []           # Empty = png, jpg, jpeg, tiff, bmp (+ webp for WEBP output)
//!
//! [downscale]
//! max_width = 2048          # Wider images shrink to this width; narrower pass through
//!
//! [fit]
//! width = 1024              # Exact output size for `fit`
//! height = 1024
//! sync_png_sources = true   # Rewrite .png sources in place with the fitted image
//!
//! [encode]
//! format = "jpeg"           # jpeg | webp
//! # quality = 85            # Omit for the per-format default (jpeg 85, webp 80)
//! lossless = false          # WEBP only
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::discovery::default_extensions;
use crate::imaging::{OutputFormat, Quality, SourceFormat};
use crate::process::DEFAULT_OUTPUT_DIR_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "imgshrink.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// A malformed numeric command-line argument.
///
/// Never fatal: the caller substitutes [`default`](Self::default) and warns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {name} '{value}', using default {default}")]
pub struct ArgumentError {
    pub name: &'static str,
    pub value: String,
    pub default: u32,
}

/// Parse an optional positive integer argument.
///
/// Missing → `Ok(default)`. Non-numeric or zero → `Err` carrying the default
/// to fall back on.
pub fn parse_dimension_arg(
    name: &'static str,
    raw: Option<&str>,
    default: u32,
) -> Result<u32, ArgumentError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ArgumentError {
            name,
            value: raw.to_string(),
            default,
        }),
    }
}

/// Optimizer configuration loaded from `imgshrink.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizerConfig {
    /// Output directory name, resolved against the source directory.
    pub output_dir_name: String,
    pub discovery: DiscoveryConfig,
    pub downscale: DownscaleConfig,
    pub fit: FitConfig,
    pub encode: EncodeConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            output_dir_name: DEFAULT_OUTPUT_DIR_NAME.to_string(),
            discovery: DiscoveryConfig::default(),
            downscale: DownscaleConfig::default(),
            fit: FitConfig::default(),
            encode: EncodeConfig::default(),
        }
    }
}

impl OptimizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir_name must not be empty".into(),
            ));
        }
        if self.downscale.max_width == 0 {
            return Err(ConfigError::Validation(
                "downscale.max_width must be non-zero".into(),
            ));
        }
        if self.fit.width == 0 || self.fit.height == 0 {
            return Err(ConfigError::Validation(
                "fit.width and fit.height must be non-zero".into(),
            ));
        }
        if self.encode.quality.is_some_and(|q| !(1..=100).contains(&q)) {
            return Err(ConfigError::Validation(
                "encode.quality must be 1-100".into(),
            ));
        }
        if self.encode.format == OutputFormat::Png {
            return Err(ConfigError::Validation(
                "encode.format must be jpeg or webp".into(),
            ));
        }
        for ext in &self.discovery.extensions {
            if SourceFormat::from_extension(&normalize_extension(ext)).is_none() {
                return Err(ConfigError::Validation(format!(
                    "discovery.extensions: unsupported extension '{ext}'"
                )));
            }
        }
        Ok(())
    }

    /// Extensions to discover for a run targeting `target`.
    pub fn extensions(&self, target: OutputFormat) -> Vec<String> {
        if self.discovery.extensions.is_empty() {
            default_extensions(target)
        } else {
            self.discovery
                .extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect()
        }
    }

    /// Configured quality, or the codec's default.
    pub fn quality(&self, format: OutputFormat) -> Quality {
        self.encode
            .quality
            .map(Quality::new)
            .unwrap_or_else(|| format.default_quality())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Which files to pick up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Allowed extensions (case-insensitive, with or without a leading dot).
    pub extensions: Vec<String>,
}

/// Settings for the `downscale` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownscaleConfig {
    pub max_width: u32,
}

impl Default for DownscaleConfig {
    fn default() -> Self {
        Self { max_width: 2048 }
    }
}

/// Settings for the `fit` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    pub width: u32,
    pub height: u32,
    /// Overwrite `.png` sources with the fitted image (encoded as PNG).
    pub sync_png_sources: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 1024,
            sync_png_sources: true,
        }
    }
}

/// Output codec settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeConfig {
    pub format: OutputFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    pub lossless: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality: None,
            lossless: false,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(OptimizerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it doesn't exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<OptimizerConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: OptimizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `imgshrink.toml` from the source directory, falling back to defaults.
pub fn load_config(source_dir: &Path) -> Result<OptimizerConfig, ConfigError> {
    resolve_config(load_raw_config(&source_dir.join(CONFIG_FILE_NAME))?)
}

/// Load an explicitly named config file. Unlike [`load_config`], the file
/// must exist.
pub fn load_config_file(path: &Path) -> Result<OptimizerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `imgshrink.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgshrink configuration
# =======================
# Place this file in the source directory as imgshrink.toml, or pass it with
# --config. Every key is optional; omitted keys keep the values shown here.
# Command-line arguments override this file.

# Output directory, created inside the source directory.
output_dir_name = "optimized_images"

[discovery]
# Extensions to pick up (case-insensitive). Empty means the defaults:
# png, jpg, jpeg, tiff, bmp, plus webp when encoding to WEBP.
extensions = []

[downscale]
# Images wider than this are shrunk to exactly this width, keeping their
# aspect ratio. Narrower images are re-encoded at their original size.
max_width = 2048

[fit]
# Every image is scaled to cover width x height and center-cropped to it.
width = 1024
height = 1024
# When a source is a .png, also overwrite it in place with the fitted image
# encoded as PNG. Pages that link the original file see the new version.
sync_png_sources = true

[encode]
# Output codec: "jpeg" or "webp".
format = "jpeg"
# Encoding quality, 1-100. Defaults to 85 for JPEG and 80 for WEBP.
# quality = 85
# WEBP only: encode lossless instead of lossy.
lossless = false
"##
}
