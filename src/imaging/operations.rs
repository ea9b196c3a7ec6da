//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take a
//! policy, compute the geometry, and call the backend.

use super::asset::ImageAsset;
use super::backend::ImageBackend;
use super::calculations::{calculate_downscale_dimensions, calculate_fit_plan};
use super::params::{OutputFormat, TransformPolicy};
use serde::Serialize;
use tracing::debug;

/// What the geometric step did to an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformApplied {
    /// Downscaled to fit the width limit.
    Resized { width: u32, height: u32 },
    /// Already within the width limit, left as-is.
    Unchanged { width: u32, height: u32 },
    /// Scaled to cover and center-cropped to the exact target.
    Fitted { width: u32, height: u32 },
}

/// Apply the run's geometric policy to one image.
pub fn apply_policy(
    backend: &impl ImageBackend,
    asset: ImageAsset,
    policy: TransformPolicy,
) -> (ImageAsset, TransformApplied) {
    let source = asset.dimensions();

    match policy {
        TransformPolicy::MaxWidthDownscale { max_width } => {
            match calculate_downscale_dimensions(source, max_width) {
                Some((width, height)) => {
                    debug!(from = ?source, to = ?(width, height), "downscaling");
                    let resized = backend.resize(asset, width, height);
                    (resized, TransformApplied::Resized { width, height })
                }
                None => (
                    asset,
                    TransformApplied::Unchanged {
                        width: source.0,
                        height: source.1,
                    },
                ),
            }
        }
        TransformPolicy::FitExact { width, height } => {
            let plan = calculate_fit_plan(source, (width, height));
            debug!(
                from = ?source,
                scaled = ?plan.scaled,
                offset = ?plan.crop_offset,
                window = ?plan.window_size,
                "fitting"
            );

            let mut asset = asset;
            if plan.needs_crop(source) {
                let (x, y) = plan.window_offset;
                let (w, h) = plan.window_size;
                asset = asset.crop(x, y, w, h);
            }
            if plan.needs_resize() {
                asset = backend.resize(asset, width, height);
            }
            (asset, TransformApplied::Fitted { width, height })
        }
    }
}

/// Flatten the asset if any of the encoders it is headed for need opaque
/// 8-bit pixels.
pub fn normalize_color(asset: ImageAsset, targets: &[OutputFormat]) -> ImageAsset {
    if targets.iter().any(|f| f.requires_opaque()) {
        let mode = asset.color_mode();
        let flat = asset.flatten_to_truecolor();
        if mode != flat.color_mode() {
            debug!(from = ?mode, to = ?flat.color_mode(), "flattened color mode");
        }
        flat
    } else {
        asset
    }
}
