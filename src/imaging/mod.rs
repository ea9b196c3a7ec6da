//! Image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory_with_format` (format from extension) |
//! | **Downscale** | Lanczos3 `resize_exact` to the truncated max-width size |
//! | **Fit** | centered source-window `crop_imm` + Lanczos3 resize to the target |
//! | **Encode** | `jpeg-encoder` (optimized Huffman) / `webp` (libwebp) / `image` PNG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Policy, codec, and quality types
//! - **Asset**: [`ImageAsset`], the decoded bitmap handed from step to step
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Policy application and color normalization

mod asset;
pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use asset::{ColorMode, ImageAsset};
pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    FitPlan, calculate_downscale_dimensions, calculate_fit_plan, reduction_percent,
};
pub use operations::{TransformApplied, apply_policy, normalize_color};
pub use params::{EncodeSpec, OutputFormat, Quality, SourceFormat, TransformPolicy};
pub use rust_backend::RustBackend;
