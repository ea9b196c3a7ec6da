//! Image codec backend trait and shared error type.
//!
//! The [`ImageBackend`] trait is the black box the engine talks to: decode
//! bytes into an [`ImageAsset`], resize it, and encode it back to bytes.
//! Cropping and color flattening are plain bitmap operations on the asset and
//! stay outside the trait.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::asset::ImageAsset;
use super::params::{EncodeSpec, SourceFormat};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Trait for image codec backends.
pub trait ImageBackend {
    /// Decode raw file bytes with the decoder for `format`. No sniffing.
    fn decode(&self, bytes: &[u8], format: SourceFormat) -> Result<ImageAsset, BackendError>;

    /// Resize to exactly `width × height` with a high-quality filter.
    fn resize(&self, asset: ImageAsset, width: u32, height: u32) -> ImageAsset;

    /// Encode to the codec described by `spec`.
    fn encode(&self, asset: &ImageAsset, spec: &EncodeSpec) -> Result<Vec<u8>, BackendError>;
}
