//! Codec backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, TIFF, BMP, WebP) | `image::load_from_memory_with_format` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `jpeg_encoder::Encoder` with optimized Huffman tables |
//! | Encode → WebP | `webp::Encoder` (libwebp), lossy at the given quality or lossless |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (best compression, adaptive filter) |

use super::asset::ImageAsset;
use super::backend::{BackendError, ImageBackend};
use super::params::{EncodeSpec, OutputFormat, Quality, SourceFormat};
use image::DynamicImage;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;

/// Default backend: `image` for decode, resize and PNG, `jpeg-encoder` and
/// `webp` for the lossy codecs.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Default)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

fn encode_jpeg(img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let too_large = || {
        BackendError::Encode(format!(
            "JPEG: {}x{} exceeds the 65535 pixel limit",
            img.width(),
            img.height()
        ))
    };
    let width = u16::try_from(img.width()).map_err(|_| too_large())?;
    let height = u16::try_from(img.height()).map_err(|_| too_large())?;

    let (data, color) = match img {
        DynamicImage::ImageLuma8(gray) => (gray.as_raw().clone(), jpeg_encoder::ColorType::Luma),
        other => (other.to_rgb8().into_raw(), jpeg_encoder::ColorType::Rgb),
    };

    let mut buf = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut buf, quality.value() as u8);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(&data, width, height, color)
        .map_err(|e| BackendError::Encode(format!("JPEG: {e}")))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilter::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("PNG: {e}")))?;
    Ok(buf)
}

fn encode_webp(img: &DynamicImage, quality: Quality, lossless: bool) -> Result<Vec<u8>, BackendError> {
    let (width, height) = (img.width(), img.height());
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
            .encode_simple(lossless, quality.value() as f32)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height)
            .encode_simple(lossless, quality.value() as f32)
    };
    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| BackendError::Encode(format!("WebP: {e:?}")))
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8], format: SourceFormat) -> Result<ImageAsset, BackendError> {
        image::load_from_memory_with_format(bytes, format.image_format())
            .map(ImageAsset::new)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn resize(&self, asset: ImageAsset, width: u32, height: u32) -> ImageAsset {
        ImageAsset::new(
            asset
                .into_pixels()
                .resize_exact(width, height, FilterType::Lanczos3),
        )
    }

    fn encode(&self, asset: &ImageAsset, spec: &EncodeSpec) -> Result<Vec<u8>, BackendError> {
        match spec.format {
            OutputFormat::Jpeg => encode_jpeg(asset.pixels(), spec.quality),
            OutputFormat::Webp => encode_webp(asset.pixels(), spec.quality, spec.lossless),
            OutputFormat::Png => encode_png(asset.pixels()),
        }
    }
}
