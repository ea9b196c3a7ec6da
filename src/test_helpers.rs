//! Shared test utilities.
//!
//! Synthetic images built with the `image` crate, plus writers that put them
//! on disk in a given codec. Gradients are used instead of flat colors so
//! resize and quality settings produce visibly different encodings.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// In-memory images
// =========================================================================

/// Opaque RGB gradient: red follows x, green follows y.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

/// RGBA gradient with a horizontal alpha ramp.
pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            (x * 255 / width.max(1)) as u8,
        ])
    });
    DynamicImage::ImageRgba8(img)
}

// =========================================================================
// Fixture files
// =========================================================================

pub fn write_png_rgb(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_png_rgba(path: &Path, width: u32, height: u32) {
    gradient_rgba(width, height)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}
