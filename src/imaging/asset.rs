//! The decoded bitmap that flows through one file's processing.
//!
//! An [`ImageAsset`] is never edited in place. Every step (resize, crop,
//! flatten) consumes the asset and hands back its successor, so the borrow
//! checker enforces that a superseded bitmap can't be reused by accident.

use image::{ColorType, DynamicImage};
use serde::Serialize;

/// Pixel layout of a decoded image.
///
/// Palette-indexed sources are expanded by the decoders, so they show up
/// here as [`Truecolor`](Self::Truecolor) or
/// [`TruecolorAlpha`](Self::TruecolorAlpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Grayscale,
    GrayscaleAlpha,
    Truecolor,
    TruecolorAlpha,
}

impl ColorMode {
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::GrayscaleAlpha | Self::TruecolorAlpha)
    }
}

#[derive(Debug, Clone)]
pub struct ImageAsset {
    pixels: DynamicImage,
}

impl ImageAsset {
    pub fn new(pixels: DynamicImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn color_mode(&self) -> ColorMode {
        let color = self.pixels.color();
        match (color.has_color(), color.has_alpha()) {
            (false, false) => ColorMode::Grayscale,
            (false, true) => ColorMode::GrayscaleAlpha,
            (true, false) => ColorMode::Truecolor,
            (true, true) => ColorMode::TruecolorAlpha,
        }
    }

    /// True for 8-bit gray or 8-bit RGB: the layouts every encoder accepts as-is.
    fn is_flat_eight_bit(&self) -> bool {
        matches!(self.pixels.color(), ColorType::L8 | ColorType::Rgb8)
    }

    /// Convert to opaque 8-bit truecolor, discarding any alpha channel.
    ///
    /// Alpha is dropped rather than blended against a background, which keeps
    /// the result independent of any compositing choice. Already-flat 8-bit
    /// images are returned unchanged.
    pub fn flatten_to_truecolor(self) -> Self {
        if self.is_flat_eight_bit() {
            return self;
        }
        Self::new(DynamicImage::ImageRgb8(self.pixels.to_rgb8()))
    }

    /// Cut a `width × height` window whose top-left corner is `(x, y)`.
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::new(self.pixels.crop_imm(x, y, width, height))
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> DynamicImage {
        self.pixels
    }
}
