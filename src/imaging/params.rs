//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. They sit between
//! the engine in [`process`](crate::process) (which decides what each file
//! needs) and the [`backend`](super::backend) (which does the pixel work).
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100). Clamped on construction.
//! - [`SourceFormat`]: Decoder selected from a normalized file extension.
//! - [`OutputFormat`]: Target codec (JPEG, WEBP, PNG).
//! - [`EncodeSpec`]: Target codec plus quality and lossless flag.
//! - [`TransformPolicy`]: The single geometric policy applied to every file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Input codec, chosen from the file extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
    WebP,
}

impl SourceFormat {
    /// Map a lowercase extension (without the dot) to a decoder.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Tiff => image::ImageFormat::Tiff,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

/// Output codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Webp,
    Png,
}

impl OutputFormat {
    /// Extension written for this codec (without the dot).
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Png => "png",
        }
    }

    /// Whether the encoder needs an opaque 8-bit truecolor (or gray) bitmap.
    ///
    /// PNG counts as opaque here: the only PNG we write is the source sync,
    /// which mirrors the flattened JPEG output.
    pub fn requires_opaque(self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }

    /// Quality used when neither config nor CLI sets one.
    pub fn default_quality(self) -> Quality {
        match self {
            Self::Jpeg => Quality::new(85),
            Self::Webp => Quality::new(80),
            Self::Png => Quality::new(100),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Webp => "WEBP",
            Self::Png => "PNG",
        };
        f.write_str(name)
    }
}

/// Target codec and its settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodeSpec {
    pub format: OutputFormat,
    pub quality: Quality,
    /// Only meaningful for WEBP. JPEG is always lossy, PNG always lossless.
    pub lossless: bool,
}

impl EncodeSpec {
    pub fn jpeg(quality: Quality) -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality,
            lossless: false,
        }
    }

    pub fn webp(quality: Quality) -> Self {
        Self {
            format: OutputFormat::Webp,
            quality,
            lossless: false,
        }
    }

    pub fn png() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: Quality::new(100),
            lossless: true,
        }
    }
}

/// The geometric policy applied to every file of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum TransformPolicy {
    /// Aspect-preserving downscale to at most `max_width`. Never enlarges.
    MaxWidthDownscale { max_width: u32 },
    /// Scale to cover `width × height`, then center-crop to exactly that size.
    FitExact { width: u32, height: u32 },
}

impl TransformPolicy {
    pub fn is_fit_exact(self) -> bool {
        matches!(self, Self::FitExact { .. })
    }
}
