//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the target size for an aspect-preserving max-width downscale.
///
/// Returns `None` when the image is already no wider than `max_width`; the
/// limit is a ceiling, smaller images pass through untouched.
///
/// The new height is `height * (max_width / width)` truncated toward zero,
/// clamped to at least one pixel.
///
/// # Examples
/// ```
/// # use imgshrink::imaging::calculate_downscale_dimensions;
/// assert_eq!(calculate_downscale_dimensions((4000, 2000), 2048), Some((2048, 1024)));
/// assert_eq!(calculate_downscale_dimensions((500, 1000), 2048), None);
/// ```
pub fn calculate_downscale_dimensions(source: (u32, u32), max_width: u32) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let scale = max_width as f64 / src_w as f64;

    if scale >= 1.0 {
        return None;
    }

    let height = (src_h as f64 * scale) as u32;
    Some((max_width, height.max(1)))
}

/// Plan for fitting an image to an exact size.
///
/// The geometry is "scale to cover, then crop the center", described by
/// `scale`, `scaled` and `crop_offset`. Execution runs the other way round:
/// the centered window is mapped back to source pixels, cropped there, and
/// only that window is resized to `target`. The full scaled image is never
/// materialized, so extreme aspect ratios stay cheap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPlan {
    /// Uniform scale factor applied to both axes.
    pub scale: f64,
    /// Size after scaling; covers the target on both axes.
    pub scaled: (u32, u32),
    /// Top-left corner of the centered crop window inside `scaled`.
    pub crop_offset: (u32, u32),
    /// Top-left corner of the same window in source pixels.
    pub window_offset: (u32, u32),
    /// Size of the window in source pixels.
    pub window_size: (u32, u32),
    /// Final output size.
    pub target: (u32, u32),
}

impl FitPlan {
    pub fn needs_crop(&self, source: (u32, u32)) -> bool {
        self.window_size != source
    }

    pub fn needs_resize(&self) -> bool {
        self.window_size != self.target
    }
}

/// Plan a fit-and-crop: scale to cover the target box, then crop the center.
///
/// The scale is the larger of the two axis ratios so the scaled image covers
/// the target fully. The scaled size is rounded and never smaller than the
/// target; the crop offset is floored. The source window is `target / scale`
/// rounded, kept within the source, and centered with floored offsets.
///
/// # Examples
/// ```
/// # use imgshrink::imaging::calculate_fit_plan;
/// // Portrait 500x1000 into 1024x1024 → scale 2.048, scaled 1024x2048
/// let plan = calculate_fit_plan((500, 1000), (1024, 1024));
/// assert_eq!(plan.scaled, (1024, 2048));
/// assert_eq!(plan.crop_offset, (0, 512));
/// // The same window in source pixels: 500x500 starting at row 250
/// assert_eq!(plan.window_size, (500, 500));
/// assert_eq!(plan.window_offset, (0, 250));
/// ```
pub fn calculate_fit_plan(source: (u32, u32), target: (u32, u32)) -> FitPlan {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale = (tgt_w as f64 / src_w as f64).max(tgt_h as f64 / src_h as f64);

    let scaled_w = ((src_w as f64 * scale).round() as u32).max(tgt_w);
    let scaled_h = ((src_h as f64 * scale).round() as u32).max(tgt_h);

    let window_w = ((tgt_w as f64 / scale).round() as u32).clamp(1, src_w);
    let window_h = ((tgt_h as f64 / scale).round() as u32).clamp(1, src_h);

    FitPlan {
        scale,
        scaled: (scaled_w, scaled_h),
        crop_offset: ((scaled_w - tgt_w) / 2, (scaled_h - tgt_h) / 2),
        window_offset: ((src_w - window_w) / 2, (src_h - window_h) / 2),
        window_size: (window_w, window_h),
        target,
    }
}

/// Percentage by which `new_size` is smaller than `original_size`.
///
/// Returns `None` for an empty original; there is no meaningful ratio.
pub fn reduction_percent(original_size: u64, new_size: u64) -> Option<f64> {
    if original_size == 0 {
        return None;
    }
    Some(100.0 - (new_size as f64 / original_size as f64 * 100.0))
}
