//! Image resizing utilities.
//!
//! Cover-fit for full-bleed backgrounds and aspect-preserving fits for
//! overlays, all using Lanczos3 filtering.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::debug;

/// Resize an image so it covers exactly `width × height`.
///
/// The image is scaled until both dimensions cover the target, then the
/// overflow is cropped evenly from both sides (centered crop).
pub fn cover_fit(img: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == width && orig_h == height {
        debug!(width, height, "Image already at target size, skipping resize");
        return img.to_rgba8();
    }

    debug!(
        orig_w,
        orig_h,
        new_width = width,
        new_height = height,
        "Cover-fitting image"
    );

    img.resize_to_fill(width.max(1), height.max(1), FilterType::Lanczos3)
        .to_rgba8()
}

/// Scale `(width, height)` down so that it fits inside `max_w × max_h`.
///
/// Aspect ratio is preserved. Dimensions that already fit are returned
/// unchanged; results never drop below 1 pixel.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if width <= max_w && height <= max_h {
        return (width, height);
    }

    let ratio = (f64::from(max_w) / f64::from(width)).min(f64::from(max_h) / f64::from(height));
    let new_w = (f64::from(width) * ratio).round() as u32;
    let new_h = (f64::from(height) * ratio).round() as u32;
    (new_w.clamp(1, max_w.max(1)), new_h.clamp(1, max_h.max(1)))
}

/// Resize an RGBA image to exactly `width × height`.
pub fn resize_exact(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    image::imageops::resize(img, width.max(1), height.max(1), FilterType::Lanczos3)
}
