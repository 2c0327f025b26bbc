//! Readability effects: gaussian blur, dark scrim, film grain and shadows.

use image::{Rgba, RgbaImage};
use rand::Rng;
use tracing::debug;

use crate::compose::blend_pixel;

/// Gaussian-blur an RGBA image. A non-positive `sigma` returns a copy.
pub fn gaussian_blur(img: &RgbaImage, sigma: f32) -> RgbaImage {
    if !sigma.is_finite() || sigma <= 0.0 {
        return img.clone();
    }
    debug!(
        width = img.width(),
        height = img.height(),
        sigma,
        "Applying gaussian blur"
    );
    imageproc::filter::gaussian_blur_f32(img, sigma)
}

/// Composite a uniform black layer of the given alpha over the whole image.
pub fn apply_scrim(img: &mut RgbaImage, alpha: u8) {
    if alpha == 0 {
        return;
    }
    let black = Rgba([0u8, 0, 0, 255]);
    let a = f32::from(alpha) / 255.0;
    for pixel in img.pixels_mut() {
        *pixel = blend_pixel(pixel, &black, a);
    }
}

/// Blend `count` randomly chosen single pixels with white at `alpha`.
///
/// The random source is supplied by the caller so output can be made
/// reproducible with a seeded generator.
pub fn apply_grain<R: Rng + ?Sized>(img: &mut RgbaImage, count: u32, alpha: u8, rng: &mut R) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || count == 0 || alpha == 0 {
        return;
    }
    let white = Rgba([255u8, 255, 255, 255]);
    let a = f32::from(alpha) / 255.0;
    for _ in 0..count {
        let x = rng.gen_range(0..w);
        let y = rng.gen_range(0..h);
        let pixel = img.get_pixel_mut(x, y);
        *pixel = blend_pixel(pixel, &white, a);
    }
}

/// Build a soft black shadow from the alpha channel of `src`.
///
/// The result is padded by `pad` pixels on every side so the blur has room
/// to spread; draw it at `(x - pad + offset_x, y - pad + offset_y)` to sit
/// under an image drawn at `(x, y)`.
pub fn drop_shadow(src: &RgbaImage, sigma: f32, opacity: f32) -> (RgbaImage, u32) {
    let pad = (sigma.max(0.0) * 3.0).ceil() as u32;
    let opacity = opacity.clamp(0.0, 1.0);
    let mut mask = RgbaImage::new(src.width() + pad * 2, src.height() + pad * 2);
    for (x, y, pixel) in src.enumerate_pixels() {
        let a = (f32::from(pixel[3]) * opacity).round() as u8;
        mask.put_pixel(x + pad, y + pad, Rgba([0, 0, 0, a]));
    }
    (gaussian_blur(&mask, sigma), pad)
}
