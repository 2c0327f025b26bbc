//! Image composition utilities: alpha overlay and viewport cropping.

use image::{Rgba, RgbaImage};

/// Overlay `top` onto `base` with its top-left corner at `(x, y)`.
///
/// Offsets may be negative; pixels falling outside `base` are dropped.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64) {
    overlay_with_opacity(base, top, x, y, 1.0);
}

/// Overlay `top` onto `base`, scaling every source alpha by `opacity`.
pub fn overlay_with_opacity(base: &mut RgbaImage, top: &RgbaImage, x: i64, y: i64, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    let (bw, bh) = (i64::from(base.width()), i64::from(base.height()));

    for (dx, dy, pixel) in top.enumerate_pixels() {
        let tx = x + i64::from(dx);
        let ty = y + i64::from(dy);
        if tx < 0 || ty < 0 || tx >= bw || ty >= bh {
            continue;
        }
        let alpha = f32::from(pixel[3]) / 255.0 * opacity;
        if alpha <= 0.0 {
            continue;
        }
        let target = base.get_pixel_mut(tx as u32, ty as u32);
        *target = blend_pixel(target, pixel, alpha);
    }
}

/// Source-over blend of `fg` (with effective `alpha`) onto `bg`.
///
/// Both pixels are straight (non-premultiplied) RGBA; the color channels
/// of `fg` are used as-is and its own alpha channel is ignored in favour
/// of `alpha`.
pub fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let fa = alpha.clamp(0.0, 1.0);
    if fa >= 1.0 {
        return Rgba([fg[0], fg[1], fg[2], 255]);
    }
    let ba = f32::from(bg[3]) / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    if out_a <= f32::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| -> u8 {
        let c = (f32::from(fg[i]) * fa + f32::from(bg[i]) * ba * (1.0 - fa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// Copy the `width × height` window starting at `(x, y)` out of `src`.
///
/// The window is clamped to the source bounds.
pub fn crop_window(src: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
    let x = x.min(src.width());
    let y = y.min(src.height());
    let width = width.min(src.width() - x);
    let height = height.min(src.height() - y);
    image::imageops::crop_imm(src, x, y, width, height).to_image()
}
