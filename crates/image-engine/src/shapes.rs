//! Anti-aliased rounded rectangles.

use image::{Rgba, RgbaImage};

use crate::compose::blend_pixel;

/// Axis-aligned rectangle with uniformly rounded corners, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

impl RoundedRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            radius,
        }
    }

    /// Grow the rectangle by `amount` on every side, growing the radius with it.
    pub fn inflate(&self, amount: f32) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
            radius: (self.radius + amount).max(0.0),
        }
    }

    /// Signed distance from `(px, py)` to the outline; negative inside.
    fn distance(&self, px: f32, py: f32) -> f32 {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let r = self.radius.clamp(0.0, hw.min(hh));
        let qx = (px - (self.x + hw)).abs() - (hw - r);
        let qy = (py - (self.y + hh)).abs() - (hh - r);
        let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
        outside + qx.max(qy).min(0.0) - r
    }
}

/// Fill `rect` with `color`, blending over the existing pixels.
pub fn fill_rounded_rect(img: &mut RgbaImage, rect: RoundedRect, color: Rgba<u8>) {
    paint(img, rect, color, coverage);
}

/// Stroke the inside edge of `rect` with a line of `width` pixels.
pub fn stroke_rounded_rect(img: &mut RgbaImage, rect: RoundedRect, width: f32, color: Rgba<u8>) {
    let width = width.max(0.0);
    paint(img, rect, color, |d| coverage(d) - coverage(d + width));
}

fn coverage(distance: f32) -> f32 {
    (0.5 - distance).clamp(0.0, 1.0)
}

fn paint(img: &mut RgbaImage, rect: RoundedRect, color: Rgba<u8>, cov: impl Fn(f32) -> f32) {
    if rect.width <= 0.0 || rect.height <= 0.0 || color[3] == 0 {
        return;
    }
    let x0 = rect.x.floor().max(0.0) as u32;
    let y0 = rect.y.floor().max(0.0) as u32;
    let x1 = ((rect.x + rect.width).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((rect.y + rect.height).ceil().max(0.0) as u32).min(img.height());
    let alpha = f32::from(color[3]) / 255.0;

    for y in y0..y1 {
        for x in x0..x1 {
            let c = cov(rect.distance(x as f32 + 0.5, y as f32 + 0.5));
            if c <= 0.0 {
                continue;
            }
            let pixel = img.get_pixel_mut(x, y);
            *pixel = blend_pixel(pixel, &color, alpha * c);
        }
    }
}
