//! Text measurement and glyph drawing.
//!
//! Measurement sits behind [`TextMeasure`] so layout can be exercised
//! without a font file; drawing goes through `imageproc` with an
//! `ab_glyph` font.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

/// Horizontal and vertical metrics of a font at a pixel size.
pub trait TextMeasure {
    /// Advance width of `text` at `size`, including kerning.
    fn text_width(&self, text: &str, size: f32) -> f32;

    /// Distance from the baseline to the top of the tallest glyphs.
    fn ascent(&self, size: f32) -> f32;

    /// Distance from the baseline to the bottom of descenders (negative).
    fn descent(&self, size: f32) -> f32;
}

impl TextMeasure for FontArc {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let scaled = self.as_scaled(PxScale::from(size));
        let mut width = 0.0f32;
        let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = prev_glyph {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        width
    }

    fn ascent(&self, size: f32) -> f32 {
        self.as_scaled(PxScale::from(size)).ascent()
    }

    fn descent(&self, size: f32) -> f32 {
        self.as_scaled(PxScale::from(size)).descent()
    }
}

/// Baseline that vertically centers glyphs of `size` on `middle_y`.
pub fn centered_baseline<M: TextMeasure + ?Sized>(measure: &M, size: f32, middle_y: f32) -> f32 {
    let ascent = measure.ascent(size);
    let descent = measure.descent(size);
    middle_y + (ascent + descent) / 2.0
}

/// A run of text positioned on the canvas, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    /// Text in visual (left-to-right drawing) order.
    pub text: String,
    /// Left edge of the run.
    pub x: f32,
    pub baseline: f32,
    pub size: f32,
    pub color: Rgba<u8>,
}

/// Legibility shadow drawn under text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub sigma: f32,
    pub offset_x: i64,
    pub offset_y: i64,
    pub opacity: f32,
}

impl Default for TextShadow {
    /// Blur 8 (sigma 4), offset (2, 2), 80% black.
    fn default() -> Self {
        Self {
            sigma: 4.0,
            offset_x: 2,
            offset_y: 2,
            opacity: 0.8,
        }
    }
}

/// Draw each run with its own color.
pub fn draw_runs(canvas: &mut RgbaImage, font: &FontArc, runs: &[GlyphRun]) {
    for run in runs {
        draw_run(canvas, font, run, run.color, 0.0);
    }
}

/// Draw a blurred black shadow under `runs`, then the runs themselves.
pub fn draw_runs_with_shadow(
    canvas: &mut RgbaImage,
    font: &FontArc,
    runs: &[GlyphRun],
    shadow: &TextShadow,
) {
    if runs.is_empty() {
        return;
    }

    let pad = (shadow.sigma * 3.0).ceil();
    let top = runs
        .iter()
        .map(|r| r.baseline - font.ascent(r.size))
        .fold(f32::INFINITY, f32::min);
    let bottom = runs
        .iter()
        .map(|r| r.baseline - font.descent(r.size))
        .fold(f32::NEG_INFINITY, f32::max);
    let layer_top = (top - pad).floor().max(0.0);
    let layer_bottom = (bottom + pad).ceil().min(canvas.height() as f32);

    if layer_bottom > layer_top {
        let mut layer = RgbaImage::new(canvas.width(), (layer_bottom - layer_top) as u32);
        for run in runs {
            draw_run(&mut layer, font, run, Rgba([0, 0, 0, 255]), layer_top);
        }
        let blurred = image_engine::gaussian_blur(&layer, shadow.sigma);
        image_engine::overlay_with_opacity(
            canvas,
            &blurred,
            shadow.offset_x,
            layer_top as i64 + shadow.offset_y,
            shadow.opacity,
        );
    }

    draw_runs(canvas, font, runs);
}

fn draw_run(canvas: &mut RgbaImage, font: &FontArc, run: &GlyphRun, color: Rgba<u8>, origin_y: f32) {
    if run.text.is_empty() {
        return;
    }
    let top = run.baseline - font.ascent(run.size) - origin_y;
    draw_text_mut(
        canvas,
        color,
        run.x.round() as i32,
        top.round() as i32,
        PxScale::from(run.size),
        font,
        &run.text,
    );
}
