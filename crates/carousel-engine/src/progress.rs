//! Progress bar and slide counter.

use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use image_engine::RoundedRect;

use crate::text::{GlyphRun, centered_baseline, draw_runs};
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN};

pub const BAR_HEIGHT: u32 = 14;
pub const BAR_BOTTOM: u32 = 50;
pub const BAR_SIDE: u32 = 100;

/// Full width of the progress track.
pub const TRACK_WIDTH: u32 = CANVAS_WIDTH - BAR_SIDE * 2;

const GLOW_MARGIN: f32 = 3.0;
const GLOW_RADIUS: f32 = 9.0;
const FILL_RADIUS: f32 = 5.0;
const TRACK_COLOR: Rgba<u8> = Rgba([255, 255, 255, 40]);
const GLOW_COLOR: Rgba<u8> = Rgba([34, 197, 94, 77]);

pub const COUNTER_FONT_SIZE: f32 = 42.0;
const COUNTER_MIDDLE_Y: f32 = 85.0;

/// Filled width of the bar on slide `index` of `total`.
pub fn progress_fill_width(index: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let done = (index + 1).min(total) as u64;
    (u64::from(TRACK_WIDTH) * done / total as u64) as u32
}

/// Counter label for slide `index` of `total`.
pub fn counter_label(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

/// Draw the track, the glow and the accent-colored fill.
pub fn draw_progress_bar(canvas: &mut RgbaImage, index: usize, total: usize, accent: Rgba<u8>) {
    let x = BAR_SIDE as f32;
    let y = (CANVAS_HEIGHT - BAR_BOTTOM - BAR_HEIGHT) as f32;
    let h = BAR_HEIGHT as f32;

    let track = RoundedRect::new(x, y, TRACK_WIDTH as f32, h, FILL_RADIUS);
    image_engine::fill_rounded_rect(canvas, track, TRACK_COLOR);

    let fill_width = progress_fill_width(index, total) as f32;
    if fill_width <= 0.0 {
        return;
    }
    let fill = RoundedRect::new(x, y, fill_width, h, FILL_RADIUS);
    let glow = RoundedRect {
        radius: GLOW_RADIUS,
        ..fill.inflate(GLOW_MARGIN)
    };
    image_engine::fill_rounded_rect(canvas, glow, GLOW_COLOR);
    image_engine::fill_rounded_rect(canvas, fill, accent);
}

/// Draw `"{i+1} / {N}"` left-aligned in the top-left corner.
pub fn draw_counter(
    canvas: &mut RgbaImage,
    font: &FontArc,
    index: usize,
    total: usize,
    color: Rgba<u8>,
) {
    let run = GlyphRun {
        text: counter_label(index, total),
        x: (MARGIN + 10) as f32,
        baseline: centered_baseline(font, COUNTER_FONT_SIZE, COUNTER_MIDDLE_Y),
        size: COUNTER_FONT_SIZE,
        color,
    };
    draw_runs(canvas, font, &[run]);
}
