//! Per-slide drawing and PNG encoding.

use std::io::Cursor;

use ab_glyph::FontArc;
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::background::PreparedBackground;
use crate::layout::{SlideLayout, anchor_line, visual_order};
use crate::logo::{LogoPlacement, draw_logo};
use crate::progress::{draw_counter, draw_progress_bar};
use crate::text::{GlyphRun, TextMeasure, TextShadow, centered_baseline, draw_runs_with_shadow};
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH, CarouselResult, MARGIN};

/// Colors shared by every slide of a carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideStyle {
    pub text_color: Rgba<u8>,
    pub highlight_color: Rgba<u8>,
    pub accent_color: Rgba<u8>,
    pub shadow: TextShadow,
}

/// A scaled logo and where to draw it.
#[derive(Debug, Clone, Copy)]
pub struct LogoLayer<'a> {
    pub image: &'a RgbaImage,
    pub placement: &'a LogoPlacement,
}

/// Turn a layout into positioned runs, block centered on `(center_x, center_y)`.
///
/// Right-to-left lines are laid from their right anchor leftwards in
/// logical run order; left-to-right lines from their left edge rightwards.
/// Each run's text is put in drawing order by the bidi algorithm.
pub fn position_runs<M: TextMeasure + ?Sized>(
    layout: &SlideLayout,
    measure: &M,
    style: &SlideStyle,
    center_x: f32,
    center_y: f32,
) -> Vec<GlyphRun> {
    let mut runs = Vec::new();
    let mut top = center_y - layout.total_height / 2.0;

    for line in &layout.lines {
        let baseline = centered_baseline(measure, line.height, top + line.height / 2.0);
        let right = anchor_line(line.width, center_x, CANVAS_WIDTH as f32, MARGIN as f32);
        let mut left_cursor = right - line.width;
        let mut right_cursor = right;

        for run in &line.runs {
            let size = layout.run_size(run);
            let width = measure.text_width(&run.text, size);
            let color = if run.is_emphasis {
                style.highlight_color
            } else {
                style.text_color
            };
            let x = if line.rtl {
                right_cursor -= width;
                right_cursor
            } else {
                left_cursor += width;
                left_cursor - width
            };
            runs.push(GlyphRun {
                text: visual_order(&run.text, line.rtl),
                x,
                baseline,
                size,
                color,
            });
        }

        top += line.height + layout.line_spacing;
    }

    runs
}

/// Draw slide `index` of `total` onto a fresh canvas.
///
/// Order: background viewport, text, logo, progress bar, counter.
pub fn render_slide(
    index: usize,
    total: usize,
    background: &PreparedBackground,
    layout: &SlideLayout,
    logo: Option<LogoLayer<'_>>,
    style: &SlideStyle,
    font: &FontArc,
) -> RgbaImage {
    let mut canvas = background.viewport(index);

    let runs = position_runs(
        layout,
        font,
        style,
        CANVAS_WIDTH as f32 / 2.0,
        CANVAS_HEIGHT as f32 / 2.0,
    );
    draw_runs_with_shadow(&mut canvas, font, &runs, &style.shadow);

    if let Some(logo) = logo {
        if logo.placement.fits_canvas() {
            draw_logo(&mut canvas, logo.image, logo.placement);
        } else {
            warn!(slide = index, placement = ?logo.placement, "Logo out of bounds at draw time, skipping");
        }
    }

    draw_progress_bar(&mut canvas, index, total, style.accent_color);
    draw_counter(&mut canvas, font, index, total, style.accent_color);

    debug!(slide = index, total, runs = runs.len(), "Slide drawn");
    canvas
}

/// Encode a canvas as PNG.
pub fn encode_png(canvas: &RgbaImage) -> CarouselResult<Vec<u8>> {
    let mut buf = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
