//! Logo scaling, collision-free placement and drawing.

use image::{DynamicImage, Rgba, RgbaImage};
use image_engine::RoundedRect;
use tracing::debug;

use crate::request::{LogoPosition, LogoSize};
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH, MARGIN};

/// Largest logo side at medium size.
pub const LOGO_BASE_SIZE: f32 = 260.0;

/// Smallest logo side at medium size.
pub const LOGO_MIN_SIZE: f32 = 20.0;

/// Padding between the logo and the edge of its backing card.
pub const CARD_PADDING: u32 = 16;

const CARD_RADIUS: f32 = 18.0;
const CARD_FILL: Rgba<u8> = Rgba([255, 255, 255, 230]);
const CARD_BORDER: Rgba<u8> = Rgba([0, 0, 0, 20]);

/// y of the top edge for top positions, before clamping.
const TOP_Y: i64 = 60;

/// Space kept free under bottom-positioned logos for the progress bar.
const BOTTOM_CLEARANCE: i64 = 64 + 25;

/// Minimum gap between a bottom logo and the top edge zone.
const BOTTOM_MIN_GAP: i64 = 50;

const MAX_LOGO_WIDTH: f32 = (CANVAS_WIDTH - 2 * MARGIN) as f32;
const MAX_LOGO_HEIGHT: f32 = (CANVAS_HEIGHT - 200) as f32;

/// Why a logo was left off the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LogoOmitted {
    #[error("logo image has no pixels")]
    Empty,

    #[error("logo does not fit inside the safe zone")]
    OutOfBounds,
}

/// Where and how large the logo is drawn, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub position: LogoPosition,
    /// Top-left of the outer box (the card when one is drawn).
    pub x: u32,
    pub y: u32,
    pub outer_width: u32,
    pub outer_height: u32,
    /// Size the logo image is scaled to.
    pub logo_width: u32,
    pub logo_height: u32,
    /// Draw a white backing card around the logo.
    pub card: bool,
}

impl LogoPlacement {
    /// Top-left corner of the logo image itself.
    pub fn logo_origin(&self) -> (u32, u32) {
        if self.card {
            (self.x + CARD_PADDING, self.y + CARD_PADDING)
        } else {
            (self.x, self.y)
        }
    }

    /// Whether the outer box lies inside the safe zone and, for bottom
    /// positions, clear of the progress bar.
    pub fn fits_canvas(&self) -> bool {
        within_bounds(
            i64::from(self.x),
            i64::from(self.y),
            i64::from(self.outer_width),
            i64::from(self.outer_height),
            self.position,
        )
    }
}

/// Scale a logo's natural size for `size`.
///
/// Oversized logos are fitted into the footprint; smaller ones are scaled
/// by the size multiplier. The shorter side is then raised to the floor and
/// the result clamped to the canvas safe area, aspect preserved throughout.
pub fn scaled_logo_size(natural_width: u32, natural_height: u32, size: LogoSize) -> (u32, u32) {
    let m = size.multiplier();
    let max_side = LOGO_BASE_SIZE * m;
    let min_side = LOGO_MIN_SIZE * m;
    let footprint = max_side.round() as u32;

    let (mut w, mut h) = if natural_width > footprint || natural_height > footprint {
        let (w, h) = image_engine::fit_within(natural_width, natural_height, footprint, footprint);
        (w as f32, h as f32)
    } else {
        (natural_width as f32 * m, natural_height as f32 * m)
    };

    let shorter = w.min(h);
    if shorter < min_side {
        let k = min_side / shorter;
        w *= k;
        h *= k;
    }

    if w > MAX_LOGO_WIDTH {
        let k = MAX_LOGO_WIDTH / w;
        w *= k;
        h *= k;
    }
    if h > MAX_LOGO_HEIGHT {
        let k = MAX_LOGO_HEIGHT / h;
        w *= k;
        h *= k;
    }

    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Compute the logo's placement, or why it must be omitted.
pub fn place_logo(
    natural_width: u32,
    natural_height: u32,
    position: LogoPosition,
    size: LogoSize,
    transparent: bool,
) -> Result<LogoPlacement, LogoOmitted> {
    if natural_width == 0 || natural_height == 0 {
        return Err(LogoOmitted::Empty);
    }

    let (logo_width, logo_height) = scaled_logo_size(natural_width, natural_height, size);
    let card = !transparent;
    let pad = if card { CARD_PADDING * 2 } else { 0 };
    let (w, h) = (i64::from(logo_width + pad), i64::from(logo_height + pad));

    let canvas_w = i64::from(CANVAS_WIDTH);
    let canvas_h = i64::from(CANVAS_HEIGHT);
    let margin = i64::from(MARGIN);

    let x = match position {
        LogoPosition::TopLeft | LogoPosition::BottomLeft => margin,
        LogoPosition::TopMiddle | LogoPosition::BottomMiddle => (canvas_w - w) / 2,
        LogoPosition::TopRight | LogoPosition::BottomRight => canvas_w - margin - w,
    };
    let x = x.min(canvas_w - margin - w).max(margin);

    let mut y = if position.is_bottom() {
        canvas_h - BOTTOM_CLEARANCE - h
    } else {
        TOP_Y
    };
    y = y.min(canvas_h - h - margin).max(margin);
    if position.is_bottom() {
        y = y.max(TOP_Y + h + BOTTOM_MIN_GAP);
    }

    if !within_bounds(x, y, w, h, position) {
        debug!(?position, ?size, width = w, height = h, x, y, "Logo out of bounds");
        return Err(LogoOmitted::OutOfBounds);
    }

    Ok(LogoPlacement {
        position,
        x: x as u32,
        y: y as u32,
        outer_width: w as u32,
        outer_height: h as u32,
        logo_width,
        logo_height,
        card,
    })
}

fn within_bounds(x: i64, y: i64, w: i64, h: i64, position: LogoPosition) -> bool {
    let margin = i64::from(MARGIN);
    let canvas_w = i64::from(CANVAS_WIDTH);
    let canvas_h = i64::from(CANVAS_HEIGHT);

    let inside = x >= margin && y >= margin && x + w <= canvas_w - margin && y + h <= canvas_h - margin;
    let clear_of_progress = !position.is_bottom() || y + h <= canvas_h - BOTTOM_CLEARANCE;
    inside && clear_of_progress
}

/// Resize the decoded logo to its placed size.
pub fn scale_logo(logo: &DynamicImage, placement: &LogoPlacement) -> RgbaImage {
    image_engine::resize_exact(&logo.to_rgba8(), placement.logo_width, placement.logo_height)
}

/// Draw an already-scaled logo with its card or drop shadow.
pub fn draw_logo(canvas: &mut RgbaImage, logo: &RgbaImage, placement: &LogoPlacement) {
    let (lx, ly) = placement.logo_origin();

    if placement.card {
        let card = RoundedRect::new(
            placement.x as f32,
            placement.y as f32,
            placement.outer_width as f32,
            placement.outer_height as f32,
            CARD_RADIUS,
        );
        draw_card_shadow(canvas, card);
        image_engine::fill_rounded_rect(canvas, card, CARD_FILL);
        image_engine::stroke_rounded_rect(canvas, card, 1.0, CARD_BORDER);
    } else {
        let (shadow, pad) = image_engine::drop_shadow(logo, 4.0, 0.5);
        image_engine::overlay(
            canvas,
            &shadow,
            i64::from(lx) - i64::from(pad) + 2,
            i64::from(ly) - i64::from(pad) + 4,
        );
    }

    image_engine::overlay(canvas, logo, i64::from(lx), i64::from(ly));
}

fn draw_card_shadow(canvas: &mut RgbaImage, card: RoundedRect) {
    const SIGMA: f32 = 8.0;
    let pad = (SIGMA * 3.0).ceil();
    let mut layer = RgbaImage::new(
        (card.width + pad * 2.0) as u32,
        (card.height + pad * 2.0) as u32,
    );
    let local = RoundedRect { x: pad, y: pad, ..card };
    image_engine::fill_rounded_rect(&mut layer, local, Rgba([0, 0, 0, 60]));
    let blurred = image_engine::gaussian_blur(&layer, SIGMA);
    image_engine::overlay(
        canvas,
        &blurred,
        (card.x - pad) as i64,
        (card.y - pad) as i64 + 6,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medium_square_keeps_natural_size() {
        assert_eq!(scaled_logo_size(100, 100, LogoSize::Medium), (100, 100));
        assert_eq!(scaled_logo_size(100, 100, LogoSize::Small), (60, 60));
        assert_eq!(scaled_logo_size(100, 100, LogoSize::Large), (150, 150));
    }

    #[test]
    fn oversized_logo_fits_footprint() {
        assert_eq!(scaled_logo_size(1000, 500, LogoSize::Medium), (260, 130));
        assert_eq!(scaled_logo_size(500, 250, LogoSize::Large), (390, 195));
    }

    #[test]
    fn tiny_logo_raised_to_floor() {
        assert_eq!(scaled_logo_size(5, 5, LogoSize::Medium), (20, 20));
        assert_eq!(scaled_logo_size(10, 10, LogoSize::Small), (12, 12));
        assert_eq!(scaled_logo_size(4, 2, LogoSize::Medium), (40, 20));
    }

    #[test]
    fn top_right_card_placement() {
        let p = place_logo(100, 100, LogoPosition::TopRight, LogoSize::Medium, false).unwrap();
        assert_eq!((p.outer_width, p.outer_height), (132, 132));
        assert_eq!((p.x, p.y), (868, 80));
        assert_eq!(p.logo_origin(), (884, 96));
        assert!(p.card);
    }

    #[test]
    fn bottom_middle_sits_above_progress_bar() {
        let p = place_logo(200, 100, LogoPosition::BottomMiddle, LogoSize::Medium, true).unwrap();
        assert_eq!((p.outer_width, p.outer_height), (200, 100));
        assert_eq!(p.x, 440);
        assert_eq!(p.y + p.outer_height, CANVAS_HEIGHT - 89);
        assert!(!p.card);
    }

    #[test]
    fn every_placement_stays_in_safe_zone() {
        let naturals = [
            (1, 1),
            (20, 400),
            (400, 20),
            (260, 260),
            (1000, 1000),
            (3000, 200),
            (200, 3000),
        ];
        for (nw, nh) in naturals {
            for position in LogoPosition::ALL {
                for size in LogoSize::ALL {
                    for transparent in [false, true] {
                        let Ok(p) = place_logo(nw, nh, position, size, transparent) else {
                            continue;
                        };
                        assert!(p.x >= MARGIN, "{nw}x{nh} {position:?} {size:?}");
                        assert!(p.y >= MARGIN);
                        assert!(p.x + p.outer_width <= CANVAS_WIDTH - MARGIN);
                        assert!(p.y + p.outer_height <= CANVAS_HEIGHT - MARGIN);
                        if position.is_bottom() {
                            assert!(p.y + p.outer_height <= CANVAS_HEIGHT - 89);
                        }
                        assert!(p.fits_canvas());
                    }
                }
            }
        }
    }

    #[test]
    fn ordinary_logos_are_always_placed() {
        for position in LogoPosition::ALL {
            for size in LogoSize::ALL {
                assert!(place_logo(300, 120, position, size, false).is_ok());
            }
        }
    }

    #[test]
    fn pathological_aspect_is_omitted_at_bottom() {
        assert_eq!(
            place_logo(1, 10_000, LogoPosition::BottomLeft, LogoSize::Large, false),
            Err(LogoOmitted::OutOfBounds)
        );
    }

    #[test]
    fn empty_logo_is_omitted() {
        assert_eq!(
            place_logo(0, 10, LogoPosition::TopLeft, LogoSize::Small, true),
            Err(LogoOmitted::Empty)
        );
    }

    #[test]
    fn tampered_placement_fails_revalidation() {
        let mut p = place_logo(100, 100, LogoPosition::TopLeft, LogoSize::Medium, false).unwrap();
        p.x = 1000;
        assert!(!p.fits_canvas());
    }

    #[test]
    fn card_is_drawn_behind_logo() {
        let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([0, 0, 0, 255]));
        let p = place_logo(40, 40, LogoPosition::TopLeft, LogoSize::Medium, false).unwrap();
        let logo = RgbaImage::from_pixel(p.logo_width, p.logo_height, Rgba([255, 0, 0, 255]));
        draw_logo(&mut canvas, &logo, &p);

        let (lx, ly) = p.logo_origin();
        assert_eq!(canvas.get_pixel(lx + 5, ly + 5), &Rgba([255, 0, 0, 255]));
        // Inside the card padding: near-white.
        let card_px = canvas.get_pixel(p.x + 8, ly + 10);
        assert!(card_px[0] > 200 && card_px[2] > 200, "{card_px:?}");
    }

    #[test]
    fn transparent_logo_has_no_card() {
        let mut canvas = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba([0, 0, 0, 255]));
        let p = place_logo(40, 40, LogoPosition::TopLeft, LogoSize::Medium, true).unwrap();
        let logo = RgbaImage::from_pixel(p.logo_width, p.logo_height, Rgba([0, 255, 0, 255]));
        draw_logo(&mut canvas, &logo, &p);
        assert_eq!(canvas.get_pixel(p.x, p.y), &Rgba([0, 255, 0, 255]));
        assert_eq!(canvas.get_pixel(p.x + 60, p.y + 20)[1], 0);
    }
}
