//! Background preparation: cover-fit, readability overlay and per-slide
//! viewports.

use image::{DynamicImage, RgbaImage};
use rand::Rng;
use tracing::debug;

use crate::{CANVAS_HEIGHT, CANVAS_WIDTH, SHIFT_PX};

const TEMPLATE_BLUR_SIGMA: f32 = 5.0;
const TEMPLATE_SCRIM_ALPHA: u8 = 165;
const CUSTOM_SCRIM_ALPHA: u8 = 120;
const GRAIN_ALPHA: u8 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundMode {
    /// One wide image panned across slides.
    Template,
    /// The same image behind every slide.
    Custom,
}

/// A background ready to be windowed into slides.
#[derive(Debug, Clone)]
pub struct PreparedBackground {
    pub mode: BackgroundMode,
    pub image: RgbaImage,
    pub slide_count: usize,
}

impl PreparedBackground {
    /// Left edge of slide `index`'s window into the prepared image.
    pub fn viewport_offset(&self, index: usize) -> u32 {
        match self.mode {
            BackgroundMode::Template => index as u32 * SHIFT_PX,
            BackgroundMode::Custom => 0,
        }
    }

    /// Canvas-sized crop of the background for slide `index`.
    pub fn viewport(&self, index: usize) -> RgbaImage {
        image_engine::crop_window(
            &self.image,
            self.viewport_offset(index),
            0,
            CANVAS_WIDTH,
            CANVAS_HEIGHT,
        )
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }
}

/// Width of the prepared image for `slide_count` slides in `mode`.
pub fn background_width(mode: BackgroundMode, slide_count: usize) -> u32 {
    match mode {
        BackgroundMode::Template => {
            CANVAS_WIDTH + slide_count.saturating_sub(1) as u32 * SHIFT_PX
        }
        BackgroundMode::Custom => CANVAS_WIDTH,
    }
}

/// Cover-fit `source`, then apply blur, scrim and grain once.
pub fn prepare_background<R: Rng + ?Sized>(
    source: &DynamicImage,
    mode: BackgroundMode,
    slide_count: usize,
    grain_count: u32,
    rng: &mut R,
) -> PreparedBackground {
    let width = background_width(mode, slide_count);
    let fitted = image_engine::cover_fit(source, width, CANVAS_HEIGHT);

    let (sigma, scrim) = match mode {
        BackgroundMode::Template => (TEMPLATE_BLUR_SIGMA, TEMPLATE_SCRIM_ALPHA),
        BackgroundMode::Custom => (0.0, CUSTOM_SCRIM_ALPHA),
    };
    let mut image = image_engine::gaussian_blur(&fitted, sigma);
    image_engine::apply_scrim(&mut image, scrim);
    image_engine::apply_grain(&mut image, grain_count, GRAIN_ALPHA, rng);

    debug!(
        ?mode,
        slide_count,
        width,
        height = CANVAS_HEIGHT,
        "Background prepared"
    );

    PreparedBackground {
        mode,
        image,
        slide_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        }))
    }

    #[test]
    fn template_width_grows_with_slides() {
        assert_eq!(background_width(BackgroundMode::Template, 1), 1080);
        assert_eq!(background_width(BackgroundMode::Template, 2), 1296);
        assert_eq!(background_width(BackgroundMode::Template, 5), 1944);
        assert_eq!(background_width(BackgroundMode::Custom, 5), 1080);
    }

    #[test]
    fn template_viewports_shift_and_end_at_edge() {
        let mut rng = StdRng::seed_from_u64(1);
        let bg = prepare_background(&gradient(400, 300), BackgroundMode::Template, 3, 0, &mut rng);
        assert_eq!(bg.width(), 1512);
        assert_eq!(bg.image.height(), 1350);
        assert_eq!(bg.viewport_offset(0), 0);
        assert_eq!(bg.viewport_offset(1), 216);
        assert_eq!(bg.viewport_offset(2) + CANVAS_WIDTH, bg.width());

        let second = bg.viewport(1);
        assert_eq!(second.dimensions(), (1080, 1350));
        assert_eq!(second.get_pixel(0, 10), bg.image.get_pixel(216, 10));
    }

    #[test]
    fn custom_viewports_are_identical() {
        let mut rng = StdRng::seed_from_u64(2);
        let bg = prepare_background(&gradient(600, 900), BackgroundMode::Custom, 4, 100, &mut rng);
        assert_eq!(bg.width(), 1080);
        let first = bg.viewport(0);
        for i in 1..4 {
            assert_eq!(bg.viewport(i), first);
        }
    }

    #[test]
    fn scrim_darkens_template_more_than_custom() {
        let white = DynamicImage::ImageRgba8(RgbaImage::from_pixel(50, 50, Rgba([255; 4])));
        let mut rng = StdRng::seed_from_u64(3);
        let template = prepare_background(&white, BackgroundMode::Template, 1, 0, &mut rng);
        let custom = prepare_background(&white, BackgroundMode::Custom, 1, 0, &mut rng);
        let t = template.image.get_pixel(540, 675)[0];
        let c = custom.image.get_pixel(540, 675)[0];
        assert!(t < c, "template {t} custom {c}");
        assert!(c < 255);
    }

    #[test]
    fn same_seed_same_grain() {
        let src = gradient(100, 100);
        let a = prepare_background(
            &src,
            BackgroundMode::Custom,
            1,
            8000,
            &mut StdRng::seed_from_u64(9),
        );
        let b = prepare_background(
            &src,
            BackgroundMode::Custom,
            1,
            8000,
            &mut StdRng::seed_from_u64(9),
        );
        assert_eq!(a.image, b.image);
    }
}
