//! Carousel orchestration.
//!
//! A render runs in two phases. Setup validates the request and prepares
//! every shared input (colors, background, font, logo) once; any failure
//! there aborts the whole request. Slides are then laid out and drawn
//! independently, in parallel on the rayon pool when enabled, and each
//! index yields its own result. A panic while drawing one slide becomes
//! that slide's [`CarouselError::SlideFailed`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::assets::{AssetStore, decode_background, decode_logo};
use crate::background::{BackgroundMode, PreparedBackground, prepare_background};
use crate::color::parse_hex_color;
use crate::config::{CompositorConfig, is_valid_identifier};
use crate::fonts::FontRegistry;
use crate::layout::{DEFAULT_START_FONT_SIZE, LayoutOptions, MAX_FONT_SIZE, layout};
use crate::logo::{LogoPlacement, place_logo, scale_logo};
use crate::render::{LogoLayer, SlideStyle, encode_png, render_slide};
use crate::request::{BackgroundSource, CarouselRequest};
use crate::text::TextShadow;
use crate::{CarouselError, CarouselResult};

const CUSTOM_TEXT_COLOR: &str = "#FFFFFF";
const CUSTOM_ACCENT_COLOR: &str = "#2563EB";

/// One encoded slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSlide {
    pub index: usize,
    pub total: usize,
    pub png: Vec<u8>,
}

/// Per-slide results in input order.
#[derive(Debug)]
pub struct CarouselOutput {
    slides: Vec<CarouselResult<RenderedSlide>>,
}

impl CarouselOutput {
    pub fn slides(&self) -> &[CarouselResult<RenderedSlide>] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Whether every slide rendered.
    pub fn is_complete(&self) -> bool {
        self.slides.iter().all(Result::is_ok)
    }

    /// All PNG buffers in input order, or the first slide error.
    pub fn into_pngs(self) -> CarouselResult<Vec<Vec<u8>>> {
        self.slides
            .into_iter()
            .map(|slide| slide.map(|s| s.png))
            .collect()
    }
}

/// Inputs shared by every slide of one request.
struct PreparedCarousel {
    background: PreparedBackground,
    style: SlideStyle,
    font: FontArc,
    logo: Option<(RgbaImage, LogoPlacement)>,
    layout_options: LayoutOptions,
}

/// Renders carousel requests against an asset directory and font registry.
pub struct Compositor {
    config: CompositorConfig,
    fonts: Arc<FontRegistry>,
    assets: AssetStore,
}

impl Compositor {
    pub fn new(config: CompositorConfig, fonts: Arc<FontRegistry>) -> CarouselResult<Self> {
        config.validate()?;
        let assets = AssetStore::new(config.asset_dir.clone());
        Ok(Self {
            config,
            fonts,
            assets,
        })
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn fonts(&self) -> &Arc<FontRegistry> {
        &self.fonts
    }

    /// Render `request`, seeding grain from the configured seed or from
    /// OS entropy.
    pub fn render(&self, request: &CarouselRequest) -> CarouselResult<CarouselOutput> {
        let mut rng = match self.config.grain_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.render_with_rng(request, &mut rng)
    }

    /// Render `request` drawing grain noise from `rng`.
    pub fn render_with_rng<R: Rng + ?Sized>(
        &self,
        request: &CarouselRequest,
        rng: &mut R,
    ) -> CarouselResult<CarouselOutput> {
        let total = request.slides.len();
        info!(
            slides = total,
            parallel = self.config.parallel,
            "Rendering carousel"
        );

        let prepared = self.prepare(request, rng)?;
        let slides = render_slides(total, self.config.parallel, |index| {
            self.render_one(&prepared, &request.slides[index], index, total)
        });

        let failed = slides.iter().filter(|s| s.is_err()).count();
        if failed > 0 {
            warn!(total, failed, "Carousel rendered with failed slides");
        } else {
            info!(total, "Carousel rendered");
        }
        Ok(CarouselOutput { slides })
    }

    fn prepare<R: Rng + ?Sized>(
        &self,
        request: &CarouselRequest,
        rng: &mut R,
    ) -> CarouselResult<PreparedCarousel> {
        if request.slides.is_empty() {
            return Err(CarouselError::NoSlides);
        }
        for size in [request.headline_font_size, request.body_font_size]
            .into_iter()
            .flatten()
        {
            if !size.is_finite() || size <= 0.0 || size > MAX_FONT_SIZE {
                return Err(CarouselError::InvalidFontSize(size));
            }
        }
        let family = request
            .font_family
            .as_deref()
            .unwrap_or(&self.config.default_font);
        if !is_valid_identifier(family) {
            return Err(CarouselError::InvalidIdentifier(family.to_string()));
        }

        let (source, mode, default_text, default_accent) = match &request.background {
            BackgroundSource::Template { id } => {
                let template = self.assets.resolve_template(id)?;
                let image = self.assets.load_template_image(&template)?;
                debug!(id = %template.id, category = ?template.category, "Template resolved");
                (
                    image,
                    BackgroundMode::Template,
                    template.text_color,
                    template.accent,
                )
            }
            BackgroundSource::Custom { bytes } => (
                decode_background(bytes)?,
                BackgroundMode::Custom,
                CUSTOM_TEXT_COLOR.to_string(),
                CUSTOM_ACCENT_COLOR.to_string(),
            ),
        };

        let style = SlideStyle {
            text_color: resolve_color(request.text_color.as_deref(), &default_text)?,
            accent_color: resolve_color(request.accent_color.as_deref(), &default_accent)?,
            highlight_color: parse_hex_color(&self.config.highlight_color)?,
            shadow: TextShadow::default(),
        };

        let font = self.fonts.resolve(family, &self.assets)?;

        let logo = request.logo.as_ref().and_then(|options| {
            let image = decode_logo(&options.bytes)?;
            match place_logo(
                image.width(),
                image.height(),
                options.position,
                options.size,
                options.transparent,
            ) {
                Ok(placement) => Some((scale_logo(&image, &placement), placement)),
                Err(reason) => {
                    warn!(%reason, position = ?options.position, "Logo omitted");
                    None
                }
            }
        });

        let background = prepare_background(
            &source,
            mode,
            request.slides.len(),
            self.config.grain_count,
            rng,
        );

        Ok(PreparedCarousel {
            background,
            style,
            font,
            logo,
            layout_options: LayoutOptions {
                start_font_size: request.body_font_size.unwrap_or(DEFAULT_START_FONT_SIZE),
                headline_font_size: request.headline_font_size,
                ..LayoutOptions::default()
            },
        })
    }

    fn render_one(
        &self,
        prepared: &PreparedCarousel,
        text: &str,
        index: usize,
        total: usize,
    ) -> CarouselResult<RenderedSlide> {
        let slide_layout = layout(text, &prepared.layout_options, &prepared.font);
        if slide_layout.overflow {
            warn!(
                slide = index,
                font_size = slide_layout.font_size,
                "Slide text overflows at minimum font size"
            );
        }

        let logo = prepared
            .logo
            .as_ref()
            .map(|(image, placement)| LogoLayer { image, placement });
        let canvas = render_slide(
            index,
            total,
            &prepared.background,
            &slide_layout,
            logo,
            &prepared.style,
            &prepared.font,
        );

        let png = encode_png(&canvas).inspect_err(|e| {
            warn!(slide = index, error = %e, "Slide encoding failed");
        })?;
        Ok(RenderedSlide { index, total, png })
    }
}

/// Run `render` for every index, isolating each call so that an error or
/// panic in one slide leaves the others intact.
fn render_slides<F>(total: usize, parallel: bool, render: F) -> Vec<CarouselResult<RenderedSlide>>
where
    F: Fn(usize) -> CarouselResult<RenderedSlide> + Sync,
{
    let isolated = |index: usize| {
        panic::catch_unwind(AssertUnwindSafe(|| render(index))).unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic".to_string());
            warn!(slide = index, %message, "Slide render panicked");
            Err(CarouselError::SlideFailed { index, message })
        })
    };

    if parallel && total > 1 {
        (0..total).into_par_iter().map(isolated).collect()
    } else {
        (0..total).map(isolated).collect()
    }
}

fn resolve_color(requested: Option<&str>, default: &str) -> CarouselResult<Rgba<u8>> {
    parse_hex_color(requested.unwrap_or(default))
}
