//! Carousel slide compositor.
//!
//! Renders a list of short texts into a sequence of fixed-size PNG slides:
//! shrink-to-fit RTL-aware text layout with `*emphasis*` markup, parallax
//! or static backgrounds with a readability overlay, collision-free logo
//! placement and a progress indicator.

pub mod assets;
pub mod background;
pub mod color;
pub mod compositor;
pub mod config;
pub mod fonts;
pub mod layout;
pub mod logo;
pub mod progress;
pub mod render;
pub mod request;
pub mod templates;
pub mod text;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use assets::AssetStore;
pub use background::{BackgroundMode, PreparedBackground, prepare_background};
pub use color::parse_hex_color;
pub use compositor::{CarouselOutput, Compositor, RenderedSlide};
pub use config::CompositorConfig;
pub use fonts::FontRegistry;
pub use layout::{SlideLayout, TextLine, TextRun, layout, segment_emphasis};
pub use logo::{LogoOmitted, LogoPlacement, place_logo};
pub use request::{BackgroundSource, CarouselRequest, LogoOptions, LogoPosition, LogoSize};
pub use templates::{Template, TemplateCategory};
pub use text::TextMeasure;

/// Slide canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1080;

/// Slide canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1350;

/// Safe-zone margin for text and logo geometry.
pub const MARGIN: u32 = 80;

/// Horizontal background shift between consecutive slides (parallax).
pub const SHIFT_PX: u32 = CANVAS_WIDTH / 5;

/// Errors that can occur while compositing a carousel.
#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    #[error("Carousel request has no slides")]
    NoSlides,

    #[error("Invalid color '{0}' (expected #RGB, #RRGGBB or #RRGGBBAA)")]
    InvalidColor(String),

    #[error("Invalid font size {0} (must be a positive number up to 500)")]
    InvalidFontSize(f32),

    #[error("Invalid asset identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font data could not be parsed: {0}")]
    FontParse(String),

    #[error("Background image could not be decoded: {0}")]
    BackgroundDecode(String),

    #[error("Slide {index} failed to render: {message}")]
    SlideFailed { index: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CarouselResult<T> = Result<T, CarouselError>;
