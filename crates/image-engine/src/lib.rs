//! Raster primitives for slide composition.
//!
//! Provides cover-fit resizing, alpha compositing, blur/scrim/grain
//! effects and anti-aliased rounded rectangles on RGBA buffers.

pub mod compose;
pub mod effects;
pub mod resize;
pub mod shapes;

// Re-exports for convenience
pub use compose::{blend_pixel, crop_window, overlay, overlay_with_opacity};
pub use effects::{apply_grain, apply_scrim, drop_shadow, gaussian_blur};
pub use resize::{cover_fit, fit_within, resize_exact};
pub use shapes::{RoundedRect, fill_rounded_rect, stroke_rounded_rect};
