//! Process-wide font registry.
//!
//! Fonts are registered once under a family name and handed out as
//! reference-counted [`FontArc`] handles. Registration is idempotent and
//! safe to race: the last writer wins, and handles already handed out stay
//! valid because they own their font data.

use std::collections::HashMap;
use std::sync::RwLock;

use ab_glyph::FontArc;
use tracing::{debug, info, warn};

use crate::assets::AssetStore;
use crate::{CarouselError, CarouselResult};

/// Family name of the font compiled into the crate.
pub const BUNDLED_FONT_FAMILY: &str = "DejaVuSans-Bold";

static BUNDLED_FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Parse the bundled fallback font.
pub fn bundled_font() -> CarouselResult<FontArc> {
    FontArc::try_from_slice(BUNDLED_FONT_BYTES)
        .map_err(|e| CarouselError::FontParse(format!("{BUNDLED_FONT_FAMILY}: {e}")))
}

/// Thread-safe map of family name to parsed font.
#[derive(Default)]
pub struct FontRegistry {
    fonts: RwLock<HashMap<String, FontArc>>,
}

impl FontRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the bundled fallback font already registered.
    pub fn with_bundled() -> CarouselResult<Self> {
        let registry = Self::new();
        registry.insert(BUNDLED_FONT_FAMILY, bundled_font()?);
        Ok(registry)
    }

    /// Parse `bytes` and register them under `family`.
    ///
    /// Invalid font data is rejected before touching the registry, so a bad
    /// registration never replaces a good one.
    pub fn register(&self, family: &str, bytes: Vec<u8>) -> CarouselResult<FontArc> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| CarouselError::FontParse(format!("{family}: {e}")))?;
        self.insert(family, font.clone());
        debug!(family, "Font registered");
        Ok(font)
    }

    /// Get a registered font by family name.
    pub fn get(&self, family: &str) -> Option<FontArc> {
        self.fonts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(family)
            .cloned()
    }

    /// Whether `family` is registered.
    pub fn contains(&self, family: &str) -> bool {
        self.get(family).is_some()
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.fonts.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bundled fallback font, registering it on first use.
    pub fn bundled(&self) -> CarouselResult<FontArc> {
        if let Some(font) = self.get(BUNDLED_FONT_FAMILY) {
            return Ok(font);
        }
        let font = bundled_font()?;
        self.insert(BUNDLED_FONT_FAMILY, font.clone());
        Ok(font)
    }

    /// Resolve `family`: registry first, then the asset store, then the
    /// bundled font as a single fallback.
    pub fn resolve(&self, family: &str, assets: &AssetStore) -> CarouselResult<FontArc> {
        if let Some(font) = self.get(family) {
            return Ok(font);
        }

        let loaded = assets
            .read_font(family)
            .and_then(|bytes| self.register(family, bytes));
        match loaded {
            Ok(font) => {
                info!(family, "Loaded font from asset store");
                Ok(font)
            }
            Err(e) => {
                warn!(family, error = %e, "Font unavailable, falling back to bundled font");
                self.bundled()
            }
        }
    }

    fn insert(&self, family: &str, font: FontArc) {
        self.fonts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(family.to_string(), font);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextMeasure;
    use std::sync::Arc;

    #[test]
    fn bundled_font_parses() {
        let font = bundled_font().unwrap();
        assert!(font.text_width("A", 40.0) > 0.0);
    }

    #[test]
    fn register_is_idempotent() {
        let registry = FontRegistry::new();
        let first = registry
            .register("Family", BUNDLED_FONT_BYTES.to_vec())
            .unwrap();
        registry
            .register("Family", BUNDLED_FONT_BYTES.to_vec())
            .unwrap();
        assert_eq!(registry.len(), 1);
        // Handles from before the re-registration remain usable.
        assert_eq!(
            first.text_width("abc", 30.0),
            registry.get("Family").unwrap().text_width("abc", 30.0)
        );
    }

    #[test]
    fn invalid_bytes_do_not_replace_existing_font() {
        let registry = FontRegistry::with_bundled().unwrap();
        let err = registry
            .register(BUNDLED_FONT_FAMILY, b"not a font".to_vec())
            .unwrap_err();
        assert!(matches!(err, CarouselError::FontParse(_)));
        assert!(registry.contains(BUNDLED_FONT_FAMILY));
    }

    #[test]
    fn concurrent_registration_of_same_family() {
        let registry = Arc::new(FontRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .register("Shared", BUNDLED_FONT_BYTES.to_vec())
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(registry.len(), 1);
        assert!(registry.get("Shared").is_some());
    }

    #[test]
    fn resolve_falls_back_to_bundled_font() {
        let registry = FontRegistry::new();
        let assets = AssetStore::new(std::env::temp_dir().join("carousel_no_such_assets"));
        let font = registry.resolve("Missing-Font", &assets).unwrap();
        assert!(font.text_width("x", 20.0) > 0.0);
        assert!(registry.contains(BUNDLED_FONT_FAMILY));
        assert!(!registry.contains("Missing-Font"));
    }
}
