//! Local asset resolution and image decoding.
//!
//! Layout of the asset directory:
//!
//! ```text
//! <root>/carousel-templates/<id>.jpg|png
//! <root>/fonts/<family>.ttf|otf
//! ```

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageReader};
use regex::Regex;
use tracing::{debug, warn};

use crate::config::is_valid_identifier;
use crate::templates::{self, Template};
use crate::{CarouselError, CarouselResult};

const TEMPLATES_DIR: &str = "carousel-templates";
const FONTS_DIR: &str = "fonts";
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];
const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024; // 50MB

static RE_DATA_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data:image/[\w.+-]+;base64,").unwrap());

/// Read-only view of the asset directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.root.join(FONTS_DIR)
    }

    /// Resolve a template id to a catalog entry whose file exists on disk.
    pub fn resolve_template(&self, id: &str) -> CarouselResult<Template> {
        if !is_valid_identifier(id) {
            return Err(CarouselError::InvalidIdentifier(id.to_string()));
        }
        let dir = self.templates_dir();
        let template = match templates::builtin(id) {
            Some(t) => t,
            None => templates::auto_register(&dir, id)
                .ok_or_else(|| CarouselError::TemplateNotFound(id.to_string()))?,
        };
        let path = dir.join(&template.file);
        if !path.is_file() {
            return Err(CarouselError::TemplateNotFound(path.display().to_string()));
        }
        Ok(template)
    }

    /// Decode the image backing `template`.
    pub fn load_template_image(&self, template: &Template) -> CarouselResult<DynamicImage> {
        let path = self.templates_dir().join(&template.file);
        if !path.is_file() {
            return Err(CarouselError::TemplateNotFound(path.display().to_string()));
        }
        debug!(path = %path.display(), "Loading template image");
        Ok(ImageReader::open(&path)?.with_guessed_format()?.decode()?)
    }

    /// Path of the font file for `family`, if one exists.
    pub fn font_path(&self, family: &str) -> Option<PathBuf> {
        if !is_valid_identifier(family) {
            return None;
        }
        let dir = self.fonts_dir();
        FONT_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{family}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Read the raw bytes of the font file for `family`.
    pub fn read_font(&self, family: &str) -> CarouselResult<Vec<u8>> {
        if !is_valid_identifier(family) {
            return Err(CarouselError::InvalidIdentifier(family.to_string()));
        }
        let path = self
            .font_path(family)
            .ok_or_else(|| CarouselError::FontNotFound(family.to_string()))?;
        if std::fs::metadata(&path)?.len() > MAX_FONT_SIZE {
            return Err(CarouselError::FontParse(format!(
                "{family}: font file too large (max 50MB)"
            )));
        }
        Ok(std::fs::read(path)?)
    }
}

/// Decode caller-supplied background bytes.
///
/// On failure, one relaxed attempt is made: the payload is treated as
/// (optionally data-URI prefixed) base64 text, or failing that re-read with
/// format sniffing and without decoder limits.
pub fn decode_background(bytes: &[u8]) -> CarouselResult<DynamicImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Ok(img),
        Err(first) => {
            warn!(error = %first, "Background decode failed, retrying with relaxed decoder");
            decode_relaxed(bytes).map_err(|second| {
                CarouselError::BackgroundDecode(format!("{first}; relaxed retry: {second}"))
            })
        }
    }
}

/// Decode logo bytes. Failure is not fatal: the logo is simply omitted.
pub fn decode_logo(bytes: &[u8]) -> Option<DynamicImage> {
    if bytes.is_empty() {
        return None;
    }
    match image::load_from_memory(bytes).or_else(|_| decode_relaxed(bytes)) {
        Ok(img) => Some(img),
        Err(e) => {
            warn!(error = %e, "Could not decode logo, continuing without it");
            None
        }
    }
}

fn decode_relaxed(bytes: &[u8]) -> Result<DynamicImage, String> {
    let payload = match base64_payload(bytes) {
        Some(decoded) => decoded,
        None => bytes.to_vec(),
    };
    let mut reader = ImageReader::new(Cursor::new(payload))
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    reader.no_limits();
    reader.decode().map_err(|e| e.to_string())
}

fn base64_payload(bytes: &[u8]) -> Option<Vec<u8>> {
    let text = std::str::from_utf8(bytes).ok()?;
    let body = RE_DATA_URI.replace(text.trim(), "");
    let cleaned: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned.as_bytes()).ok()
}
