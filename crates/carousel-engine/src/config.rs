//! Compositor configuration: defaults, environment overrides and validation.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::{CarouselError, CarouselResult};

static RE_HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#?([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").unwrap()
});
static RE_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

/// Environment variables recognised by [`CompositorConfig::from_env`].
pub const ENV_KEYS: &[&str] = &[
    "CAROUSEL_ASSET_DIR",
    "CAROUSEL_DEFAULT_FONT",
    "CAROUSEL_HIGHLIGHT_COLOR",
    "CAROUSEL_GRAIN_SEED",
    "CAROUSEL_GRAIN_COUNT",
    "CAROUSEL_PARALLEL",
];

/// Runtime configuration of the compositor.
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    /// Root of the asset tree (`carousel-templates/`, `fonts/`).
    pub asset_dir: PathBuf,
    /// Font family used when a request names none.
    pub default_font: String,
    /// Fill color of `*emphasis*` runs.
    pub highlight_color: String,
    /// Seed for the grain pass. `None` seeds from OS entropy.
    pub grain_seed: Option<u64>,
    /// Number of grain pixels per prepared background.
    pub grain_count: u32,
    /// Render slides on the rayon thread pool.
    pub parallel: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            default_font: "Assistant-Bold".into(),
            highlight_color: "#F8FF00".into(),
            grain_seed: None,
            grain_count: 8000,
            parallel: true,
        }
    }
}

impl CompositorConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load defaults overridden by `CAROUSEL_*` environment variables.
    pub fn from_env() -> CarouselResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load defaults overridden by whatever `lookup` returns for each key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CarouselResult<Self> {
        let mut config = Self::default();
        for key in ENV_KEYS {
            let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) else {
                continue;
            };
            let value = value.trim();
            validate_setting(key, value)
                .map_err(|e| CarouselError::Config(format!("{key}: {e}")))?;
            match *key {
                "CAROUSEL_ASSET_DIR" => config.asset_dir = PathBuf::from(value),
                "CAROUSEL_DEFAULT_FONT" => config.default_font = value.to_string(),
                "CAROUSEL_HIGHLIGHT_COLOR" => config.highlight_color = value.to_string(),
                "CAROUSEL_GRAIN_SEED" => config.grain_seed = value.parse().ok(),
                "CAROUSEL_GRAIN_COUNT" => config.grain_count = value.parse().unwrap_or(8000),
                "CAROUSEL_PARALLEL" => config.parallel = value == "true",
                _ => {}
            }
            tracing::debug!(key, value, "Config override from environment");
        }
        Ok(config)
    }

    /// Builder: set the asset directory.
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    /// Builder: set the default font family.
    pub fn with_default_font(mut self, family: impl Into<String>) -> Self {
        self.default_font = family.into();
        self
    }

    /// Builder: set the emphasis color.
    pub fn with_highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = color.into();
        self
    }

    /// Builder: pin the grain seed for reproducible output.
    pub fn with_grain_seed(mut self, seed: u64) -> Self {
        self.grain_seed = Some(seed);
        self
    }

    /// Builder: set the number of grain pixels (0 disables grain).
    pub fn with_grain_count(mut self, count: u32) -> Self {
        self.grain_count = count;
        self
    }

    /// Builder: toggle parallel slide rendering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check every field, returning the first problem found.
    pub fn validate(&self) -> CarouselResult<()> {
        validate_setting("CAROUSEL_DEFAULT_FONT", &self.default_font)
            .and_then(|_| validate_setting("CAROUSEL_HIGHLIGHT_COLOR", &self.highlight_color))
            .and_then(|_| {
                validate_setting("CAROUSEL_GRAIN_COUNT", &self.grain_count.to_string())
            })
            .map_err(CarouselError::Config)
    }
}

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "CAROUSEL_ASSET_DIR" => {
            if value.is_empty() {
                return Err("must not be empty".into());
            }
        }
        "CAROUSEL_DEFAULT_FONT" => {
            if !is_valid_identifier(value) {
                return Err("must be 1-64 characters of [A-Za-z0-9_-]".into());
            }
        }
        "CAROUSEL_HIGHLIGHT_COLOR" => {
            if !RE_HEX_COLOR.is_match(value) {
                return Err("must be a hex color like #F8FF00".into());
            }
        }
        "CAROUSEL_GRAIN_SEED" => {
            value.parse::<u64>().map_err(|_| "must be an unsigned integer")?;
        }
        "CAROUSEL_GRAIN_COUNT" => {
            let v: u32 = value.parse().map_err(|_| "must be an unsigned integer")?;
            if v > 1_000_000 {
                return Err("must be at most 1000000".into());
            }
        }
        "CAROUSEL_PARALLEL" => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => return Err(format!("unknown setting key: {key}")),
    }
    Ok(())
}

/// Whether `value` is a safe template/font identifier (no path separators).
pub fn is_valid_identifier(value: &str) -> bool {
    RE_IDENTIFIER.is_match(value)
}
