//! Compositor input types.

use serde::{Deserialize, Serialize};

/// One compositor invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselRequest {
    /// Slide texts in display order; `*word*` marks emphasis.
    pub slides: Vec<String>,
    pub background: BackgroundSource,
    #[serde(default)]
    pub logo: Option<LogoOptions>,
    /// Progress bar and counter color. Defaults to the template accent.
    #[serde(default)]
    pub accent_color: Option<String>,
    /// Default text color. Defaults to the template text color.
    #[serde(default)]
    pub text_color: Option<String>,
    /// Font family id resolved under `<asset_dir>/fonts/`.
    #[serde(default)]
    pub font_family: Option<String>,
    /// Pixel size of emphasis runs. Defaults to the fitted body size.
    #[serde(default)]
    pub headline_font_size: Option<f32>,
    /// Starting pixel size of the shrink-to-fit search.
    #[serde(default)]
    pub body_font_size: Option<f32>,
}

/// Where the slide background comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BackgroundSource {
    /// A named template from the asset store, shifted per slide (parallax).
    Template { id: String },
    /// Caller-supplied image bytes, identical on every slide.
    Custom { bytes: Vec<u8> },
}

/// Optional logo drawn on every slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoOptions {
    pub bytes: Vec<u8>,
    #[serde(default)]
    pub position: LogoPosition,
    #[serde(default)]
    pub size: LogoSize,
    /// Skip the white backing card and only drop a shadow.
    #[serde(default)]
    pub transparent: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoPosition {
    TopLeft,
    TopMiddle,
    #[default]
    TopRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl LogoPosition {
    pub const ALL: [LogoPosition; 6] = [
        LogoPosition::TopLeft,
        LogoPosition::TopMiddle,
        LogoPosition::TopRight,
        LogoPosition::BottomLeft,
        LogoPosition::BottomMiddle,
        LogoPosition::BottomRight,
    ];

    pub fn is_bottom(self) -> bool {
        matches!(
            self,
            LogoPosition::BottomLeft | LogoPosition::BottomMiddle | LogoPosition::BottomRight
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl LogoSize {
    pub const ALL: [LogoSize; 3] = [LogoSize::Small, LogoSize::Medium, LogoSize::Large];

    /// Scale factor applied to the base logo footprint.
    pub fn multiplier(self) -> f32 {
        match self {
            LogoSize::Small => 0.6,
            LogoSize::Medium => 1.0,
            LogoSize::Large => 1.5,
        }
    }
}

impl CarouselRequest {
    /// Request rendered over a named template.
    pub fn template(slides: Vec<String>, template_id: impl Into<String>) -> Self {
        Self::with_background(slides, BackgroundSource::Template {
            id: template_id.into(),
        })
    }

    /// Request rendered over caller-supplied background bytes.
    pub fn custom(slides: Vec<String>, background: Vec<u8>) -> Self {
        Self::with_background(slides, BackgroundSource::Custom { bytes: background })
    }

    fn with_background(slides: Vec<String>, background: BackgroundSource) -> Self {
        Self {
            slides,
            background,
            logo: None,
            accent_color: None,
            text_color: None,
            font_family: None,
            headline_font_size: None,
            body_font_size: None,
        }
    }

    /// Builder: attach a logo.
    pub fn with_logo(mut self, logo: LogoOptions) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Builder: set the accent color.
    pub fn with_accent_color(mut self, color: impl Into<String>) -> Self {
        self.accent_color = Some(color.into());
        self
    }

    /// Builder: set the default text color.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    /// Builder: set the font family id.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Builder: set explicit headline/body pixel sizes.
    pub fn with_font_sizes(mut self, headline: Option<f32>, body: Option<f32>) -> Self {
        self.headline_font_size = headline;
        self.body_font_size = body;
        self
    }
}
