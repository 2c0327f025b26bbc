//! Built-in background templates and auto-registration of template files.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Visual family of a template, used for default colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Tech,
    Gradient,
    Office,
    Abstract,
    Dark,
    Nature,
    Pastel,
}

/// A named background design backed by an image file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub style: String,
    /// File name under `<asset_dir>/carousel-templates/`.
    pub file: String,
    pub text_color: String,
    pub accent: String,
    pub category: TemplateCategory,
}

type TemplateRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    TemplateCategory,
);

use TemplateCategory::*;

// (id, style, text color, accent, category); file is `<id>.jpg`.
const BUILTIN: &[TemplateRow] = &[
    ("b1", "Building 1", "#FFFFFF", "#F8FF00", Abstract),
    ("b2", "Building 2", "#FFFFFF", "#F8FF00", Abstract),
    ("b3", "Building 3", "#FFFFFF", "#F8FF00", Abstract),
    ("b4", "Building 4", "#FFFFFF", "#F8FF00", Abstract),
    ("b5", "Building 5", "#FFFFFF", "#F8FF00", Abstract),
    ("b6", "Building 6", "#FFFFFF", "#F8FF00", Abstract),
    ("T_02", "Abstract Purple", "#1A1A1A", "#2563EB", Gradient),
    ("T_04", "Smooth Gradient", "#1A1A1A", "#2563EB", Gradient),
    ("T_06", "Cyber Grid", "#FFFFFF", "#60A5FA", Dark),
    ("T_07", "Global Data", "#FFFFFF", "#60A5FA", Dark),
    ("T_10", "Hardware Close-up", "#1A1A1A", "#2563EB", Tech),
    ("T_11", "Modern Office", "#1A1A1A", "#2563EB", Office),
    ("T_12", "Skyscraper Lines", "#1A1A1A", "#2563EB", Office),
    ("T_18", "Circuit Board", "#FFFFFF", "#60A5FA", Tech),
    ("T_20", "Vibrant Mesh", "#1A1A1A", "#2563EB", Gradient),
    ("T_21", "Dark Landscape", "#FFFFFF", "#60A5FA", Dark),
    ("T_22", "Urban Night", "#FFFFFF", "#60A5FA", Dark),
    ("T_24", "Matrix Green", "#FFFFFF", "#60A5FA", Dark),
    ("T_097", "Mountain View", "#FFFFFF", "#60A5FA", Nature),
    ("T_101", "Lake Reflection", "#FFFFFF", "#60A5FA", Nature),
    ("T_128", "Northern Lights", "#FFFFFF", "#60A5FA", Nature),
    ("G_01", "Indigo Dream", "#FFFFFF", "#E0E7FF", Gradient),
    ("G_06", "Lavender Mist", "#1A1A1A", "#6D28D9", Pastel),
    ("G_14", "Midnight Sky", "#FFFFFF", "#93C5FD", Dark),
    ("G_37", "Dark Galaxy", "#FFFFFF", "#A78BFA", Dark),
    ("G_43", "Pastel Dream", "#1A1A1A", "#DB2777", Pastel),
];

/// Extensions probed, in order, when auto-registering a template file.
const TEMPLATE_EXTENSIONS: &[&str] = &["jpg", "png"];

/// Look up a built-in template by id.
pub fn builtin(id: &str) -> Option<Template> {
    BUILTIN
        .iter()
        .find(|(row_id, ..)| *row_id == id)
        .map(|&(id, style, text_color, accent, category)| Template {
            id: id.to_string(),
            style: style.to_string(),
            file: format!("{id}.jpg"),
            text_color: text_color.to_string(),
            accent: accent.to_string(),
            category,
        })
}

/// All built-in templates, optionally filtered by category.
pub fn builtin_templates(category: Option<TemplateCategory>) -> Vec<Template> {
    BUILTIN
        .iter()
        .filter(|row| category.is_none_or(|c| row.4 == c))
        .filter_map(|row| builtin(row.0))
        .collect()
}

/// Build a template entry for an unlisted id whose file exists in `dir`.
///
/// Categories are inferred from the `T_<n>` numbering scheme; colors follow
/// the category.
pub fn auto_register(dir: &Path, id: &str) -> Option<Template> {
    let file = TEMPLATE_EXTENSIONS
        .iter()
        .map(|ext| format!("{id}.{ext}"))
        .find(|name| dir.join(name).is_file())?;

    let category = infer_category(id);
    let dark = category == TemplateCategory::Dark;
    tracing::debug!(id, file = %file, ?category, "Auto-registered template");

    Some(Template {
        id: id.to_string(),
        style: id.to_string(),
        file,
        text_color: if dark { "#FFFFFF" } else { "#1A1A1A" }.to_string(),
        accent: if dark { "#60A5FA" } else { "#2563EB" }.to_string(),
        category,
    })
}

fn infer_category(id: &str) -> TemplateCategory {
    let Some(num) = id.strip_prefix("T_").and_then(|n| n.parse::<u32>().ok()) else {
        return TemplateCategory::Abstract;
    };
    match num {
        96..=144 => TemplateCategory::Nature,
        20..=30 => TemplateCategory::Gradient,
        60..=80 => TemplateCategory::Tech,
        _ => TemplateCategory::Abstract,
    }
}
