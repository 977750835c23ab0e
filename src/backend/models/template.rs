// src/backend/models/template.rs
use candid::CandidType;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE_ID: &str = "classic";

/// A named bundle of style settings applied wholesale when chosen in the wizard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplatePreset {
    pub id: &'static str,
    pub display_name: &'static str,
    pub background_color: &'static str,
    pub accent_color: &'static str,
    pub font_family: &'static str,
    pub layout: &'static str,
}

static PRESETS: [TemplatePreset; 4] = [
    TemplatePreset {
        id: "classic",
        display_name: "Classic",
        background_color: "#f8f5f0",
        accent_color: "#8b6f47",
        font_family: "Frank Ruhl Libre",
        layout: "classic",
    },
    TemplatePreset {
        id: "modern",
        display_name: "Modern",
        background_color: "#ffffff",
        accent_color: "#2563eb",
        font_family: "Heebo",
        layout: "grid",
    },
    TemplatePreset {
        id: "elegant",
        display_name: "Elegant",
        background_color: "#1f1f1f",
        accent_color: "#d4af37",
        font_family: "David Libre",
        layout: "centered",
    },
    TemplatePreset {
        id: "nature",
        display_name: "Nature",
        background_color: "#eef5ec",
        accent_color: "#4a7c59",
        font_family: "Assistant",
        layout: "timeline",
    },
];

/// Owned view of a preset for the Candid API.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TemplateSummary {
    pub id: String,
    pub display_name: String,
    pub background_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub layout: String,
}

impl From<&TemplatePreset> for TemplateSummary {
    fn from(preset: &TemplatePreset) -> Self {
        Self {
            id: preset.id.to_string(),
            display_name: preset.display_name.to_string(),
            background_color: preset.background_color.to_string(),
            accent_color: preset.accent_color.to_string(),
            font_family: preset.font_family.to_string(),
            layout: preset.layout.to_string(),
        }
    }
}

pub fn all() -> &'static [TemplatePreset] {
    &PRESETS
}

pub fn find(id: &str) -> Option<&'static TemplatePreset> {
    PRESETS.iter().find(|preset| preset.id == id)
}
