// src/backend/models/draft.rs
use crate::models::memory_item::MemoryItem;
use crate::models::template::{self, DEFAULT_TEMPLATE_ID};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// Identity fields of the deceased, filled in on the "info" step.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub name: String,
    pub birth_date: Option<String>, // ISO date, YYYY-MM-DD
    pub death_date: Option<String>,
    pub bio: String,
    pub profile_photo: Option<String>,
    pub cover_photo: Option<String>,
}

/// Display settings; the four style fields come from a template preset.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    pub background_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub layout: String,
    pub show_dates: bool,
    pub allow_comments: bool,
    pub template: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        let mut settings = Self {
            background_color: String::new(),
            accent_color: String::new(),
            font_family: String::new(),
            layout: String::new(),
            show_dates: true,
            allow_comments: true,
            template: DEFAULT_TEMPLATE_ID.to_string(),
        };
        if let Some(preset) = template::find(DEFAULT_TEMPLATE_ID) {
            settings.apply_preset(preset);
        }
        settings
    }
}

impl PageSettings {
    /// Overwrites the styled fields and template id; display toggles are kept.
    pub fn apply_preset(&mut self, preset: &template::TemplatePreset) {
        self.background_color = preset.background_color.to_string();
        self.accent_color = preset.accent_color.to_string();
        self.font_family = preset.font_family.to_string();
        self.layout = preset.layout.to_string();
        self.template = preset.id.to_string();
    }
}

/// The in-progress memorial page owned by one wizard session.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    pub basic_info: BasicInfo,
    pub memories: Vec<MemoryItem>,
    pub settings: PageSettings,
    pub selected_template: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            basic_info: BasicInfo::default(),
            memories: Vec::new(),
            settings: PageSettings::default(),
            selected_template: DEFAULT_TEMPLATE_ID.to_string(),
        }
    }
}
