// src/backend/services/wizard.rs
//! Page-creation wizard: step sequencing plus the draft it accumulates.
//!
//! Navigation is deliberately permissive. Moving forward never checks that the
//! current step is complete; only jumping ahead of the current step is refused.

use crate::error::PageError;
use crate::models::common::{MediaKind, MemoryId, PageId, PrincipalId, TimestampNs};
use crate::models::draft::{BasicInfo, Draft};
use crate::models::memory_item::FileCandidate;
use crate::models::page_record::PageRecord;
use crate::models::template;
use crate::services::media_service::{self, MoveDirection};
use crate::services::media_validator::{self, MediaBatchOutcome};
use crate::storage::documents::{Collection, DocumentStore};
use crate::utils::crypto::{generate_id, slugify};
use crate::utils::log;
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Template,
    Info,
    Media,
    Settings,
    Preview,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::Template,
        WizardStep::Info,
        WizardStep::Media,
        WizardStep::Settings,
        WizardStep::Preview,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// Style fields the owner may tweak after choosing a template.
#[derive(CandidType, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleOverrides {
    pub background_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
    pub layout: Option<String>,
}

/// What the payment step receives when the owner leaves the preview.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CheckoutHandoff {
    pub editing_page_id: Option<PageId>,
    pub selected_template: String,
    pub photo_count: u32,
    pub video_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardController {
    step: WizardStep,
    draft: Draft,
    editing: Option<PageId>,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Template,
            draft: Draft::default(),
            editing: None,
        }
    }

    /// Starts a wizard over an existing page; saving updates that page.
    pub fn from_record(record: &PageRecord) -> Self {
        let draft = Draft {
            basic_info: BasicInfo {
                name: record.name.clone(),
                birth_date: record.birth_date.clone(),
                death_date: record.death_date.clone(),
                bio: record.bio.clone(),
                profile_photo: record.profile_photo.clone(),
                cover_photo: record.cover_photo.clone(),
            },
            memories: record.memories.clone(),
            settings: record.settings.clone(),
            selected_template: record.settings.template.clone(),
        };
        Self {
            step: WizardStep::Template,
            draft,
            editing: Some(record.id.clone()),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn editing(&self) -> Option<&PageId> {
        self.editing.as_ref()
    }

    /// Advances one step. Returns false at `Preview`.
    pub fn go_next(&mut self) -> bool {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Steps back one step. Returns false at `Template`.
    pub fn go_back(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Revisits the current or an earlier step. Jumping ahead is ignored.
    pub fn jump_to(&mut self, step: WizardStep) -> bool {
        if step <= self.step {
            self.step = step;
            true
        } else {
            false
        }
    }

    /// Applies a preset's style fields wholesale; show_dates/allow_comments survive.
    pub fn select_template(&mut self, template_id: &str) -> Result<(), PageError> {
        let preset = template::find(template_id)
            .ok_or_else(|| PageError::UnknownTemplate(template_id.to_string()))?;
        self.draft.settings.apply_preset(preset);
        self.draft.selected_template = preset.id.to_string();
        Ok(())
    }

    pub fn update_basic_info(&mut self, info: BasicInfo) {
        self.draft.basic_info = info;
    }

    pub fn update_display_options(&mut self, show_dates: bool, allow_comments: bool) {
        self.draft.settings.show_dates = show_dates;
        self.draft.settings.allow_comments = allow_comments;
    }

    pub fn update_style(&mut self, overrides: StyleOverrides) {
        let settings = &mut self.draft.settings;
        if let Some(color) = overrides.background_color {
            settings.background_color = color;
        }
        if let Some(color) = overrides.accent_color {
            settings.accent_color = color;
        }
        if let Some(font) = overrides.font_family {
            settings.font_family = font;
        }
        if let Some(layout) = overrides.layout {
            settings.layout = layout;
        }
    }

    /// Runs the batch through the quota validator and merges what was accepted.
    pub fn add_media(
        &mut self,
        candidates: &[FileCandidate],
        new_id: impl FnMut() -> MemoryId,
    ) -> MediaBatchOutcome {
        let outcome = media_validator::validate_and_add(candidates, &self.draft.memories, new_id);
        media_service::merge_accepted(&mut self.draft.memories, outcome.accepted.clone());
        outcome
    }

    pub fn remove_media(&mut self, id: &str) -> Result<(), PageError> {
        media_service::remove(&mut self.draft.memories, id).map(|_| ())
    }

    pub fn move_media(&mut self, id: &str, direction: MoveDirection) -> Result<(), PageError> {
        media_service::move_item(&mut self.draft.memories, id, direction)
    }

    pub fn toggle_media(&mut self, id: &str) -> Result<bool, PageError> {
        media_service::toggle_visibility(&mut self.draft.memories, id)
    }

    pub fn describe_media(&mut self, id: &str, description: String) -> Result<(), PageError> {
        media_service::set_description(&mut self.draft.memories, id, description)
    }

    /// Leaves the wizard for the payment step. Only allowed from `Preview`.
    pub fn proceed_to_checkout(&self) -> Result<CheckoutHandoff, PageError> {
        if self.step != WizardStep::Preview {
            return Err(PageError::InvalidStep(format!(
                "checkout is only available from the preview, current step is {:?}",
                self.step
            )));
        }
        let count = |kind: MediaKind| self.draft.memories.iter().filter(|m| m.kind == kind).count() as u32;
        Ok(CheckoutHandoff {
            editing_page_id: self.editing.clone(),
            selected_template: self.draft.selected_template.clone(),
            photo_count: count(MediaKind::Photo),
            video_count: count(MediaKind::Video),
        })
    }

    /// Hands the draft to the document store.
    ///
    /// New pages are created with `draft` status; an edited page keeps its
    /// status and counters. Returns the page id.
    pub async fn save_draft<S: DocumentStore>(
        &self,
        store: &S,
        owner: PrincipalId,
        now: TimestampNs,
    ) -> Result<PageId, PageError> {
        let record = match &self.editing {
            Some(id) => {
                let doc = store
                    .get(Collection::MemorialPages, id)
                    .await?
                    .ok_or_else(|| PageError::PageNotFound(id.clone()))?;
                let mut record = PageRecord::decode(id, doc)?;
                record.apply_draft(&self.draft, now);
                record
            }
            None => {
                let id = generate_id("page", &owner, now);
                let slug = slugify(&self.draft.basic_info.name, &id);
                PageRecord::from_draft(id, owner, slug, &self.draft, now)
            }
        };

        store
            .set(Collection::MemorialPages, &record.id, record.encode()?)
            .await?;

        log::info(format!(
            "Draft saved as page {} (status {}) by {}",
            record.id,
            record.status.as_str(),
            owner
        ));
        Ok(record.id)
    }
}
