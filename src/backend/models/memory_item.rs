// src/backend/models/memory_item.rs
use crate::models::common::{MediaKind, MemoryId};
use candid::CandidType;
use serde::{Deserialize, Serialize};

/// One photo or video attached to a memorial page.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryItem {
    pub id: MemoryId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Handle to the uploaded blob, owned by the media storage collaborator.
    pub binary_reference: String,
    #[serde(default)]
    pub description: String,
    /// Dense, zero-based position among the page's items.
    pub order: u32,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// A file offered for upload, as reported by the browser's file input.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub binary_reference: String,
}

impl FileCandidate {
    /// Classifies by MIME prefix; anything other than image/* or video/* is unsupported.
    pub fn media_kind(&self) -> Option<MediaKind> {
        if self.mime_type.starts_with("image/") {
            Some(MediaKind::Photo)
        } else if self.mime_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}
