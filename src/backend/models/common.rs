// src/backend/models/common.rs
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};

pub type PageId = String; // Hex id derived in utils::crypto
pub type MemoryId = String; // Client-visible id of a media item
pub type PrincipalId = Principal;

pub type TimestampNs = u64; // Nanoseconds since epoch

pub const MAX_PHOTOS: usize = 8;
pub const MAX_VIDEOS: usize = 2;
pub const MAX_VIDEO_SIZE_MB: u64 = 50;
pub const MAX_VIDEO_SIZE_BYTES: u64 = MAX_VIDEO_SIZE_MB * 1024 * 1024;

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,       // Saved from the wizard, never published
    Published,   // Publicly viewable at /memory/<slug>
    Unpublished, // Taken down by the owner, still editable
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Unpublished => "unpublished",
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum UserRole {
    Admin,
    Producer,
    Member,
}
