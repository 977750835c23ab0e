// src/backend/services/media_validator.rs
//! Per-page media quotas: at most 8 photos, 2 videos, 50 MB per video.

use crate::models::common::{MediaKind, MemoryId, MAX_PHOTOS, MAX_VIDEOS, MAX_VIDEO_SIZE_BYTES, MAX_VIDEO_SIZE_MB};
use crate::models::memory_item::{FileCandidate, MemoryItem};
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    UnsupportedType,
    VideoTooLarge { limit_mb: u64 },
    PhotoLimit { max: u32 },
    VideoLimit { max: u32 },
}

impl RejectionReason {
    pub fn message(&self) -> String {
        match self {
            RejectionReason::UnsupportedType => "Unsupported file type".to_string(),
            RejectionReason::VideoTooLarge { limit_mb } => {
                format!("Video is larger than the {}MB limit", limit_mb)
            }
            RejectionReason::PhotoLimit { max } => format!("You can upload up to {} photos", max),
            RejectionReason::VideoLimit { max } => format!("You can upload up to {} videos", max),
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    pub file_name: String,
    pub reason: RejectionReason,
    pub message: String,
}

impl Rejection {
    fn new(file_name: &str, reason: RejectionReason) -> Self {
        Self {
            file_name: file_name.to_string(),
            message: reason.message(),
            reason,
        }
    }
}

#[derive(CandidType, Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaBatchOutcome {
    pub accepted: Vec<MemoryItem>,
    pub rejected: Vec<Rejection>,
    /// Set when a video was offered while the page already held the maximum
    /// before this batch. Clients show the upgrade prompt instead of an error.
    pub video_limit_reached: bool,
}

/// Decides, file by file and in input order, which candidates join the page.
///
/// Running counts start from `current_items` and grow only with files accepted
/// earlier in the same batch. Accepted items continue the page's order.
/// `new_id` is called once per accepted file.
pub fn validate_and_add(
    candidates: &[FileCandidate],
    current_items: &[MemoryItem],
    mut new_id: impl FnMut() -> MemoryId,
) -> MediaBatchOutcome {
    let mut outcome = MediaBatchOutcome::default();

    let existing_videos = count_kind(current_items, MediaKind::Video);
    let mut photos = count_kind(current_items, MediaKind::Photo);
    let mut videos = existing_videos;
    let mut next_order = current_items.len() as u32;

    for file in candidates {
        let kind = match file.media_kind() {
            Some(kind) => kind,
            None => {
                outcome.rejected.push(Rejection::new(&file.name, RejectionReason::UnsupportedType));
                continue;
            }
        };

        match kind {
            MediaKind::Photo => {
                if photos >= MAX_PHOTOS {
                    outcome.rejected.push(Rejection::new(
                        &file.name,
                        RejectionReason::PhotoLimit { max: MAX_PHOTOS as u32 },
                    ));
                    continue;
                }
                photos += 1;
            }
            MediaKind::Video => {
                if file.size_bytes > MAX_VIDEO_SIZE_BYTES {
                    outcome.rejected.push(Rejection::new(
                        &file.name,
                        RejectionReason::VideoTooLarge { limit_mb: MAX_VIDEO_SIZE_MB },
                    ));
                    continue;
                }
                if videos >= MAX_VIDEOS {
                    if existing_videos >= MAX_VIDEOS {
                        outcome.video_limit_reached = true;
                    } else {
                        outcome.rejected.push(Rejection::new(
                            &file.name,
                            RejectionReason::VideoLimit { max: MAX_VIDEOS as u32 },
                        ));
                    }
                    continue;
                }
                videos += 1;
            }
        }

        outcome.accepted.push(MemoryItem {
            id: new_id(),
            kind,
            binary_reference: file.binary_reference.clone(),
            description: String::new(),
            order: next_order,
            visible: true,
        });
        next_order += 1;
    }

    outcome
}

fn count_kind(items: &[MemoryItem], kind: MediaKind) -> usize {
    items.iter().filter(|item| item.kind == kind).count()
}
