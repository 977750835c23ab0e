// src/backend/metrics.rs
use crate::models::common::{PageStatus, TimestampNs};
use crate::services::media_validator::MediaBatchOutcome;
use crate::storage::metrics::{get_metrics, update_metrics};
use crate::utils::log;
use candid::CandidType;
use serde::{Deserialize, Serialize};

#[derive(CandidType, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PageMetrics {
    pub pages_created: u64,
    pub pages_published: u64,
    pub pages_unpublished: u64,
    pub pages_deleted: u64,
    pub media_accepted: u64,
    pub media_rejected: u64,
    /// Times a caller hit the video quota and was offered the upgrade.
    pub video_limit_prompts: u64,
    pub sessions_purged: u64,
    pub last_purge_at: Option<TimestampNs>,
}

// Metrics are best-effort: a failed write is logged, never surfaced to the caller.
fn record(update_fn: impl FnOnce(&mut PageMetrics)) {
    if let Err(e) = update_metrics(update_fn) {
        log::warn(e);
    }
}

pub fn record_page_created() {
    record(|m| m.pages_created = m.pages_created.saturating_add(1));
}

pub fn record_status_change(status: PageStatus) {
    record(|m| match status {
        PageStatus::Published => m.pages_published = m.pages_published.saturating_add(1),
        PageStatus::Unpublished => m.pages_unpublished = m.pages_unpublished.saturating_add(1),
        PageStatus::Draft => {}
    });
}

pub fn record_page_deleted() {
    record(|m| m.pages_deleted = m.pages_deleted.saturating_add(1));
}

pub fn record_media_batch(outcome: &MediaBatchOutcome) {
    record(|m| {
        m.media_accepted = m.media_accepted.saturating_add(outcome.accepted.len() as u64);
        m.media_rejected = m.media_rejected.saturating_add(outcome.rejected.len() as u64);
        if outcome.video_limit_reached {
            m.video_limit_prompts = m.video_limit_prompts.saturating_add(1);
        }
    });
}

pub fn record_purge(purged: usize, now: TimestampNs) {
    record(|m| {
        m.sessions_purged = m.sessions_purged.saturating_add(purged as u64);
        m.last_purge_at = Some(now);
    });
}

pub fn get_page_metrics() -> PageMetrics {
    get_metrics()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_changes_count_per_status() {
        record_status_change(PageStatus::Published);
        record_status_change(PageStatus::Published);
        record_status_change(PageStatus::Unpublished);
        record_status_change(PageStatus::Draft);
        let metrics = get_page_metrics();
        assert_eq!(metrics.pages_published, 2);
        assert_eq!(metrics.pages_unpublished, 1);
    }

    #[test]
    fn purge_records_timestamp() {
        record_purge(3, 77);
        let metrics = get_page_metrics();
        assert_eq!(metrics.sessions_purged, 3);
        assert_eq!(metrics.last_purge_at, Some(77));
    }
}
