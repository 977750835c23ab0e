// src/backend/models/page_record.rs
use crate::error::PageError;
use crate::models::common::{PageId, PageStatus, PrincipalId, TimestampNs};
use crate::models::draft::{Draft, PageSettings};
use crate::models::memory_item::MemoryItem;
use candid::CandidType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A memorial page as persisted in the `memorialPages` collection.
///
/// The store key is authoritative for `id`: [`PageRecord::decode`] overwrites
/// whatever id the document body carries.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    #[serde(default)]
    pub id: PageId,
    pub owner: PrincipalId,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub cover_photo: Option<String>,
    #[serde(default)]
    pub memories: Vec<MemoryItem>,
    #[serde(default)]
    pub settings: PageSettings,
    pub status: PageStatus,
    // Counters written by the public viewer and QR service, never by this canister.
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub qr_scans: u64,
    pub slug: String,
    pub created_at: TimestampNs,
    #[serde(default)]
    pub updated_at: Option<TimestampNs>,
}

impl PageRecord {
    /// Builds a fresh `draft` record from the wizard state.
    pub fn from_draft(
        id: PageId,
        owner: PrincipalId,
        slug: String,
        draft: &Draft,
        now: TimestampNs,
    ) -> Self {
        let info = &draft.basic_info;
        Self {
            id,
            owner,
            name: info.name.clone(),
            birth_date: info.birth_date.clone(),
            death_date: info.death_date.clone(),
            bio: info.bio.clone(),
            profile_photo: info.profile_photo.clone(),
            cover_photo: info.cover_photo.clone(),
            memories: draft.memories.clone(),
            settings: draft.settings.clone(),
            status: PageStatus::Draft,
            view_count: 0,
            qr_scans: 0,
            slug,
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Decodes a loosely-typed store document into a record.
    ///
    /// Counters, media, settings and optional fields default when absent;
    /// `owner`, `name`, `status`, `slug` and `createdAt` are required.
    pub fn decode(id: &str, doc: Value) -> Result<Self, PageError> {
        if !doc.is_object() {
            return Err(PageError::MalformedRecord {
                id: id.to_string(),
                reason: "document is not an object".to_string(),
            });
        }
        let mut record: PageRecord =
            serde_json::from_value(doc).map_err(|e| PageError::MalformedRecord {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        if record.slug.trim().is_empty() {
            return Err(PageError::MalformedRecord {
                id: id.to_string(),
                reason: "empty slug".to_string(),
            });
        }
        record.id = id.to_string();
        // Stored order may have gaps if an older client wrote it.
        record.memories.sort_by_key(|item| item.order);
        for (position, item) in record.memories.iter_mut().enumerate() {
            item.order = position as u32;
        }
        Ok(record)
    }

    /// Encodes the record as a store document.
    pub fn encode(&self) -> Result<Value, PageError> {
        serde_json::to_value(self)
            .map_err(|e| PageError::InternalError(format!("Failed to encode page {}: {}", self.id, e)))
    }

    /// Copies the wizard's editable fields onto an existing record.
    pub fn apply_draft(&mut self, draft: &Draft, now: TimestampNs) {
        let info = &draft.basic_info;
        self.name = info.name.clone();
        self.birth_date = info.birth_date.clone();
        self.death_date = info.death_date.clone();
        self.bio = info.bio.clone();
        self.profile_photo = info.profile_photo.clone();
        self.cover_photo = info.cover_photo.clone();
        self.memories = draft.memories.clone();
        self.settings = draft.settings.clone();
        self.updated_at = Some(now);
    }

    /// Public viewing URL, `<origin>/memory/<slug>`.
    pub fn share_url(&self, origin: &str) -> String {
        format!("{}/memory/{}", origin.trim_end_matches('/'), self.slug)
    }

    /// The record as shown to the public: hidden media are dropped and the
    /// remaining items renumbered from zero.
    pub fn public_view(mut self) -> Self {
        self.memories.retain(|item| item.visible);
        for (position, item) in self.memories.iter_mut().enumerate() {
            item.order = position as u32;
        }
        self
    }
}

#[cfg(test)]
impl PageRecord {
    /// A published record with fixed content, for seeding tests.
    pub(crate) fn sample(id: &str) -> Self {
        Self {
            id: id.to_string(),
            owner: candid::Principal::anonymous(),
            name: "Example Memorial".to_string(),
            birth_date: Some("1940-01-01".to_string()),
            death_date: Some("2020-01-01".to_string()),
            bio: "A life remembered with love by family and friends.".to_string(),
            profile_photo: None,
            cover_photo: None,
            memories: Vec::new(),
            settings: PageSettings::default(),
            status: PageStatus::Published,
            view_count: 0,
            qr_scans: 0,
            slug: "example".to_string(),
            created_at: 0,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::MediaKind;
    use candid::Principal;
    use serde_json::json;

    fn owner() -> Principal {
        Principal::from_slice(&[7; 29])
    }

    #[test]
    fn decode_fills_counter_defaults() {
        let doc = json!({
            "owner": owner().to_text(),
            "name": "Sara Levi",
            "status": "published",
            "slug": "sara-levi-a1b2c3",
            "createdAt": 42u64,
        });
        let record = PageRecord::decode("p1", doc).unwrap();
        assert_eq!(record.id, "p1");
        assert_eq!(record.updated_at, None);
        assert_eq!(record.status, PageStatus::Published);
        assert_eq!(record.view_count, 0);
        assert_eq!(record.qr_scans, 0);
        assert!(record.memories.is_empty());
        assert_eq!(record.settings, PageSettings::default());
    }

    #[test]
    fn decode_rejects_missing_status() {
        let doc = json!({
            "owner": owner().to_text(),
            "name": "Sara Levi",
            "slug": "sara",
            "createdAt": 1u64,
        });
        let err = PageRecord::decode("p1", doc).unwrap_err();
        assert!(matches!(err, PageError::MalformedRecord { ref id, .. } if id == "p1"));
    }

    #[test]
    fn decode_rejects_unknown_status_and_non_objects() {
        let doc = json!({
            "owner": owner().to_text(),
            "name": "x",
            "status": "archived",
            "slug": "x",
            "createdAt": 1u64,
        });
        assert!(PageRecord::decode("p1", doc).is_err());
        assert!(PageRecord::decode("p1", json!([1, 2, 3])).is_err());
    }

    #[test]
    fn decode_redensifies_memory_order() {
        let doc = json!({
            "owner": owner().to_text(),
            "name": "x",
            "status": "draft",
            "slug": "x",
            "createdAt": 1u64,
            "memories": [
                { "id": "b", "type": "video", "binaryReference": "blob-b", "order": 7 },
                { "id": "a", "type": "photo", "binaryReference": "blob-a", "order": 2, "visible": false },
            ],
        });
        let record = PageRecord::decode("p1", doc).unwrap();
        let ids: Vec<_> = record.memories.iter().map(|m| (m.id.as_str(), m.order)).collect();
        assert_eq!(ids, vec![("a", 0), ("b", 1)]);
        assert_eq!(record.memories[1].kind, MediaKind::Video);
        assert!(record.memories[1].visible);
        assert!(!record.memories[0].visible);
    }

    #[test]
    fn encode_then_decode_keeps_fields() {
        let mut draft = Draft::default();
        draft.basic_info.name = "Avi".to_string();
        let record = PageRecord::from_draft("p9".to_string(), owner(), "avi-1".to_string(), &draft, 5);
        let doc = record.encode().unwrap();
        assert_eq!(doc["status"], "draft");
        assert_eq!(doc["createdAt"], 5);
        assert_eq!(PageRecord::decode("p9", doc).unwrap(), record);
    }

    #[test]
    fn share_url_uses_memory_path() {
        let record = PageRecord::sample("p1");
        assert_eq!(
            record.share_url("https://anikod.example/"),
            "https://anikod.example/memory/example"
        );
    }

    #[test]
    fn public_view_hides_invisible_media() {
        let mut record = PageRecord::sample("p1");
        let item = |id: &str, kind: MediaKind, order: u32, visible: bool| MemoryItem {
            id: id.to_string(),
            kind,
            binary_reference: format!("blob-{}", id),
            description: String::new(),
            order,
            visible,
        };
        record.memories = vec![
            item("a", MediaKind::Photo, 0, true),
            item("b", MediaKind::Photo, 1, false),
            item("c", MediaKind::Video, 2, true),
        ];
        let shown: Vec<_> = record
            .public_view()
            .memories
            .iter()
            .map(|m| (m.id.clone(), m.order))
            .collect();
        assert_eq!(shown, vec![("a".to_string(), 0), ("c".to_string(), 1)]);
    }
}
