// src/backend/services/lifecycle.rs
//! Publish, unpublish and delete of stored memorial pages.
//!
//! Every mutation is two-phase: the store write happens first, and the local
//! copy is only touched once that write succeeded. A failed write leaves the
//! local copy exactly as it was.

use crate::error::PageError;
use crate::models::common::{PageId, PageStatus, PrincipalId, TimestampNs};
use crate::models::page_record::PageRecord;
use crate::storage::documents::{Collection, DocumentStore};
use crate::utils::log;
use candid::CandidType;
use serde::Deserialize;
use serde_json::{json, Map};
use std::collections::HashMap;
use thiserror::Error;

#[derive(CandidType, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleOp {
    Fetch,
    Publish,
    Unpublish,
    Remove,
}

impl LifecycleOp {
    /// The one message shown to users when this operation fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            LifecycleOp::Fetch => "An error occurred while loading the page",
            LifecycleOp::Publish => "An error occurred while publishing the page",
            LifecycleOp::Unpublish => "An error occurred while unpublishing the page",
            LifecycleOp::Remove => "An error occurred while deleting the page",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{op:?} of page {page_id} failed: {cause}")]
pub struct LifecycleError {
    pub op: LifecycleOp,
    pub page_id: PageId,
    pub cause: PageError,
}

impl LifecycleError {
    fn new(op: LifecycleOp, page_id: &str, cause: PageError) -> Self {
        Self {
            op,
            page_id: page_id.to_string(),
            cause,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.op.user_message()
    }
}

impl From<LifecycleError> for PageError {
    /// Missing pages and access errors keep their meaning; store failures
    /// collapse into the operation's fixed message.
    fn from(err: LifecycleError) -> Self {
        match err.cause {
            PageError::PageNotFound(_) | PageError::NotAuthenticated | PageError::NotAuthorized(_) => {
                err.cause
            }
            _ => PageError::OperationFailed(err.user_message().to_string()),
        }
    }
}

pub struct PageLifecycle<S: DocumentStore> {
    store: S,
    local: HashMap<PageId, PageRecord>,
}

impl<S: DocumentStore> PageLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            local: HashMap::new(),
        }
    }

    /// Local copy of a page previously fetched through this manager.
    pub fn local(&self, id: &str) -> Option<&PageRecord> {
        self.local.get(id)
    }

    /// Reads and decodes a page. A missing page is `PageNotFound`.
    pub async fn fetch(&mut self, id: &str) -> Result<PageRecord, LifecycleError> {
        let op = LifecycleOp::Fetch;
        let doc = self
            .store
            .get(Collection::MemorialPages, id)
            .await
            .map_err(|e| self.fail(op, id, e))?
            .ok_or_else(|| LifecycleError::new(op, id, PageError::PageNotFound(id.to_string())))?;
        let record = PageRecord::decode(id, doc).map_err(|e| self.fail(op, id, e))?;
        self.local.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    pub async fn publish(&mut self, id: &str, now: TimestampNs) -> Result<PageStatus, LifecycleError> {
        self.set_status(LifecycleOp::Publish, id, PageStatus::Published, now).await
    }

    pub async fn unpublish(&mut self, id: &str, now: TimestampNs) -> Result<PageStatus, LifecycleError> {
        self.set_status(LifecycleOp::Unpublish, id, PageStatus::Unpublished, now).await
    }

    async fn set_status(
        &mut self,
        op: LifecycleOp,
        id: &str,
        status: PageStatus,
        now: TimestampNs,
    ) -> Result<PageStatus, LifecycleError> {
        let mut fields = Map::new();
        fields.insert("status".to_string(), json!(status.as_str()));
        fields.insert("updatedAt".to_string(), json!(now));

        self.store
            .update(Collection::MemorialPages, id, fields)
            .await
            .map_err(|e| self.fail(op, id, e))?;

        if let Some(record) = self.local.get_mut(id) {
            record.status = status;
            record.updated_at = Some(now);
        }
        log::info(format!("Page {} is now {}", id, status.as_str()));
        Ok(status)
    }

    /// Deletes the page. There is no undo.
    pub async fn remove(&mut self, id: &str) -> Result<(), LifecycleError> {
        let op = LifecycleOp::Remove;
        self.store
            .delete(Collection::MemorialPages, id)
            .await
            .map_err(|e| self.fail(op, id, e))?;
        self.local.remove(id);
        log::info(format!("Page {} deleted", id));
        Ok(())
    }

    /// Pages owned by `owner`, newest first. Undecodable documents are skipped.
    pub async fn list_owned(&self, owner: &PrincipalId) -> Result<Vec<PageRecord>, PageError> {
        let mut pages: Vec<PageRecord> = self
            .decoded_pages()
            .await?
            .into_iter()
            .filter(|page| &page.owner == owner)
            .collect();
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pages)
    }

    /// The published page behind a public slug, without hidden media.
    /// Drafts and unpublished pages are indistinguishable from missing ones.
    pub async fn view_published(&self, slug: &str) -> Result<PageRecord, PageError> {
        self.decoded_pages()
            .await?
            .into_iter()
            .find(|page| page.slug == slug && page.status == PageStatus::Published)
            .map(PageRecord::public_view)
            .ok_or_else(|| PageError::PageNotFound(slug.to_string()))
    }

    async fn decoded_pages(&self) -> Result<Vec<PageRecord>, PageError> {
        let docs = self.store.list(Collection::MemorialPages).await?;
        let mut pages = Vec::with_capacity(docs.len());
        for (id, doc) in docs {
            match PageRecord::decode(&id, doc) {
                Ok(page) => pages.push(page),
                Err(e) => log::warn(format!("Skipping page {}: {}", id, e)),
            }
        }
        Ok(pages)
    }

    fn fail(&self, op: LifecycleOp, id: &str, cause: PageError) -> LifecycleError {
        log::error(format!("{:?} of page {} failed: {}", op, id, cause));
        LifecycleError::new(op, id, cause)
    }
}
