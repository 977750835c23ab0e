// src/backend/storage/documents.rs
use crate::error::PageError;
use crate::storage::memory::{get_documents_memory, Memory};
use crate::storage::storable::{Cbor, StorableString};
use ic_stable_structures::StableBTreeMap;
use serde_json::{Map, Value};
use std::cell::RefCell;

/// Named collections of the document store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    MemorialPages,
    Users,
    Memories,
    Comments,
    Orders,
    QrRequests,
    SupportTickets,
    Analytics,
    Payments,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::MemorialPages => "memorialPages",
            Collection::Users => "users",
            Collection::Memories => "memories",
            Collection::Comments => "comments",
            Collection::Orders => "orders",
            Collection::QrRequests => "qrRequests",
            Collection::SupportTickets => "supportTickets",
            Collection::Analytics => "analytics",
            Collection::Payments => "payments",
        }
    }
}

/// Document store the page services read and write through.
///
/// Documents are loosely-typed JSON objects; decoding into typed records is the
/// caller's job (see `PageRecord::decode`).
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Returns `None` when no document exists under `id`.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, PageError>;

    /// Creates or replaces a whole document.
    async fn set(&self, collection: Collection, id: &str, doc: Value) -> Result<(), PageError>;

    /// Merges top-level fields into an existing document.
    /// Fails with `PageNotFound` if the document does not exist.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), PageError>;

    /// Deletes a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), PageError>;

    /// All documents of a collection as `(id, document)` pairs.
    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, PageError>;
}

type DocumentsMap = StableBTreeMap<StorableString, Cbor<Value>, Memory>;

thread_local! {
    /// Key: "<collection>/<id>", Value: the JSON document
    static DOCUMENTS: RefCell<DocumentsMap> = RefCell::new(
        DocumentsMap::init(get_documents_memory())
    );
}

fn document_key(collection: Collection, id: &str) -> StorableString {
    Cbor(format!("{}/{}", collection.as_str(), id))
}

/// Document store backed by the canister's stable memory.
#[derive(Clone, Copy, Debug, Default)]
pub struct StableDocumentStore;

impl DocumentStore for StableDocumentStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, PageError> {
        let key = document_key(collection, id);
        Ok(DOCUMENTS.with(|map_ref| map_ref.borrow().get(&key).map(|cbor| cbor.0)))
    }

    async fn set(&self, collection: Collection, id: &str, doc: Value) -> Result<(), PageError> {
        if !doc.is_object() {
            return Err(PageError::StorageError(format!(
                "Document {}/{} must be an object",
                collection.as_str(),
                id
            )));
        }
        let key = document_key(collection, id);
        DOCUMENTS.with(|map_ref| {
            map_ref.borrow_mut().insert(key, Cbor(doc));
        });
        Ok(())
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), PageError> {
        let key = document_key(collection, id);
        DOCUMENTS.with(|map_ref| {
            let mut map = map_ref.borrow_mut();
            let mut doc = map
                .get(&key)
                .map(|cbor| cbor.0)
                .ok_or_else(|| PageError::PageNotFound(id.to_string()))?;
            let object = doc.as_object_mut().ok_or_else(|| {
                PageError::StorageError(format!(
                    "Stored document {}/{} is not an object",
                    collection.as_str(),
                    id
                ))
            })?;
            object.extend(fields);
            map.insert(key, Cbor(doc));
            Ok(())
        })
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), PageError> {
        let key = document_key(collection, id);
        DOCUMENTS.with(|map_ref| {
            map_ref.borrow_mut().remove(&key);
        });
        Ok(())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<(String, Value)>, PageError> {
        let prefix = format!("{}/", collection.as_str());
        let mut documents = Vec::new();
        DOCUMENTS.with(|map_ref| {
            let map = map_ref.borrow();
            for (key, value) in map.iter() {
                if let Some(id) = key.0.strip_prefix(&prefix) {
                    documents.push((id.to_string(), value.0));
                }
            }
        });
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn update_merges_top_level_fields() {
        let store = StableDocumentStore;
        block_on(async {
            store
                .set(Collection::MemorialPages, "a", json!({ "name": "Sara", "status": "draft" }))
                .await
                .unwrap();
            let mut fields = Map::new();
            fields.insert("status".to_string(), json!("published"));
            fields.insert("updatedAt".to_string(), json!(9u64));
            store.update(Collection::MemorialPages, "a", fields).await.unwrap();

            let doc = store.get(Collection::MemorialPages, "a").await.unwrap().unwrap();
            assert_eq!(doc, json!({ "name": "Sara", "status": "published", "updatedAt": 9u64 }));
        });
    }

    #[test]
    fn update_of_missing_document_fails() {
        let store = StableDocumentStore;
        let err = block_on(store.update(Collection::MemorialPages, "ghost", Map::new())).unwrap_err();
        assert_eq!(err, PageError::PageNotFound("ghost".to_string()));
    }

    #[test]
    fn delete_is_idempotent_and_collections_are_separate() {
        let store = StableDocumentStore;
        block_on(async {
            store.set(Collection::MemorialPages, "x", json!({ "n": 1 })).await.unwrap();
            store.set(Collection::Comments, "x", json!({ "n": 2 })).await.unwrap();

            let pages = store.list(Collection::MemorialPages).await.unwrap();
            assert_eq!(pages, vec![("x".to_string(), json!({ "n": 1 }))]);

            store.delete(Collection::MemorialPages, "x").await.unwrap();
            store.delete(Collection::MemorialPages, "x").await.unwrap();
            assert!(store.get(Collection::MemorialPages, "x").await.unwrap().is_none());
            assert!(store.get(Collection::Comments, "x").await.unwrap().is_some());
        });
    }

    #[test]
    fn set_rejects_non_objects() {
        let store = StableDocumentStore;
        assert!(block_on(store.set(Collection::Users, "u", json!("nope"))).is_err());
    }
}
