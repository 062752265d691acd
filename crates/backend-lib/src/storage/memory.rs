//! In-memory document store.
use super::{
    apply_upsert, existing_duplicate, find_conflict, Document, DocumentStore, Filter, StoreError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
    unique_fields: Vec<String>,
}

/// Document store kept in process memory.
///
/// Each collection is guarded by its map entry, so operations on one
/// collection are serialised.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map_or(0, |c| c.documents.len())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collections.get(collection).and_then(|c| {
            c.documents
                .iter()
                .find(|doc| filter.matches(doc))
                .cloned()
        }))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut entry = self.collections.entry(collection.to_string()).or_default();

        if let Some(field) = find_conflict(&entry.documents, &entry.unique_fields, &document, None)
        {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                field,
            });
        }

        entry.documents.push(document);
        Ok(())
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: Document,
    ) -> Result<(), StoreError> {
        let mut entry = self.collections.entry(collection.to_string()).or_default();
        let Collection {
            documents,
            unique_fields,
        } = &mut *entry;
        apply_upsert(collection, documents, unique_fields, filter, update)
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut entry = self.collections.entry(collection.to_string()).or_default();

        if entry.unique_fields.iter().any(|f| f == field) {
            return Ok(());
        }

        if existing_duplicate(&entry.documents, field) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                field: field.to_string(),
            });
        }

        entry.unique_fields.push(field.to_string());
        Ok(())
    }
}
