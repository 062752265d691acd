// ============================
// authgate-backend-lib/src/storage/mod.rs
// ============================
//! Document store abstraction.
//!
//! The credential core only needs three document operations plus a way to
//! declare unique fields. Uniqueness is enforced here, by the store, not by
//! the callers' existence checks.
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

mod flat_file;
mod memory;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStore;

/// A stored document: a JSON object
pub type Document = Map<String, Value>;

/// Storage layer errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key for unique field '{field}' in collection '{collection}'")]
    DuplicateKey { collection: String, field: String },

    #[error("invalid collection name '{0}'")]
    InvalidCollection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt collection '{0}': expected an array of objects")]
    Corrupt(String),

    #[error("could not connect to '{0}': unsupported address")]
    Connect(String),
}

/// Conjunction of field equalities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<(String, Value)>,
}

impl Filter {
    /// Match documents whose `field` equals `value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::default().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.terms
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// The filter's terms as a document, used as the base of an upsert
    pub fn to_document(&self) -> Document {
        self.terms.iter().cloned().collect()
    }
}

/// Trait for document store backends
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// First document in `collection` matching `filter`
    async fn find_one(&self, collection: &str, filter: &Filter)
        -> Result<Option<Document>, StoreError>;

    /// Insert a document, rejecting it if it breaks a unique index
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Set `update`'s fields on the first match, or insert `filter` + `update`
    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: Document,
    ) -> Result<(), StoreError>;

    /// Declare `field` unique within `collection`. Idempotent.
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;
}

/// Open the store named by `address`.
///
/// `memory://` selects the in-memory store; `file://<path>` or a bare path
/// selects the flat-file store rooted at `<path>/<database>`.
pub fn connect(address: &str, database: &str) -> Result<Arc<dyn DocumentStore>, StoreError> {
    if address == "memory://" || address == "memory" {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = match address.split_once("://") {
        Some(("file", path)) => path,
        Some(_) => return Err(StoreError::Connect(address.to_string())),
        None => address,
    };

    if path.is_empty() {
        return Err(StoreError::Connect(address.to_string()));
    }

    Ok(Arc::new(FlatFileStorage::new(path, database)?))
}

/// First unique field on which `candidate` collides with a stored document,
/// ignoring the document at position `skip`
pub(crate) fn find_conflict<'a>(
    documents: &[Document],
    unique_fields: impl IntoIterator<Item = &'a String>,
    candidate: &Document,
    skip: Option<usize>,
) -> Option<String> {
    for field in unique_fields {
        let Some(value) = candidate.get(field) else {
            continue;
        };
        let clash = documents
            .iter()
            .enumerate()
            .any(|(i, doc)| Some(i) != skip && doc.get(field) == Some(value));
        if clash {
            return Some(field.clone());
        }
    }
    None
}

/// Whether `field` already holds the same value in two documents
pub(crate) fn existing_duplicate(documents: &[Document], field: &str) -> bool {
    documents.iter().enumerate().any(|(i, doc)| {
        doc.get(field).is_some_and(|value| {
            documents[i + 1..].iter().any(|other| other.get(field) == Some(value))
        })
    })
}

/// Apply upsert semantics to an in-memory collection
pub(crate) fn apply_upsert(
    collection: &str,
    documents: &mut Vec<Document>,
    unique_fields: &[String],
    filter: &Filter,
    update: Document,
) -> Result<(), StoreError> {
    let position = documents.iter().position(|doc| filter.matches(doc));

    let mut candidate = match position {
        Some(i) => documents[i].clone(),
        None => filter.to_document(),
    };
    candidate.extend(update);

    if let Some(field) = find_conflict(documents, unique_fields, &candidate, position) {
        return Err(StoreError::DuplicateKey {
            collection: collection.to_string(),
            field,
        });
    }

    match position {
        Some(i) => documents[i] = candidate,
        None => documents.push(candidate),
    }
    Ok(())
}
