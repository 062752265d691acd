//! Flat-file document store.
//!
//! Layout under the store root:
//! `<collection>.json` holds the documents as a JSON array,
//! `<collection>.indexes.json` the names of its unique fields.
use super::{
    apply_upsert, existing_duplicate, find_conflict, Document, DocumentStore, Filter, StoreError,
};
use async_trait::async_trait;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::Mutex};
use tracing::debug;

/// Flat-file implementation of the [`DocumentStore`] trait
#[derive(Clone, Debug)]
pub struct FlatFileStorage {
    root: PathBuf,
    // serialises read-modify-write cycles
    lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    /// Open (creating if needed) the database directory `<root>/<database>`
    pub fn new<P: AsRef<Path>>(root: P, database: &str) -> Result<Self, StoreError> {
        check_name(database)?;
        let root = root.as_ref().join(database);
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn documents_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }

    fn indexes_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}{INDEXES_SUFFIX}.json"))
    }

    async fn read_documents(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let path = self.documents_path(collection);
        if !tokio_fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        let Value::Array(items) = serde_json::from_str(&content)? else {
            return Err(StoreError::Corrupt(collection.to_string()));
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::Object(doc) => Ok(doc),
                _ => Err(StoreError::Corrupt(collection.to_string())),
            })
            .collect()
    }

    async fn read_indexes(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let path = self.indexes_path(collection);
        if !tokio_fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_documents(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(documents)?;
        write_atomic(&self.documents_path(collection), json).await
    }
}

/// Write through a temp file and rename, so readers never see half a file
async fn write_atomic(path: &Path, contents: String) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    tokio_fs::write(&tmp, contents).await?;
    tokio_fs::rename(&tmp, path).await?;
    Ok(())
}

const INDEXES_SUFFIX: &str = ".indexes";

/// Collection and database names become file names.
///
/// A name ending in `.indexes` would share a file with another collection's
/// index list.
fn check_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with(INDEXES_SUFFIX)
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollection(name.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FlatFileStorage {
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        check_name(collection)?;
        let _guard = self.lock.lock().await;

        let documents = self.read_documents(collection).await?;
        Ok(documents.into_iter().find(|doc| filter.matches(doc)))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        check_name(collection)?;
        let _guard = self.lock.lock().await;

        let mut documents = self.read_documents(collection).await?;
        let unique_fields = self.read_indexes(collection).await?;

        if let Some(field) = find_conflict(&documents, &unique_fields, &document, None) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                field,
            });
        }

        documents.push(document);
        self.write_documents(collection, &documents).await?;
        debug!("inserted document into {}", collection);
        Ok(())
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: Document,
    ) -> Result<(), StoreError> {
        check_name(collection)?;
        let _guard = self.lock.lock().await;

        let mut documents = self.read_documents(collection).await?;
        let unique_fields = self.read_indexes(collection).await?;

        apply_upsert(collection, &mut documents, &unique_fields, filter, update)?;
        self.write_documents(collection, &documents).await?;
        debug!("upserted document in {}", collection);
        Ok(())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        check_name(collection)?;
        let _guard = self.lock.lock().await;

        let mut unique_fields = self.read_indexes(collection).await?;
        if unique_fields.iter().any(|f| f == field) {
            return Ok(());
        }

        let documents = self.read_documents(collection).await?;
        if existing_duplicate(&documents, field) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                field: field.to_string(),
            });
        }

        unique_fields.push(field.to_string());
        let json = serde_json::to_string_pretty(&unique_fields)?;
        write_atomic(&self.indexes_path(collection), json).await
    }
}
