use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::DocumentStoreError;
use crate::interfaces::{DocumentStore, FieldMap};

/// Document store that keeps every record in a process-local map.
///
/// # Example
///
/// ```ignore
/// use video_likes_repository::{DocumentStore, FieldMap, InMemoryDocumentStore};
///
/// let store = InMemoryDocumentStore::new();
/// store.insert_document("video-1", FieldMap::new());
/// store.write_field("video-1", "title", "Intro").await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, FieldMap>>,
    /// Recognized fields. `None` accepts any field.
    schema: Option<HashSet<String>>,
    read_only: AtomicBool,
    offline: AtomicBool,
}

impl InMemoryDocumentStore {
    /// Create an empty store that accepts any field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that only recognizes the given fields.
    ///
    /// Reading or writing any other field fails with `SchemaMismatch`, the way
    /// a hosted database rejects an attribute that was never declared.
    pub fn with_schema<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schema: Some(fields.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Reject every write with `Forbidden` while set.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Fail every operation with `Network` while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Create or replace a whole record.
    pub fn insert_document(&self, item_id: impl Into<String>, fields: FieldMap) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(item_id.into(), fields);
    }

    /// Remove a record, returning its last contents.
    pub fn delete_document(&self, item_id: &str) -> Option<FieldMap> {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(item_id)
    }

    /// Snapshot of a record.
    pub fn document(&self, item_id: &str) -> Option<FieldMap> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(item_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), DocumentStoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::network("in-memory store is offline"));
        }
        Ok(())
    }

    fn check_field(&self, field: &str) -> Result<(), DocumentStoreError> {
        match &self.schema {
            Some(schema) if !schema.contains(field) => {
                Err(DocumentStoreError::schema_mismatch(field))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn read_field(
        &self,
        item_id: &str,
        field: &str,
    ) -> Result<Option<String>, DocumentStoreError> {
        self.check_online()?;
        let documents = self
            .documents
            .read()
            .map_err(|e| DocumentStoreError::unknown(e.to_string()))?;
        let document = documents
            .get(item_id)
            .ok_or_else(|| DocumentStoreError::not_found(item_id))?;
        self.check_field(field)?;
        Ok(document.get(field).cloned())
    }

    async fn write_fields(
        &self,
        item_id: &str,
        fields: &FieldMap,
    ) -> Result<(), DocumentStoreError> {
        self.check_online()?;
        if self.read_only.load(Ordering::SeqCst) {
            return Err(DocumentStoreError::forbidden(format!(
                "update not permitted on {item_id}"
            )));
        }
        for field in fields.keys() {
            self.check_field(field)?;
        }

        let mut documents = self
            .documents
            .write()
            .map_err(|e| DocumentStoreError::unknown(e.to_string()))?;
        let document = documents
            .get_mut(item_id)
            .ok_or_else(|| DocumentStoreError::not_found(item_id))?;
        for (field, value) in fields {
            document.insert(field.clone(), value.clone());
        }

        debug!(item_id = %item_id, fields = fields.len(), "Document updated");
        Ok(())
    }
}
