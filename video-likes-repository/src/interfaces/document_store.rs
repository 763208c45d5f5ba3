//! Document store trait definition.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::DocumentStoreError;

/// A partial record update: field name to string value.
pub type FieldMap = BTreeMap<String, String>;

/// Abstracts the backend holding video records (a hosted document database,
/// an in-memory map in tests).
///
/// Records are flat maps of string fields keyed by item id. Writes are partial
/// updates with last-write-wins semantics: fields not named in a write keep
/// their current value. The trait exposes no version token, so callers that
/// need read-modify-write atomicity must provide it themselves.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a single field of a record.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The field is set
    /// * `Ok(None)` - The record exists but the field is absent
    /// * `Err(DocumentStoreError::NotFound)` - The record does not exist
    /// * `Err(DocumentStoreError)` - Any other backend failure
    async fn read_field(
        &self,
        item_id: &str,
        field: &str,
    ) -> Result<Option<String>, DocumentStoreError>;

    /// Write several fields of an existing record in one partial update.
    ///
    /// The record is not created if it is missing; `NotFound` is returned instead.
    /// A backend that rejects any of the fields rejects the whole update.
    async fn write_fields(&self, item_id: &str, fields: &FieldMap)
        -> Result<(), DocumentStoreError>;

    /// Write a single field of an existing record.
    async fn write_field(
        &self,
        item_id: &str,
        field: &str,
        value: &str,
    ) -> Result<(), DocumentStoreError> {
        let mut fields = FieldMap::new();
        fields.insert(field.to_string(), value.to_string());
        self.write_fields(item_id, &fields).await
    }
}
