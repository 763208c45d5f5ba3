//! Like ledger store.
//!
//! This module provides the service that owns the authoritative like ledger of
//! every video. Application code toggles likes and reads like state through it;
//! it talks to the backend only through the `DocumentStore` trait.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};
use video_likes_shared::{fields, LikeState, ToggleResult, VideoMetadataUpdate, VoterSet};

use crate::config::LedgerStoreConfig;
use crate::errors::{DocumentStoreError, LedgerError};
use crate::interfaces::{DocumentStore, FieldMap};
use crate::ledger::{decode, Decoded, EvictionPolicy};
use crate::locks::ItemLocks;

/// The service that owns the like ledger of each video.
///
/// A toggle is a read-modify-write cycle against the document store: read the
/// serialized ledger, flip the voter's membership, shrink the ledger if its
/// encoding outgrew the soft cap, and write it back together with the derived
/// like count. The cycle runs inside a per-item critical section, so toggles
/// from concurrent tasks in this process never lose each other's update.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use video_likes_repository::{FieldMap, InMemoryDocumentStore, LedgerStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let documents = Arc::new(InMemoryDocumentStore::new());
/// documents.insert_document("video-1", FieldMap::new());
///
/// let ledger = LedgerStore::new(documents);
/// let result = ledger.toggle("video-1", "user-42").await?;
/// assert!(result.is_liked);
/// assert_eq!(result.new_count, 1);
/// # Ok(())
/// # }
/// ```
pub struct LedgerStore {
    store: Arc<dyn DocumentStore>,
    config: LedgerStoreConfig,
    eviction: EvictionPolicy,
    locks: ItemLocks,
}

impl LedgerStore {
    /// Create a new LedgerStore with default configuration.
    ///
    /// The default configuration caps the serialized ledger at 4500 bytes and
    /// evicts down the ladder 1000, 500, 200.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let config = LedgerStoreConfig::default();
        Self {
            store,
            eviction: EvictionPolicy::from_config(&config),
            config,
            locks: ItemLocks::new(),
        }
    }

    /// Create a new LedgerStore with custom configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(LedgerStore)` - If the configuration is valid
    /// * `Err(LedgerError::Validation)` - If the limits are incoherent
    pub fn with_config(
        store: Arc<dyn DocumentStore>,
        config: LedgerStoreConfig,
    ) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self {
            store,
            eviction: EvictionPolicy::from_config(&config),
            config,
            locks: ItemLocks::new(),
        })
    }

    pub fn config(&self) -> &LedgerStoreConfig {
        &self.config
    }

    fn validate_id(field_name: &str, value: &str) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::validation(format!("{} is required", field_name)));
        }
        Ok(())
    }

    /// Flip `voter_id`'s like on `item_id`.
    ///
    /// A voter in the ledger is removed (unlike); any other voter is appended as
    /// its newest member (like). If the resulting encoding exceeds the soft cap,
    /// the oldest members are evicted. The acting voter's like is the newest
    /// member and is never the one evicted.
    ///
    /// A ledger field that cannot be parsed is read as empty and overwritten.
    ///
    /// # Returns
    ///
    /// * `Ok(ToggleResult)` - Size of the stored ledger and the voter's membership in it
    /// * `Err(LedgerError::Validation)` - Empty ids, or a voter id too long to ever fit
    /// * `Err(LedgerError::NotFound)` - The video does not exist
    /// * `Err(LedgerError::Forbidden)` - The store refused the write
    /// * `Err(LedgerError::SchemaMismatch)` - The store lacks the ledger field
    /// * `Err(LedgerError::NetworkUnavailable)` - The store could not be reached
    ///
    /// Nothing is retried here.
    pub async fn toggle(&self, item_id: &str, voter_id: &str) -> Result<ToggleResult, LedgerError> {
        Self::validate_id("item_id", item_id)?;
        Self::validate_id("voter_id", voter_id)?;
        if !self.eviction.admits(voter_id) {
            return Err(LedgerError::validation(format!(
                "voter_id does not fit in a {} byte ledger",
                self.eviction.soft_cap_bytes()
            )));
        }

        let guard = self.locks.acquire(item_id).await;
        let result = self.toggle_locked(item_id, voter_id).await;
        drop(guard);
        self.locks.release_idle().await;

        result
    }

    async fn toggle_locked(
        &self,
        item_id: &str,
        voter_id: &str,
    ) -> Result<ToggleResult, LedgerError> {
        // Without the ledger field membership is unknowable, so nothing is counted
        let raw = self
            .store
            .read_field(item_id, fields::LIKED_BY)
            .await
            .map_err(|e| Self::rejected(item_id, e))?;

        let mut voters = match decode(raw.as_deref()) {
            Decoded::Unparseable(reason) => {
                warn!(item_id = %item_id, reason = %reason, "Unparseable like ledger, treating as empty");
                VoterSet::new()
            }
            decoded => decoded.into_set(),
        };

        let is_liked = voters.toggle(voter_id);
        let fitted = self.eviction.fit(&mut voters)?;
        let new_count = voters.len() as u64;

        self.write_ledger(item_id, &fitted.encoded, new_count)
            .await
            .map_err(|e| Self::rejected(item_id, e))?;

        debug!(
            item_id = %item_id,
            voter_id = %voter_id,
            new_count,
            is_liked,
            evicted = fitted.evicted,
            ledger_bytes = fitted.encoded.len(),
            "Like toggled"
        );

        Ok(ToggleResult::new(new_count, voters.contains(voter_id)))
    }

    /// Write the ledger, the derived count and the modification time in one update.
    ///
    /// A mirrored field the store does not recognize is dropped from the update
    /// and the rest is written again. The ledger field itself is never dropped.
    async fn write_ledger(
        &self,
        item_id: &str,
        encoded: &str,
        count: u64,
    ) -> Result<(), DocumentStoreError> {
        let mut update = FieldMap::new();
        update.insert(fields::LIKED_BY.to_string(), encoded.to_string());
        update.insert(fields::UPDATED_AT.to_string(), Utc::now().to_rfc3339());
        if self.config.mirror_legacy_count {
            update.insert(fields::LIKES.to_string(), count.to_string());
        }

        loop {
            match self.store.write_fields(item_id, &update).await {
                Err(DocumentStoreError::SchemaMismatch { field })
                    if field != fields::LIKED_BY && update.contains_key(&field) =>
                {
                    debug!(
                        item_id = %item_id,
                        field = %field,
                        "Store does not recognize a mirrored field, writing without it"
                    );
                    update.remove(&field);
                }
                result => return result,
            }
        }
    }

    async fn read_legacy_count(&self, item_id: &str) -> Result<u64, LedgerError> {
        let raw = match self.store.read_field(item_id, fields::LIKES).await {
            Ok(raw) => raw,
            Err(DocumentStoreError::SchemaMismatch { .. }) => None,
            Err(e) => return Err(Self::rejected(item_id, e)),
        };
        Ok(raw
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0))
    }

    /// Read the like count of `item_id` and whether `voter_id` is among the likers.
    ///
    /// The count comes from the ledger when it decodes, otherwise from the legacy
    /// numeric field, so records that predate the ledger still show their likes.
    /// Without a voter, `is_liked` is `false`.
    ///
    /// A store that does not recognize the ledger field yields the legacy count
    /// while `legacy_count_fallback` is on and `SchemaMismatch` otherwise.
    pub async fn read_state(
        &self,
        item_id: &str,
        voter_id: Option<&str>,
    ) -> Result<LikeState, LedgerError> {
        Self::validate_id("item_id", item_id)?;

        let raw = match self.store.read_field(item_id, fields::LIKED_BY).await {
            Ok(raw) => raw,
            Err(DocumentStoreError::SchemaMismatch { .. }) if self.config.legacy_count_fallback => {
                warn!(item_id = %item_id, "Store does not recognize the like ledger field, using legacy count");
                None
            }
            Err(e) => return Err(Self::rejected(item_id, e)),
        };

        match decode(raw.as_deref()) {
            Decoded::Parsed(voters) => Ok(LikeState::new(
                voters.len() as u64,
                voter_id.is_some_and(|v| voters.contains(v)),
            )),
            Decoded::Unparseable(reason) => {
                warn!(item_id = %item_id, reason = %reason, "Unparseable like ledger, using legacy count");
                Ok(LikeState::new(self.read_legacy_count(item_id).await?, false))
            }
            Decoded::Absent => Ok(LikeState::new(self.read_legacy_count(item_id).await?, false)),
        }
    }

    /// Update descriptive attributes of a video without touching its like ledger.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the attributes were written
    /// * `Err(LedgerError::Validation)` - If the update names no attribute
    /// * `Err(LedgerError)` - If the store rejects the write
    pub async fn update_metadata(
        &self,
        item_id: &str,
        update: &VideoMetadataUpdate,
    ) -> Result<(), LedgerError> {
        Self::validate_id("item_id", item_id)?;
        if update.is_empty() {
            return Err(LedgerError::validation(
                "At least one attribute must be provided",
            ));
        }

        let mut fields_to_write = FieldMap::new();
        if let Some(title) = &update.title {
            fields_to_write.insert(fields::TITLE.to_string(), title.clone());
        }
        if let Some(description) = &update.description {
            fields_to_write.insert(fields::DESCRIPTION.to_string(), description.clone());
        }
        if let Some(views) = update.views {
            fields_to_write.insert(fields::VIEWS.to_string(), views.to_string());
        }
        if let Some(verified) = update.verified {
            fields_to_write.insert(fields::VERIFIED.to_string(), verified.to_string());
        }
        fields_to_write.insert(fields::UPDATED_AT.to_string(), Utc::now().to_rfc3339());

        self.store
            .write_fields(item_id, &fields_to_write)
            .await
            .map_err(|e| Self::rejected(item_id, e))?;

        debug!(item_id = %item_id, fields = fields_to_write.len(), "Video metadata updated");
        Ok(())
    }

    fn rejected(item_id: &str, err: DocumentStoreError) -> LedgerError {
        error!(item_id = %item_id, error = %err, "Document store request failed");
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mock store holding one record, with a scripted failure for writes.
    struct MockStore {
        liked_by: Mutex<Option<String>>,
        likes: Mutex<Option<String>>,
        writes: Mutex<Vec<FieldMap>>,
        read_error: Option<DocumentStoreError>,
        write_error: Option<DocumentStoreError>,
    }

    impl MockStore {
        fn new(liked_by: Option<&str>) -> Self {
            Self {
                liked_by: Mutex::new(liked_by.map(str::to_string)),
                likes: Mutex::new(None),
                writes: Mutex::new(Vec::new()),
                read_error: None,
                write_error: None,
            }
        }

        fn failing_writes(liked_by: Option<&str>, err: DocumentStoreError) -> Self {
            Self {
                write_error: Some(err),
                ..Self::new(liked_by)
            }
        }

        fn failing_reads(err: DocumentStoreError) -> Self {
            Self {
                read_error: Some(err),
                ..Self::new(None)
            }
        }
    }

    #[async_trait]
    impl DocumentStore for MockStore {
        async fn read_field(
            &self,
            _item_id: &str,
            field: &str,
        ) -> Result<Option<String>, DocumentStoreError> {
            if let Some(err) = &self.read_error {
                return Err(err.clone());
            }
            Ok(match field {
                fields::LIKED_BY => self.liked_by.lock().unwrap().clone(),
                fields::LIKES => self.likes.lock().unwrap().clone(),
                _ => None,
            })
        }

        async fn write_fields(
            &self,
            _item_id: &str,
            update: &FieldMap,
        ) -> Result<(), DocumentStoreError> {
            if let Some(err) = &self.write_error {
                return Err(err.clone());
            }
            if let Some(value) = update.get(fields::LIKED_BY) {
                *self.liked_by.lock().unwrap() = Some(value.clone());
            }
            if let Some(value) = update.get(fields::LIKES) {
                *self.likes.lock().unwrap() = Some(value.clone());
            }
            self.writes.lock().unwrap().push(update.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_toggle_writes_ledger_count_and_timestamp() {
        let store = Arc::new(MockStore::new(Some(r#"["u1","u2","u3"]"#)));
        let ledger = LedgerStore::new(store.clone());

        let result = ledger.toggle("v1", "u4").await.unwrap();
        assert_eq!(result, ToggleResult::new(4, true));

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0][fields::LIKED_BY], r#"["u1","u2","u3","u4"]"#);
        assert_eq!(writes[0][fields::LIKES], "4");
        assert!(writes[0].contains_key(fields::UPDATED_AT));
    }

    #[tokio::test]
    async fn test_toggle_rejects_empty_ids() {
        let ledger = LedgerStore::new(Arc::new(MockStore::new(None)));

        assert!(matches!(
            ledger.toggle("", "u1").await,
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            ledger.toggle("v1", "  ").await,
            Err(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_toggle_rejects_voter_that_cannot_fit() {
        let ledger = LedgerStore::new(Arc::new(MockStore::new(None)));
        let huge = "x".repeat(5000);

        assert!(matches!(
            ledger.toggle("v1", &huge).await,
            Err(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unparseable_ledger_is_treated_as_empty() {
        let store = Arc::new(MockStore::new(Some("{broken")));
        let ledger = LedgerStore::new(store.clone());

        let result = ledger.toggle("v1", "u1").await.unwrap();
        assert_eq!(result, ToggleResult::new(1, true));
        assert_eq!(
            store.liked_by.lock().unwrap().as_deref(),
            Some(r#"["u1"]"#)
        );
    }

    #[tokio::test]
    async fn test_write_errors_are_mapped() {
        let cases = [
            (
                DocumentStoreError::not_found("v1"),
                LedgerError::NotFound("v1".to_string()),
            ),
            (
                DocumentStoreError::forbidden("denied"),
                LedgerError::Forbidden("denied".to_string()),
            ),
            (
                DocumentStoreError::network("timeout"),
                LedgerError::NetworkUnavailable("timeout".to_string()),
            ),
            (
                DocumentStoreError::unknown("boom"),
                LedgerError::Unknown("boom".to_string()),
            ),
        ];

        for (store_error, expected) in cases {
            let ledger = LedgerStore::new(Arc::new(MockStore::failing_writes(None, store_error)));
            assert_eq!(ledger.toggle("v1", "u1").await, Err(expected));
        }
    }

    #[tokio::test]
    async fn test_read_not_found_is_mapped() {
        let ledger = LedgerStore::new(Arc::new(MockStore::failing_reads(
            DocumentStoreError::not_found("v1"),
        )));

        assert_eq!(
            ledger.toggle("v1", "u1").await,
            Err(LedgerError::NotFound("v1".to_string()))
        );
        assert_eq!(
            ledger.read_state("v1", None).await,
            Err(LedgerError::NotFound("v1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_ledger_field_fails_toggle() {
        let store = Arc::new(MockStore::failing_writes(
            None,
            DocumentStoreError::schema_mismatch(fields::LIKED_BY),
        ));
        *store.likes.lock().unwrap() = Some("41".to_string());
        let ledger = LedgerStore::new(store.clone());

        for _ in 0..2 {
            assert_eq!(
                ledger.toggle("v1", "u1").await,
                Err(LedgerError::SchemaMismatch(fields::LIKED_BY.to_string()))
            );
        }
        assert_eq!(store.likes.lock().unwrap().as_deref(), Some("41"));
    }

    #[tokio::test]
    async fn test_read_state_on_unknown_ledger_field() {
        let store = Arc::new(MockStore::failing_reads(DocumentStoreError::schema_mismatch(
            fields::LIKED_BY,
        )));

        let ledger = LedgerStore::new(store.clone());
        assert_eq!(
            ledger.read_state("v1", Some("u1")).await.unwrap(),
            LikeState::new(0, false)
        );
        assert_eq!(
            ledger.toggle("v1", "u1").await,
            Err(LedgerError::SchemaMismatch(fields::LIKED_BY.to_string()))
        );

        let config = LedgerStoreConfig::default().legacy_count_fallback(false);
        let strict = LedgerStore::with_config(store, config).unwrap();
        assert_eq!(
            strict.read_state("v1", None).await,
            Err(LedgerError::SchemaMismatch(fields::LIKED_BY.to_string()))
        );
    }

    #[tokio::test]
    async fn test_with_config_validates() {
        let store = Arc::new(MockStore::new(None));
        let config = LedgerStoreConfig::with_caps(6000, 5000);
        assert!(LedgerStore::with_config(store, config).is_err());
    }

    #[tokio::test]
    async fn test_read_state_prefers_ledger_over_legacy_count() {
        let store = Arc::new(MockStore::new(Some(r#"["u1","u2"]"#)));
        *store.likes.lock().unwrap() = Some("40".to_string());
        let ledger = LedgerStore::new(store);

        assert_eq!(
            ledger.read_state("v1", Some("u2")).await.unwrap(),
            LikeState::new(2, true)
        );
        assert_eq!(
            ledger.read_state("v1", Some("u9")).await.unwrap(),
            LikeState::new(2, false)
        );
        assert_eq!(
            ledger.read_state("v1", None).await.unwrap(),
            LikeState::new(2, false)
        );
    }

    #[tokio::test]
    async fn test_read_state_falls_back_to_legacy_count() {
        let store = Arc::new(MockStore::new(None));
        *store.likes.lock().unwrap() = Some("17".to_string());
        let ledger = LedgerStore::new(store.clone());
        assert_eq!(
            ledger.read_state("v1", Some("u1")).await.unwrap(),
            LikeState::new(17, false)
        );

        *store.liked_by.lock().unwrap() = Some("garbage".to_string());
        assert_eq!(
            ledger.read_state("v1", None).await.unwrap(),
            LikeState::new(17, false)
        );
    }

    #[tokio::test]
    async fn test_update_metadata_never_writes_ledger_fields() {
        let store = Arc::new(MockStore::new(Some(r#"["u1"]"#)));
        let ledger = LedgerStore::new(store.clone());

        let update = VideoMetadataUpdate {
            title: Some("New title".to_string()),
            views: Some(12),
            ..Default::default()
        };
        ledger.update_metadata("v1", &update).await.unwrap();

        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0][fields::TITLE], "New title");
        assert_eq!(writes[0][fields::VIEWS], "12");
        assert!(!writes[0].contains_key(fields::LIKED_BY));
        assert!(!writes[0].contains_key(fields::LIKES));
    }

    #[tokio::test]
    async fn test_update_metadata_rejects_empty_update() {
        let ledger = LedgerStore::new(Arc::new(MockStore::new(None)));
        assert!(matches!(
            ledger
                .update_metadata("v1", &VideoMetadataUpdate::default())
                .await,
            Err(LedgerError::Validation(_))
        ));
    }
}
