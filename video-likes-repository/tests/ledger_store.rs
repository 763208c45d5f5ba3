//! Integration tests for the ledger store against the in-memory document store.

use std::sync::Arc;

use video_likes_repository::ledger::decode;
use video_likes_repository::{
    DocumentStore, FieldMap, InMemoryDocumentStore, LedgerError, LedgerStore, LedgerStoreConfig,
};
use video_likes_shared::{fields, LikeState, ToggleResult, VideoMetadataUpdate, VoterSet};

fn record(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn store_with(item_id: &str, fields: FieldMap) -> Arc<InMemoryDocumentStore> {
    let store = Arc::new(InMemoryDocumentStore::new());
    store.insert_document(item_id, fields);
    store
}

fn stored_voters(store: &InMemoryDocumentStore, item_id: &str) -> VoterSet {
    let doc = store.document(item_id).unwrap();
    decode(doc.get(fields::LIKED_BY).map(String::as_str)).into_set()
}

fn ledger_of(ids: impl Iterator<Item = String>) -> String {
    serde_json::to_string(&ids.collect::<Vec<_>>()).unwrap()
}

#[tokio::test]
async fn test_like_then_unlike_scenario() {
    let store = store_with("v1", record(&[(fields::LIKED_BY, r#"["u1","u2","u3"]"#)]));
    let ledger = LedgerStore::new(store.clone());

    let result = ledger.toggle("v1", "u4").await.unwrap();
    assert_eq!(result, ToggleResult::new(4, true));
    assert_eq!(
        stored_voters(&store, "v1").as_slice(),
        ["u1", "u2", "u3", "u4"]
    );

    let result = ledger.toggle("v1", "u2").await.unwrap();
    assert_eq!(result, ToggleResult::new(3, false));
    assert_eq!(stored_voters(&store, "v1").as_slice(), ["u1", "u3", "u4"]);

    let doc = store.document("v1").unwrap();
    assert_eq!(doc[fields::LIKES], "3");
}

#[tokio::test]
async fn test_toggle_pair_restores_ledger() {
    let store = store_with("v1", record(&[(fields::LIKED_BY, r#"["a","b","c"]"#)]));
    let ledger = LedgerStore::new(store.clone());
    let before = stored_voters(&store, "v1");

    let first = ledger.toggle("v1", "z").await.unwrap();
    let second = ledger.toggle("v1", "z").await.unwrap();

    assert!(first.is_liked);
    assert!(!second.is_liked);
    assert_eq!(second.new_count, 3);
    assert_eq!(stored_voters(&store, "v1"), before);
}

#[tokio::test]
async fn test_first_toggle_creates_ledger() {
    let store = store_with("v1", record(&[("title", "Intro")]));
    let ledger = LedgerStore::new(store.clone());

    let result = ledger.toggle("v1", "u1").await.unwrap();
    assert_eq!(result, ToggleResult::new(1, true));

    let doc = store.document("v1").unwrap();
    assert_eq!(doc[fields::LIKED_BY], r#"["u1"]"#);
    assert_eq!(doc["title"], "Intro");
}

#[tokio::test]
async fn test_eviction_keeps_newest_thousand_and_acting_voter() {
    // 5-byte ids: 1300 of them encode to 10401 bytes, 1000 to 8001
    let ids = (0..1300).map(|i| format!("{i:05}"));
    let store = store_with("v1", record(&[(fields::LIKED_BY, &ledger_of(ids))]));
    let config = LedgerStoreConfig::with_caps(9000, 10000);
    let ledger = LedgerStore::with_config(store.clone(), config).unwrap();

    let result = ledger.toggle("v1", "newer").await.unwrap();
    assert_eq!(result, ToggleResult::new(1000, true));

    let voters = stored_voters(&store, "v1");
    assert_eq!(voters.len(), 1000);
    assert_eq!(voters.as_slice().last().map(String::as_str), Some("newer"));
    assert_eq!(voters.as_slice().first().map(String::as_str), Some("00301"));
    assert!(store.document("v1").unwrap()[fields::LIKED_BY].len() <= 9000);
}

#[tokio::test]
async fn test_eviction_with_default_cap_descends_to_five_hundred() {
    let ids = (0..1300).map(|i| format!("u{i:04}"));
    let store = store_with("v1", record(&[(fields::LIKED_BY, &ledger_of(ids))]));
    let ledger = LedgerStore::new(store.clone());

    let result = ledger.toggle("v1", "u9999").await.unwrap();
    assert_eq!(result, ToggleResult::new(500, true));

    let doc = store.document("v1").unwrap();
    assert!(doc[fields::LIKED_BY].len() <= 4500);
    assert!(stored_voters(&store, "v1").contains("u9999"));
}

#[tokio::test]
async fn test_evicted_voter_can_like_again() {
    let ids = (0..1300).map(|i| format!("u{i:04}"));
    let store = store_with("v1", record(&[(fields::LIKED_BY, &ledger_of(ids))]));
    let ledger = LedgerStore::new(store.clone());

    ledger.toggle("v1", "late").await.unwrap();
    assert!(!stored_voters(&store, "v1").contains("u0000"));

    // u0000 was forgotten, so toggling likes again instead of unliking
    let result = ledger.toggle("v1", "u0000").await.unwrap();
    assert!(result.is_liked);
}

#[tokio::test]
async fn test_ledger_never_exceeds_soft_cap() {
    let store = store_with("v1", FieldMap::new());
    let ledger = LedgerStore::new(store.clone());

    for i in 0..1200 {
        let result = ledger
            .toggle("v1", &format!("voter-{i:08}"))
            .await
            .unwrap();
        assert!(result.is_liked);

        let doc = store.document("v1").unwrap();
        let bytes = doc[fields::LIKED_BY].len();
        assert!(bytes <= 4500, "ledger grew to {} bytes", bytes);
    }
}

#[tokio::test]
async fn test_concurrent_toggles_on_same_item_are_not_lost() {
    let store = store_with("v1", FieldMap::new());
    let ledger = Arc::new(LedgerStore::new(store.clone()));

    let mut handles = Vec::new();
    for i in 0..64 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            let voter = format!("u{i}");
            ledger.toggle("v1", &voter).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(stored_voters(&store, "v1").len(), 64);
    assert_eq!(
        ledger.read_state("v1", Some("u7")).await.unwrap(),
        LikeState::new(64, true)
    );
}

#[tokio::test]
async fn test_toggle_only_touches_its_own_item() {
    let store = Arc::new(InMemoryDocumentStore::new());
    store.insert_document("v1", FieldMap::new());
    store.insert_document("v2", record(&[(fields::LIKED_BY, r#"["u1"]"#)]));
    let ledger = LedgerStore::new(store.clone());

    ledger.toggle("v1", "u1").await.unwrap();

    assert_eq!(store.document("v2").unwrap()[fields::LIKED_BY], r#"["u1"]"#);
}

#[tokio::test]
async fn test_deleted_item_is_not_found() {
    let store = store_with("v1", FieldMap::new());
    let ledger = LedgerStore::new(store.clone());
    store.delete_document("v1");

    assert!(matches!(
        ledger.toggle("v1", "u1").await,
        Err(LedgerError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_read_only_store_is_forbidden() {
    let store = store_with("v1", FieldMap::new());
    store.set_read_only(true);
    let ledger = LedgerStore::new(store.clone());

    assert!(matches!(
        ledger.toggle("v1", "u1").await,
        Err(LedgerError::Forbidden(_))
    ));
    assert_eq!(store.document("v1").unwrap().get(fields::LIKED_BY), None);
}

#[tokio::test]
async fn test_offline_store_is_network_unavailable() {
    let store = store_with("v1", FieldMap::new());
    store.set_offline(true);
    let ledger = LedgerStore::new(store);

    let err = ledger.toggle("v1", "u1").await.unwrap_err();
    assert!(matches!(err, LedgerError::NetworkUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_store_without_ledger_field_never_counts_blindly() {
    let store = Arc::new(InMemoryDocumentStore::with_schema([
        fields::LIKES,
        fields::UPDATED_AT,
    ]));
    store.insert_document("v1", record(&[(fields::LIKES, "41")]));
    let ledger = LedgerStore::new(store.clone());

    for _ in 0..4 {
        assert_eq!(
            ledger.toggle("v1", "u1").await,
            Err(LedgerError::SchemaMismatch(fields::LIKED_BY.to_string()))
        );
    }
    assert_eq!(store.document("v1").unwrap()[fields::LIKES], "41");

    assert_eq!(
        ledger.read_state("v1", Some("u1")).await.unwrap(),
        LikeState::new(41, false)
    );
}

#[tokio::test]
async fn test_store_without_mirrored_fields_still_stores_ledger() {
    let store = Arc::new(InMemoryDocumentStore::with_schema([fields::LIKED_BY]));
    store.insert_document("v1", FieldMap::new());
    let ledger = LedgerStore::new(store.clone());

    let result = ledger.toggle("v1", "u1").await.unwrap();
    assert_eq!(result, ToggleResult::new(1, true));

    let doc = store.document("v1").unwrap();
    assert_eq!(doc[fields::LIKED_BY], r#"["u1"]"#);
    assert_eq!(doc.get(fields::LIKES), None);
}

#[tokio::test]
async fn test_unknown_timestamp_field_keeps_count_mirrored() {
    let store = Arc::new(InMemoryDocumentStore::with_schema([
        fields::LIKED_BY,
        fields::LIKES,
    ]));
    store.insert_document("v1", FieldMap::new());
    let ledger = LedgerStore::new(store.clone());

    ledger.toggle("v1", "u1").await.unwrap();
    ledger.toggle("v1", "u2").await.unwrap();

    let doc = store.document("v1").unwrap();
    assert_eq!(doc[fields::LIKED_BY], r#"["u1","u2"]"#);
    assert_eq!(doc[fields::LIKES], "2");
    assert_eq!(doc.get(fields::UPDATED_AT), None);
}

#[tokio::test]
async fn test_metadata_update_preserves_ledger() {
    let store = store_with("v1", FieldMap::new());
    let ledger = LedgerStore::new(store.clone());
    ledger.toggle("v1", "u1").await.unwrap();
    ledger.toggle("v1", "u2").await.unwrap();

    let update = VideoMetadataUpdate {
        description: Some("Updated".to_string()),
        verified: Some(true),
        ..Default::default()
    };
    ledger.update_metadata("v1", &update).await.unwrap();

    let doc = store.document("v1").unwrap();
    assert_eq!(doc[fields::LIKED_BY], r#"["u1","u2"]"#);
    assert_eq!(doc[fields::LIKES], "2");
    assert_eq!(doc[fields::DESCRIPTION], "Updated");
    assert_eq!(doc[fields::VERIFIED], "true");
    assert_eq!(
        store.read_field("v1", fields::TITLE).await.unwrap(),
        None
    );
}
