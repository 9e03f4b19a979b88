//! RecordStore interface tests.
//!
//! These tests verify the contract of the RecordStore trait.
//! Each storage implementation should run these tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use rolodex::record::{Record, RecordPatch};
use rolodex::storage::{RecordStore, StoreError};

static SEQ: AtomicUsize = AtomicUsize::new(0);

/// Build an id unique to this process run so shared tables stay isolated.
pub fn unique_id(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!(
        "test_{}_{}_{}",
        prefix,
        nanos,
        SEQ.fetch_add(1, Ordering::SeqCst)
    )
}

pub fn make_record(id: &str) -> Record {
    Record::new(id, format!("Name {}", id), format!("{}@example.com", id))
}

// =============================================================================
// RecordStore::get tests
// =============================================================================

pub async fn test_get_nonexistent<S: RecordStore>(store: &S) {
    let id = unique_id("get_missing");

    let record = store.get(&id).await.expect("get should succeed");
    assert!(record.is_none(), "nonexistent record should be None");
}

pub async fn test_get_existing<S: RecordStore>(store: &S) {
    let id = unique_id("get_exist");
    let record = make_record(&id);

    store.put(record.clone()).await.expect("put should succeed");

    let fetched = store
        .get(&id)
        .await
        .expect("get should succeed")
        .expect("record should exist");
    assert_eq!(fetched, record);
}

// =============================================================================
// RecordStore::put tests
// =============================================================================

pub async fn test_put_overwrites<S: RecordStore>(store: &S) {
    let id = unique_id("put_over");

    store.put(make_record(&id)).await.unwrap();
    store
        .put(Record::new(&id, "Replaced", "replaced@example.com"))
        .await
        .expect("second put should succeed");

    let fetched = store.get(&id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Replaced");
    assert_eq!(fetched.email, "replaced@example.com");
}

// =============================================================================
// RecordStore::update tests
// =============================================================================

pub async fn test_update_partial<S: RecordStore>(store: &S) {
    let id = unique_id("update_partial");
    let original = make_record(&id);
    store.put(original.clone()).await.unwrap();

    store
        .update(
            &id,
            RecordPatch {
                name: None,
                email: Some("new@example.com".to_string()),
            },
        )
        .await
        .expect("update should succeed");

    let fetched = store.get(&id).await.unwrap().unwrap();
    assert_eq!(fetched.name, original.name, "omitted field must be kept");
    assert_eq!(fetched.email, "new@example.com");
}

pub async fn test_update_both_fields<S: RecordStore>(store: &S) {
    let id = unique_id("update_both");
    store.put(make_record(&id)).await.unwrap();

    store
        .update(
            &id,
            RecordPatch {
                name: Some("Both".to_string()),
                email: Some("both@example.com".to_string()),
            },
        )
        .await
        .unwrap();

    let fetched = store.get(&id).await.unwrap().unwrap();
    assert_eq!(fetched, Record::new(&id, "Both", "both@example.com"));
}

pub async fn test_update_nonexistent<S: RecordStore>(store: &S) {
    let id = unique_id("update_missing");

    let err = store
        .update(
            &id,
            RecordPatch {
                name: Some("Ghost".to_string()),
                email: None,
            },
        )
        .await
        .expect_err("update of a missing id should fail");
    assert!(matches!(err, StoreError::NotFound { .. }));
    assert!(
        store.get(&id).await.unwrap().is_none(),
        "failed update must not create the record"
    );
}

pub async fn test_update_empty_patch<S: RecordStore>(store: &S) {
    let present = unique_id("update_empty");
    store.put(make_record(&present)).await.unwrap();
    store
        .update(&present, RecordPatch::default())
        .await
        .expect("empty patch on a present id should succeed");
    assert_eq!(store.get(&present).await.unwrap(), Some(make_record(&present)));

    let missing = unique_id("update_empty_missing");
    let err = store
        .update(&missing, RecordPatch::default())
        .await
        .expect_err("empty patch on a missing id should fail");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

// =============================================================================
// RecordStore::delete tests
// =============================================================================

pub async fn test_delete_existing<S: RecordStore>(store: &S) {
    let id = unique_id("delete_exist");
    store.put(make_record(&id)).await.unwrap();

    store.delete(&id).await.expect("delete should succeed");

    assert!(store.get(&id).await.unwrap().is_none());
}

pub async fn test_delete_nonexistent<S: RecordStore>(store: &S) {
    let id = unique_id("delete_missing");
    store
        .delete(&id)
        .await
        .expect("delete of a missing id should not fail");
}

pub async fn test_delete_then_recreate<S: RecordStore>(store: &S) {
    let id = unique_id("delete_recreate");
    store.put(make_record(&id)).await.unwrap();
    store.delete(&id).await.unwrap();

    let recreated = Record::new(&id, "Again", "again@example.com");
    store.put(recreated.clone()).await.unwrap();

    assert_eq!(store.get(&id).await.unwrap(), Some(recreated));
}

// =============================================================================
// RecordStore::scan tests
// =============================================================================

pub async fn test_scan_all_contains_every_record<S: RecordStore>(store: &S) {
    let ids: Vec<String> = (0..3).map(|_| unique_id("scan_all")).collect();
    for id in &ids {
        store.put(make_record(id)).await.unwrap();
    }

    let scanned = store.scan(None).await.expect("scan should succeed");
    for id in &ids {
        assert!(
            scanned.iter().any(|r| &r.id == id),
            "scan should include {}",
            id
        );
    }
}

pub async fn test_scan_by_id<S: RecordStore>(store: &S) {
    let target = unique_id("scan_target");
    let other = unique_id("scan_other");
    store.put(make_record(&target)).await.unwrap();
    store.put(make_record(&other)).await.unwrap();

    let scanned = store.scan(Some(&target)).await.unwrap();
    assert_eq!(scanned, vec![make_record(&target)]);
}

pub async fn test_scan_unknown_id_is_empty<S: RecordStore>(store: &S) {
    let id = unique_id("scan_missing");
    let scanned = store.scan(Some(&id)).await.unwrap();
    assert!(scanned.is_empty());
}

pub async fn test_scan_is_restartable<S: RecordStore>(store: &S) {
    let id = unique_id("scan_restart");
    store.put(make_record(&id)).await.unwrap();

    let first = store.scan(Some(&id)).await.unwrap();
    let second = store.scan(Some(&id)).await.unwrap();
    assert_eq!(first, second);
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all RecordStore interface tests against a store implementation.
#[macro_export]
macro_rules! run_record_store_tests {
    ($store:expr) => {
        use $crate::storage::record_store_tests::*;

        // get tests
        test_get_nonexistent($store).await;
        println!("  test_get_nonexistent: PASSED");

        test_get_existing($store).await;
        println!("  test_get_existing: PASSED");

        // put tests
        test_put_overwrites($store).await;
        println!("  test_put_overwrites: PASSED");

        // update tests
        test_update_partial($store).await;
        println!("  test_update_partial: PASSED");

        test_update_both_fields($store).await;
        println!("  test_update_both_fields: PASSED");

        test_update_nonexistent($store).await;
        println!("  test_update_nonexistent: PASSED");

        test_update_empty_patch($store).await;
        println!("  test_update_empty_patch: PASSED");

        // delete tests
        test_delete_existing($store).await;
        println!("  test_delete_existing: PASSED");

        test_delete_nonexistent($store).await;
        println!("  test_delete_nonexistent: PASSED");

        test_delete_then_recreate($store).await;
        println!("  test_delete_then_recreate: PASSED");

        // scan tests
        test_scan_all_contains_every_record($store).await;
        println!("  test_scan_all_contains_every_record: PASSED");

        test_scan_by_id($store).await;
        println!("  test_scan_by_id: PASSED");

        test_scan_unknown_id_is_empty($store).await;
        println!("  test_scan_unknown_id_is_empty: PASSED");

        test_scan_is_restartable($store).await;
        println!("  test_scan_is_restartable: PASSED");
    };
}
