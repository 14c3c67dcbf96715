use super::*;
use test_utils::builder::TestBuilder;

async fn store_with_table() -> RelationalCredentialStore {
    let test = TestBuilder::new()
        .with_table(entity::prelude::UserToken)
        .build()
        .await
        .unwrap();

    RelationalCredentialStore::new(test.db.unwrap())
}

/// A connection without the `user_token` table behaves like an unreachable database.
async fn broken_store() -> RelationalCredentialStore {
    let test = TestBuilder::new().build().await.unwrap();

    RelationalCredentialStore::new(test.db.unwrap())
}

/// Tests that a write can be read back and re-writing overwrites.
///
/// Expected: one record holding the latest token
#[tokio::test]
async fn write_is_an_upsert() {
    let store = store_with_table().await;

    assert!(store.write(&UpsertCredentialParam::new("1", "first")).await);
    assert!(store.write(&UpsertCredentialParam::new("1", "second")).await);

    assert_eq!(store.read("1").await.unwrap().access_token, "second");
    assert_eq!(store.read_all().await.len(), 1);
}

/// Tests that an empty token is refused.
///
/// Expected: write returns false and nothing is stored
#[tokio::test]
async fn refuses_empty_token() {
    let store = store_with_table().await;

    assert!(!store.write(&UpsertCredentialParam::new("1", "")).await);
    assert!(store.read("1").await.is_none());
}

/// Tests that deleting an absent user succeeds.
///
/// Expected: true
#[tokio::test]
async fn delete_is_idempotent() {
    let store = store_with_table().await;

    assert!(store.delete("missing").await);

    store.write(&UpsertCredentialParam::new("1", "token")).await;
    assert!(store.delete("1").await);
    assert!(store.delete("1").await);
    assert!(store.read("1").await.is_none());
}

/// Tests the soft-failure contract against a broken database.
///
/// Expected: absent read, failed write and delete, empty listing, unavailable health
#[tokio::test]
async fn fails_soft_when_unavailable() {
    let store = broken_store().await;

    assert!(store.read("1").await.is_none());
    assert!(!store.write(&UpsertCredentialParam::new("1", "token")).await);
    assert!(!store.delete("1").await);
    assert!(store.read_all().await.is_empty());
    assert!(matches!(
        store.health().await.status,
        HealthStatus::Unavailable { .. }
    ));
}

/// Tests that health reports the record count.
///
/// Expected: available with 2 records
#[tokio::test]
async fn health_counts_records() {
    let store = store_with_table().await;
    store.write(&UpsertCredentialParam::new("1", "a")).await;
    store.write(&UpsertCredentialParam::new("2", "b")).await;

    assert_eq!(
        store.health().await.status,
        HealthStatus::Available { records: 2 }
    );
}
