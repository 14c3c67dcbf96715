use super::*;
use serde_json::{json, Value};

/// Tests writing to a file that does not exist yet.
///
/// Expected: file is created with the credential object
#[tokio::test]
async fn creates_file_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");
    let store = LocalFileCredentialStore::new(&path);

    let param = UpsertCredentialParam::new("1", "token").with_username("alice");
    assert!(store.write(&param).await);

    let contents: Value =
        serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
    assert_eq!(contents["1"]["access_token"], "token");
    assert_eq!(contents["1"]["username"], "alice");
    assert!(contents["1"]["updated_at"].is_string());
}

/// Tests that writing twice keeps a single entry.
///
/// Expected: one record holding the latest token
#[tokio::test]
async fn write_is_an_upsert() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileCredentialStore::new(dir.path().join("tokens.json"));

    store.write(&UpsertCredentialParam::new("1", "first")).await;
    store.write(&UpsertCredentialParam::new("1", "second")).await;

    let records = store.read_all().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records["1"].access_token, "second");
}

/// Tests reading a legacy file with bare token strings.
///
/// Expected: token readable without metadata
#[tokio::test]
async fn reads_legacy_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");
    tokio::fs::write(&path, json!({ "9": "legacy-token" }).to_string())
        .await
        .unwrap();

    let store = LocalFileCredentialStore::new(&path);
    let record = store.read("9").await.unwrap();

    assert_eq!(record.access_token, "legacy-token");
    assert!(record.username.is_none());
}

/// Tests that a missing file reads as empty and deletes succeed.
///
/// Expected: absent read, empty listing, successful delete without creating the file
#[tokio::test]
async fn missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");
    let store = LocalFileCredentialStore::new(&path);

    assert!(store.read("1").await.is_none());
    assert!(store.read_all().await.is_empty());
    assert!(store.delete("1").await);
    assert!(!path.exists());
}

/// Tests deleting one user keeps the others.
///
/// Expected: only the deleted user disappears
#[tokio::test]
async fn delete_removes_only_target() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileCredentialStore::new(dir.path().join("tokens.json"));

    store.write(&UpsertCredentialParam::new("1", "a")).await;
    store.write(&UpsertCredentialParam::new("2", "b")).await;

    assert!(store.delete("1").await);
    assert!(store.read("1").await.is_none());
    assert_eq!(store.read("2").await.unwrap().access_token, "b");
}

/// Tests that a corrupted file is not overwritten by a write.
///
/// Expected: write fails and the file is unchanged
#[tokio::test]
async fn corrupted_file_blocks_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");
    tokio::fs::write(&path, "{ not json").await.unwrap();

    let store = LocalFileCredentialStore::new(&path);

    assert!(!store.write(&UpsertCredentialParam::new("1", "token")).await);
    assert!(store.read("1").await.is_none());
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "{ not json");
    assert!(matches!(
        store.health().await.status,
        HealthStatus::Unavailable { .. }
    ));
}

/// Tests that concurrent writers in one process do not lose updates.
///
/// Expected: every user is present after all writes finish
#[tokio::test]
async fn serializes_concurrent_writes() {
    let dir = tempfile::tempdir().unwrap();
    let store = std::sync::Arc::new(LocalFileCredentialStore::new(
        dir.path().join("tokens.json"),
    ));

    let mut handles = Vec::new();
    for user_id in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .write(&UpsertCredentialParam::new(user_id.to_string(), "token"))
                .await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert_eq!(store.read_all().await.len(), 10);
}

/// Tests that the roster order is stored beside credentials without disturbing them.
///
/// Expected: order readable back, tokens intact, later writes keep the order
#[tokio::test]
async fn keeps_roster_order_beside_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalFileCredentialStore::new(dir.path().join("tokens.json"));
    store.write(&UpsertCredentialParam::new("1", "a")).await;
    store.write(&UpsertCredentialParam::new("2", "b")).await;

    assert_eq!(store.roster_order().await, None);
    assert!(
        store
            .write_roster_order(&["2".to_string(), "1".to_string()])
            .await
    );
    store.write(&UpsertCredentialParam::new("3", "c")).await;

    assert_eq!(
        store.roster_order().await,
        Some(vec!["2".to_string(), "1".to_string()])
    );
    assert_eq!(store.read_all().await.len(), 3);
}
