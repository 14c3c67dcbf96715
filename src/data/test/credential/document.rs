use std::sync::Arc;

use super::*;
use mockito::Matcher;
use serde_json::json;

const API_KEY: &str = "master-key";

fn store(server: &mockito::Server, document_id: Option<&str>) -> DocumentCredentialStore {
    DocumentCredentialStore::new(
        reqwest::Client::new(),
        server.url(),
        API_KEY,
        document_id.map(str::to_string),
    )
}

/// Tests reading a user's token from the latest document version.
///
/// Expected: record built from the `record` field, authenticated with the API key
#[tokio::test]
async fn reads_token_from_document() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/b/bin-1/latest")
        .match_header("X-Master-Key", API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "record": { "42": { "access_token": "tok-42", "username": "alice" } },
                "metadata": { "id": "bin-1" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let record = store(&server, Some("bin-1")).read("42").await.unwrap();

    assert_eq!(record.access_token, "tok-42");
    assert_eq!(record.username.as_deref(), Some("alice"));
    mock.assert_async().await;
}

/// Tests that a write replaces the whole document with the new entry merged in.
///
/// Expected: PUT carries both the existing and the new user
#[tokio::test]
async fn write_merges_into_document() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/b/bin-1/latest")
        .with_status(200)
        .with_body(json!({ "record": { "1": "tok-1" } }).to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/b/bin-1")
        .match_header("X-Master-Key", API_KEY)
        .match_body(Matcher::PartialJson(json!({
            "1": "tok-1",
            "2": { "access_token": "tok-2", "username": "bob" }
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let param = UpsertCredentialParam::new("2", "tok-2").with_username("bob");
    assert!(store(&server, Some("bin-1")).write(&param).await);

    put.assert_async().await;
}

/// Tests that a failed read aborts the write instead of overwriting the document.
///
/// Expected: write returns false and no PUT is issued
#[tokio::test]
async fn failed_read_aborts_write() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/b/bin-1/latest")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/b/bin-1")
        .expect(0)
        .create_async()
        .await;

    let written = store(&server, Some("bin-1"))
        .write(&UpsertCredentialParam::new("1", "tok"))
        .await;

    assert!(!written);
    put.assert_async().await;
}

/// Tests that a missing document id is provisioned on first use.
///
/// Expected: POST creates a document and its id is kept
#[tokio::test]
async fn provisions_document_without_id() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/b")
        .match_header("X-Master-Key", API_KEY)
        .with_status(200)
        .with_body(json!({ "record": {}, "metadata": { "id": "fresh-bin" } }).to_string())
        .create_async()
        .await;

    let store = store(&server, None);

    assert!(store.read("1").await.is_none());
    assert_eq!(store.document_id().await.as_deref(), Some("fresh-bin"));
    create.assert_async().await;
}

/// Tests that concurrent first reads share one provisioned document.
///
/// Expected: exactly one POST; every task ends up on the same document id
#[tokio::test]
async fn concurrent_first_reads_provision_once() {
    let mut server = mockito::Server::new_async().await;
    let create = server
        .mock("POST", "/b")
        .with_status(200)
        .with_body(json!({ "record": {}, "metadata": { "id": "shared-bin" } }).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/b/shared-bin/latest")
        .with_status(200)
        .with_body(json!({ "record": {} }).to_string())
        .create_async()
        .await;

    let store = Arc::new(store(&server, None));
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.read("1").await })
        })
        .collect();

    for task in tasks {
        assert!(task.await.unwrap().is_none());
    }

    assert_eq!(store.document_id().await.as_deref(), Some("shared-bin"));
    create.assert_async().await;
}

/// Tests that a vanished document (404) is replaced by a new one.
///
/// Expected: read is absent and the store switches to the new id
#[tokio::test]
async fn replaces_missing_document() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/b/gone/latest")
        .with_status(404)
        .with_body(json!({ "message": "Bin not found" }).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/b")
        .with_status(200)
        .with_body(json!({ "metadata": { "id": "replacement" } }).to_string())
        .create_async()
        .await;

    let store = store(&server, Some("gone"));

    assert!(store.read("1").await.is_none());
    assert_eq!(store.document_id().await.as_deref(), Some("replacement"));
}

/// Tests that deleting an absent user does not rewrite the document.
///
/// Expected: true with no PUT
#[tokio::test]
async fn delete_of_absent_user_skips_write() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/b/bin-1/latest")
        .with_status(200)
        .with_body(json!({ "record": { "1": "tok-1" } }).to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/b/bin-1")
        .expect(0)
        .create_async()
        .await;

    assert!(store(&server, Some("bin-1")).delete("2").await);
    put.assert_async().await;
}

/// Tests health against an unreachable service.
///
/// Expected: unavailable with the document id as location
#[tokio::test]
async fn health_reports_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/b/bin-1/latest")
        .with_status(401)
        .with_body("unauthorized")
        .create_async()
        .await;

    let health = store(&server, Some("bin-1")).health().await;

    assert!(matches!(health.status, HealthStatus::Unavailable { .. }));
    assert_eq!(health.location.as_deref(), Some("bin-1"));
}

/// Tests that saving the roster order rewrites the document with the order merged in.
///
/// Expected: PUT keeps existing tokens and carries `_roster_order`
#[tokio::test]
async fn writes_roster_order_into_document() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/b/bin-1/latest")
        .with_status(200)
        .with_body(json!({ "record": { "1": "tok-1", "2": "tok-2" } }).to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/b/bin-1")
        .match_body(Matcher::Json(json!({
            "1": "tok-1",
            "2": "tok-2",
            "_roster_order": ["2", "1"]
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let saved = store(&server, Some("bin-1"))
        .write_roster_order(&["2".to_string(), "1".to_string()])
        .await;

    assert!(saved);
    put.assert_async().await;
}
