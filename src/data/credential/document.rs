use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::{
    data::credential::{soft, token_document::TokenDocument, CredentialStore},
    error::store::StoreError,
    model::{
        credential::{CredentialRecord, StoreKind, UpsertCredentialParam},
        storage::{HealthStatus, StoreHealth},
    },
};

/// Credential backend over a single JSONBin document.
///
/// The whole credential mapping lives in one remote document, so every write fetches
/// the document, mutates it and replaces it. Writers within this process are
/// serialized; concurrent writers elsewhere race and the last replace wins.
///
/// Without a configured document id, one is created on first use and logged so the
/// operator can pin it with `JSONBIN_BIN_ID`. A document that has disappeared (404)
/// is replaced the same way.
pub struct DocumentCredentialStore {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    document_id: RwLock<Option<String>>,
    write_lock: Mutex<()>,
    provision_lock: Mutex<()>,
}

impl DocumentCredentialStore {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        document_id: Option<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            document_id: RwLock::new(document_id),
            write_lock: Mutex::new(()),
            provision_lock: Mutex::new(()),
        }
    }

    /// The document currently in use, if one has been configured or provisioned.
    pub async fn document_id(&self) -> Option<String> {
        self.document_id.read().await.clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Master-Key", &self.api_key)
            .header("X-Access-Key", &self.api_key)
    }

    /// Creates a new document holding `document` and switches to it, unless the
    /// document in use has already moved on from `stale`.
    ///
    /// Provisioning is serialized and the current id is checked again under the lock,
    /// so concurrent first uses create one document between them.
    ///
    /// # Returns
    /// - `Ok(Some(id))` - A new document was created
    /// - `Ok(None)` - Another task already replaced `stale`
    async fn provision_replacing(
        &self,
        stale: Option<&str>,
        document: &TokenDocument,
    ) -> Result<Option<String>, StoreError> {
        let _guard = self.provision_lock.lock().await;

        if self.document_id().await.as_deref() != stale {
            return Ok(None);
        }

        let response = self
            .request(Method::POST, "/b")
            .json(&document.clone().into_value())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body: Value = response.json().await?;
        let id = body["metadata"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or(StoreError::MissingDocumentId)?;

        *self.document_id.write().await = Some(id.clone());
        tracing::warn!(
            "Created new JSONBin document {}; set JSONBIN_BIN_ID={} to keep using it across restarts",
            id,
            id
        );

        Ok(Some(id))
    }

    /// The document id to use, provisioning a document holding `initial` if there is none.
    ///
    /// # Returns
    /// - `Ok((id, true))` - A document holding `initial` was just created
    /// - `Ok((id, false))` - An existing document
    async fn current_or_provision(
        &self,
        initial: &TokenDocument,
    ) -> Result<(String, bool), StoreError> {
        if let Some(id) = self.document_id().await {
            return Ok((id, false));
        }

        match self.provision_replacing(None, initial).await? {
            Some(id) => Ok((id, true)),
            None => self
                .document_id()
                .await
                .map(|id| (id, false))
                .ok_or(StoreError::MissingDocumentId),
        }
    }

    /// Fetches the current document, provisioning an empty one if none exists.
    async fn load(&self) -> Result<TokenDocument, StoreError> {
        let (id, created) = self.current_or_provision(&TokenDocument::default()).await?;
        if created {
            return Ok(TokenDocument::default());
        }

        let response = self
            .request(Method::GET, &format!("/b/{}/latest", id))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::warn!("JSONBin document {} not found, creating a new one", id);
                self.provision_replacing(Some(&id), &TokenDocument::default())
                    .await?;
                Ok(TokenDocument::default())
            }
            status if status.is_success() => {
                let mut body: Value = response.json().await?;
                let record = body
                    .get_mut("record")
                    .map(Value::take)
                    .unwrap_or(Value::Null);
                TokenDocument::from_value(record)
            }
            status => Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Replaces the whole remote document.
    async fn save(&self, document: TokenDocument) -> Result<(), StoreError> {
        let (id, created) = self.current_or_provision(&document).await?;
        if created {
            return Ok(());
        }

        let response = self
            .request(Method::PUT, &format!("/b/{}", id))
            .json(&document.into_value())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn upsert(&self, param: &UpsertCredentialParam) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        document.upsert(param, Utc::now())?;
        self.save(document).await?;

        tracing::debug!("Saved token for user {} to JSONBin", param.user_id);
        Ok(())
    }

    async fn replace_roster_order(&self, order: &[String]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        document.set_roster_order(order);
        self.save(document).await
    }

    async fn remove(&self, user_id: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        if document.remove(user_id) {
            self.save(document).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for DocumentCredentialStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Document
    }

    async fn read(&self, user_id: &str) -> Option<CredentialRecord> {
        let result = self.load().await.map(|document| document.get(user_id));
        soft(self.kind(), "read", result, None)
    }

    async fn write(&self, param: &UpsertCredentialParam) -> bool {
        if !param.is_valid() {
            return false;
        }

        let result = self.upsert(param).await.map(|_| true);
        soft(self.kind(), "write", result, false)
    }

    async fn delete(&self, user_id: &str) -> bool {
        let result = self.remove(user_id).await.map(|_| true);
        soft(self.kind(), "delete", result, false)
    }

    async fn read_all(&self) -> BTreeMap<String, CredentialRecord> {
        let result = self.load().await.map(|document| document.records());
        soft(self.kind(), "read all", result, BTreeMap::new())
    }

    async fn health(&self) -> StoreHealth {
        let status = match self.load().await {
            Ok(document) => HealthStatus::Available {
                records: document.records().len(),
            },
            Err(e) => HealthStatus::Unavailable {
                reason: e.to_string(),
            },
        };

        StoreHealth {
            kind: self.kind(),
            status,
            location: self.document_id().await,
        }
    }

    async fn roster_order(&self) -> Option<Vec<String>> {
        let result = self.load().await.map(|document| document.roster_order());
        soft(self.kind(), "read roster order", result, None)
    }

    async fn write_roster_order(&self, order: &[String]) -> bool {
        let result = self.replace_roster_order(order).await.map(|_| true);
        soft(self.kind(), "write roster order", result, false)
    }
}
