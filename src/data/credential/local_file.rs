use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    data::credential::{soft, token_document::TokenDocument, CredentialStore},
    error::store::StoreError,
    model::{
        credential::{CredentialRecord, StoreKind, UpsertCredentialParam},
        storage::{HealthStatus, StoreHealth},
    },
};

/// Credential backend over a pretty-printed JSON file.
///
/// Every write reads the whole file, mutates it and rewrites it. Writers within this
/// process are serialized; another process writing the same file can still lose an
/// update.
pub struct LocalFileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or blank file is an empty document.
    async fn load(&self) -> Result<TokenDocument, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TokenDocument::default()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(TokenDocument::default());
        }

        let value: Value = serde_json::from_str(&contents)?;
        TokenDocument::from_value(value)
    }

    async fn save(&self, document: TokenDocument) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(&document.into_value())?;
        tokio::fs::write(&self.path, contents).await?;
        Ok(())
    }

    async fn upsert(&self, param: &UpsertCredentialParam) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut document = self.load().await?;
        document.upsert(param, Utc::now())?;
        self.save(document).await?;

        tracing::debug!("Saved token for user {} to {}", param.user_id, self.path.display());
        Ok(())
    }

    async fn replace_roster_order(&self, order: &[String]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut document = self.load().await?;
        document.set_roster_order(order);
        self.save(document).await
    }

    async fn remove(&self, user_id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let mut document = self.load().await?;
        if document.remove(user_id) {
            self.save(document).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for LocalFileCredentialStore {
    fn kind(&self) -> StoreKind {
        StoreKind::LocalFile
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
            location: Some(self.path.display().to_string()),
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
