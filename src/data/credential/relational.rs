use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::{
    data::{
        credential::{soft, CredentialStore},
        user_token::UserTokenRepository,
    },
    error::store::StoreError,
    model::{
        credential::{CredentialRecord, StoreKind, UpsertCredentialParam},
        storage::{HealthStatus, StoreHealth},
    },
};

/// Credential backend over the `user_token` table.
pub struct RelationalCredentialStore {
    db: DatabaseConnection,
}

impl RelationalCredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn repository(&self) -> UserTokenRepository<'_> {
        UserTokenRepository::new(&self.db)
    }
}

#[async_trait]
impl CredentialStore for RelationalCredentialStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Relational
    }

    async fn read(&self, user_id: &str) -> Option<CredentialRecord> {
        let result = self
            .repository()
            .find_by_user_id(user_id)
            .await
            .map_err(StoreError::from);

        soft(self.kind(), "read", result, None)
            .filter(|record| !record.access_token.trim().is_empty())
    }

    async fn write(&self, param: &UpsertCredentialParam) -> bool {
        if !param.is_valid() {
            return false;
        }

        let result = self
            .repository()
            .upsert(param.clone())
            .await
            .map(|_| true)
            .map_err(StoreError::from);

        soft(self.kind(), "write", result, false)
    }

    async fn delete(&self, user_id: &str) -> bool {
        let result = self
            .repository()
            .delete(user_id)
            .await
            .map(|_| true)
            .map_err(StoreError::from);

        soft(self.kind(), "delete", result, false)
    }

    async fn read_all(&self) -> BTreeMap<String, CredentialRecord> {
        let result = self
            .repository()
            .get_all()
            .await
            .map(|records| {
                records
                    .into_iter()
                    .filter(|record| !record.access_token.trim().is_empty())
                    .map(|record| (record.user_id.clone(), record))
                    .collect()
            })
            .map_err(StoreError::from);

        soft(self.kind(), "read all", result, BTreeMap::new())
    }

    async fn health(&self) -> StoreHealth {
        let status = match self.repository().count().await {
            Ok(count) => HealthStatus::Available {
                records: count as usize,
            },
            Err(e) => HealthStatus::Unavailable {
                reason: e.to_string(),
            },
        };

        StoreHealth {
            kind: self.kind(),
            status,
            location: None,
        }
    }
}
