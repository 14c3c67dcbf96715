//! Credential storage backends.
//!
//! Each backend implements [`CredentialStore`]. Failures never cross this boundary:
//! backends log the cause and degrade to an absent record, `false`, or an empty
//! mapping so the resolver can move on to the next backend.

pub mod document;
pub mod local_file;
pub mod relational;
pub mod token_document;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{
    error::store::StoreError,
    model::{
        credential::{CredentialRecord, StoreKind, UpsertCredentialParam},
        storage::StoreHealth,
    },
};

pub use document::DocumentCredentialStore;
pub use local_file::LocalFileCredentialStore;
pub use relational::RelationalCredentialStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    fn kind(&self) -> StoreKind;

    /// Reads one user's credential, `None` if absent or the backend failed.
    async fn read(&self, user_id: &str) -> Option<CredentialRecord>;

    /// Inserts or replaces one user's credential, `false` on any failure.
    async fn write(&self, param: &UpsertCredentialParam) -> bool;

    /// Removes one user's credential. Removing an absent user succeeds.
    async fn delete(&self, user_id: &str) -> bool;

    /// Every stored credential keyed by user id, empty on failure.
    async fn read_all(&self) -> BTreeMap<String, CredentialRecord>;

    async fn health(&self) -> StoreHealth;

    /// Stored roster order. Only whole-document backends keep one.
    async fn roster_order(&self) -> Option<Vec<String>> {
        None
    }

    /// Replaces the stored roster order, `false` if unsupported or on failure.
    async fn write_roster_order(&self, _order: &[String]) -> bool {
        false
    }
}

/// Logs a backend failure and substitutes the soft-failure value.
pub(crate) fn soft<T>(kind: StoreKind, operation: &str, result: Result<T, StoreError>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{} backend failed to {}: {}", kind, operation, e);
            fallback
        }
    }
}
