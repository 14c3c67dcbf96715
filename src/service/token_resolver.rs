//! Unified access to the credential backends.
//!
//! Reads fall back through the backends in priority order (database, remote
//! document, local file). Writes and deletes fan out to every configured backend
//! independently; nothing keeps the backends consistent with each other.

use std::{collections::BTreeMap, sync::Arc};

use crate::{
    data::credential::CredentialStore,
    model::{
        credential::{CredentialRecord, StoreKind, UpsertCredentialParam},
        roster,
        storage::{FanOutReport, StoreHealth, StoreOutcome},
    },
};

pub struct TokenResolver {
    stores: Vec<Arc<dyn CredentialStore>>,
}

impl TokenResolver {
    /// Creates a resolver over the configured backends.
    ///
    /// Backends are ordered by priority regardless of the order given. Unconfigured
    /// backends are simply left out of the list.
    pub fn new(mut stores: Vec<Arc<dyn CredentialStore>>) -> Self {
        stores.sort_by_key(|store| store.kind().priority());
        Self { stores }
    }

    pub fn stores(&self) -> &[Arc<dyn CredentialStore>] {
        &self.stores
    }

    pub fn store(&self, kind: StoreKind) -> Option<&Arc<dyn CredentialStore>> {
        self.stores.iter().find(|store| store.kind() == kind)
    }

    pub fn is_configured(&self, kind: StoreKind) -> bool {
        self.store(kind).is_some()
    }

    /// First record found, trying backends in priority order.
    ///
    /// Values are never merged; a stale token in a higher-priority backend shadows a
    /// fresher one further down.
    pub async fn resolve_record(&self, user_id: &str) -> Option<CredentialRecord> {
        for store in &self.stores {
            if let Some(record) = store.read(user_id).await {
                tracing::debug!("Resolved token for user {} from {}", user_id, store.kind());
                return Some(record);
            }
        }

        None
    }

    /// The user's access token, if any backend has one.
    pub async fn resolve_read(&self, user_id: &str) -> Option<String> {
        self.resolve_record(user_id)
            .await
            .map(|record| record.access_token)
    }

    /// Writes to every configured backend and reports each outcome.
    ///
    /// A failing backend never stops the others from being written.
    pub async fn write_all(&self, param: &UpsertCredentialParam) -> FanOutReport {
        let mut report = FanOutReport::default();

        for store in &self.stores {
            let success = store.write(param).await;
            report.set(store.kind(), StoreOutcome::from_success(success));
        }

        if !report.any_succeeded() {
            tracing::error!("Failed to persist token for user {} to any backend", param.user_id);
        }

        report
    }

    /// Writes to every configured backend; `true` if at least one succeeded.
    pub async fn resolve_write(&self, param: &UpsertCredentialParam) -> bool {
        self.write_all(param).await.any_succeeded()
    }

    /// Deletes from every configured backend and reports each outcome.
    ///
    /// Unconfigured backends are reported as such rather than as failures.
    pub async fn resolve_delete(&self, user_id: &str) -> FanOutReport {
        let mut report = FanOutReport::default();

        for store in &self.stores {
            let success = store.delete(user_id).await;
            report.set(store.kind(), StoreOutcome::from_success(success));
        }

        report
    }

    /// Health of all three backend kinds, in priority order.
    pub async fn storage_health(&self) -> Vec<StoreHealth> {
        let mut health = Vec::with_capacity(StoreKind::ALL.len());

        for kind in StoreKind::ALL {
            match self.store(kind) {
                Some(store) => health.push(store.health().await),
                None => health.push(StoreHealth::not_configured(kind)),
            }
        }

        health
    }

    /// Union of every backend's records; on conflicting ids the higher-priority
    /// backend's record wins.
    pub async fn known_records(&self) -> BTreeMap<String, CredentialRecord> {
        let mut known = BTreeMap::new();

        for store in &self.stores {
            for (user_id, record) in store.read_all().await {
                known.entry(user_id).or_insert(record);
            }
        }

        known
    }

    /// Ids of every user with a stored token in any backend.
    pub async fn known_user_ids(&self) -> Vec<String> {
        self.known_records().await.into_keys().collect()
    }

    /// Roster order from the highest-priority backend that keeps one.
    pub async fn roster_order(&self) -> Option<Vec<String>> {
        for store in &self.stores {
            if let Some(order) = store.roster_order().await {
                return Some(order);
            }
        }

        None
    }

    /// Saves the roster order to every backend that keeps one.
    ///
    /// # Returns
    /// - `Vec<StoreKind>` - Backends that saved the order, empty if none did
    pub async fn write_roster_order(&self, order: &[String]) -> Vec<StoreKind> {
        let mut saved = Vec::new();

        for store in &self.stores {
            if store.write_roster_order(order).await {
                saved.push(store.kind());
            }
        }

        saved
    }

    /// Every known record, in roster order.
    pub async fn roster(&self) -> Vec<CredentialRecord> {
        let records = self.known_records().await;
        let order = self.roster_order().await.unwrap_or_default();

        roster::arrange(&order, records)
    }
}
