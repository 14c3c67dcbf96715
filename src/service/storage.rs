//! Operator-facing storage administration.

use std::sync::Arc;

use crate::{
    data::credential::CredentialStore,
    error::AppError,
    model::{
        credential::StoreKind,
        roster,
        storage::{FanOutReport, MigrationReport, StoreHealth},
    },
    service::token_resolver::TokenResolver,
};

/// Read order shown to operators.
pub const STORAGE_HIERARCHY: &str = "Database → JSONBin.io → Local JSON";

pub struct StorageAdminService<'a> {
    resolver: &'a TokenResolver,
}

impl<'a> StorageAdminService<'a> {
    pub fn new(resolver: &'a TokenResolver) -> Self {
        Self { resolver }
    }

    /// Availability and record count of every backend.
    pub async fn health(&self) -> Vec<StoreHealth> {
        self.resolver.storage_health().await
    }

    /// Copies every record from one backend into another.
    ///
    /// Records are written one at a time; a failed write is counted and the copy
    /// continues. The source is left untouched.
    ///
    /// # Returns
    /// - `Ok(MigrationReport)` - Counts of migrated, failed and total records; a total
    ///   of zero means the source held nothing
    /// - `Err(AppError::BadRequest)` - Source equals target, or either is not configured
    pub async fn migrate(
        &self,
        source: StoreKind,
        target: StoreKind,
    ) -> Result<MigrationReport, AppError> {
        if source == target {
            return Err(AppError::BadRequest(
                "Source and target storage must differ".to_string(),
            ));
        }

        let source_store = self.configured(source)?;
        let target_store = self.configured(target)?;

        let records = source_store.read_all().await;
        let mut report = MigrationReport {
            source,
            target,
            migrated: 0,
            failed: 0,
            total: records.len(),
        };

        for record in records.values() {
            if target_store.write(&record.to_upsert_param()).await {
                report.migrated += 1;
            } else {
                report.failed += 1;
            }
        }

        tracing::info!(
            "Migrated {}/{} tokens from {} to {}",
            report.migrated,
            report.total,
            source,
            target
        );

        Ok(report)
    }

    /// Deletes a user's token from every backend.
    pub async fn purge(&self, user_id: u64) -> FanOutReport {
        let report = self.resolver.resolve_delete(&user_id.to_string()).await;
        tracing::info!("Purged user {} from storage: {:?}", user_id, report);
        report
    }

    /// Moves a user to a 1-based position in the roster and saves the new order.
    ///
    /// Without a saved order, the current roster listing is the starting point.
    ///
    /// # Returns
    /// - `Vec<StoreKind>` - Backends that saved the new order, empty if none did
    pub async fn move_in_roster(&self, user_id: u64, position: usize) -> Vec<StoreKind> {
        let mut order = match self.resolver.roster_order().await {
            Some(order) => order,
            None => self
                .resolver
                .roster()
                .await
                .into_iter()
                .map(|record| record.user_id)
                .collect(),
        };

        roster::move_to_position(&mut order, &user_id.to_string(), position);

        let saved = self.resolver.write_roster_order(&order).await;
        tracing::info!("Moved user {} to roster position {}", user_id, position);
        saved
    }

    fn configured(
        &self,
        kind: StoreKind,
    ) -> Result<&Arc<dyn CredentialStore>, AppError> {
        self.resolver
            .store(kind)
            .ok_or_else(|| AppError::BadRequest(format!("{} storage is not configured", kind)))
    }
}
