use std::collections::BTreeMap;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;

use crate::{
    model::storage::{HealthStatus, StoreHealth},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub bot_connected: bool,
    /// Keyed by backend name (`db`, `jsonbin`, `json`).
    pub storage: BTreeMap<&'static str, StorageHealthDto>,
    pub servers: usize,
}

#[derive(Debug, Serialize)]
pub struct StorageHealthDto {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<StoreHealth> for StorageHealthDto {
    fn from(health: StoreHealth) -> Self {
        let (status, records, detail) = match health.status {
            HealthStatus::Available { records } => ("available", Some(records), None),
            HealthStatus::Unavailable { reason } => ("unavailable", None, Some(reason)),
            HealthStatus::NotConfigured => ("not_configured", None, None),
        };

        Self {
            status,
            records,
            detail,
            location: health.location,
        }
    }
}

impl HealthDto {
    pub fn new(storage: Vec<StoreHealth>, bot_connected: bool, servers: usize) -> Self {
        Self {
            status: "ok",
            bot_connected,
            storage: storage
                .into_iter()
                .map(|health| (health.kind.name(), health.into()))
                .collect(),
            servers,
        }
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let storage = state.resolver.storage_health().await;

    Json(HealthDto::new(
        storage,
        state.is_bot_ready(),
        state.guild_count(),
    ))
}
