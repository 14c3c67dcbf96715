//! Per-backend reporting models for the credential storage layer.

use std::fmt;

use crate::model::credential::StoreKind;

/// Result of one backend's part in a fan-out write or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Succeeded,
    Failed,
    /// The backend is not configured and was skipped.
    NotConfigured,
}

impl StoreOutcome {
    pub fn from_success(success: bool) -> Self {
        if success {
            StoreOutcome::Succeeded
        } else {
            StoreOutcome::Failed
        }
    }

    pub fn is_success(self) -> bool {
        self == StoreOutcome::Succeeded
    }
}

impl fmt::Display for StoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOutcome::Succeeded => f.write_str("✅ Success"),
            StoreOutcome::Failed => f.write_str("❌ Failed"),
            StoreOutcome::NotConfigured => f.write_str("➖ Not configured"),
        }
    }
}

/// Outcome of a fan-out operation, one entry per backend kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutReport {
    pub relational: StoreOutcome,
    pub document: StoreOutcome,
    pub local_file: StoreOutcome,
}

impl Default for FanOutReport {
    fn default() -> Self {
        Self {
            relational: StoreOutcome::NotConfigured,
            document: StoreOutcome::NotConfigured,
            local_file: StoreOutcome::NotConfigured,
        }
    }
}

impl FanOutReport {
    pub fn get(&self, kind: StoreKind) -> StoreOutcome {
        match kind {
            StoreKind::Relational => self.relational,
            StoreKind::Document => self.document,
            StoreKind::LocalFile => self.local_file,
        }
    }

    pub fn set(&mut self, kind: StoreKind, outcome: StoreOutcome) {
        match kind {
            StoreKind::Relational => self.relational = outcome,
            StoreKind::Document => self.document = outcome,
            StoreKind::LocalFile => self.local_file = outcome,
        }
    }

    pub fn any_succeeded(&self) -> bool {
        StoreKind::ALL
            .iter()
            .any(|kind| self.get(*kind).is_success())
    }

    /// Backends in priority order paired with their outcome.
    pub fn entries(&self) -> impl Iterator<Item = (StoreKind, StoreOutcome)> + '_ {
        StoreKind::ALL.iter().map(move |kind| (*kind, self.get(*kind)))
    }
}

/// Availability of a single backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Available { records: usize },
    Unavailable { reason: String },
    NotConfigured,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Available { records } => {
                write!(f, "✅ Available ({} records)", records)
            }
            HealthStatus::Unavailable { reason } => write!(f, "❌ Unavailable ({})", reason),
            HealthStatus::NotConfigured => f.write_str("➖ Not configured"),
        }
    }
}

/// Health report for one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHealth {
    pub kind: StoreKind,
    pub status: HealthStatus,
    /// Document id or file path, where the backend has one.
    pub location: Option<String>,
}

impl StoreHealth {
    pub fn not_configured(kind: StoreKind) -> Self {
        Self {
            kind,
            status: HealthStatus::NotConfigured,
            location: None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, HealthStatus::Available { .. })
    }
}

/// Result of copying every record from one backend to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub source: StoreKind,
    pub target: StoreKind,
    pub migrated: usize,
    pub failed: usize,
    pub total: usize,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
