//! Credential domain models.
//!
//! A credential record is one user's OAuth access token plus best-effort display
//! metadata. The same record shape is produced by every storage backend.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// A user's stored OAuth credential.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    /// Discord user ID, kept opaque as a string.
    pub user_id: String,
    /// OAuth bearer token with the `guilds.join` scope. Never empty.
    pub access_token: String,
    pub username: Option<String>,
    pub avatar_hash: Option<String>,
    /// Time of the last write, advisory only.
    pub updated_at: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    /// Converts an entity model to a credential domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `CredentialRecord` - The converted credential domain model
    pub fn from_entity(entity: entity::user_token::Model) -> Self {
        Self {
            user_id: entity.user_id,
            access_token: entity.access_token,
            username: entity.username,
            avatar_hash: entity.avatar_hash,
            updated_at: Some(entity.updated_at),
        }
    }

    /// Builds the parameters that would write this record to another backend.
    pub fn to_upsert_param(&self) -> UpsertCredentialParam {
        UpsertCredentialParam {
            user_id: self.user_id.clone(),
            access_token: self.access_token.clone(),
            username: self.username.clone(),
            avatar_hash: self.avatar_hash.clone(),
        }
    }
}

/// Parameters for upserting a credential.
///
/// Creates the record if the user has none, otherwise overwrites the token and
/// metadata and refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertCredentialParam {
    pub user_id: String,
    pub access_token: String,
    pub username: Option<String>,
    pub avatar_hash: Option<String>,
}

impl UpsertCredentialParam {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            username: None,
            avatar_hash: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_avatar_hash(mut self, avatar_hash: Option<String>) -> Self {
        self.avatar_hash = avatar_hash;
        self
    }

    /// A write needs a user and a non-empty token; backends refuse anything else.
    pub fn is_valid(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.access_token.trim().is_empty()
    }
}

/// The three credential backends, in read-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKind {
    /// Relational database table.
    Relational,
    /// Remote JSON document hosted on JSONBin.
    Document,
    /// JSON file on the local filesystem.
    LocalFile,
}

impl StoreKind {
    pub const ALL: [StoreKind; 3] = [
        StoreKind::Relational,
        StoreKind::Document,
        StoreKind::LocalFile,
    ];

    /// Lower is consulted first on reads.
    pub fn priority(self) -> u8 {
        match self {
            StoreKind::Relational => 0,
            StoreKind::Document => 1,
            StoreKind::LocalFile => 2,
        }
    }

    /// Short name used by the migration command.
    pub fn name(self) -> &'static str {
        match self {
            StoreKind::Relational => "db",
            StoreKind::Document => "jsonbin",
            StoreKind::LocalFile => "json",
        }
    }

    /// Human readable label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            StoreKind::Relational => "Database",
            StoreKind::Document => "JSONBin.io",
            StoreKind::LocalFile => "Local JSON",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StoreKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "db" => Ok(StoreKind::Relational),
            "jsonbin" => Ok(StoreKind::Document),
            "json" => Ok(StoreKind::LocalFile),
            other => Err(AppError::BadRequest(format!(
                "Unknown storage backend '{}', expected one of: db, jsonbin, json",
                other
            ))),
        }
    }
}
