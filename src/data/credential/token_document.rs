//! JSON document holding every user's credential, shared by the whole-document backends.
//!
//! The document is an object keyed by user id. Values are normally
//! `{access_token, username, avatar_hash, updated_at}` objects, but older documents
//! store a bare token string. Keys that are not credentials (bookkeeping such as
//! `_roster_order`) are preserved untouched on rewrite.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::store::StoreError,
    model::{
        credential::{CredentialRecord, UpsertCredentialParam},
        roster::ROSTER_ORDER_KEY,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    access_token: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    avatar_hash: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Record(StoredCredential),
    Bare(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenDocument(Map<String, Value>);

impl TokenDocument {
    /// Wraps a JSON value read from storage. `null` is treated as an empty document.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::Json(serde::de::Error::custom(format!(
                "expected a JSON object, found {}",
                json_type(&other)
            )))),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Looks up a credential; entries with an empty token read as absent.
    pub fn get(&self, user_id: &str) -> Option<CredentialRecord> {
        let value = self.0.get(user_id)?;
        entry_to_record(user_id, value)
    }

    pub fn upsert(&mut self, param: &UpsertCredentialParam, now: DateTime<Utc>) -> Result<(), StoreError> {
        let stored = StoredCredential {
            access_token: param.access_token.clone(),
            username: param.username.clone(),
            avatar_hash: param.avatar_hash.clone(),
            updated_at: Some(now.to_rfc3339()),
        };

        self.0
            .insert(param.user_id.clone(), serde_json::to_value(stored)?);
        Ok(())
    }

    /// Removes a user's entry, returning whether one existed.
    pub fn remove(&mut self, user_id: &str) -> bool {
        self.0.remove(user_id).is_some()
    }

    /// The stored roster order, `None` if absent or malformed.
    pub fn roster_order(&self) -> Option<Vec<String>> {
        let value = self.0.get(ROSTER_ORDER_KEY)?;
        Vec::<String>::deserialize(value).ok()
    }

    pub fn set_roster_order(&mut self, order: &[String]) {
        self.0
            .insert(ROSTER_ORDER_KEY.to_string(), Value::from(order.to_vec()));
    }

    /// Every valid credential in the document.
    pub fn records(&self) -> BTreeMap<String, CredentialRecord> {
        self.0
            .iter()
            .filter_map(|(user_id, value)| {
                entry_to_record(user_id, value).map(|record| (user_id.clone(), record))
            })
            .collect()
    }
}

fn entry_to_record(user_id: &str, value: &Value) -> Option<CredentialRecord> {
    let entry = StoredEntry::deserialize(value).ok()?;

    let record = match entry {
        StoredEntry::Record(stored) => CredentialRecord {
            user_id: user_id.to_string(),
            access_token: stored.access_token,
            username: stored.username,
            avatar_hash: stored.avatar_hash,
            updated_at: stored.updated_at.as_deref().and_then(parse_timestamp),
        },
        StoredEntry::Bare(access_token) => CredentialRecord {
            user_id: user_id.to_string(),
            access_token,
            username: None,
            avatar_hash: None,
            updated_at: None,
        },
    };

    if record.access_token.trim().is_empty() {
        None
    } else {
        Some(record)
    }
}

/// Accepts RFC 3339 as well as epoch seconds (`"1735689600.123"`).
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    let seconds = value.trim().parse::<f64>().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.trunc() as i64;
    let nanos = ((seconds - seconds.trunc()) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole, nanos)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
