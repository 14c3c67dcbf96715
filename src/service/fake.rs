//! In-memory stand-ins for the service layer's seams.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    data::credential::CredentialStore,
    model::{
        credential::{CredentialRecord, StoreKind, UpsertCredentialParam},
        membership::MembershipOutcome,
        storage::{HealthStatus, StoreHealth},
    },
    service::{deployment::GuildDirectory, membership::MembershipOperator},
};

/// Credential backend held in memory. An unavailable store fails every operation.
///
/// Like the real backends, only the whole-document kinds keep a roster order.
pub struct FakeCredentialStore {
    kind: StoreKind,
    available: bool,
    records: Mutex<BTreeMap<String, CredentialRecord>>,
    roster: Mutex<Option<Vec<String>>>,
}

impl FakeCredentialStore {
    pub fn new(kind: StoreKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            available: true,
            records: Mutex::new(BTreeMap::new()),
            roster: Mutex::new(None),
        })
    }

    pub fn unavailable(kind: StoreKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            available: false,
            records: Mutex::new(BTreeMap::new()),
            roster: Mutex::new(None),
        })
    }

    fn keeps_roster(&self) -> bool {
        self.available && self.kind != StoreKind::Relational
    }

    pub fn stored_roster(&self) -> Option<Vec<String>> {
        self.roster.lock().unwrap().clone()
    }

    pub fn insert(&self, user_id: &str, access_token: &str) {
        self.records.lock().unwrap().insert(
            user_id.to_string(),
            CredentialRecord {
                user_id: user_id.to_string(),
                access_token: access_token.to_string(),
                username: Some(format!("user{}", user_id)),
                avatar_hash: None,
                updated_at: None,
            },
        );
    }

    pub fn token(&self, user_id: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(user_id)
            .map(|record| record.access_token.clone())
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl CredentialStore for FakeCredentialStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    async fn read(&self, user_id: &str) -> Option<CredentialRecord> {
        if !self.available {
            return None;
        }
        self.records.lock().unwrap().get(user_id).cloned()
    }

    async fn write(&self, param: &UpsertCredentialParam) -> bool {
        if !self.available || !param.is_valid() {
            return false;
        }
        self.records.lock().unwrap().insert(
            param.user_id.clone(),
            CredentialRecord {
                user_id: param.user_id.clone(),
                access_token: param.access_token.clone(),
                username: param.username.clone(),
                avatar_hash: param.avatar_hash.clone(),
                updated_at: None,
            },
        );
        true
    }

    async fn delete(&self, user_id: &str) -> bool {
        if !self.available {
            return false;
        }
        self.records.lock().unwrap().remove(user_id);
        true
    }

    async fn read_all(&self) -> BTreeMap<String, CredentialRecord> {
        if !self.available {
            return BTreeMap::new();
        }
        self.records.lock().unwrap().clone()
    }

    async fn health(&self) -> StoreHealth {
        let status = if self.available {
            HealthStatus::Available { records: self.len() }
        } else {
            HealthStatus::Unavailable {
                reason: "connection refused".to_string(),
            }
        };

        StoreHealth {
            kind: self.kind,
            status,
            location: None,
        }
    }

    async fn roster_order(&self) -> Option<Vec<String>> {
        if !self.keeps_roster() {
            return None;
        }
        self.stored_roster()
    }

    async fn write_roster_order(&self, order: &[String]) -> bool {
        if !self.keeps_roster() {
            return false;
        }
        *self.roster.lock().unwrap() = Some(order.to_vec());
        true
    }
}

/// Membership operator that records calls and answers from a script.
#[derive(Default)]
pub struct FakeMembershipOperator {
    calls: Mutex<Vec<(u64, u64, String)>>,
    /// Pairs answered with a rejection; everything else is added.
    rejected: HashSet<(u64, u64)>,
    /// Pairs answered as already a member.
    members: HashSet<(u64, u64)>,
    count: AtomicUsize,
}

impl FakeMembershipOperator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(mut self, guild_id: u64, user_id: u64) -> Self {
        self.rejected.insert((guild_id, user_id));
        self
    }

    pub fn with_member(mut self, guild_id: u64, user_id: u64) -> Self {
        self.members.insert((guild_id, user_id));
        self
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn calls_for_guild(&self, guild_id: u64) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(guild, _, _)| *guild == guild_id)
            .count()
    }

    pub fn calls(&self) -> Vec<(u64, u64, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MembershipOperator for FakeMembershipOperator {
    async fn add_member(&self, guild_id: u64, user_id: u64, access_token: &str) -> MembershipOutcome {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((guild_id, user_id, access_token.to_string()));

        if self.rejected.contains(&(guild_id, user_id)) {
            MembershipOutcome::Rejected {
                status: 403,
                body: "Missing Permissions".to_string(),
            }
        } else if self.members.contains(&(guild_id, user_id)) {
            MembershipOutcome::AlreadyMember
        } else {
            MembershipOutcome::Added
        }
    }
}

/// Guild directory backed by a fixed map of reachable guilds.
#[derive(Default)]
pub struct FakeGuildDirectory {
    guilds: HashMap<u64, String>,
    members: HashSet<(u64, u64)>,
}

impl FakeGuildDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guild(mut self, guild_id: u64, name: &str) -> Self {
        self.guilds.insert(guild_id, name.to_string());
        self
    }

    pub fn with_member(mut self, guild_id: u64, user_id: u64) -> Self {
        self.members.insert((guild_id, user_id));
        self
    }
}

impl GuildDirectory for FakeGuildDirectory {
    fn guild_name(&self, guild_id: u64) -> Option<String> {
        self.guilds.get(&guild_id).cloned()
    }

    fn guild_ids(&self) -> Vec<u64> {
        let mut ids: Vec<_> = self.guilds.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn is_member(&self, guild_id: u64, user_id: u64) -> bool {
        self.members.contains(&(guild_id, user_id))
    }
}
