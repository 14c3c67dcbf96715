//! Bulk deployment plans and their aggregated reports.

use std::fmt;

use crate::util::parse::{truncate_chars, truncate_with_marker};

/// Discord's embed field value limit.
pub const MAX_FAILURE_DETAIL_CHARS: usize = 1024;
/// Operator messages are cut to this many characters in failure lines.
pub const MAX_FAILURE_MESSAGE_CHARS: usize = 50;

/// Which loop runs on the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOrder {
    /// For each guild, every user. Unreachable guilds short-circuit as a batch.
    GuildMajor,
    /// For each user, every guild.
    UserMajor,
}

/// The (user, guild) pairs a deployment run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    pub user_ids: Vec<u64>,
    pub guild_ids: Vec<u64>,
    pub order: DeploymentOrder,
}

impl DeploymentPlan {
    /// Many users into many guilds.
    pub fn users_to_guilds(user_ids: Vec<u64>, guild_ids: Vec<u64>) -> Self {
        Self {
            user_ids,
            guild_ids,
            order: DeploymentOrder::GuildMajor,
        }
    }

    /// One user into each of the given guilds.
    pub fn user_to_guilds(user_id: u64, guild_ids: Vec<u64>) -> Self {
        Self {
            user_ids: vec![user_id],
            guild_ids,
            order: DeploymentOrder::UserMajor,
        }
    }

    /// Many users into a single guild.
    pub fn users_to_guild(user_ids: Vec<u64>, guild_id: u64) -> Self {
        Self {
            user_ids,
            guild_ids: vec![guild_id],
            order: DeploymentOrder::GuildMajor,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.user_ids.len() * self.guild_ids.len()
    }
}

/// Why a pair (or a whole guild) failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No backend holds a token for the user.
    NoToken,
    /// The bot cannot reach the guild; applies to every user in the plan.
    GuildUnavailable,
    /// The membership call failed; carries the operator's message.
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentFailure {
    /// `None` for a batch-level guild failure.
    pub user_id: Option<u64>,
    pub guild_id: u64,
    pub guild_name: Option<String>,
    pub reason: FailureReason,
}

impl fmt::Display for DeploymentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guild = match &self.guild_name {
            Some(name) => format!("`{}`", name),
            None => format!("guild `{}`", self.guild_id),
        };
        let who = match self.user_id {
            Some(user_id) => format!("<@{}>", user_id),
            None => "All users".to_string(),
        };
        let why = match &self.reason {
            FailureReason::NoToken => "no token".to_string(),
            FailureReason::GuildUnavailable => {
                "not found or bot is not a member".to_string()
            }
            FailureReason::Rejected(message) => {
                truncate_chars(message, MAX_FAILURE_MESSAGE_CHARS).to_string()
            }
        };

        write!(f, "{} → {} ({})", who, guild, why)
    }
}

/// Aggregated result of a deployment run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentReport {
    pub succeeded: usize,
    pub failed: usize,
    /// Failure details in the order they happened.
    pub failures: Vec<DeploymentFailure>,
}

impl DeploymentReport {
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Records one failed pair.
    pub fn record_failure(&mut self, failure: DeploymentFailure) {
        self.failed += 1;
        self.failures.push(failure);
    }

    /// Records a guild-level failure that covers `affected` pairs with one detail line.
    ///
    /// A batch with no pairs records nothing, so counts and detail lines stay in step.
    pub fn record_batch_failure(&mut self, failure: DeploymentFailure, affected: usize) {
        if affected == 0 {
            return;
        }
        self.failed += affected;
        self.failures.push(failure);
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn no_token_count(&self) -> usize {
        self.failures
            .iter()
            .filter(|failure| failure.reason == FailureReason::NoToken)
            .count()
    }

    /// Renders failure lines joined by newlines, capped at `max_chars`.
    ///
    /// An over-long rendering keeps the first `max_chars - 4` characters and
    /// appends `"\n..."`. Returns `None` when nothing failed.
    pub fn render_failures(&self, max_chars: usize) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }

        let details = self
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        Some(truncate_with_marker(&details, max_chars))
    }
}
