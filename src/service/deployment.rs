//! Bulk deployment of users into guilds.
//!
//! Every (user, guild) pair in a plan is attempted one at a time. A missing token or a
//! rejected call is recorded and the run moves on; a guild the bot cannot reach is
//! recorded once for all users and skipped.

use std::{collections::HashMap, sync::Arc};

use serenity::{
    all::{GuildId, UserId},
    cache::Cache,
};

use crate::{
    model::deployment::{
        DeploymentFailure, DeploymentOrder, DeploymentPlan, DeploymentReport, FailureReason,
    },
    service::{membership::MembershipOperator, token_resolver::TokenResolver},
};

/// The bot's view of the guilds it can act in.
pub trait GuildDirectory: Send + Sync {
    /// Name of a guild the bot is in, `None` if it cannot be reached.
    fn guild_name(&self, guild_id: u64) -> Option<String>;

    /// Every guild the bot is in.
    fn guild_ids(&self) -> Vec<u64>;

    /// Whether the user is already known to be in the guild.
    fn is_member(&self, _guild_id: u64, _user_id: u64) -> bool {
        false
    }
}

/// Guild directory over the gateway cache.
pub struct CacheGuildDirectory {
    cache: Arc<Cache>,
}

impl CacheGuildDirectory {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

impl GuildDirectory for CacheGuildDirectory {
    fn guild_name(&self, guild_id: u64) -> Option<String> {
        self.cache
            .guild(GuildId::new(guild_id))
            .map(|guild| guild.name.clone())
    }

    fn guild_ids(&self) -> Vec<u64> {
        self.cache
            .guilds()
            .into_iter()
            .map(|guild_id| guild_id.get())
            .collect()
    }

    fn is_member(&self, guild_id: u64, user_id: u64) -> bool {
        self.cache
            .guild(GuildId::new(guild_id))
            .map(|guild| guild.members.contains_key(&UserId::new(user_id)))
            .unwrap_or(false)
    }
}

pub struct DeploymentOrchestrator<'a> {
    resolver: &'a TokenResolver,
    operator: &'a dyn MembershipOperator,
    directory: &'a dyn GuildDirectory,
}

impl<'a> DeploymentOrchestrator<'a> {
    pub fn new(
        resolver: &'a TokenResolver,
        operator: &'a dyn MembershipOperator,
        directory: &'a dyn GuildDirectory,
    ) -> Self {
        Self {
            resolver,
            operator,
            directory,
        }
    }

    /// Runs every pair in the plan to completion and aggregates the results.
    ///
    /// Calls are issued sequentially. Each user's token is resolved at most once per run.
    pub async fn deploy(&self, plan: &DeploymentPlan) -> DeploymentReport {
        tracing::info!(
            "Deploying {} users to {} guilds",
            plan.user_ids.len(),
            plan.guild_ids.len()
        );

        let mut run = DeploymentRun {
            report: DeploymentReport::default(),
            tokens: HashMap::new(),
        };

        match plan.order {
            DeploymentOrder::GuildMajor => {
                for &guild_id in &plan.guild_ids {
                    let Some(guild_name) = self.directory.guild_name(guild_id) else {
                        run.report.record_batch_failure(
                            DeploymentFailure {
                                user_id: None,
                                guild_id,
                                guild_name: None,
                                reason: FailureReason::GuildUnavailable,
                            },
                            plan.user_ids.len(),
                        );
                        continue;
                    };

                    for &user_id in &plan.user_ids {
                        self.deploy_pair(&mut run, guild_id, &guild_name, user_id)
                            .await;
                    }
                }
            }
            DeploymentOrder::UserMajor => {
                for &user_id in &plan.user_ids {
                    for &guild_id in &plan.guild_ids {
                        match self.directory.guild_name(guild_id) {
                            Some(guild_name) => {
                                self.deploy_pair(&mut run, guild_id, &guild_name, user_id)
                                    .await
                            }
                            None => run.report.record_failure(DeploymentFailure {
                                user_id: Some(user_id),
                                guild_id,
                                guild_name: None,
                                reason: FailureReason::GuildUnavailable,
                            }),
                        }
                    }
                }
            }
        }

        tracing::info!(
            "Deployment finished: {} succeeded, {} failed",
            run.report.succeeded,
            run.report.failed
        );

        run.report
    }

    async fn deploy_pair(
        &self,
        run: &mut DeploymentRun,
        guild_id: u64,
        guild_name: &str,
        user_id: u64,
    ) {
        let failure = |reason| DeploymentFailure {
            user_id: Some(user_id),
            guild_id,
            guild_name: Some(guild_name.to_string()),
            reason,
        };

        let Some(access_token) = self.token_for(run, user_id).await else {
            run.report.record_failure(failure(FailureReason::NoToken));
            return;
        };

        if self.directory.is_member(guild_id, user_id) {
            tracing::debug!("User {} already in guild {}", user_id, guild_id);
            run.report.record_success();
            return;
        }

        let outcome = self
            .operator
            .add_member(guild_id, user_id, &access_token)
            .await;

        if outcome.is_success() {
            tracing::debug!("User {} → guild {}: {}", user_id, guild_id, outcome.message());
            run.report.record_success();
        } else {
            run.report
                .record_failure(failure(FailureReason::Rejected(outcome.message())));
        }
    }

    async fn token_for(&self, run: &mut DeploymentRun, user_id: u64) -> Option<String> {
        if let Some(cached) = run.tokens.get(&user_id) {
            return cached.clone();
        }

        let token = self.resolver.resolve_read(&user_id.to_string()).await;
        run.tokens.insert(user_id, token.clone());
        token
    }
}

struct DeploymentRun {
    report: DeploymentReport,
    tokens: HashMap<u64, Option<String>>,
}
