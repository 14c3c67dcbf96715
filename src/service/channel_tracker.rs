//! Inactivity checks for tracked channels.
//!
//! A channel is inactive once its most recent message (or, for an empty channel, its
//! creation) is older than the configured threshold. Alerts are only posted when the
//! state flips, so a channel that stays inactive is reported once.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::{
    all::{Channel, ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage},
    http::{Http, HttpError},
};

use crate::{
    data::tracked_channel::TrackedChannelRepository, error::AppError,
    model::tracked_channel::TrackedChannel,
};

const INACTIVE_COLOR: u32 = 0xE67E22;
const ACTIVE_COLOR: u32 = 0x2ECC71;

/// What an activity check means for a channel's stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityTransition {
    BecameInactive,
    BecameActive,
    Unchanged,
}

/// Decides the transition for a channel last active at `last_activity`.
///
/// Inactive means strictly more than `threshold` has passed.
pub fn evaluate_activity(
    last_activity: DateTime<Utc>,
    now: DateTime<Utc>,
    threshold: Duration,
    was_inactive: bool,
) -> ActivityTransition {
    let is_inactive = now - last_activity > threshold;

    match (was_inactive, is_inactive) {
        (false, true) => ActivityTransition::BecameInactive,
        (true, false) => ActivityTransition::BecameActive,
        _ => ActivityTransition::Unchanged,
    }
}

pub struct ChannelTrackerService<'a> {
    db: &'a DatabaseConnection,
    http: Arc<Http>,
    threshold_minutes: i64,
}

impl<'a> ChannelTrackerService<'a> {
    pub fn new(db: &'a DatabaseConnection, http: Arc<Http>, threshold_minutes: i64) -> Self {
        Self {
            db,
            http,
            threshold_minutes,
        }
    }

    /// Checks every tracked channel once.
    ///
    /// A failure on one channel is logged and does not stop the pass.
    pub async fn check_all(&self) -> Result<(), AppError> {
        let channels = TrackedChannelRepository::new(self.db).get_all().await?;
        tracing::info!("Checking activity of {} tracked channels", channels.len());

        for channel in channels {
            if let Err(e) = self.check_channel(&channel).await {
                tracing::error!(
                    "Failed to check activity of channel {}: {}",
                    channel.channel_id,
                    e
                );
            }
        }

        Ok(())
    }

    async fn check_channel(&self, tracked: &TrackedChannel) -> Result<(), AppError> {
        let repo = TrackedChannelRepository::new(self.db);

        let notification_channel = ChannelId::new(tracked.notification_channel_id);
        if let Err(e) = self.http.get_channel(notification_channel).await {
            if is_gone(&e) {
                tracing::warn!(
                    "Notification channel {} is gone, untracking channel {}",
                    tracked.notification_channel_id,
                    tracked.channel_id
                );
                repo.delete(tracked.channel_id).await?;
                return Ok(());
            }
            return Err(e.into());
        }

        let channel = match self.http.get_channel(ChannelId::new(tracked.channel_id)).await {
            Ok(Channel::Guild(channel)) => channel,
            Ok(_) => {
                repo.delete(tracked.channel_id).await?;
                return Ok(());
            }
            Err(e) if is_gone(&e) => {
                tracing::warn!("Channel {} is gone, untracking it", tracked.channel_id);
                repo.delete(tracked.channel_id).await?;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let last_activity_id = channel
            .last_message_id
            .map(|id| id.created_at())
            .unwrap_or_else(|| channel.id.created_at());
        let last_activity =
            DateTime::from_timestamp(last_activity_id.unix_timestamp(), 0).unwrap_or_else(Utc::now);

        let transition = evaluate_activity(
            last_activity,
            Utc::now(),
            Duration::minutes(self.threshold_minutes),
            tracked.is_inactive,
        );

        let (content, embed) = match transition {
            ActivityTransition::Unchanged => return Ok(()),
            ActivityTransition::BecameInactive => {
                repo.set_inactive(tracked.channel_id, true).await?;
                (
                    format!("Notice for <@{}>:", tracked.user_id),
                    CreateEmbed::new()
                        .title("⚠️ Channel Inactive")
                        .description(format!(
                            "<#{}> has had no new messages for more than **{}** minutes.",
                            tracked.channel_id, self.threshold_minutes
                        ))
                        .field(
                            "Last activity",
                            format!("<t:{}:R>", last_activity.timestamp()),
                            false,
                        )
                        .footer(CreateEmbedFooter::new(format!(
                            "Tracked by user {}",
                            tracked.user_id
                        )))
                        .color(INACTIVE_COLOR),
                )
            }
            ActivityTransition::BecameActive => {
                repo.set_inactive(tracked.channel_id, false).await?;
                (
                    format!("Update for <@{}>:", tracked.user_id),
                    CreateEmbed::new()
                        .title("✅ Channel Active Again")
                        .description(format!("<#{}> has new activity.", tracked.channel_id))
                        .field(
                            "Latest activity",
                            format!("<t:{}:R>", last_activity.timestamp()),
                            false,
                        )
                        .footer(CreateEmbedFooter::new("Tracking continues."))
                        .color(ACTIVE_COLOR),
                )
            }
        };

        tracing::info!("Channel {} transition: {:?}", tracked.channel_id, transition);

        notification_channel
            .send_message(&self.http, CreateMessage::new().content(content).embed(embed))
            .await?;

        Ok(())
    }
}

/// Not found or no longer accessible to the bot.
fn is_gone(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            matches!(response.status_code.as_u16(), 403 | 404)
        }
        _ => false,
    }
}
