//! Domain models for channels watched for inactivity.

use chrono::{DateTime, Utc};

use crate::{error::AppError, util::parse::parse_u64_from_string};

/// A channel watched for inactivity.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedChannel {
    pub channel_id: u64,
    pub guild_id: u64,
    /// User who started tracking; mentioned in alerts.
    pub user_id: u64,
    /// Channel alerts are posted to.
    pub notification_channel_id: u64,
    pub added_at: DateTime<Utc>,
    /// Whether the last pass found the channel inactive.
    pub is_inactive: bool,
}

impl TrackedChannel {
    /// Converts an entity model to a tracked channel domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(TrackedChannel)` - The converted domain model
    /// - `Err(AppError::InternalErr(ParseStringId))` - A stored id is not a valid u64
    pub fn from_entity(entity: entity::tracked_channel::Model) -> Result<Self, AppError> {
        Ok(Self {
            channel_id: parse_u64_from_string(entity.channel_id)?,
            guild_id: parse_u64_from_string(entity.guild_id)?,
            user_id: parse_u64_from_string(entity.user_id)?,
            notification_channel_id: parse_u64_from_string(entity.notification_channel_id)?,
            added_at: entity.added_at,
            is_inactive: entity.is_inactive,
        })
    }
}

/// Parameters for starting (or restarting) tracking of a channel.
///
/// Re-tracking an existing channel replaces the owner and notification
/// destination and clears the inactivity flag.
#[derive(Debug, Clone)]
pub struct UpsertTrackedChannelParam {
    pub channel_id: u64,
    pub guild_id: u64,
    pub user_id: u64,
    pub notification_channel_id: u64,
}
