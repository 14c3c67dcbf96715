//! Tracked channel factory.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating tracked channel rows.
///
/// All ids default to fresh unique values; the channel starts out active.
pub struct TrackedChannelFactory<'a> {
    db: &'a DatabaseConnection,
    channel_id: String,
    guild_id: String,
    user_id: String,
    notification_channel_id: String,
    is_inactive: bool,
}

impl<'a> TrackedChannelFactory<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            channel_id: next_id().to_string(),
            guild_id: next_id().to_string(),
            user_id: next_id().to_string(),
            notification_channel_id: next_id().to_string(),
            is_inactive: false,
        }
    }

    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn notification_channel_id(mut self, notification_channel_id: impl Into<String>) -> Self {
        self.notification_channel_id = notification_channel_id.into();
        self
    }

    pub fn inactive(mut self, is_inactive: bool) -> Self {
        self.is_inactive = is_inactive;
        self
    }

    /// Builds and inserts the tracked channel row into the database.
    pub async fn build(self) -> Result<entity::tracked_channel::Model, DbErr> {
        entity::tracked_channel::ActiveModel {
            channel_id: ActiveValue::Set(self.channel_id),
            guild_id: ActiveValue::Set(self.guild_id),
            user_id: ActiveValue::Set(self.user_id),
            notification_channel_id: ActiveValue::Set(self.notification_channel_id),
            added_at: ActiveValue::Set(Utc::now()),
            is_inactive: ActiveValue::Set(self.is_inactive),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a tracked channel row with default values.
pub async fn create_tracked_channel(
    db: &DatabaseConnection,
) -> Result<entity::tracked_channel::Model, DbErr> {
    TrackedChannelFactory::new(db).build().await
}
