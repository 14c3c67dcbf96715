//! Tracked channel data repository for database operations.
//!
//! Rows describe channels watched by the inactivity tracker. Ids are stored as strings
//! and parsed back to `u64` at the repository boundary.

use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::{
    error::AppError,
    model::tracked_channel::{TrackedChannel, UpsertTrackedChannelParam},
};

/// Repository providing database operations for tracked channels.
pub struct TrackedChannelRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TrackedChannelRepository<'a> {
    /// Creates a new TrackedChannelRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `TrackedChannelRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Starts tracking a channel, or restarts tracking of an already tracked one.
    ///
    /// Re-tracking replaces the owner and the notification channel and resets the
    /// inactivity flag; the guild and `added_at` of the original row are kept.
    ///
    /// # Arguments
    /// - `param` - Channel, guild, owner and notification destination ids
    ///
    /// # Returns
    /// - `Ok(TrackedChannel)` - The stored tracked channel
    /// - `Err(AppError::DbErr)` - Database error during insert or update
    /// - `Err(AppError::InternalErr)` - Stored ids could not be parsed
    pub async fn upsert(&self, param: UpsertTrackedChannelParam) -> Result<TrackedChannel, AppError> {
        let entity = entity::prelude::TrackedChannel::insert(entity::tracked_channel::ActiveModel {
            channel_id: ActiveValue::Set(param.channel_id.to_string()),
            guild_id: ActiveValue::Set(param.guild_id.to_string()),
            user_id: ActiveValue::Set(param.user_id.to_string()),
            notification_channel_id: ActiveValue::Set(param.notification_channel_id.to_string()),
            added_at: ActiveValue::Set(Utc::now()),
            is_inactive: ActiveValue::Set(false),
        })
        .on_conflict(
            OnConflict::column(entity::tracked_channel::Column::ChannelId)
                .update_columns([
                    entity::tracked_channel::Column::UserId,
                    entity::tracked_channel::Column::NotificationChannelId,
                    entity::tracked_channel::Column::IsInactive,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        TrackedChannel::from_entity(entity)
    }

    /// Finds a tracked channel by its Discord channel ID.
    ///
    /// # Returns
    /// - `Ok(Some(TrackedChannel))` - Channel is tracked
    /// - `Ok(None)` - Channel is not tracked
    /// - `Err(AppError)` - Database or parse error
    pub async fn find_by_channel_id(
        &self,
        channel_id: u64,
    ) -> Result<Option<TrackedChannel>, AppError> {
        let entity = entity::prelude::TrackedChannel::find_by_id(channel_id.to_string())
            .one(self.db)
            .await?;

        entity.map(TrackedChannel::from_entity).transpose()
    }

    /// Gets all tracked channels, oldest first.
    pub async fn get_all(&self) -> Result<Vec<TrackedChannel>, AppError> {
        let entities = entity::prelude::TrackedChannel::find()
            .order_by_asc(entity::tracked_channel::Column::AddedAt)
            .all(self.db)
            .await?;

        entities
            .into_iter()
            .map(TrackedChannel::from_entity)
            .collect()
    }

    /// Stops tracking a channel.
    ///
    /// # Returns
    /// - `Ok(true)` - The channel was tracked and has been removed
    /// - `Ok(false)` - The channel was not tracked
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, channel_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::TrackedChannel::delete_by_id(channel_id.to_string())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Persists the result of an activity check.
    ///
    /// # Arguments
    /// - `channel_id` - Discord channel ID
    /// - `is_inactive` - New inactivity flag
    ///
    /// # Returns
    /// - `Ok(())` - Flag updated (or no matching row)
    /// - `Err(DbErr)` - Database error during update
    pub async fn set_inactive(&self, channel_id: u64, is_inactive: bool) -> Result<(), DbErr> {
        entity::prelude::TrackedChannel::update_many()
            .filter(entity::tracked_channel::Column::ChannelId.eq(channel_id.to_string()))
            .col_expr(
                entity::tracked_channel::Column::IsInactive,
                sea_orm::sea_query::Expr::value(is_inactive),
            )
            .exec(self.db)
            .await?;

        Ok(())
    }
}
