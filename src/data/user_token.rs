//! User token data repository for database operations.
//!
//! This module provides the `UserTokenRepository` for managing OAuth credential rows in
//! the relational backend. One row per Discord user, keyed by the user id; writes are
//! upserts so re-authorizing never produces a duplicate row.

use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveValue, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
};

use crate::model::credential::{CredentialRecord, UpsertCredentialParam};

/// Repository providing database operations for stored user tokens.
pub struct UserTokenRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserTokenRepository<'a> {
    /// Creates a new UserTokenRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `UserTokenRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a user's token or replaces the existing one.
    ///
    /// On conflict the access token, username, avatar hash and `updated_at` are
    /// overwritten; `created_at` keeps the time of the first authorization.
    ///
    /// # Arguments
    /// - `param` - User id, access token and optional display metadata
    ///
    /// # Returns
    /// - `Ok(CredentialRecord)` - The stored record
    /// - `Err(DbErr)` - Database error during insert or update
    pub async fn upsert(&self, param: UpsertCredentialParam) -> Result<CredentialRecord, DbErr> {
        let now = Utc::now();

        let entity = entity::prelude::UserToken::insert(entity::user_token::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            access_token: ActiveValue::Set(param.access_token),
            username: ActiveValue::Set(param.username),
            avatar_hash: ActiveValue::Set(param.avatar_hash),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        })
        .on_conflict(
            OnConflict::column(entity::user_token::Column::UserId)
                .update_columns([
                    entity::user_token::Column::AccessToken,
                    entity::user_token::Column::Username,
                    entity::user_token::Column::AvatarHash,
                    entity::user_token::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(self.db)
        .await?;

        Ok(CredentialRecord::from_entity(entity))
    }

    /// Finds the stored token for a user.
    ///
    /// # Arguments
    /// - `user_id` - Discord user ID as a string slice
    ///
    /// # Returns
    /// - `Ok(Some(CredentialRecord))` - Token found
    /// - `Ok(None)` - No token stored for this user
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Option<CredentialRecord>, DbErr> {
        let entity = entity::prelude::UserToken::find_by_id(user_id.to_string())
            .one(self.db)
            .await?;

        Ok(entity.map(CredentialRecord::from_entity))
    }

    /// Deletes a user's token.
    ///
    /// Deleting a user with no stored token is not an error.
    ///
    /// # Returns
    /// - `Ok(true)` - A row was removed
    /// - `Ok(false)` - No row existed for this user
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, user_id: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::UserToken::delete_by_id(user_id.to_string())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets every stored token, oldest authorization first.
    pub async fn get_all(&self) -> Result<Vec<CredentialRecord>, DbErr> {
        let entities = entity::prelude::UserToken::find()
            .order_by_asc(entity::user_token::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(CredentialRecord::from_entity)
            .collect())
    }

    /// Counts stored tokens.
    pub async fn count(&self) -> Result<u64, DbErr> {
        entity::prelude::UserToken::find().count(self.db).await
    }
}
