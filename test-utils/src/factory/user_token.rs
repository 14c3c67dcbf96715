//! Credential factory for creating stored OAuth tokens.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test credential rows with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user_token::UserTokenFactory;
///
/// let token = UserTokenFactory::new(&db)
///     .user_id("123456789")
///     .access_token("abc")
///     .username("agent")
///     .build()
///     .await?;
/// ```
pub struct UserTokenFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: String,
    access_token: String,
    username: Option<String>,
    avatar_hash: Option<String>,
}

impl<'a> UserTokenFactory<'a> {
    /// Creates a new UserTokenFactory with default values.
    ///
    /// Defaults:
    /// - user_id: auto-incremented id
    /// - access_token: `"token-{id}"`
    /// - username: `"user{id}"`
    /// - avatar_hash: `None`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            user_id: id.to_string(),
            access_token: format!("token-{}", id),
            username: Some(format!("user{}", id)),
            avatar_hash: None,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = access_token.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn avatar_hash(mut self, avatar_hash: impl Into<String>) -> Self {
        self.avatar_hash = Some(avatar_hash.into());
        self
    }

    /// Builds and inserts the credential row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user_token::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user_token::Model, DbErr> {
        let now = Utc::now();
        entity::user_token::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            access_token: ActiveValue::Set(self.access_token),
            username: ActiveValue::Set(self.username),
            avatar_hash: ActiveValue::Set(self.avatar_hash),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a credential row with default values.
///
/// Shorthand for `UserTokenFactory::new(db).build().await`.
pub async fn create_user_token(
    db: &DatabaseConnection,
) -> Result<entity::user_token::Model, DbErr> {
    UserTokenFactory::new(db).build().await
}
