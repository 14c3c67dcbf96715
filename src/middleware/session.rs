//! Type-safe session wrappers.
//!
//! The web surface only keeps one thing in the session: the CSRF state of an
//! in-flight authorization. Wrapping it keeps the key and value type in one place.

use tower_sessions::Session;

use crate::error::AppError;

const SESSION_OAUTH_CSRF_TOKEN: &str = "oauth:csrf_token";

/// CSRF protection session management.
///
/// The token is stored when the login redirect is issued and consumed when Discord
/// redirects back to the callback.
pub struct CsrfSession<'a> {
    session: &'a Session,
}

impl<'a> CsrfSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores a CSRF token in the session, replacing any earlier one.
    ///
    /// # Returns
    /// - `Ok(())` - Token successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_token(&self, token: String) -> Result<(), AppError> {
        self.session.insert(SESSION_OAUTH_CSRF_TOKEN, token).await?;
        Ok(())
    }

    /// Retrieves and removes the CSRF token so each token validates at most once.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - CSRF token was found and removed
    /// - `Ok(None)` - No CSRF token in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn take_token(&self) -> Result<Option<String>, AppError> {
        let token = self.session.remove(SESSION_OAUTH_CSRF_TOKEN).await?;
        Ok(token)
    }
}
