//! OAuth2 authorization with Discord.
//!
//! Users grant the `identify` and `guilds.join` scopes; the resulting access token is
//! what later lets the bot add them to guilds.

use std::sync::{
    atomic::{AtomicU16, Ordering},
    Arc,
};

use oauth2::{
    basic::BasicErrorResponse, AuthorizationCode, CsrfToken, HttpRequest, HttpResponse,
    RequestTokenError, Scope, TokenResponse,
};
use serde::Deserialize;
use url::Url;

use crate::{
    error::{auth::AuthError, AppError},
    model::{credential::UpsertCredentialParam, storage::FanOutReport},
    service::token_resolver::TokenResolver,
    state::OAuth2Client,
};

/// Scopes requested during authorization.
pub const OAUTH_SCOPES: [&str; 2] = ["identify", "guilds.join"];

/// Subset of Discord's `/users/@me` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A user whose token has been stored.
#[derive(Debug, Clone)]
pub struct AuthorizedUser {
    pub profile: DiscordProfile,
    pub storage: FanOutReport,
}

pub struct DiscordAuthService<'a> {
    http_client: &'a reqwest::Client,
    oauth_client: &'a OAuth2Client,
    api_base: &'a str,
}

impl<'a> DiscordAuthService<'a> {
    pub fn new(
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        api_base: &'a str,
    ) -> Self {
        Self {
            http_client,
            oauth_client,
            api_base,
        }
    }

    /// Builds the Discord authorization URL and the CSRF state to remember.
    pub fn login_url(&self) -> (Url, CsrfToken) {
        self.oauth_client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(OAUTH_SCOPES.iter().map(|scope| Scope::new(scope.to_string())))
            .url()
    }

    /// Completes authorization and stores the user's token in every backend.
    ///
    /// # Arguments
    /// - `authorization_code` - Code Discord passed to the callback
    /// - `resolver` - Token resolver to persist the token through
    ///
    /// # Returns
    /// - `Ok(AuthorizedUser)` - Token stored in at least one backend
    /// - `Err(AuthError::TokenEndpoint)` - Token endpoint rejected the code
    /// - `Err(AuthError::TokenExchange)` - Token endpoint could not be reached
    /// - `Err(AuthError::ProfileFetch)` - Discord refused the profile request
    /// - `Err(AppError::InternalError)` - No backend accepted the token
    pub async fn callback(
        &self,
        authorization_code: String,
        resolver: &TokenResolver,
    ) -> Result<AuthorizedUser, AppError> {
        let last_status = Arc::new(AtomicU16::new(0));
        let http_client = self.http_client.clone();
        let send = |request: HttpRequest| {
            send_oauth_request(http_client.clone(), Arc::clone(&last_status), request)
        };

        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(authorization_code))
            .request_async(&send)
            .await
            .map_err(|e| token_exchange_error(e, last_status.load(Ordering::Relaxed)))?;
        let access_token = token.access_token().secret();

        let profile = self.fetch_profile(access_token).await?;

        let param = UpsertCredentialParam::new(profile.id.clone(), access_token.clone())
            .with_username(profile.username.clone())
            .with_avatar_hash(profile.avatar.clone());
        let storage = resolver.write_all(&param).await;

        if !storage.any_succeeded() {
            return Err(AppError::InternalError(format!(
                "Could not store the authorization for {} in any storage backend",
                profile.username
            )));
        }

        tracing::info!("Stored authorization for {} ({})", profile.username, profile.id);

        Ok(AuthorizedUser { profile, storage })
    }

    /// Retrieves the authorizing user's profile with their access token.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<DiscordProfile, AppError> {
        let response = self
            .http_client
            .get(format!("{}/users/@me", self.api_base.trim_end_matches('/')))
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::ProfileFetch {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }
            .into());
        }

        Ok(response.json::<DiscordProfile>().await?)
    }
}

/// Sends an OAuth request with reqwest, remembering the response status so a
/// rejected exchange can be reported with it.
async fn send_oauth_request(
    http_client: reqwest::Client,
    last_status: Arc<AtomicU16>,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = http_client.execute(request.try_into()?).await?;
    let status = response.status();
    let headers = response.headers().clone();
    last_status.store(status.as_u16(), Ordering::Relaxed);

    let body = response.bytes().await?;
    let mut http_response = HttpResponse::new(body.to_vec());
    *http_response.status_mut() = status;
    *http_response.headers_mut() = headers;

    Ok(http_response)
}

/// Keeps the token endpoint's status and body for responses it actually sent.
fn token_exchange_error<RE>(error: RequestTokenError<RE, BasicErrorResponse>, status: u16) -> AuthError
where
    RE: std::error::Error + 'static,
{
    match error {
        RequestTokenError::ServerResponse(response) => AuthError::TokenEndpoint {
            status,
            body: serde_json::to_string(&response).unwrap_or_else(|_| response.to_string()),
        },
        RequestTokenError::Parse(_, body) => AuthError::TokenEndpoint {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        },
        other => AuthError::TokenExchange(other.to_string()),
    }
}
