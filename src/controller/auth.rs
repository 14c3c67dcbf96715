use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    error::{auth::AuthError, AppError},
    middleware::session::CsrfSession,
    model::storage::StoreOutcome,
    service::auth::{AuthorizedUser, DiscordAuthService},
    state::AppState,
    templates::{render_page, AuthorizedTemplate, IndexTemplate},
};

/// Query parameters for the OAuth callback endpoint.
///
/// Both are optional so a missing value renders an error page instead of a bare
/// extractor rejection.
#[derive(Deserialize)]
pub struct CallbackParams {
    /// Authorization code used to exchange for an access token.
    pub code: Option<String>,
    /// CSRF state token to be validated against the session value.
    pub state: Option<String>,
}

pub async fn index() -> Response {
    render_page(
        StatusCode::OK,
        &IndexTemplate {
            login_path: "/login",
        },
    )
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = DiscordAuthService::new(
        &state.http_client,
        &state.oauth_client,
        &state.config.discord_api_base,
    );

    let (url, csrf_token) = auth_service.login_url();

    CsrfSession::new(&session)
        .set_token(csrf_token.secret().clone())
        .await?;

    Ok(Redirect::temporary(url.as_str()))
}

pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    let auth_service = DiscordAuthService::new(
        &state.http_client,
        &state.oauth_client,
        &state.config.discord_api_base,
    );

    validate_csrf(&session, params.state.as_deref()).await?;

    let Some(code) = params.code else {
        return Err(AuthError::MissingAuthorizationCode.into());
    };

    let user = auth_service.callback(code, &state.resolver).await?;

    Ok(success_page(&user))
}

async fn validate_csrf(session: &Session, csrf_state: Option<&str>) -> Result<(), AppError> {
    let stored_state = CsrfSession::new(session).take_token().await?;

    if let (Some(stored), Some(received)) = (stored_state, csrf_state) {
        if stored == received {
            return Ok(());
        }
    }

    Err(AppError::AuthErr(AuthError::CsrfValidationFailed))
}

fn success_page(user: &AuthorizedUser) -> Response {
    let stored_in = user
        .storage
        .entries()
        .filter(|(_, outcome)| *outcome == StoreOutcome::Succeeded)
        .map(|(kind, _)| kind.label())
        .collect::<Vec<_>>()
        .join(", ");

    render_page(
        StatusCode::OK,
        &AuthorizedTemplate {
            username: &user.profile.username,
            stored_in: &stored_in,
        },
    )
}
