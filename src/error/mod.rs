//! Error types and HTTP response handling.
//!
//! `AppError` is the top-level error for startup, the web surface and bot
//! commands. The web surface is a handful of browser pages, so responses are
//! rendered as small HTML error pages rather than JSON.

pub mod auth;
pub mod config;
pub mod internal;
pub mod store;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    error::{auth::AuthError, config::ConfigError, internal::InternalError},
    templates::{render_page, ErrorTemplate},
    util::parse::truncate_chars,
};

/// Upper bound on upstream response bodies echoed back to the browser.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Top-level application error type.
///
/// Most variants use `#[from]` for automatic conversion. Authentication errors
/// map to their own status codes; every other unexpected error is logged and
/// rendered as a generic 500 page.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// OAuth login flow error.
    #[error(transparent)]
    AuthErr(#[from] AuthError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Session store operation error.
    #[error(transparent)]
    SessionErr(#[from] tower_sessions::session::Error),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Malformed URL in configuration.
    #[error(transparent)]
    UrlErr(#[from] url::ParseError),

    /// Unexpected internal state, usually corrupted stored data.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Resource not found error.
    ///
    /// Results in 404 Not Found with the provided error message.
    #[error("{0}")]
    NotFound(String),

    /// Invalid request error.
    ///
    /// Results in 400 Bad Request with the provided error message.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error with custom message.
    ///
    /// The provided message is logged and shown to the operator-facing page.
    #[error("{0}")]
    InternalError(String),
}

/// Boxes the error to keep `AppError` small.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

/// Converts application errors into HTML error pages.
///
/// # Returns
/// - 400 Bad Request - For `BadRequest` variant
/// - 404 Not Found - For `NotFound` variant
/// - Variable - For `AuthErr`, delegated to `AuthError::into_response()`
/// - 500 Internal Server Error - For all other error types
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::AuthErr(err) => err.into_response(),
            Self::NotFound(msg) => error_page(StatusCode::NOT_FOUND, "Not Found", &msg),
            Self::BadRequest(msg) => error_page(StatusCode::BAD_REQUEST, "Bad Request", &msg),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_page(StatusCode::INTERNAL_SERVER_ERROR, "Error", &msg)
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("Authorization failed: {}", self);

        match self {
            Self::CsrfValidationFailed => error_page(
                StatusCode::BAD_REQUEST,
                "Authorization Failed",
                "There was an issue logging you in, please try again.",
            ),
            Self::MissingAuthorizationCode => error_page(
                StatusCode::BAD_REQUEST,
                "Authorization Failed",
                "No authorization code was received from Discord.",
            ),
            Self::TokenExchange(reason) => error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Token Exchange Failed",
                truncate_chars(&reason, MAX_ERROR_BODY_CHARS),
            ),
            Self::TokenEndpoint { status, body } => error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Token Exchange Failed",
                &format!(
                    "HTTP {}: {}",
                    status,
                    truncate_chars(&body, MAX_ERROR_BODY_CHARS)
                ),
            ),
            Self::ProfileFetch { status, body } => error_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Profile Fetch Failed",
                &format!(
                    "HTTP {}: {}",
                    status,
                    truncate_chars(&body, MAX_ERROR_BODY_CHARS)
                ),
            ),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the full error message and returns a generic page to avoid leaking
/// implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_page(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error",
            "Internal server error",
        )
    }
}

/// Renders the error page template for the given status.
pub fn error_page(status: StatusCode, title: &str, message: &str) -> Response {
    render_page(status, &ErrorTemplate { title, message })
}
