//! Application state shared by the web handlers and the bot.
//!
//! The state is built once during startup and cloned into every request handler
//! and event handler. All fields are cheap to clone (pools, `Arc`s or types that
//! share an `Arc` internally).

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use sea_orm::DatabaseConnection;
use serenity::cache::Cache;

use crate::{
    config::Config,
    service::{membership::MembershipOperator, token_resolver::TokenResolver},
};

/// Type alias for the OAuth2 client configured for Discord authentication.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// `None` when no database is configured. Backs the relational credential
    /// store and the channel tracker.
    pub db: Option<DatabaseConnection>,

    /// Shared HTTP client for the OAuth flow, JSONBin and membership calls.
    ///
    /// Configured without redirects.
    pub http_client: reqwest::Client,

    pub oauth_client: OAuth2Client,

    pub resolver: Arc<TokenResolver>,

    pub membership: Arc<dyn MembershipOperator>,

    /// Gateway cache, available once the bot client has been built.
    pub discord_cache: Option<Arc<Cache>>,

    /// Set by the bot when the gateway reports ready.
    pub bot_ready: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        db: Option<DatabaseConnection>,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        resolver: Arc<TokenResolver>,
        membership: Arc<dyn MembershipOperator>,
    ) -> Self {
        Self {
            config,
            db,
            http_client,
            oauth_client,
            resolver,
            membership,
            discord_cache: None,
            bot_ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attaches the gateway cache of the built bot client.
    pub fn with_discord_cache(mut self, cache: Arc<Cache>) -> Self {
        self.discord_cache = Some(cache);
        self
    }

    pub fn is_bot_ready(&self) -> bool {
        self.bot_ready.load(Ordering::Relaxed)
    }

    pub fn set_bot_ready(&self, ready: bool) {
        self.bot_ready.store(ready, Ordering::Relaxed);
    }

    /// Number of guilds the bot is in, zero before the cache exists.
    pub fn guild_count(&self) -> usize {
        self.discord_cache
            .as_ref()
            .map(|cache| cache.guilds().len())
            .unwrap_or(0)
    }
}
