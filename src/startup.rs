use std::{sync::Arc, time::Duration};

use oauth2::{basic::BasicClient, AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};
use sea_orm::DatabaseConnection;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::Config,
    data::credential::{
        CredentialStore, DocumentCredentialStore, LocalFileCredentialStore,
        RelationalCredentialStore,
    },
    error::AppError,
    service::token_resolver::TokenResolver,
    state::OAuth2Client,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOG_FILTER: &str = "interlink=info,sea_orm=warn";

/// Loads `.env` into the process environment, then installs the tracing subscriber.
///
/// `.env` must be loaded first for a `RUST_LOG` kept there to take effect.
pub fn init_environment() {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }
}

/// Log filter from `RUST_LOG`, or the crate default when unset or invalid.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Connects to the configured database and runs pending migrations.
///
/// The pool is created lazily, so an unreachable database does not stop startup; the
/// relational backend then fails soft on every call. A failed migration is logged
/// for the same reason.
///
/// # Arguments
/// - `config` - Application configuration containing the optional database URL
///
/// # Returns
/// - `Ok(Some(DatabaseConnection))` - Database configured
/// - `Ok(None)` - No `DATABASE_URL` set
/// - `Err(AppError::DbErr(_))` - The URL could not be used to build a pool
pub async fn connect_to_database(
    config: &Config,
) -> Result<Option<DatabaseConnection>, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let Some(database_url) = &config.database_url else {
        tracing::info!("DATABASE_URL not set, database storage disabled");
        return Ok(None);
    };

    let mut opt = ConnectOptions::new(database_url);
    opt.sqlx_logging(false)
        .connect_lazy(true)
        .connect_timeout(Duration::from_secs(10));

    let db = Database::connect(opt).await?;

    if let Err(e) = Migrator::up(&db, None).await {
        tracing::warn!("Failed to run database migrations: {}", e);
    }

    Ok(Some(db))
}

/// Builds the shared HTTP client.
///
/// Redirects are not followed.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(HTTP_TIMEOUT)
        .build()?;

    Ok(client)
}

/// Builds the Discord OAuth2 client from configuration.
///
/// # Returns
/// - `Ok(OAuth2Client)` - Client with authorize, token and redirect URLs set
/// - `Err(AppError::UrlErr(_))` - One of the configured URLs is malformed
pub fn setup_oauth_client(config: &Config) -> Result<OAuth2Client, AppError> {
    let client = BasicClient::new(ClientId::new(config.discord_client_id.clone()))
        .set_client_secret(ClientSecret::new(config.discord_client_secret.clone()))
        .set_auth_uri(AuthUrl::new(config.discord_auth_url.clone())?)
        .set_token_uri(TokenUrl::new(config.discord_token_url.clone())?)
        .set_redirect_uri(RedirectUrl::new(config.discord_redirect_url.clone())?);

    Ok(client)
}

/// Assembles the token resolver from whichever backends are configured.
///
/// The local file backend is always present.
pub fn build_token_resolver(
    config: &Config,
    db: Option<DatabaseConnection>,
    http_client: &reqwest::Client,
) -> TokenResolver {
    let mut stores: Vec<Arc<dyn CredentialStore>> = Vec::new();

    if let Some(db) = db {
        stores.push(Arc::new(RelationalCredentialStore::new(db)));
    }

    match &config.jsonbin_api_key {
        Some(api_key) => stores.push(Arc::new(DocumentCredentialStore::new(
            http_client.clone(),
            config.jsonbin_base_url.clone(),
            api_key.clone(),
            config.jsonbin_bin_id.clone(),
        ))),
        None => tracing::info!("JSONBIN_API_KEY not set, JSONBin storage disabled"),
    }

    stores.push(Arc::new(LocalFileCredentialStore::new(
        config.token_file_path.clone(),
    )));

    let resolver = TokenResolver::new(stores);
    tracing::info!(
        "Token storage backends: {}",
        resolver
            .stores()
            .iter()
            .map(|store| store.kind().label())
            .collect::<Vec<_>>()
            .join(" → ")
    );

    resolver
}
