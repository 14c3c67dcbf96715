mod bot;
mod config;
mod controller;
mod data;
mod error;
mod middleware;
mod model;
mod router;
mod scheduler;
mod service;
mod startup;
mod state;
mod templates;
mod util;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::{
    config::Config, error::AppError, scheduler::channel_activity,
    service::membership::DiscordMembershipOperator, state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    startup::init_environment();
    let config = Arc::new(Config::from_env()?);

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client()?;
    let oauth_client = startup::setup_oauth_client(&config)?;
    let resolver = Arc::new(startup::build_token_resolver(
        &config,
        db.clone(),
        &http_client,
    ));
    let membership = Arc::new(DiscordMembershipOperator::new(
        http_client.clone(),
        config.discord_api_base.clone(),
        config.discord_bot_token.clone(),
    ));

    let state = AppState::new(
        config.clone(),
        db.clone(),
        http_client,
        oauth_client,
        resolver,
        membership,
    );

    tracing::info!("Starting server");

    // Build the bot first so its cache and HTTP client can be shared
    let bot_client = bot::start::init_bot(state.clone()).await?;
    let discord_http = bot_client.http.clone();
    let state = state.with_discord_cache(bot_client.cache.clone());

    tokio::spawn(async move {
        if let Err(e) = bot::start::start_bot(bot_client).await {
            tracing::error!("Discord bot error: {}", e);
        }
    });

    // Keeps the scheduler handle alive for the lifetime of the server
    let _scheduler = match db {
        Some(db) => Some(
            channel_activity::start_scheduler(
                db,
                discord_http,
                config.inactivity_threshold_minutes,
            )
            .await?,
        ),
        None => {
            tracing::info!("Channel tracking disabled without a database");
            None
        }
    };

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.app_url.starts_with("https://"));

    let app = router::router()
        .with_state(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("Listening on {} ({})", listener.local_addr()?, config.app_url);

    axum::serve(listener, app).await?;

    Ok(())
}
