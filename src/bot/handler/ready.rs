//! Ready handler for bot initialization.
//!
//! Runs once the gateway handshake completes. Marks the bot as connected for the
//! health endpoint and logs where the web surface and storage stand.

use serenity::all::{ActivityData, Context, Ready};

use crate::state::AppState;

pub fn handle_ready(state: &AppState, ctx: &Context, ready: &Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );
    tracing::info!("Web server: {}", state.config.app_url);
    tracing::info!("OAuth redirect: {}", state.config.discord_redirect_url);

    ctx.set_activity(Some(ActivityData::listening("!help")));
    state.set_bot_ready(true);
}
