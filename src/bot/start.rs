use std::collections::HashSet;

use serenity::all::{Client, GatewayIntents, UserId};

use crate::{
    bot::{command, handler},
    error::AppError,
    state::AppState,
};

/// Builds the Discord bot client without connecting.
///
/// The client's cache and HTTP handle are available right away, so the web surface
/// and the scheduler can share them before the gateway connects.
///
/// # Arguments
/// - `state` - Application state handed to every command
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started
/// - `Err(AppError::DiscordErr(_))` - Client construction failed
pub async fn init_bot(state: AppState) -> Result<Client, AppError> {
    // GUILD_MEMBERS and MESSAGE_CONTENT are privileged intents and must be enabled in the
    // Discord Developer Portal
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let token = state.config.discord_bot_token.clone();
    let owner = UserId::new(state.config.owner_id);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: command::list(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(command::PREFIX.to_string()),
                case_insensitive_commands: true,
                ..Default::default()
            },
            owners: HashSet::from([owner]),
            initialize_owners: false,
            on_error: |error| Box::pin(handler::error::on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::debug!(
                        "{} ran !{}",
                        ctx.author().name,
                        ctx.command().qualified_name
                    );
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                handler::ready::handle_ready(&state, ctx, ready);
                Ok(state)
            })
        })
        .build();

    let client = Client::builder(&token, intents)
        .framework(framework)
        .await?;

    Ok(client)
}

/// Connects the bot to the gateway and runs until shutdown.
///
/// Should be called from within a spawned task.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
