use std::sync::Arc;

use serenity::all::{
    Cache, ChannelId, ChannelType, CreateEmbed, CreateEmbedFooter, GuildChannel, GuildId, UserId,
};

use crate::{
    bot::{
        command::{invalid_argument, reply_embed, say, COLOR_ERROR, COLOR_INFO, COLOR_SUCCESS},
        Context,
    },
    data::tracked_channel::TrackedChannelRepository,
    error::AppError,
    model::tracked_channel::UpsertTrackedChannelParam,
};

const NO_DATABASE: &str = "❌ Channel tracking needs a database; set `DATABASE_URL` to enable it.";

/// A cached text channel found by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMatch {
    pub channel_id: ChannelId,
    pub guild_id: GuildId,
    pub guild_name: String,
}

#[poise::command(prefix_command, subcommands("track_name"))]
pub async fn track(ctx: Context<'_>, channel: GuildChannel) -> Result<(), AppError> {
    let Some(db) = &ctx.data().db else {
        return say(ctx, NO_DATABASE).await;
    };

    if channel.kind != ChannelType::Text {
        return say(ctx, format!("❌ <#{}> is not a text channel.", channel.id)).await;
    }

    TrackedChannelRepository::new(db)
        .upsert(UpsertTrackedChannelParam {
            channel_id: channel.id.get(),
            guild_id: channel.guild_id.get(),
            user_id: ctx.author().id.get(),
            notification_channel_id: ctx.channel_id().get(),
        })
        .await?;

    let guild_name = ctx
        .serenity_context()
        .cache
        .guild(channel.guild_id)
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| channel.guild_id.to_string());

    let embed = CreateEmbed::new()
        .title("🛰️ Tracking Started")
        .description(format!(
            "The bot is now watching <#{}> in **{}**.",
            channel.id, guild_name
        ))
        .footer(CreateEmbedFooter::new(
            "Alerts are posted here if the channel goes quiet.",
        ))
        .color(COLOR_SUCCESS);

    reply_embed(ctx, embed).await
}

/// Tracks every text channel with the given name in guilds the author is in.
#[poise::command(prefix_command, rename = "name")]
pub async fn track_name(ctx: Context<'_>, #[rest] name: String) -> Result<(), AppError> {
    let Some(db) = &ctx.data().db else {
        return say(ctx, NO_DATABASE).await;
    };

    let wanted = normalize_channel_name(&name);
    if wanted.is_empty() {
        return Err(invalid_argument("channel name", &name, "track name"));
    }

    let found = find_text_channels(
        &ctx.serenity_context().cache,
        &wanted,
        Some(ctx.author().id),
    );
    if found.is_empty() {
        return say(
            ctx,
            format!("❌ No channel named `{}` in the servers you are in.", wanted),
        )
        .await;
    }

    let repo = TrackedChannelRepository::new(db);
    for found in &found {
        repo.upsert(UpsertTrackedChannelParam {
            channel_id: found.channel_id.get(),
            guild_id: found.guild_id.get(),
            user_id: ctx.author().id.get(),
            notification_channel_id: ctx.channel_id().get(),
        })
        .await?;
    }

    let servers = found
        .iter()
        .map(|found| format!("• **{}**", found.guild_name))
        .collect::<Vec<_>>()
        .join("\n");

    let embed = CreateEmbed::new()
        .title("🛰️ Tracking Started")
        .description(format!(
            "Now watching **{}** channels named `{}` in:\n{}",
            found.len(),
            wanted,
            servers
        ))
        .footer(CreateEmbedFooter::new(
            "Alerts are posted here if a channel goes quiet.",
        ))
        .color(COLOR_SUCCESS);

    reply_embed(ctx, embed).await
}

/// Only the user who started tracking or the bot owner may stop it.
#[poise::command(prefix_command)]
pub async fn untrack(ctx: Context<'_>, channel: GuildChannel) -> Result<(), AppError> {
    let Some(db) = &ctx.data().db else {
        return say(ctx, NO_DATABASE).await;
    };
    let repo = TrackedChannelRepository::new(db);
    let channel_id = channel.id.get();

    let Some(tracked) = repo.find_by_channel_id(channel_id).await? else {
        return say(ctx, format!("<#{}> is not being tracked.", channel_id)).await;
    };

    let author_id = ctx.author().id.get();
    if tracked.user_id != author_id && author_id != ctx.data().config.owner_id {
        return say(
            ctx,
            "❌ Only the user who started tracking this channel can stop it.",
        )
        .await;
    }

    repo.delete(channel_id).await?;

    let embed = CreateEmbed::new()
        .title("✅ Tracking Stopped")
        .description(format!("No longer watching <#{}>.", channel_id))
        .color(COLOR_ERROR);

    reply_embed(ctx, embed).await
}

/// Lists the ids of text channels with the given name across every cached guild.
#[poise::command(prefix_command, owners_only)]
pub async fn getid(ctx: Context<'_>, #[rest] name: String) -> Result<(), AppError> {
    let wanted = normalize_channel_name(&name);
    if wanted.is_empty() {
        return Err(invalid_argument("channel name", &name, "getid"));
    }

    let found = find_text_channels(&ctx.serenity_context().cache, &wanted, None);
    if found.is_empty() {
        return say(ctx, format!("❌ No channel named `{}` found.", wanted)).await;
    }

    reply_embed(ctx, channel_ids_embed(&wanted, &found)).await
}

/// Scans cached guilds for text channels named `name`.
///
/// With `member` set, only guilds that user is a cached member of are scanned.
pub fn find_text_channels(
    cache: &Arc<Cache>,
    name: &str,
    member: Option<UserId>,
) -> Vec<ChannelMatch> {
    let mut found = Vec::new();

    for guild_id in cache.guilds() {
        let Some(guild) = cache.guild(guild_id) else {
            continue;
        };
        if member.is_some_and(|user_id| !guild.members.contains_key(&user_id)) {
            continue;
        }

        found.extend(
            guild
                .channels
                .values()
                .filter(|channel| channel.kind == ChannelType::Text && channel.name == name)
                .map(|channel| ChannelMatch {
                    channel_id: channel.id,
                    guild_id,
                    guild_name: guild.name.clone(),
                }),
        );
    }

    found
}

pub fn channel_ids_embed(name: &str, found: &[ChannelMatch]) -> CreateEmbed {
    let lines = found
        .iter()
        .map(|found| format!("**{}**: `{}`", found.guild_name, found.channel_id))
        .collect::<Vec<_>>()
        .join("\n");

    CreateEmbed::new()
        .title(format!("🔎 Channels named #{}", name))
        .description(lines)
        .footer(CreateEmbedFooter::new(format!(
            "{} channels found",
            found.len()
        )))
        .color(COLOR_INFO)
}

/// Discord text channel names are lowercase with dashes instead of spaces.
pub fn normalize_channel_name(name: &str) -> String {
    name.trim()
        .trim_start_matches('#')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
