use std::time::Instant;

use serenity::all::{CreateEmbed, CreateEmbedFooter};

use crate::{
    bot::{
        command::{reply_embed, COLOR_ERROR, COLOR_INFO, COLOR_SUCCESS},
        Context,
    },
    error::AppError,
    model::credential::StoreKind,
    service::storage::STORAGE_HIERARCHY,
};

/// Replies with the REST round-trip time of sending the reply itself.
#[poise::command(prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), AppError> {
    let started = Instant::now();
    let reply = ctx.say("🏓 Pong!").await?;
    let latency = started.elapsed().as_millis();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!("🏓 Pong! Latency is {}ms.", latency)),
        )
        .await?;

    Ok(())
}

#[poise::command(prefix_command)]
pub async fn auth(ctx: Context<'_>) -> Result<(), AppError> {
    reply_embed(ctx, auth_embed(&ctx.data().config.app_url)).await
}

#[poise::command(prefix_command)]
pub async fn check_token(ctx: Context<'_>) -> Result<(), AppError> {
    let authorized = ctx
        .data()
        .resolver
        .resolve_read(&ctx.author().id.to_string())
        .await
        .is_some();

    reply_embed(ctx, token_status_embed(authorized)).await
}

#[poise::command(prefix_command)]
pub async fn status(ctx: Context<'_>) -> Result<(), AppError> {
    let state = ctx.data();
    let configured: Vec<(StoreKind, bool)> = StoreKind::ALL
        .into_iter()
        .map(|kind| (kind, state.resolver.is_configured(kind)))
        .collect();

    let cache = &ctx.serenity_context().cache;
    let embed = status_embed(
        cache.guilds().len(),
        cache.user_count(),
        &configured,
        &state.config.app_url,
    );

    reply_embed(ctx, embed).await
}

#[poise::command(prefix_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), AppError> {
    let is_owner = ctx.author().id.get() == ctx.data().config.owner_id;

    reply_embed(ctx, help_embed(is_owner)).await
}

pub fn auth_embed(app_url: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("🔐 Authorize the Bot")
        .description("Follow the link below to let the bot add you to its servers.")
        .field(
            "🔗 Authorization link",
            format!("[Click here]({}/login)", app_url),
            false,
        )
        .field(
            "📌 Note",
            format!("Your token is kept in: {}", STORAGE_HIERARCHY),
            false,
        )
        .color(COLOR_SUCCESS)
}

pub fn token_status_embed(authorized: bool) -> CreateEmbed {
    if authorized {
        CreateEmbed::new()
            .title("✅ Authorized")
            .description("The bot has your token and can add you to servers.")
            .color(COLOR_SUCCESS)
    } else {
        not_authorized_embed("You have not authorized the bot yet. Use `!auth` first.")
    }
}

pub fn not_authorized_embed(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title("❌ Not Authorized")
        .description(description)
        .color(COLOR_ERROR)
}

pub fn status_embed(
    guilds: usize,
    users: usize,
    configured: &[(StoreKind, bool)],
    app_url: &str,
) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("🤖 Bot Status")
        .field("📊 Servers", format!("{} servers", guilds), true)
        .field("👥 Users", format!("{} users", users), true);

    for (kind, is_configured) in configured {
        let value = if *is_configured {
            "✅ Configured"
        } else {
            "➖ Not configured"
        };
        embed = embed.field(format!("💾 {}", kind.label()), value, true);
    }

    embed
        .field("🌍 Web Server", format!("[Open]({})", app_url), false)
        .color(COLOR_INFO)
}

pub fn help_embed(is_owner: bool) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("📖 Commands")
        .field("`!auth`", "Get the authorization link.", true)
        .field("`!add_me`", "Join every server the bot is in.", true)
        .field("`!check_token`", "Check whether you are authorized.", true)
        .field("`!status`", "Show bot and storage status.", true)
        .field("`!ping`", "Check the bot's latency.", true)
        .field("`!track <channel>`", "Watch a channel for inactivity.", true)
        .field(
            "`!track name <channel-name>`",
            "Watch every channel with that name in your servers.",
            true,
        )
        .field("`!untrack <channel>`", "Stop watching a channel.", true);

    if is_owner {
        embed = embed
            .field("👑 Owner commands", "\u{200b}", false)
            .field("`!force_add <user>`", "Add a user to every server.", true)
            .field("`!invite <user> <guilds>`", "Add a user to selected servers.", true)
            .field("`!deploy <guilds|all> <users|all>`", "Add many users to many servers.", true)
            .field("`!roster`", "List authorized users.", true)
            .field("`!roster_move <user> <position>`", "Reorder the roster.", true)
            .field("`!getid <channel-name>`", "Find channel ids by name.", true)
            .field("`!remove <user>`", "Delete a user's token everywhere.", true)
            .field("`!storage_info`", "Show storage backend health.", true)
            .field("`!migrate_tokens <src> <dst>`", "Copy tokens between backends.", true);
    }

    embed
        .footer(CreateEmbedFooter::new("Arguments accept ids or mentions."))
        .color(COLOR_INFO)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn field_names(embed: &CreateEmbed) -> Vec<String> {
        let value = serde_json::to_value(embed).unwrap();
        value["fields"]
            .as_array()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|field| field["name"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn help_hides_owner_commands_from_others() {
        let names = field_names(&help_embed(false));
        assert!(names.iter().any(|name| name == "`!add_me`"));
        assert!(!names.iter().any(|name| name.starts_with("`!deploy")));

        let names = field_names(&help_embed(true));
        assert!(names.iter().any(|name| name.starts_with("`!deploy")));
        assert!(names.iter().any(|name| name.starts_with("`!roster_move")));
        assert!(names.iter().any(|name| name.starts_with("`!getid")));
    }

    #[test]
    fn auth_links_to_login_route() {
        let value = serde_json::to_value(auth_embed("https://example.test")).unwrap();
        let link = &value["fields"][0]["value"];
        assert_eq!(link, &Value::from("[Click here](https://example.test/login)"));
    }

    #[test]
    fn status_lists_every_backend() {
        let configured = [
            (StoreKind::Relational, false),
            (StoreKind::Document, true),
            (StoreKind::LocalFile, true),
        ];
        let names = field_names(&status_embed(3, 10, &configured, "http://localhost"));

        assert!(names.contains(&"💾 Database".to_string()));
        assert!(names.contains(&"💾 JSONBin.io".to_string()));
        assert!(names.contains(&"💾 Local JSON".to_string()));
    }
}
