use serenity::all::{CreateEmbed, CreateEmbedFooter, User};

use crate::{
    bot::{
        command::{invalid_argument, reply_embed, say, COLOR_ERROR, COLOR_INFO, COLOR_SUCCESS},
        Context,
    },
    error::AppError,
    model::{
        credential::{CredentialRecord, StoreKind},
        storage::{FanOutReport, MigrationReport, StoreHealth},
    },
    service::storage::{StorageAdminService, STORAGE_HIERARCHY},
    util::parse::truncate_with_marker,
};

/// Discord's embed description limit.
const MAX_DESCRIPTION_CHARS: usize = 4096;

#[poise::command(prefix_command, owners_only)]
pub async fn storage_info(ctx: Context<'_>) -> Result<(), AppError> {
    let health = StorageAdminService::new(&ctx.data().resolver).health().await;

    reply_embed(ctx, health_embed(&health)).await
}

/// Without both backends the usage embed is shown instead.
#[poise::command(prefix_command, owners_only)]
pub async fn migrate_tokens(
    ctx: Context<'_>,
    source: Option<String>,
    target: Option<String>,
) -> Result<(), AppError> {
    let (Some(source), Some(target)) = (source, target) else {
        return reply_embed(ctx, migration_usage_embed()).await;
    };
    let source = store_arg(&source)?;
    let target = store_arg(&target)?;

    say(
        ctx,
        format!("🔄 Starting migration from {} to {}...", source, target),
    )
    .await?;

    let report = StorageAdminService::new(&ctx.data().resolver)
        .migrate(source, target)
        .await?;

    if report.is_empty() {
        return say(ctx, format!("❌ No data found in {}", source)).await;
    }

    reply_embed(ctx, migration_embed(&report)).await
}

fn store_arg(value: &str) -> Result<StoreKind, AppError> {
    value
        .parse::<StoreKind>()
        .map_err(|_| invalid_argument("storage backend", value, "migrate_tokens"))
}

#[poise::command(prefix_command, owners_only)]
pub async fn remove(ctx: Context<'_>, user: User) -> Result<(), AppError> {
    let user_id = user.id.get();
    say(
        ctx,
        format!("🔥 Purging stored data for <@{}> (`{}`)...", user_id, user_id),
    )
    .await?;

    let report = StorageAdminService::new(&ctx.data().resolver)
        .purge(user_id)
        .await;

    reply_embed(ctx, purge_embed(user_id, &report)).await
}

#[poise::command(prefix_command, owners_only)]
pub async fn roster(ctx: Context<'_>) -> Result<(), AppError> {
    let records = ctx.data().resolver.roster().await;
    if records.is_empty() {
        return say(ctx, "❌ No authorized users found.").await;
    }

    reply_embed(ctx, roster_embed(&records)).await
}

/// Moves a user to a 1-based position in the roster listing.
#[poise::command(prefix_command, owners_only)]
pub async fn roster_move(ctx: Context<'_>, user: User, position: usize) -> Result<(), AppError> {
    if position == 0 {
        return Err(invalid_argument(
            "position",
            &position.to_string(),
            "roster_move",
        ));
    }

    let resolver = &ctx.data().resolver;
    if resolver.roster().await.is_empty() {
        return say(ctx, "❌ No authorized users found.").await;
    }

    let saved = StorageAdminService::new(resolver)
        .move_in_roster(user.id.get(), position)
        .await;
    if saved.is_empty() {
        return say(
            ctx,
            "❌ The roster order could not be saved. It is kept in JSONBin or the local JSON file.",
        )
        .await;
    }

    reply_embed(ctx, roster_move_embed(&user.name, position, &saved)).await
}

pub fn health_embed(health: &[StoreHealth]) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title("💾 Storage Systems");

    for entry in health {
        let value = match &entry.location {
            Some(location) => format!("{}\n`{}`", entry.status, location),
            None => entry.status.to_string(),
        };
        embed = embed.field(entry.kind.label(), value, false);
    }

    embed
        .field("ℹ️ Hierarchy", STORAGE_HIERARCHY, false)
        .color(COLOR_INFO)
}

pub fn migration_usage_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("📦 Token Migration")
        .description("Copy every stored token from one backend to another.")
        .field(
            "Usage",
            "`!migrate_tokens <source> <target>`\n\nValid backends:\n\
             • `db` - Database\n• `jsonbin` - JSONBin.io\n• `json` - Local JSON file",
            false,
        )
        .field(
            "Examples",
            "`!migrate_tokens json jsonbin`\n`!migrate_tokens db jsonbin`",
            false,
        )
        .color(COLOR_INFO)
}

pub fn migration_embed(report: &MigrationReport) -> CreateEmbed {
    CreateEmbed::new()
        .title("📦 Migration Complete")
        .description(format!("{} → {}", report.source, report.target))
        .field("✅ Migrated", format!("{} tokens", report.migrated), true)
        .field("❌ Failed", format!("{} tokens", report.failed), true)
        .field("📊 Total", format!("{} tokens found", report.total), true)
        .color(if report.failed == 0 {
            COLOR_SUCCESS
        } else {
            COLOR_ERROR
        })
}

pub fn purge_embed(user_id: u64, report: &FanOutReport) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("Data Purge Report")
        .description(format!("<@{}> (`{}`)", user_id, user_id));

    for (kind, outcome) in report.entries() {
        embed = embed.field(kind.label(), outcome.to_string(), false);
    }

    embed.color(COLOR_ERROR)
}

pub fn roster_embed(records: &[CredentialRecord]) -> CreateEmbed {
    let lines = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            format!(
                "`{}.` <@{}> {}",
                index + 1,
                record.user_id,
                record.username.as_deref().unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    CreateEmbed::new()
        .title("🗂️ Authorized Users")
        .description(truncate_with_marker(&lines, MAX_DESCRIPTION_CHARS))
        .footer(CreateEmbedFooter::new(format!(
            "{} users authorized",
            records.len()
        )))
        .color(COLOR_INFO)
}

pub fn roster_move_embed(username: &str, position: usize, saved: &[StoreKind]) -> CreateEmbed {
    let saved_in = saved
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(", ");

    CreateEmbed::new()
        .title("🗂️ Roster Updated")
        .description(format!("Moved **{}** to position {}.", username, position))
        .footer(CreateEmbedFooter::new(format!("Saved in: {}", saved_in)))
        .color(COLOR_SUCCESS)
}
