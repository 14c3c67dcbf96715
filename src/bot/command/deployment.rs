use serenity::all::{CreateEmbed, User};

use crate::{
    bot::{
        command::{
            general::not_authorized_embed, invalid_argument, reply_embed, say, Selection,
            COLOR_SUCCESS, COLOR_WARNING,
        },
        Context,
    },
    error::AppError,
    model::deployment::{DeploymentPlan, DeploymentReport, MAX_FAILURE_DETAIL_CHARS},
    service::deployment::{CacheGuildDirectory, DeploymentOrchestrator, GuildDirectory},
    util::parse::parse_snowflake_list,
};

#[poise::command(prefix_command)]
pub async fn add_me(ctx: Context<'_>) -> Result<(), AppError> {
    deploy_everywhere(
        ctx,
        ctx.author().id.get(),
        "You have not authorized the bot yet. Use `!auth` first.".to_string(),
    )
    .await
}

#[poise::command(prefix_command, owners_only)]
pub async fn force_add(ctx: Context<'_>, user: User) -> Result<(), AppError> {
    deploy_everywhere(
        ctx,
        user.id.get(),
        format!(
            "<@{}> has not authorized the bot yet. Ask them to use `!auth` first.",
            user.id
        ),
    )
    .await
}

/// Adds one user to every guild the bot is in, after checking the user has a token.
async fn deploy_everywhere(
    ctx: Context<'_>,
    user_id: u64,
    not_authorized: String,
) -> Result<(), AppError> {
    if ctx
        .data()
        .resolver
        .resolve_read(&user_id.to_string())
        .await
        .is_none()
    {
        return reply_embed(ctx, not_authorized_embed(not_authorized)).await;
    }

    let directory = CacheGuildDirectory::new(ctx.serenity_context().cache.clone());
    say(ctx, format!("✅ Adding <@{}> to the bot's servers...", user_id)).await?;

    let plan = DeploymentPlan::user_to_guilds(user_id, directory.guild_ids());
    run(ctx, &directory, &plan).await
}

#[poise::command(prefix_command, owners_only)]
pub async fn invite(ctx: Context<'_>, user: User, guilds: String) -> Result<(), AppError> {
    let guild_ids = parse_snowflake_list(&guilds)
        .ok_or_else(|| invalid_argument("guild list", &guilds, "invite"))?;

    let directory = CacheGuildDirectory::new(ctx.serenity_context().cache.clone());
    say(
        ctx,
        format!(
            "✅ Adding <@{}> to {} selected servers...",
            user.id,
            guild_ids.len()
        ),
    )
    .await?;

    let plan = DeploymentPlan::user_to_guilds(user.id.get(), guild_ids);
    run(ctx, &directory, &plan).await
}

#[poise::command(prefix_command, owners_only)]
pub async fn deploy(ctx: Context<'_>, guilds: String, users: String) -> Result<(), AppError> {
    let guilds =
        Selection::parse(&guilds).ok_or_else(|| invalid_argument("guild list", &guilds, "deploy"))?;
    let users =
        Selection::parse(&users).ok_or_else(|| invalid_argument("user list", &users, "deploy"))?;

    let directory = CacheGuildDirectory::new(ctx.serenity_context().cache.clone());

    let guild_ids = match guilds {
        Selection::All => directory.guild_ids(),
        Selection::Ids(ids) => ids,
    };
    let user_ids = match users {
        Selection::All => ctx
            .data()
            .resolver
            .known_user_ids()
            .await
            .into_iter()
            .filter_map(|user_id| user_id.parse::<u64>().ok())
            .collect(),
        Selection::Ids(ids) => ids,
    };

    if user_ids.is_empty() {
        return say(ctx, "❌ No authorized users to deploy.").await;
    }
    if guild_ids.is_empty() {
        return say(ctx, "❌ No servers to deploy to.").await;
    }

    let plan = DeploymentPlan::users_to_guilds(user_ids, guild_ids);
    say(
        ctx,
        format!(
            "🚀 Deploying {} users to {} servers ({} additions)...",
            plan.user_ids.len(),
            plan.guild_ids.len(),
            plan.pair_count()
        ),
    )
    .await?;

    run(ctx, &directory, &plan).await
}

async fn run(
    ctx: Context<'_>,
    directory: &dyn GuildDirectory,
    plan: &DeploymentPlan,
) -> Result<(), AppError> {
    let state = ctx.data();
    let orchestrator =
        DeploymentOrchestrator::new(&state.resolver, state.membership.as_ref(), directory);
    let report = orchestrator.deploy(plan).await;

    reply_embed(ctx, report_embed(&report)).await
}

pub fn report_embed(report: &DeploymentReport) -> CreateEmbed {
    let color = if report.failed == 0 {
        COLOR_SUCCESS
    } else {
        COLOR_WARNING
    };

    let mut embed = CreateEmbed::new()
        .title("📊 Deployment Results")
        .field("✅ Succeeded", report.succeeded.to_string(), true)
        .field("❌ Failed", report.failed.to_string(), true)
        .color(color);

    if let Some(details) = report.render_failures(MAX_FAILURE_DETAIL_CHARS) {
        embed = embed.field("Failure details", details, false);
    }

    embed
}
