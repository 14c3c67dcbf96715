//! Prefix commands (`!name args...`).
//!
//! Commands are poise prefix commands. Argument conversion, the owner gate and
//! usage replies are handled by the framework; command bodies live in one submodule
//! per concern and build their embeds with pure functions.

pub mod deployment;
pub mod general;
pub mod storage;
pub mod tracking;

use serenity::all::CreateEmbed;

use crate::{
    bot::Context,
    error::AppError,
    state::AppState,
    util::parse::parse_snowflake_list,
};

pub const PREFIX: &str = "!";

const COLOR_SUCCESS: u32 = 0x2ECC71;
const COLOR_ERROR: u32 = 0xE74C3C;
const COLOR_WARNING: u32 = 0xE67E22;
const COLOR_INFO: u32 = 0x5865F2;

/// Every command the bot answers to.
pub fn list() -> Vec<poise::Command<AppState, AppError>> {
    vec![
        general::ping(),
        general::auth(),
        general::check_token(),
        general::status(),
        general::help(),
        deployment::add_me(),
        deployment::force_add(),
        deployment::invite(),
        deployment::deploy(),
        storage::storage_info(),
        storage::migrate_tokens(),
        storage::remove(),
        storage::roster(),
        storage::roster_move(),
        tracking::track(),
        tracking::untrack(),
        tracking::getid(),
    ]
}

/// Usage line shown when a command's arguments cannot be understood.
pub fn usage(qualified_name: &str) -> Option<&'static str> {
    let usage = match qualified_name {
        "force_add" => "!force_add <user>",
        "invite" => "!invite <user> <guild_id,guild_id,...>",
        "deploy" => "!deploy <guild_id,...|all> <user_id,...|all>",
        "migrate_tokens" => "!migrate_tokens <db|jsonbin|json> <db|jsonbin|json>",
        "remove" => "!remove <user>",
        "roster_move" => "!roster_move <user> <position>",
        "track" | "track name" => "!track <channel> | !track name <channel-name>",
        "untrack" => "!untrack <channel>",
        "getid" => "!getid <channel-name>",
        _ => return None,
    };
    Some(usage)
}

/// A target set given either explicitly or as `all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Ids(Vec<u64>),
}

impl Selection {
    pub fn parse(input: &str) -> Option<Self> {
        if input.eq_ignore_ascii_case("all") {
            return Some(Selection::All);
        }
        parse_snowflake_list(input).map(Selection::Ids)
    }
}

/// Rejects an argument the framework converted but the command cannot use.
fn invalid_argument(what: &str, value: &str, command: &str) -> AppError {
    match usage(command) {
        Some(usage) => {
            AppError::BadRequest(format!("Invalid {} `{}`. Usage: `{}`", what, value, usage))
        }
        None => AppError::BadRequest(format!("Invalid {} `{}`.", what, value)),
    }
}

async fn reply_embed(ctx: Context<'_>, embed: CreateEmbed) -> Result<(), AppError> {
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

async fn say(ctx: Context<'_>, content: impl Into<String>) -> Result<(), AppError> {
    ctx.say(content).await?;
    Ok(())
}
