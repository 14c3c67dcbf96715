//! Discord bot: prefix commands for authorization, deployment, storage
//! administration and channel tracking.
//!
//! Commands run on the poise framework with [`AppState`] as the shared data. The bot
//! runs in its own tokio task next to the web server. Its cache backs the guild
//! directory used by deployments, and its HTTP client is shared with the inactivity
//! scheduler.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability and channels
//! - `GUILD_MEMBERS` - Member lists, used to skip users already in a guild (privileged)
//! - `GUILD_MESSAGES` - Messages carrying commands
//! - `MESSAGE_CONTENT` - Reading command text (privileged)

pub mod command;
pub mod handler;
pub mod start;

use crate::{error::AppError, state::AppState};

/// Command context carrying the application state.
pub type Context<'a> = poise::Context<'a, AppState, AppError>;
