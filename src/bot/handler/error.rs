use poise::FrameworkError;

use crate::{
    bot::{command::usage, Context},
    error::AppError,
    state::AppState,
};

const OWNER_ONLY: &str = "❌ This command is restricted to the bot owner.";
const GENERIC_FAILURE: &str = "❌ Something went wrong while running that command.";

/// Replies to the author for failures they can act on and logs the rest.
pub async fn on_error(error: FrameworkError<'_, AppState, AppError>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            let text = command_error_reply(&error);
            if text == GENERIC_FAILURE {
                tracing::error!(
                    "Command !{} from {} failed: {}",
                    ctx.command().qualified_name,
                    ctx.author().id,
                    error
                );
            }
            reply(ctx, text).await;
        }
        FrameworkError::ArgumentParse { input, ctx, .. } => {
            let text = argument_error_reply(&ctx.command().qualified_name, input.as_deref());
            reply(ctx, text).await;
        }
        FrameworkError::NotAnOwner { ctx, .. } => reply(ctx, OWNER_ONLY.to_string()).await,
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Failed to handle framework error: {}", e);
            }
        }
    }
}

/// Request problems are shown verbatim; anything else gets a generic reply.
fn command_error_reply(error: &AppError) -> String {
    match error {
        AppError::BadRequest(reason) | AppError::NotFound(reason) => format!("❌ {}", reason),
        _ => GENERIC_FAILURE.to_string(),
    }
}

fn argument_error_reply(command: &str, input: Option<&str>) -> String {
    let problem = match input {
        Some(input) => format!("Could not understand `{}`.", input),
        None => "Missing argument.".to_string(),
    };

    match usage(command) {
        Some(usage) => format!("❌ {} Usage: `{}`", problem, usage),
        None => format!("❌ {}", problem),
    }
}

async fn reply(ctx: Context<'_>, text: String) {
    if let Err(e) = ctx.say(text).await {
        tracing::error!("Failed to reply in channel {}: {}", ctx.channel_id(), e);
    }
}
