use crate::error::{config::ConfigError, AppError};

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_API_BASE: &str = "https://discord.com/api/v10";
const JSONBIN_BASE_URL: &str = "https://api.jsonbin.io/v3";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_FILE_PATH: &str = "tokens.json";
/// One week.
const DEFAULT_INACTIVITY_THRESHOLD_MINUTES: i64 = 7 * 24 * 60;

pub struct Config {
    pub discord_bot_token: String,
    pub discord_client_id: String,
    pub discord_client_secret: String,
    pub discord_redirect_url: String,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    pub discord_api_base: String,

    /// Discord user allowed to run administrative commands.
    pub owner_id: u64,

    /// Relational backend; `None` disables it along with the channel tracker.
    pub database_url: Option<String>,

    /// Remote document backend; `None` disables it.
    pub jsonbin_api_key: Option<String>,
    pub jsonbin_bin_id: Option<String>,
    pub jsonbin_base_url: String,

    pub token_file_path: String,

    pub port: u16,
    pub app_url: String,

    pub inactivity_threshold_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let port = match optional_var("PORT") {
            Some(value) => parse_var("PORT", &value)?,
            None => DEFAULT_PORT,
        };
        let app_url = optional_var("RENDER_EXTERNAL_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", port));
        let discord_api_base = optional_var("DISCORD_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DISCORD_API_BASE.to_string());
        let inactivity_threshold_minutes = match optional_var("INACTIVITY_THRESHOLD_MINUTES") {
            Some(value) => parse_var("INACTIVITY_THRESHOLD_MINUTES", &value)?,
            None => DEFAULT_INACTIVITY_THRESHOLD_MINUTES,
        };

        Ok(Self {
            discord_bot_token: required_var("DISCORD_TOKEN")?,
            discord_client_id: required_var("DISCORD_CLIENT_ID")?,
            discord_client_secret: required_var("DISCORD_CLIENT_SECRET")?,
            discord_redirect_url: format!("{}/callback", app_url),
            discord_auth_url: DISCORD_AUTH_URL.to_string(),
            discord_token_url: token_url(&discord_api_base),
            discord_api_base,
            owner_id: parse_var("BOT_OWNER_ID", &required_var("BOT_OWNER_ID")?)?,
            database_url: optional_var("DATABASE_URL"),
            jsonbin_api_key: optional_var("JSONBIN_API_KEY"),
            jsonbin_bin_id: optional_var("JSONBIN_BIN_ID"),
            jsonbin_base_url: optional_var("JSONBIN_BASE_URL")
                .unwrap_or_else(|| JSONBIN_BASE_URL.to_string()),
            token_file_path: optional_var("TOKEN_FILE_PATH")
                .unwrap_or_else(|| DEFAULT_TOKEN_FILE_PATH.to_string()),
            port,
            app_url,
            inactivity_threshold_minutes,
        })
    }
}

/// The OAuth token endpoint lives under the API base, so an overridden base moves it too.
fn token_url(api_base: &str) -> String {
    format!("{}/oauth2/token", api_base.trim_end_matches('/'))
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    optional_var(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

/// Reads an environment variable, treating an empty value as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value: value.to_string(),
    })
}
