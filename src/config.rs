use std::{collections::HashSet, env};

use crate::init_data::DEFAULT_MAX_AGE_SECONDS;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8787";
const DEFAULT_MINI_APP_SHORT_NAME: &str = "app";

/// Represents the application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The Telegram bot token. Signs init data and authenticates the bot.
    /// Without it the API rejects every request and the bot is not started.
    pub telegram_bot_token: Option<String>,
    /// Telegram user ids allowed to use admin endpoints.
    pub admin_ids: HashSet<u64>,
    /// The maximum accepted age of init data, in seconds.
    pub init_data_max_age: i64,
    /// The address the HTTP API listens on.
    pub bind_address: String,
    /// The bot username used in Mini App links. Fetched from Telegram when unset.
    pub bot_username: Option<String>,
    /// The short name of the Mini App registered with BotFather.
    pub mini_app_short_name: String,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    pub fn from_env() -> Self {
        Self {
            telegram_bot_token: non_empty_var("TELOXIDE_TOKEN"),
            admin_ids: env::var("ADMIN_TELEGRAM_IDS")
                .map(|v| parse_admin_ids(&v))
                .unwrap_or_default(),
            init_data_max_age: env::var("INIT_DATA_MAX_AGE")
                .map(|v| parse_max_age(&v))
                .unwrap_or(DEFAULT_MAX_AGE_SECONDS),
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            bot_username: non_empty_var("BOT_USERNAME"),
            mini_app_short_name: env::var("MINI_APP_SHORT_NAME")
                .unwrap_or_else(|_| DEFAULT_MINI_APP_SHORT_NAME.to_string()),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Parses a positive number of seconds. Anything else would reject every
/// launch, so it falls back to the default.
fn parse_max_age(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(seconds) if seconds > 0 => seconds,
        _ => {
            tracing::warn!(
                "Invalid INIT_DATA_MAX_AGE {raw:?}, using {DEFAULT_MAX_AGE_SECONDS} seconds"
            );
            DEFAULT_MAX_AGE_SECONDS
        }
    }
}

/// Parses a comma-separated list of user ids, skipping entries that are not
/// numbers.
fn parse_admin_ids(raw: &str) -> HashSet<u64> {
    raw.split(',').filter_map(|id| id.trim().parse().ok()).collect()
}
