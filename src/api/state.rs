use std::{collections::HashSet, sync::Arc};

use crate::config::Config;

/// Settings the `tma` authentication needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token used to verify `initData`. `None` fails every request with 500.
    pub bot_token: Option<String>,
    /// Maximum accepted `initData` age, in seconds.
    pub max_age_seconds: i64,
    /// Telegram user ids allowed on admin routes.
    pub admin_ids: HashSet<u64>,
}

impl AuthConfig {
    /// Takes the auth settings from the application config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            bot_token: config.telegram_bot_token.clone(),
            max_age_seconds: config.init_data_max_age,
            admin_ids: config.admin_ids.clone(),
        }
    }

    /// Returns `true` if `user_id` is on the admin allowlist.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

/// Shared state for API handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Authentication settings.
    pub auth: Arc<AuthConfig>,
}

impl AppState {
    /// Creates the state around `auth`.
    pub fn new(auth: AuthConfig) -> Self {
        Self { auth: Arc::new(auth) }
    }
}
