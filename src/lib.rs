#![warn(missing_docs)]
//! Backend for a Telegram quiz Mini App.
//!
//! Verifies the `initData` the Mini App sends with every API call, encodes
//! and decodes the deep-link `start_param`, and runs a bot that answers
//! `/start` and turns shared results into inline cards.

/// The HTTP API guarded by `initData` authentication.
pub mod api;
/// The handler for the bot's commands and inline queries.
pub mod bot_handler;
/// The configuration for the application.
pub mod config;
/// The `start_param` codec and Mini App launch links.
pub mod deep_link;
/// The dispatcher for routing updates to the correct handlers.
pub mod dispatcher;
/// Validation of the signed Mini App launch payload.
pub mod init_data;
/// Parsing of the payloads typed into inline queries.
pub mod inline_query;
/// The service for sending messages to the user.
pub mod messaging;

use std::{io, sync::Arc};

use teloxide::prelude::*;
use tokio::task::JoinHandle;

use crate::{
    bot_handler::BotHandler, config::Config, deep_link::MiniAppLinks,
    messaging::TelegramMessagingService,
};

/// Runs the API server and, when a bot token is configured, the bot.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();

    let Some(token) = config.telegram_bot_token.clone() else {
        tracing::warn!("TELOXIDE_TOKEN is not set, running the API without the bot");
        api::serve(&config).await?;
        return Ok(());
    };

    let bot = Bot::new(token);
    let bot_username = match config.bot_username.clone() {
        Some(username) => username,
        None => bot.get_me().await?.user.username.ok_or("The bot account has no username")?,
    };
    tracing::info!("Running as @{bot_username}");

    let links = MiniAppLinks::new(&bot_username, &config.mini_app_short_name);
    let messaging_service = Arc::new(TelegramMessagingService::new(bot.clone()));

    // Bind before starting the bot so a taken address fails startup.
    let listener = api::bind(&config).await?;
    let state = api::AppState::new(api::AuthConfig::from_config(&config));
    let api_task = tokio::spawn(api::serve_on(listener, state));

    let handler = Arc::new(BotHandler::new(messaging_service, links));
    let mut dispatcher = dispatcher::BotDispatcher::new(handler).build(bot);
    tracing::debug!("Dispatcher built successfully.");

    run_alongside_api(api_task, dispatcher.dispatch()).await
}

/// Drives `bot` until it finishes, failing as soon as the API task stops.
async fn run_alongside_api(
    api_task: JoinHandle<io::Result<()>>,
    bot: impl Future<Output = ()>,
) -> Result<(), Box<dyn std::error::Error>> {
    tokio::select! {
        api_result = api_task => {
            match api_result? {
                Ok(()) => Err("HTTP API server stopped unexpectedly".into()),
                Err(e) => {
                    tracing::error!("Error in API server: {e}");
                    Err(e.into())
                }
            }
        }
        () = bot => Ok(()),
    }
}
