mod cards;
#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use teloxide::{
    types::{ChatId, Message},
    utils::command::BotCommands,
};
use thiserror::Error;

pub use self::cards::{INLINE_SOURCE, build_open_app_card, build_share_card};
use crate::{
    deep_link::{MiniAppLinks, parse_start_param},
    inline_query::{InlinePayload, resolve_inline_ref_user_id},
    messaging::{MessagingError, MessagingService},
};

/// Errors raised while handling an update.
#[derive(Debug, Error)]
pub enum BotHandlerError {
    /// Telegram refused or failed a request.
    #[error("Failed to send message: {0}")]
    SendMessageError(#[from] MessagingError),
    /// A launch link could not be built.
    #[error("Failed to build Mini App link: {0}")]
    InvalidLink(#[from] url::ParseError),
}

/// Result type for bot handlers.
pub type BotHandlerResult<T> = Result<T, BotHandlerError>;

// BotCommands turns doc comments into descriptions; `description` covers it.
#[allow(missing_docs)]
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Open the quiz app.")]
    Start(String),
    #[command(description = "Show this help text.")]
    Help,
}

/// Encapsulates the bot's reactions to commands and inline queries.
pub struct BotHandler {
    messaging_service: Arc<dyn MessagingService>,
    links: MiniAppLinks,
}

impl BotHandler {
    /// Creates a new `BotHandler` instance.
    pub fn new(messaging_service: Arc<dyn MessagingService>, links: MiniAppLinks) -> Self {
        Self { messaging_service, links }
    }

    /// Dispatches the incoming command to the appropriate handler.
    pub async fn handle_commands(&self, msg: &Message, cmd: Command) -> BotHandlerResult<()> {
        match cmd {
            Command::Start(payload) => self.handle_start(msg.chat.id, &payload).await,
            Command::Help => {
                self.messaging_service.send_help_msg(msg.chat.id).await?;
                Ok(())
            }
        }
    }

    /// Greets the user. A `/start` deep-link payload uses the same encoding as
    /// the Mini App `start_param` and is forwarded into the launch button.
    pub async fn handle_start(&self, chat_id: ChatId, payload: &str) -> BotHandlerResult<()> {
        let launch = parse_start_param(payload.trim());
        tracing::debug!("Start in chat {chat_id} with launch {launch:?}");

        let url = self.links.launch_url(&launch)?;
        self.messaging_service.send_start_msg(chat_id, url).await?;
        Ok(())
    }

    /// Answers an inline query from `sender_user_id`. Known payloads get their
    /// result card; anything else gets a card opening the app.
    pub async fn handle_inline_query(
        &self,
        query_id: &str,
        sender_user_id: u64,
        text: &str,
    ) -> BotHandlerResult<()> {
        let card = match InlinePayload::parse(text.trim()) {
            Some(payload) => {
                let referrer = resolve_inline_ref_user_id(payload.ref_user_id(), sender_user_id);
                tracing::debug!("Inline payload from {sender_user_id}: {payload:?}");
                build_share_card(&payload, referrer, &self.links)?
            }
            None => build_open_app_card(sender_user_id, &self.links)?,
        };

        self.messaging_service.answer_inline_query(query_id, vec![card]).await?;
        Ok(())
    }
}
