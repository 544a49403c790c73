mod keyboards;

use async_trait::async_trait;
use mockall::automock;
use teloxide::{
    prelude::*,
    types::{
        ChatId, InlineQueryResult, InlineQueryResultArticle, InputMessageContent,
        InputMessageContentText,
    },
    utils::command::BotCommands,
};
use thiserror::Error;
use url::Url;

pub use self::keyboards::build_open_app_keyboard;
use crate::bot_handler::Command;

const START_TEXT: &str = "👋 Welcome! Take quizzes, discover your personality and challenge \
                          your friends. Tap the button below to open the app.";
const OPEN_APP_BUTTON: &str = "🚀 Open the app";

/// Errors from sending messages.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The Bot API request failed.
    #[error("Teloxide API request failed: {0}")]
    TeloxideRequest(#[from] teloxide::RequestError),
}

type Result<T> = std::result::Result<T, MessagingError>;

/// A result card offered in answer to an inline query. Sending it posts
/// `text` to the chat with a single button opening `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCard {
    /// Unique within one inline answer.
    pub id: String,
    /// Shown in the inline results list.
    pub title: String,
    /// Second line in the results list.
    pub description: String,
    /// Message posted when the card is picked.
    pub text: String,
    /// Label of the launch button.
    pub button_text: String,
    /// Launch link behind the button.
    pub url: Url,
}

impl ShareCard {
    fn into_inline_result(self) -> InlineQueryResult {
        let content = InputMessageContent::Text(InputMessageContentText::new(self.text));
        let article = InlineQueryResultArticle::new(self.id, self.title, content)
            .description(self.description)
            .reply_markup(build_open_app_keyboard(&self.button_text, self.url));
        InlineQueryResult::Article(article)
    }
}

/// Trait for sending messages to the user.
#[automock]
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Sends the welcome message with a button opening the Mini App at
    /// `launch_url`.
    async fn send_start_msg(&self, chat_id: ChatId, launch_url: Url) -> Result<()>;

    /// Sends a help message to the user.
    async fn send_help_msg(&self, chat_id: ChatId) -> Result<()>;

    /// Answers an inline query with `cards`. Answers are personal: every card
    /// carries the sender's referral link.
    async fn answer_inline_query(&self, query_id: &str, cards: Vec<ShareCard>) -> Result<()>;
}

/// Telegram messaging service.
pub struct TelegramMessagingService {
    bot: Bot,
}

impl TelegramMessagingService {
    /// Creates a service sending through `bot`.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessagingService for TelegramMessagingService {
    async fn send_start_msg(&self, chat_id: ChatId, launch_url: Url) -> Result<()> {
        self.bot
            .send_message(chat_id, START_TEXT)
            .reply_markup(build_open_app_keyboard(OPEN_APP_BUTTON, launch_url))
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }

    async fn send_help_msg(&self, chat_id: ChatId) -> Result<()> {
        self.bot
            .send_message(chat_id, Command::descriptions().to_string())
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }

    async fn answer_inline_query(&self, query_id: &str, cards: Vec<ShareCard>) -> Result<()> {
        let results: Vec<InlineQueryResult> =
            cards.into_iter().map(ShareCard::into_inline_result).collect();

        self.bot
            .answer_inline_query(query_id.to_string(), results)
            .is_personal(true)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }
}
