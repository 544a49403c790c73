use std::sync::Arc;

use chrono::Utc;
use teloxide::types::{
    Chat, ChatId, ChatKind, ChatPrivate, MediaKind, MediaText, Message, MessageCommon, MessageId,
    MessageKind,
};

use crate::{
    bot_handler::{BotHandler, BotHandlerError, Command},
    deep_link::MiniAppLinks,
    messaging::MockMessagingService,
};

pub const CHAT_ID: ChatId = ChatId(123);
pub const SENDER_ID: u64 = 99000111;

// Test harness wrapping a handler built on a mock messaging service.
pub struct TestHarness {
    bot_handler: BotHandler,
}

impl TestHarness {
    pub fn new(mock_messaging: MockMessagingService) -> Self {
        let links = MiniAppLinks::new("QuizBot", "app");
        Self { bot_handler: BotHandler::new(Arc::new(mock_messaging), links) }
    }

    // Simulates a command message in the test chat.
    pub async fn handle_command(&self, command: Command) -> Result<(), BotHandlerError> {
        let msg = mock_message(CHAT_ID, "/command");
        self.bot_handler.handle_commands(&msg, command).await
    }

    // Simulates an inline query typed by `SENDER_ID`.
    pub async fn handle_inline_query(&self, text: &str) -> Result<(), BotHandlerError> {
        self.bot_handler.handle_inline_query("inline-query-id", SENDER_ID, text).await
    }
}

// Helper to create a mock teloxide message to reduce boilerplate in tests
pub fn mock_message(chat_id: ChatId, text: &str) -> Message {
    Message {
        id: MessageId(1),
        date: Utc::now(),
        chat: Chat {
            id: chat_id,
            kind: ChatKind::Private(ChatPrivate {
                username: Some("test".to_string()),
                first_name: Some("Test".to_string()),
                last_name: None,
            }),
        },
        kind: MessageKind::Common(MessageCommon {
            media_kind: MediaKind::Text(MediaText {
                text: text.to_string(),
                entities: vec![],
                link_preview_options: None,
            }),
            reply_to_message: None,
            reply_markup: None,
            edit_date: None,
            author_signature: None,
            has_protected_content: false,
            is_automatic_forward: false,
            effect_id: None,
            forward_origin: None,
            external_reply: None,
            quote: None,
            reply_to_story: None,
            sender_boost_count: None,
            is_from_offline: false,
            business_connection_id: None,
        }),
        from: None,
        is_topic_message: false,
        sender_business_bot: None,
        sender_chat: None,
        thread_id: None,
        via_bot: None,
    }
}
