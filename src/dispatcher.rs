use std::sync::Arc;

use teloxide::{
    dispatching::{DefaultKey, DpHandlerDescription},
    dptree::deps,
    prelude::*,
    types::Update,
};

use crate::bot_handler::{BotHandler, BotHandlerError, Command};

/// Type alias to simplify handler type signatures.
type BotResultHandler =
    Handler<'static, DependencyMap, Result<(), BotHandlerError>, DpHandlerDescription>;

/// Encapsulates the dispatcher logic for the bot.
pub struct BotDispatcher {
    handler: Arc<BotHandler>,
}

impl BotDispatcher {
    /// Creates a new `BotDispatcher`.
    pub fn new(handler: Arc<BotHandler>) -> Self {
        Self { handler }
    }

    /// Builds the dispatcher using the provided `bot` instance.
    #[must_use = "This function returns a Dispatcher that should not be ignored"]
    pub fn build(&self, bot: Bot) -> Dispatcher<Bot, BotHandlerError, DefaultKey> {
        Dispatcher::builder(
            bot,
            dptree::entry()
                .branch(self.build_commands_branch())
                .branch(self.build_inline_queries_branch()),
        )
        .dependencies(deps![self.handler.clone()])
        .enable_ctrlc_handler()
        .build()
    }

    /// Builds the branch for handling text commands.
    fn build_commands_branch(&self) -> BotResultHandler {
        Update::filter_message().filter_command::<Command>().endpoint(
            |msg: Message, cmd: Command, handler: Arc<BotHandler>| async move {
                handler.handle_commands(&msg, cmd).await
            },
        )
    }

    /// Builds the branch answering inline queries with share cards.
    fn build_inline_queries_branch(&self) -> BotResultHandler {
        Update::filter_inline_query().endpoint(
            |query: InlineQuery, handler: Arc<BotHandler>| async move {
                handler.handle_inline_query(&query.id, query.from.id.0, &query.query).await
            },
        )
    }
}
