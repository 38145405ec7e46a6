//! Telegram bot wiring.

use std::sync::Arc;

use buildbot_core::{BuildDispatcher, Markup};
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters, ThreadId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{Result, TelegramError};

/// The Telegram side of the build bot.
pub struct TelegramBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared build dispatcher.
    dispatcher: Arc<BuildDispatcher>,
}

impl TelegramBot {
    /// Creates a bot with the given token.
    pub fn new(token: impl Into<String>, dispatcher: Arc<BuildDispatcher>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TelegramError::NoToken);
        }

        Ok(Self {
            bot: Bot::new(token),
            dispatcher,
        })
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Polls for updates until `shutdown` fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let dispatcher = Arc::clone(&self.dispatcher);
        let handler = Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { handle_message(bot, msg, dispatcher).await }
        });

        let mut updates = Dispatcher::builder(self.bot, handler)
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd.kind);
            })
            .build();

        let token = updates.shutdown_token();
        tokio::spawn(async move {
            // Either a shutdown signal or the sender being dropped stops polling
            let _ = shutdown.changed().await;
            match token.shutdown() {
                Ok(stopped) => {
                    stopped.await;
                    info!("Telegram bot stopped");
                }
                Err(_) => debug!("Telegram dispatcher was not running at shutdown"),
            }
        });

        updates.dispatch().await;
        Ok(())
    }
}

/// Handle an incoming message.
async fn handle_message(
    bot: Bot,
    msg: Message,
    dispatcher: Arc<BuildDispatcher>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    debug!(chat_id = %msg.chat.id, text = %text, "Message received");

    let Some(reply) = dispatcher.reply(text, Markup::TelegramMarkdownV2).await else {
        return Ok(());
    };

    info!(chat_id = %msg.chat.id, text = %text, "Replying to build command");
    debug!(chat_id = %msg.chat.id, "Chat response:\n{}", reply);

    let mut req = bot
        .send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_parameters(ReplyParameters::new(msg.id));

    if let Some(tid) = reply_thread(msg.is_topic_message, msg.thread_id) {
        req = req.message_thread_id(tid);
    }

    if let Err(e) = req.await {
        warn!(chat_id = %msg.chat.id, error = %e, "Failed to send reply");
    }

    Ok(())
}

/// Thread to reply into: only forum topic messages carry one worth keeping.
fn reply_thread(is_topic_message: bool, thread_id: Option<ThreadId>) -> Option<ThreadId> {
    if is_topic_message {
        thread_id
    } else {
        None
    }
}
