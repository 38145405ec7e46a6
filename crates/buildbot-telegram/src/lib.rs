//! Telegram transport for the build bot.
//!
//! Long-polls the Bot API, hands every text message to the shared
//! [`BuildDispatcher`](buildbot_core::BuildDispatcher) and replies with
//! `MarkdownV2` in the same chat, topic and reply thread.

pub mod bot;
pub mod error;

pub use bot::TelegramBot;
pub use error::{Result, TelegramError};
