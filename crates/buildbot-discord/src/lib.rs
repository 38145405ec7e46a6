//! Discord transport for the build bot.
//!
//! Connects to the gateway with the message-content intent, passes every
//! human-authored message to the shared
//! [`BuildDispatcher`](buildbot_core::BuildDispatcher) and posts the reply
//! back to the same channel.

pub mod bot;
pub mod error;

pub use bot::DiscordBot;
pub use error::{DiscordError, Result};
