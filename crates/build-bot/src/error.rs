//! Error types for the build bot binary.

use buildbot_core::BuildError;
use buildbot_discord::DiscordError;
use buildbot_telegram::TelegramError;
use thiserror::Error;

/// Errors that stop the bot process.
#[derive(Debug, Error)]
pub enum BotError {
    /// No chat transport configured.
    #[error("No chat transport configured. Set TELEGRAM_TOKEN and/or DISCORD_TOKEN.")]
    NoTransport,

    /// Dispatcher setup failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Telegram transport error.
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    /// Discord transport error.
    #[error(transparent)]
    Discord(#[from] DiscordError),

    /// A transport task panicked or was cancelled.
    #[error("Transport task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for the binary.
pub type Result<T> = std::result::Result<T, BotError>;
