//! Error types for the Telegram transport.

use thiserror::Error;

/// Errors that can occur in the Telegram transport.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_TOKEN environment variable.")]
    NoToken,

    /// Failed to reach the Bot API at start-up.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;
