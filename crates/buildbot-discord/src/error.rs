//! Error types for the Discord transport.

use thiserror::Error;

/// Errors that can occur in the Discord transport.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// Bot token not provided.
    #[error("Discord bot token not set. Set DISCORD_TOKEN environment variable.")]
    NoToken,

    /// Gateway client error.
    #[error("Discord client error: {0}")]
    Client(#[from] serenity::Error),
}

/// Result type for Discord operations.
pub type Result<T> = std::result::Result<T, DiscordError>;
