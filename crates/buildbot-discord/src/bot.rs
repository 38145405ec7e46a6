//! Discord gateway wiring.

use std::sync::{Arc, OnceLock};

use buildbot_core::{BuildDispatcher, Markup};
use serenity::all::{Client, Context, EventHandler, GatewayIntents, Message, Ready, UserId};
use serenity::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{DiscordError, Result};

/// The Discord side of the build bot.
pub struct DiscordBot {
    token: String,
    dispatcher: Arc<BuildDispatcher>,
}

struct Handler {
    dispatcher: Arc<BuildDispatcher>,
    current_user: OnceLock<UserId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Discord connected");
        let _ = self.current_user.set(ready.user.id);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if should_ignore(msg.author.bot, msg.author.id, self.current_user.get().copied()) {
            return;
        }

        debug!(channel_id = %msg.channel_id, text = %msg.content, "Message received");

        let Some(reply) = self.dispatcher.reply(&msg.content, Markup::Discord).await else {
            return;
        };

        info!(channel_id = %msg.channel_id, text = %msg.content, "Replying to build command");
        if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
            warn!(channel_id = %msg.channel_id, error = %e, "Failed to send reply");
        }
    }
}

/// Messages from bots, including our own replies, are never commands.
fn should_ignore(author_is_bot: bool, author: UserId, own_id: Option<UserId>) -> bool {
    author_is_bot || own_id == Some(author)
}

impl DiscordBot {
    /// Creates a bot with the given token.
    pub fn new(token: impl Into<String>, dispatcher: Arc<BuildDispatcher>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(DiscordError::NoToken);
        }
        Ok(Self { token, dispatcher })
    }

    /// Connects to the gateway and handles messages until `shutdown` fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("Starting Discord bot...");

        let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
        let handler = Handler {
            dispatcher: self.dispatcher,
            current_user: OnceLock::new(),
        };

        let mut client = Client::builder(&self.token, intents)
            .event_handler(handler)
            .await?;

        let shard_manager = Arc::clone(&client.shard_manager);
        tokio::spawn(async move {
            let _ = shutdown.changed().await;
            shard_manager.shutdown_all().await;
            info!("Discord bot stopped");
        });

        client.start().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildbot_core::DispatcherConfig;

    #[test]
    fn test_ignores_bots_and_self() {
        let me = UserId::new(1);
        let someone = UserId::new(2);

        assert!(should_ignore(true, someone, Some(me)));
        assert!(should_ignore(false, me, Some(me)));
        assert!(!should_ignore(false, someone, Some(me)));
        assert!(!should_ignore(false, someone, None));
    }

    #[test]
    fn test_empty_token_rejected() {
        let dispatcher = Arc::new(BuildDispatcher::new(DispatcherConfig::new("gh")).unwrap());
        assert!(matches!(
            DiscordBot::new("", dispatcher),
            Err(DiscordError::NoToken)
        ));
    }
}
