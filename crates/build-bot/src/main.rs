//! Build Bot binary.
//!
//! Start the bot with:
//! ```bash
//! GITHUB_TOKEN=xxx TELEGRAM_TOKEN=xxx DISCORD_TOKEN=xxx cargo run -p build-bot
//! ```

mod cli;
mod error;

use std::sync::Arc;

use buildbot_core::workflows::supported_repositories;
use buildbot_core::BuildDispatcher;
use buildbot_discord::DiscordBot;
use buildbot_telegram::TelegramBot;
use clap::Parser;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::error::{BotError, Result};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load .env.local or .env before clap reads the environment
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(args).await {
        error!(error = %e, "Build bot exited with error");
        return Err(e.into());
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let telegram_token = args.telegram_token().map(str::to_string);
    let discord_token = args.discord_token().map(str::to_string);
    if telegram_token.is_none() && discord_token.is_none() {
        return Err(BotError::NoTransport);
    }

    let dispatcher = Arc::new(BuildDispatcher::new(args.dispatcher_config())?);
    info!(
        repositories = supported_repositories().count(),
        builder = %dispatcher.config().builder_full_name(),
        "Build dispatcher ready"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut transports: JoinSet<Result<()>> = JoinSet::new();

    if let Some(token) = telegram_token {
        let bot = TelegramBot::new(token, Arc::clone(&dispatcher))?;
        let username = bot.get_me().await?;
        info!(username = %username, "Started listening on Telegram");

        let shutdown = shutdown_rx.clone();
        transports.spawn(async move { bot.run(shutdown).await.map_err(BotError::from) });
    }

    if let Some(token) = discord_token {
        let bot = DiscordBot::new(token, Arc::clone(&dispatcher))?;
        let shutdown = shutdown_rx.clone();
        transports.spawn(async move { bot.run(shutdown).await.map_err(BotError::from) });
        info!("Discord bot started");
    }

    let mut first_error = None;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
        Some(finished) = transports.join_next() => {
            // A transport only returns on its own when something went wrong
            if let Err(e) = flatten(finished) {
                error!(error = %e, "Transport stopped unexpectedly");
                first_error = Some(e);
            }
        }
    }

    let _ = shutdown_tx.send(true);
    while let Some(finished) = transports.join_next().await {
        if let Err(e) = flatten(finished) {
            error!(error = %e, "Transport failed during shutdown");
            first_error.get_or_insert(e);
        }
    }

    info!("Stopped");
    first_error.map_or(Ok(()), Err)
}

fn flatten(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    joined?
}
