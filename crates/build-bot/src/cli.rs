//! Command-line and environment configuration.

use std::time::Duration;

use buildbot_core::config::{DEFAULT_API_BASE, DEFAULT_REGISTRY_PREFIX};
use buildbot_core::DispatcherConfig;
use clap::Parser;

/// Build Bot - trigger Docker image builds from Telegram and Discord
#[derive(Parser, Debug)]
#[command(name = "build-bot")]
#[command(about = "Chat bot that triggers Docker image builds on GitHub Actions")]
pub struct Args {
    /// Telegram bot token (Telegram is disabled when unset)
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Discord bot token (Discord is disabled when unset)
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub discord_token: Option<String>,

    /// GitHub token allowed to dispatch workflows on the builder repository
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Registry namespace used in the reported image tags
    #[arg(long, default_value = DEFAULT_REGISTRY_PREFIX)]
    pub registry_prefix: String,

    /// Delay before looking up the triggered run, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub run_lookup_delay_ms: u64,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "build_bot=info,buildbot_core=info,buildbot_telegram=info,buildbot_discord=info,teloxide=warn,serenity=warn",
            1 => "build_bot=debug,buildbot_core=debug,buildbot_telegram=debug,buildbot_discord=debug,teloxide=info,serenity=info",
            2 => "build_bot=trace,buildbot_core=trace,buildbot_telegram=trace,buildbot_discord=trace,teloxide=debug,serenity=debug",
            _ => "trace",
        }
    }

    /// Telegram token, if set and non-empty.
    pub fn telegram_token(&self) -> Option<&str> {
        non_empty(self.telegram_token.as_deref())
    }

    /// Discord token, if set and non-empty.
    pub fn discord_token(&self) -> Option<&str> {
        non_empty(self.discord_token.as_deref())
    }

    /// Builds the dispatcher configuration.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig::new(self.github_token.clone())
            .with_api_base(self.api_base.clone())
            .with_registry_prefix(self.registry_prefix.clone())
            .with_run_lookup_delay(Duration::from_millis(self.run_lookup_delay_ms))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
