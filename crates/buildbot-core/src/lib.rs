//! Chat-driven Docker image builds.
//!
//! This crate turns a chat command such as
//! `/build https://github.com/ethereum/go-ethereum/tree/master` into a
//! GitHub Actions workflow dispatch on the image builder repository, and
//! renders a reply listing the images the run will publish.
//!
//! It knows nothing about chat platforms: transports hand it the message
//! text and post back whatever reply it returns.
//!
//! # Example
//!
//! ```no_run
//! use buildbot_core::{BuildDispatcher, DispatcherConfig, Markup};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = BuildDispatcher::new(DispatcherConfig::new("ghp_xxx"))?;
//!
//!     let text = "/build https://github.com/sigp/lighthouse/tree/unstable";
//!     if let Some(reply) = dispatcher.reply(text, Markup::Plain).await {
//!         println!("{}", reply);
//!     }
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod github;
pub mod images;
pub mod reply;
pub mod resolver;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{parse_command, BuildRequest, RepositoryId};
pub use config::DispatcherConfig;
pub use dispatcher::{BuildDispatcher, BuildTriggered};
pub use error::{BuildError, ErrorKind, Result};
pub use github::{BuildBackend, GithubClient, RepositoryMetadata};
pub use images::image_tags;
pub use reply::Markup;
pub use resolver::{resolve, Resolution};
