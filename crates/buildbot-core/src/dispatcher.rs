//! The build dispatcher: parse, resolve, trigger, reply.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::command::{parse_command, BuildRequest};
use crate::config::DispatcherConfig;
use crate::error::{BuildError, ErrorKind, Result};
use crate::github::{BuildBackend, GithubClient};
use crate::images::image_tags;
use crate::reply::{render_error, render_success, Markup};
use crate::resolver::resolve;
use crate::workflows::docker_base;

/// A successfully triggered build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTriggered {
    /// What was built.
    pub request: BuildRequest,
    /// Workflow file that was dispatched.
    pub workflow: &'static str,
    /// Image tags the run will publish.
    pub images: Vec<String>,
    /// Best-effort link to the run.
    ///
    /// This is the newest run listed after the dispatch, which may belong to
    /// an unrelated build. Falls back to the builder's actions page when the
    /// listing is empty.
    pub run_url: String,
}

/// Turns chat commands into GitHub Actions workflow runs.
///
/// Stateless apart from its configuration; one instance is shared by all
/// transports.
pub struct BuildDispatcher {
    config: DispatcherConfig,
    backend: Arc<dyn BuildBackend>,
}

impl BuildDispatcher {
    /// Creates a dispatcher talking to GitHub.
    pub fn new(config: DispatcherConfig) -> Result<Self> {
        let backend = GithubClient::new(&config)?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Creates a dispatcher with a custom backend.
    pub fn with_backend(config: DispatcherConfig, backend: Arc<dyn BuildBackend>) -> Self {
        Self { config, backend }
    }

    /// Returns the dispatcher configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Handles a chat message.
    ///
    /// Returns `None` if the message is not a build command.
    pub async fn handle(&self, text: &str) -> Option<Result<BuildTriggered>> {
        let request = match parse_command(text, self.config.commands.as_slice())? {
            Ok(request) => request,
            Err(e) => {
                debug!(text = %text, error = %e, "Rejected build command");
                return Some(Err(e));
            }
        };

        let outcome = self.trigger(&request).await;
        match &outcome {
            Ok(triggered) => info!(
                repository = %request.repository,
                branch = %request.branch,
                workflow = triggered.workflow,
                run_url = %triggered.run_url,
                images = %triggered.images.join(", "),
                "Build triggered"
            ),
            Err(e) if e.kind() == ErrorKind::UnsupportedRepository => info!(
                repository = %request.repository,
                branch = %request.branch,
                "Unsupported repository"
            ),
            Err(e) => warn!(
                repository = %request.repository,
                branch = %request.branch,
                error = %e,
                "Unable to trigger build"
            ),
        }
        Some(outcome)
    }

    /// Handles a chat message and renders the reply for `markup`.
    pub async fn reply(&self, text: &str, markup: Markup) -> Option<String> {
        let reply = match self.handle(text).await? {
            Ok(triggered) => render_success(&triggered, markup),
            Err(e) => render_error(&e, markup),
        };
        Some(reply)
    }

    async fn trigger(&self, request: &BuildRequest) -> Result<BuildTriggered> {
        let resolution = resolve(self.backend.as_ref(), &request.repository).await?;

        let base = docker_base(resolution.workflow).ok_or_else(|| {
            BuildError::Configuration(format!("no image name in workflow {}", resolution.workflow))
        })?;
        let fork_owner = resolution.is_fork().then(|| request.repository.owner());
        let images = image_tags(&self.config.registry_prefix, base, &request.branch, fork_owner);

        self.backend
            .dispatch_workflow(resolution.workflow, request)
            .await?;

        // Give GitHub a moment to list the new run
        if !self.config.run_lookup_delay.is_zero() {
            tokio::time::sleep(self.config.run_lookup_delay).await;
        }

        let run_url = self
            .backend
            .latest_run_url()
            .await?
            .unwrap_or_else(|| self.config.builder_actions_url());

        Ok(BuildTriggered {
            request: request.clone(),
            workflow: resolution.workflow,
            images,
            run_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{INVALID_URL_TEXT, MISSING_LINK_TEXT, TRIGGER_FAILED_TEXT};
    use crate::testing::{MockBackend, RUN_URL};
    use std::time::Duration;

    fn dispatcher(backend: Arc<MockBackend>) -> BuildDispatcher {
        let config = DispatcherConfig::new("token").with_run_lookup_delay(Duration::ZERO);
        BuildDispatcher::with_backend(config, backend)
    }

    #[tokio::test]
    async fn test_non_command_is_ignored() {
        let backend = Arc::new(MockBackend::new());
        let d = dispatcher(Arc::clone(&backend));

        assert!(d.handle("good morning").await.is_none());
        assert!(d.reply("good morning", Markup::Plain).await.is_none());
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_argument_makes_no_calls() {
        let backend = Arc::new(MockBackend::new());
        let d = dispatcher(Arc::clone(&backend));

        let reply = d.reply("/build", Markup::Plain).await;

        assert_eq!(reply.as_deref(), Some(MISSING_LINK_TEXT));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_url_reply() {
        let backend = Arc::new(MockBackend::new());
        let d = dispatcher(Arc::clone(&backend));

        let reply = d
            .reply("/build https://github.com/ethereum/go-ethereum", Markup::Plain)
            .await;

        assert_eq!(reply.as_deref(), Some(INVALID_URL_TEXT));
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_direct_repository() {
        let backend = Arc::new(MockBackend::new());
        let d = dispatcher(Arc::clone(&backend));

        let triggered = d
            .handle("/build https://github.com/ethereum/go-ethereum/tree/master")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(triggered.workflow, "build-push-geth.yml");
        assert_eq!(triggered.images, vec!["ethpandaops/geth:master"]);
        assert_eq!(triggered.run_url, RUN_URL);
        assert_eq!(
            backend.calls().await,
            vec![
                "dispatch build-push-geth.yml ethereum/go-ethereum@master".to_string(),
                "runs".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_fork_repository() {
        let backend =
            Arc::new(MockBackend::new().with_fork("someuser/go-ethereum", "ethereum/go-ethereum"));
        let d = dispatcher(Arc::clone(&backend));

        let reply = d
            .reply(
                "/build https://github.com/someuser/go-ethereum/tree/patch-1",
                Markup::Plain,
            )
            .await
            .unwrap();

        assert!(reply.contains("ethpandaops/geth:someuser-patch-1"));
        assert_eq!(
            backend.calls().await,
            vec![
                "repository someuser/go-ethereum".to_string(),
                "dispatch build-push-geth.yml someuser/go-ethereum@patch-1".to_string(),
                "runs".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_unsupported_repository_does_not_dispatch() {
        let backend = Arc::new(MockBackend::new().with_original("alice/original"));
        let d = dispatcher(Arc::clone(&backend));

        let reply = d
            .reply("/build https://github.com/alice/original/tree/main", Markup::Plain)
            .await;

        assert_eq!(reply.as_deref(), Some(TRIGGER_FAILED_TEXT));
        assert_eq!(backend.calls().await, vec!["repository alice/original".to_string()]);
    }

    #[tokio::test]
    async fn test_dispatch_failure() {
        let backend = Arc::new(MockBackend::new().with_failing_dispatch());
        let d = dispatcher(Arc::clone(&backend));

        let outcome = d
            .handle("/build https://github.com/sigp/lighthouse/tree/unstable")
            .await
            .unwrap();

        let err = outcome.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(!backend.calls().await.contains(&"runs".to_string()));
    }

    #[tokio::test]
    async fn test_run_listing_failure_is_upstream_error() {
        let backend = Arc::new(MockBackend::new().with_failing_runs());
        let d = dispatcher(Arc::clone(&backend));

        let reply = d
            .reply("/build https://github.com/sigp/lighthouse/tree/unstable", Markup::Plain)
            .await;

        assert_eq!(reply.as_deref(), Some(TRIGGER_FAILED_TEXT));
    }

    #[tokio::test]
    async fn test_empty_run_listing_falls_back_to_actions_page() {
        let backend = Arc::new(MockBackend::new().with_run_url(None));
        let d = dispatcher(Arc::clone(&backend));

        let triggered = d
            .handle("/build https://github.com/prysmaticlabs/prysm/tree/develop")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            triggered.run_url,
            "https://github.com/ethpandaops/eth-client-docker-image-builder/actions"
        );
        assert_eq!(
            triggered.images,
            vec![
                "ethpandaops/prysm-beacon-chain:develop",
                "ethpandaops/prysm-validator:develop",
            ]
        );
    }
}
