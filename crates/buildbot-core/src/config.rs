//! Dispatcher configuration.

use std::time::Duration;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Owner of the repository hosting the build workflows.
pub const DEFAULT_BUILDER_OWNER: &str = "ethpandaops";

/// Repository hosting the build workflows.
pub const DEFAULT_BUILDER_REPO: &str = "eth-client-docker-image-builder";

/// Ref of the builder repository the workflows run from.
pub const DEFAULT_BUILDER_REF: &str = "master";

/// Docker Hub namespace the built images are pushed to.
pub const DEFAULT_REGISTRY_PREFIX: &str = "ethpandaops";

/// Value of the `X-GitHub-Api-Version` header.
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Value of the `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = "build-bot/1";

/// Commands that trigger a build.
pub const DEFAULT_COMMANDS: &[&str] = &["/build", "/barnabas"];

/// Configuration for the build dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Bearer token for the GitHub API.
    pub github_token: String,
    /// GitHub REST API base URL.
    pub api_base: String,
    /// Owner of the workflow-hosting repository.
    pub builder_owner: String,
    /// Name of the workflow-hosting repository.
    pub builder_repo: String,
    /// Ref of the workflow-hosting repository to dispatch on.
    pub builder_ref: String,
    /// Registry namespace used in image tags.
    pub registry_prefix: String,
    /// `X-GitHub-Api-Version` header value.
    pub api_version: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Pause between the dispatch and the run listing.
    pub run_lookup_delay: Duration,
    /// Command tokens recognised as build commands.
    pub commands: Vec<String>,
}

impl DispatcherConfig {
    /// Creates a config with default values and the given GitHub token.
    pub fn new(github_token: impl Into<String>) -> Self {
        Self {
            github_token: github_token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            builder_owner: DEFAULT_BUILDER_OWNER.to_string(),
            builder_repo: DEFAULT_BUILDER_REPO.to_string(),
            builder_ref: DEFAULT_BUILDER_REF.to_string(),
            registry_prefix: DEFAULT_REGISTRY_PREFIX.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            run_lookup_delay: Duration::from_millis(1500),
            commands: DEFAULT_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Sets the API base URL. A trailing slash is stripped.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the workflow-hosting repository.
    pub fn with_builder_repo(mut self, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        self.builder_owner = owner.into();
        self.builder_repo = repo.into();
        self
    }

    /// Sets the ref of the workflow-hosting repository.
    pub fn with_builder_ref(mut self, builder_ref: impl Into<String>) -> Self {
        self.builder_ref = builder_ref.into();
        self
    }

    /// Sets the registry namespace.
    pub fn with_registry_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.registry_prefix = prefix.into();
        self
    }

    /// Sets the delay before listing runs.
    pub fn with_run_lookup_delay(mut self, delay: Duration) -> Self {
        self.run_lookup_delay = delay;
        self
    }

    /// Replaces the recognised command tokens.
    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// Full name (`owner/repo`) of the workflow-hosting repository.
    pub fn builder_full_name(&self) -> String {
        format!("{}/{}", self.builder_owner, self.builder_repo)
    }

    /// Web page listing the builder's workflow runs.
    pub fn builder_actions_url(&self) -> String {
        format!("https://github.com/{}/actions", self.builder_full_name())
    }
}
