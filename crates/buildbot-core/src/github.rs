//! GitHub REST API client.
//!
//! Three calls are needed to trigger a build: repository metadata (for fork
//! resolution), workflow dispatch, and the run listing used to find a link
//! to show the user. They sit behind [`BuildBackend`] so the dispatcher can
//! be exercised without a network.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::command::{BuildRequest, RepositoryId};
use crate::config::DispatcherConfig;
use crate::error::{BuildError, Result};

/// Fork information for a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMetadata {
    /// Whether the repository is a fork.
    pub fork: bool,
    /// The repository it was forked from, if any.
    pub parent: Option<RepositoryId>,
}

/// Operations the dispatcher needs from the build-orchestration system.
#[async_trait]
pub trait BuildBackend: Send + Sync {
    /// Fetches fork information for a repository.
    async fn repository(&self, repository: &RepositoryId) -> Result<RepositoryMetadata>;

    /// Dispatches a run of `workflow` building `request`.
    async fn dispatch_workflow(&self, workflow: &str, request: &BuildRequest) -> Result<()>;

    /// Returns the web URL of the most recently listed run, if any.
    async fn latest_run_url(&self) -> Result<Option<String>>;
}

/// Body of `POST .../actions/workflows/{id}/dispatches`.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchRequest<'a> {
    /// Ref of the workflow-hosting repository.
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
    /// Workflow inputs.
    pub inputs: DispatchInputs<'a>,
}

/// Inputs passed to the build workflow.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchInputs<'a> {
    /// Repository to build, `owner/name`.
    pub repository: String,
    /// Branch to build.
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    fork: bool,
    parent: Option<ParentRepository>,
}

#[derive(Debug, Deserialize)]
struct ParentRepository {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunsResponse {
    #[serde(default)]
    workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRun {
    html_url: String,
}

/// GitHub API client authenticated with a bearer token.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    builder: String,
    builder_ref: String,
}

impl GithubClient {
    /// Creates a client from the dispatcher configuration.
    pub fn new(config: &DispatcherConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| BuildError::Configuration(format!("invalid API version: {}", e)))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| BuildError::Configuration(format!("invalid user agent: {}", e)))?,
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.github_token.trim()))
            .map_err(|e| BuildError::Configuration(format!("invalid GitHub token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BuildError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            builder: config.builder_full_name(),
            builder_ref: config.builder_ref.clone(),
        })
    }

    fn builder_url(&self, path: &str) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.builder, path)
    }
}

#[async_trait]
impl BuildBackend for GithubClient {
    async fn repository(&self, repository: &RepositoryId) -> Result<RepositoryMetadata> {
        let lookup_failed = |reason: String| BuildError::RepositoryLookup {
            repository: repository.full_name(),
            reason,
        };

        let url = format!("{}/repos/{}", self.api_base, repository.full_name());
        debug!(url = %url, "Fetching repository metadata");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| lookup_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(lookup_failed(format!("HTTP {}", status)));
        }

        let body: RepositoryResponse = response
            .json()
            .await
            .map_err(|e| lookup_failed(format!("invalid response: {}", e)))?;

        let parent = match body.parent {
            Some(p) => Some(
                RepositoryId::parse(&p.full_name)
                    .ok_or_else(|| lookup_failed(format!("invalid parent name: {}", p.full_name)))?,
            ),
            None => None,
        };

        Ok(RepositoryMetadata {
            fork: body.fork,
            parent,
        })
    }

    async fn dispatch_workflow(&self, workflow: &str, request: &BuildRequest) -> Result<()> {
        let body = DispatchRequest {
            git_ref: &self.builder_ref,
            inputs: DispatchInputs {
                repository: request.repository.full_name(),
                git_ref: &request.branch,
            },
        };
        trace!("Dispatching workflow {}: {:?}", workflow, body);

        let response = self
            .http
            .post(self.builder_url(&format!("actions/workflows/{}/dispatches", workflow)))
            .json(&body)
            .send()
            .await
            .map_err(|e| BuildError::upstream("workflow dispatch", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BuildError::upstream(
                "workflow dispatch",
                format!("HTTP {}: {}", status, text),
            ));
        }

        Ok(())
    }

    async fn latest_run_url(&self) -> Result<Option<String>> {
        let response = self
            .http
            .get(self.builder_url("actions/runs"))
            .send()
            .await
            .map_err(|e| BuildError::upstream("run listing", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BuildError::upstream("run listing", format!("HTTP {}", status)));
        }

        let runs: WorkflowRunsResponse = response
            .json()
            .await
            .map_err(|e| BuildError::upstream("run listing", format!("invalid response: {}", e)))?;

        Ok(runs.workflow_runs.into_iter().next().map(|run| run.html_url))
    }
}
