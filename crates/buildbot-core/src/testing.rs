//! In-memory backend for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::command::{BuildRequest, RepositoryId};
use crate::error::{BuildError, Result};
use crate::github::{BuildBackend, RepositoryMetadata};

pub(crate) const RUN_URL: &str =
    "https://github.com/ethpandaops/eth-client-docker-image-builder/actions/runs/42";

/// Mock backend that records every call it receives.
pub(crate) struct MockBackend {
    repositories: HashMap<String, RepositoryMetadata>,
    dispatch_fails: bool,
    runs_fail: bool,
    run_url: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            repositories: HashMap::new(),
            dispatch_fails: false,
            runs_fail: false,
            run_url: Some(RUN_URL.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fork(mut self, repo: &str, parent: &str) -> Self {
        self.repositories.insert(
            repo.to_ascii_lowercase(),
            RepositoryMetadata {
                fork: true,
                parent: RepositoryId::parse(parent),
            },
        );
        self
    }

    pub fn with_original(mut self, repo: &str) -> Self {
        self.repositories.insert(
            repo.to_ascii_lowercase(),
            RepositoryMetadata {
                fork: false,
                parent: None,
            },
        );
        self
    }

    pub fn with_failing_dispatch(mut self) -> Self {
        self.dispatch_fails = true;
        self
    }

    pub fn with_failing_runs(mut self) -> Self {
        self.runs_fail = true;
        self
    }

    pub fn with_run_url(mut self, url: Option<&str>) -> Self {
        self.run_url = url.map(str::to_string);
        self
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl BuildBackend for MockBackend {
    async fn repository(&self, repository: &RepositoryId) -> Result<RepositoryMetadata> {
        self.calls
            .lock()
            .await
            .push(format!("repository {}", repository));
        self.repositories
            .get(&repository.canonical())
            .cloned()
            .ok_or_else(|| BuildError::RepositoryLookup {
                repository: repository.full_name(),
                reason: "HTTP 404 Not Found".to_string(),
            })
    }

    async fn dispatch_workflow(&self, workflow: &str, request: &BuildRequest) -> Result<()> {
        self.calls.lock().await.push(format!(
            "dispatch {} {}@{}",
            workflow, request.repository, request.branch
        ));
        if self.dispatch_fails {
            return Err(BuildError::upstream("workflow dispatch", "HTTP 500"));
        }
        Ok(())
    }

    async fn latest_run_url(&self) -> Result<Option<String>> {
        self.calls.lock().await.push("runs".to_string());
        if self.runs_fail {
            return Err(BuildError::upstream("run listing", "HTTP 502"));
        }
        Ok(self.run_url.clone())
    }
}
