//! Repository to workflow resolution.

use tracing::{debug, info};

use crate::command::RepositoryId;
use crate::error::{BuildError, Result};
use crate::github::BuildBackend;
use crate::workflows::workflow_for;

/// The workflow a repository builds with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Workflow file name in the builder repository.
    pub workflow: &'static str,
    /// Set when the repository was resolved through its fork parent.
    pub parent: Option<RepositoryId>,
}

impl Resolution {
    /// Whether the build comes from a fork of a supported repository.
    pub fn is_fork(&self) -> bool {
        self.parent.is_some()
    }
}

/// Resolves a repository to its build workflow.
///
/// Mapped repositories resolve without any network call. Anything else
/// must be a fork whose parent is mapped; unknown originals are refused.
pub async fn resolve(backend: &dyn BuildBackend, repository: &RepositoryId) -> Result<Resolution> {
    if let Some(workflow) = workflow_for(repository) {
        return Ok(Resolution {
            workflow,
            parent: None,
        });
    }

    debug!(repository = %repository, "Repository not in workflow map, checking for fork");
    let metadata = backend.repository(repository).await?;

    if !metadata.fork {
        return Err(BuildError::UnsupportedRepository(repository.full_name()));
    }

    let Some(parent) = metadata.parent else {
        return Err(BuildError::UnsupportedRepository(repository.full_name()));
    };

    match workflow_for(&parent) {
        Some(workflow) => {
            info!(repository = %repository, parent = %parent, "Found supported parent repository");
            Ok(Resolution {
                workflow,
                parent: Some(parent),
            })
        }
        None => Err(BuildError::UnsupportedRepository(repository.full_name())),
    }
}
