//! Error types for the build dispatcher.

use thiserror::Error;

/// Broad classification of a [`BuildError`].
///
/// Callers use this to decide how loudly to log a failure and which reply
/// to show; every kind is terminal for the command being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user sent something we could not understand.
    UserInput,
    /// The repository has no build workflow, directly or through its parent.
    UnsupportedRepository,
    /// A call to GitHub failed or returned a non-success status.
    Upstream,
    /// The dispatcher could not be set up.
    Configuration,
}

/// Errors that can occur while handling a build command.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The command had no URL argument.
    #[error("no repository link supplied")]
    MissingRepositoryLink,

    /// The URL argument is not a GitHub tree URL.
    #[error("unable to parse repository and branch from URL: {0}")]
    InvalidRepositoryUrl(String),

    /// Neither the repository nor its fork parent has a build workflow.
    #[error("unsupported repository: {0}")]
    UnsupportedRepository(String),

    /// Repository metadata could not be fetched.
    #[error("repository not found or inaccessible: {repository} ({reason})")]
    RepositoryLookup { repository: String, reason: String },

    /// A GitHub Actions call failed.
    #[error("{operation} failed: {reason}")]
    Upstream {
        operation: &'static str,
        reason: String,
    },

    /// Invalid dispatcher configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BuildError {
    /// Creates an upstream error for the named operation.
    pub fn upstream(operation: &'static str, reason: impl ToString) -> Self {
        BuildError::Upstream {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::MissingRepositoryLink | BuildError::InvalidRepositoryUrl(_) => {
                ErrorKind::UserInput
            }
            BuildError::UnsupportedRepository(_) => ErrorKind::UnsupportedRepository,
            BuildError::RepositoryLookup { .. } | BuildError::Upstream { .. } => {
                ErrorKind::Upstream
            }
            BuildError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

/// Result type for dispatcher operations.
pub type Result<T> = std::result::Result<T, BuildError>;
