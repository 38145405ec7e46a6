//! Build command parsing.
//!
//! A build command looks like `/build https://github.com/<owner>/<name>/tree/<branch>`.
//! Everything after `/tree/` is the branch, so branch names containing
//! slashes (`feature/foo`) survive intact.

use std::fmt;
use std::hash::{Hash, Hasher};

use url::Url;

use crate::error::{BuildError, Result};

/// A GitHub repository identifier of the form `owner/name`.
///
/// Equality and hashing ignore ASCII case; the original casing is kept for
/// display, API calls and image tags.
#[derive(Debug, Clone)]
pub struct RepositoryId {
    owner: String,
    name: String,
}

impl RepositoryId {
    /// Creates an identifier from its parts.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parses a `owner/name` string.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// The owning user or organisation, original casing.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// The repository name, original casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name` in original casing.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Lower-cased `owner/name`, used as the workflow lookup key.
    pub fn canonical(&self) -> String {
        self.full_name().to_ascii_lowercase()
    }
}

impl PartialEq for RepositoryId {
    fn eq(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for RepositoryId {}

impl Hash for RepositoryId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A request to build one branch of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Repository to build.
    pub repository: RepositoryId,
    /// Branch to build; may contain `/`.
    pub branch: String,
}

/// Returns true if `text` starts with one of the recognised command tokens.
pub fn is_build_command<S: AsRef<str>>(text: &str, commands: &[S]) -> bool {
    commands.iter().any(|c| text.starts_with(c.as_ref()))
}

/// Parses a chat message into a build request.
///
/// Returns `None` when the message is not a build command at all, so the
/// caller can stay silent.
pub fn parse_command<S: AsRef<str>>(text: &str, commands: &[S]) -> Option<Result<BuildRequest>> {
    if !is_build_command(text, commands) {
        return None;
    }

    let Some(link) = text.split_whitespace().nth(1) else {
        return Some(Err(BuildError::MissingRepositoryLink));
    };

    Some(parse_tree_url(link))
}

/// Extracts repository and branch from a `https://github.com/<owner>/<name>/tree/<branch>` URL.
pub fn parse_tree_url(link: &str) -> Result<BuildRequest> {
    let invalid = || BuildError::InvalidRepositoryUrl(link.to_string());

    // Discord users wrap links in <> to suppress embeds
    let trimmed = link.trim_start_matches('<').trim_end_matches('>');
    let url = Url::parse(trimmed).map_err(|_| invalid())?;

    if url.scheme() != "https" || !matches!(url.host_str(), Some("github.com" | "www.github.com")) {
        return Err(invalid());
    }

    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
    match segments.as_slice() {
        [owner, name, "tree", branch @ ..] if !owner.is_empty() && !name.is_empty() => {
            let branch = branch.join("/");
            let branch = branch.trim_end_matches('/');
            if branch.is_empty() {
                return Err(invalid());
            }
            Ok(BuildRequest {
                repository: RepositoryId::new(*owner, *name),
                branch: branch.to_string(),
            })
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_COMMANDS;

    #[test]
    fn test_repository_id_case_insensitive() {
        let a = RepositoryId::new("Ethereum", "Go-Ethereum");
        let b = RepositoryId::parse("ethereum/go-ethereum").unwrap();
        let c = RepositoryId::parse("ETHEREUM/GO-ETHEREUM").unwrap();

        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.canonical(), "ethereum/go-ethereum");
        assert_eq!(a.to_string(), "Ethereum/Go-Ethereum");
        assert_eq!(a.owner(), "Ethereum");
    }

    #[test]
    fn test_repository_id_parse_rejects_malformed() {
        assert!(RepositoryId::parse("nodash").is_none());
        assert!(RepositoryId::parse("/name").is_none());
        assert!(RepositoryId::parse("owner/").is_none());
        assert!(RepositoryId::parse("a/b/c").is_none());
    }

    #[test]
    fn test_parse_tree_url_with_slashed_branch() {
        let req = parse_tree_url("https://github.com/owner/name/tree/my/branch").unwrap();
        assert_eq!(req.repository.full_name(), "owner/name");
        assert_eq!(req.branch, "my/branch");
    }

    #[test]
    fn test_parse_tree_url_trailing_slash_and_brackets() {
        let req = parse_tree_url("<https://github.com/sigp/lighthouse/tree/unstable/>").unwrap();
        assert_eq!(req.repository.full_name(), "sigp/lighthouse");
        assert_eq!(req.branch, "unstable");
    }

    #[test]
    fn test_parse_tree_url_failures() {
        for link in [
            "https://github.com/owner/name",
            "https://github.com/owner/name/blob/main/README.md",
            "https://github.com/owner/name/tree/",
            "https://gitlab.com/owner/name/tree/main",
            "http://github.com/owner/name/tree/main",
            "github.com/owner/name/tree/main",
            "not a url",
        ] {
            assert!(
                matches!(parse_tree_url(link), Err(BuildError::InvalidRepositoryUrl(_))),
                "expected failure for {}",
                link
            );
        }
    }

    #[test]
    fn test_parse_command_not_a_command() {
        assert!(parse_command("hello there", DEFAULT_COMMANDS).is_none());
        assert!(parse_command("please /build this", DEFAULT_COMMANDS).is_none());
    }

    #[test]
    fn test_parse_command_missing_argument() {
        let result = parse_command("/build", DEFAULT_COMMANDS).unwrap();
        assert!(matches!(result, Err(BuildError::MissingRepositoryLink)));

        let result = parse_command("/barnabas   ", DEFAULT_COMMANDS).unwrap();
        assert!(matches!(result, Err(BuildError::MissingRepositoryLink)));
    }

    #[test]
    fn test_parse_command_alias_and_bot_suffix() {
        let req = parse_command(
            "/barnabas https://github.com/ethereum/go-ethereum/tree/master",
            DEFAULT_COMMANDS,
        )
        .unwrap()
        .unwrap();
        assert_eq!(req.repository.full_name(), "ethereum/go-ethereum");
        assert_eq!(req.branch, "master");

        let req = parse_command(
            "/build@SomeBot  https://github.com/sigp/lighthouse/tree/unstable",
            DEFAULT_COMMANDS,
        )
        .unwrap()
        .unwrap();
        assert_eq!(req.branch, "unstable");
    }
}
