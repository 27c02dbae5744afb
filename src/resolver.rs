use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// An owner/name pair identifying a repository on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPath {
    /// Owner or organization login
    pub owner: String,
    /// Repository name, with any `.git` suffix stripped
    pub name: String,
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

static REPO_URL_RE: Lazy<Regex> = Lazy::new(|| {
    // the host must actually be github.com (subdomains allowed), and
    // owner/repo must be terminal apart from an optional trailing slash
    Regex::new(r"^(?:https?://)?(?:[A-Za-z0-9-]+\.)*github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)/?$")
        .expect("repo URL regex is valid")
});

/// Parses a user-supplied GitHub URL into an owner/name pair
///
/// Returns `None` for anything that does not contain `<owner>/<repo>` right
/// after a `github.com` host segment. Callers should surface `None` as a
/// user-facing validation message, not a crash.
pub fn parse_repo_url(url: &str) -> Option<RepoPath> {
    let caps = REPO_URL_RE.captures(url.trim())?;
    let owner = caps.get(1)?.as_str().to_string();
    let name = caps.get(2)?.as_str().trim_end_matches(".git").to_string();

    if owner.is_empty() || name.is_empty() {
        return None;
    }

    Some(RepoPath { owner, name })
}
