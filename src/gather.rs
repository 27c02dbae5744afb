use crate::error::{GeneratorError, Result};
use crate::github::{GitHubClient, RepositoryMetadata};
use crate::resolver::RepoPath;
use chrono::{Datelike, Utc};
use log::{info, warn};

/// Recognized build/dependency manifests, highest priority first
///
/// The first name with a matching tree entry whose content can be fetched
/// wins; scanning stops there.
pub const CONFIG_FILE_PRIORITY: &[&str] = &[
    "package.json",
    "composer.json",
    "requirements.txt",
    "pom.xml",
    "build.gradle",
    "Dockerfile",
];

/// Used for `[fullname]` when the repository owner login is unavailable
const FULLNAME_FALLBACK: &str = "The Project Authors";

/// The single config file selected from the repository tree, decoded
#[derive(Debug, Clone)]
pub struct ConfigFileSelection {
    /// Basename of the selected manifest (e.g. `package.json`)
    pub file_name: String,
    /// Decoded file content, embedded verbatim in the prompt
    pub content: String,
}

/// Everything fetched from GitHub that feeds prompt construction
#[derive(Debug)]
pub struct GatheredContext {
    /// Repository metadata, fetched fresh for this request
    pub metadata: RepositoryMetadata,
    /// All paths in the repository at the default branch, in API order
    pub file_paths: Vec<String>,
    /// At most one recognized config file with its decoded content
    pub config_file: Option<ConfigFileSelection>,
    /// License text with placeholders substituted, when one was requested
    /// and its template fetch succeeded
    pub license_text: Option<String>,
    /// Non-fatal license fetch failure, reported alongside a successful run
    pub license_error: Option<String>,
}

/// Gathers repository metadata, the recursive file tree, and the optional
/// license template and config file
///
/// Metadata and tree fetches must both succeed; the license and config-file
/// fetches are best-effort. The tree is fetched at the resolved default
/// branch — there is no fallback to a hardcoded branch name.
pub async fn gather(
    client: &GitHubClient,
    repo: &RepoPath,
    license_id: Option<&str>,
) -> Result<GatheredContext> {
    info!("Fetching repository metadata for {}", repo);
    let metadata = client.fetch_repository(repo).await?;

    let branch = metadata
        .default_branch
        .as_deref()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| {
            GeneratorError::Parse("Repository metadata did not include a default branch".into())
        })?
        .to_string();

    // The tree depends on the resolved branch; the license template does not,
    // so the two can be fetched together.
    let license_requested = license_id.filter(|id| !id.is_empty() && *id != "none");
    let (tree_result, license_result) = tokio::join!(
        client.fetch_tree(repo, &branch),
        fetch_license_text(client, &metadata, license_requested),
    );

    let file_paths = tree_result?;
    info!("Fetched {} tree entries at branch {}", file_paths.len(), branch);

    let (license_text, license_error) = license_result;

    let config_file = select_config_file(client, repo, &branch, &file_paths).await;

    Ok(GatheredContext {
        metadata,
        file_paths,
        config_file,
        license_text,
        license_error,
    })
}

/// Best-effort license template fetch with placeholder substitution
///
/// Returns `(text, error)`; a failure is recorded, never propagated, so the
/// README generation can still succeed while the license fetch is reported
/// separately.
async fn fetch_license_text(
    client: &GitHubClient,
    metadata: &RepositoryMetadata,
    license_id: Option<&str>,
) -> (Option<String>, Option<String>) {
    let Some(id) = license_id else {
        return (None, None);
    };

    match client.fetch_license(id).await {
        Ok(template) => {
            let fullname = metadata.owner_login().unwrap_or(FULLNAME_FALLBACK);
            let year = Utc::now().year();
            (
                Some(substitute_placeholders(&template.body, year, fullname)),
                None,
            )
        }
        Err(e) => {
            warn!("License template fetch failed for '{}': {}", id, e);
            (None, Some(format!("Could not fetch license '{}': {}", id, e)))
        }
    }
}

/// Replaces every `[year]` and `[fullname]` occurrence, case-sensitively
pub fn substitute_placeholders(body: &str, year: i32, fullname: &str) -> String {
    body.replace("[year]", &year.to_string())
        .replace("[fullname]", fullname)
}

/// Walks the priority list and selects at most one config file
///
/// For each priority name in order, the first tree entry whose path ends
/// with that name is fetched; a fetch failure is swallowed and scanning
/// moves on to the next priority name.
async fn select_config_file(
    client: &GitHubClient,
    repo: &RepoPath,
    branch: &str,
    file_paths: &[String],
) -> Option<ConfigFileSelection> {
    for name in CONFIG_FILE_PRIORITY {
        let Some(path) = file_paths.iter().find(|p| p.ends_with(name)) else {
            continue;
        };

        match client.fetch_content(repo, path, branch).await {
            Ok(content) => {
                info!("Selected config file {} ({})", path, name);
                return Some(ConfigFileSelection {
                    file_name: (*name).to_string(),
                    content,
                });
            }
            Err(e) => {
                warn!("Failed to fetch config file {}: {}", path, e);
            }
        }
    }
    None
}
