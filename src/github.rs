use crate::config::Config;
use crate::error::{GeneratorError, Result};
use crate::resolver::RepoPath;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::debug;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = "readmegen";

/// Metadata for a GitHub repository, fetched fresh per request
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryMetadata {
    /// Repository name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Primary programming language, if GitHub detected one
    pub language: Option<String>,
    /// Browser-facing URL of the repository
    pub html_url: String,
    /// The branch GitHub treats as primary; resolved dynamically, never assumed
    pub default_branch: Option<String>,
    /// License attached to the repository, if any
    pub license: Option<LicenseInfo>,
    /// Repository owner
    pub owner: Option<OwnerInfo>,
}

/// License descriptor embedded in repository metadata
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseInfo {
    /// Human-readable license name
    pub name: String,
}

/// Owner descriptor embedded in repository metadata
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerInfo {
    /// Owner login used for `[fullname]` substitution in license templates
    pub login: String,
}

impl RepositoryMetadata {
    /// Owner login, if present in the metadata
    pub fn owner_login(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.login.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
    encoding: String,
}

/// A license template fetched by SPDX-style identifier
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseTemplate {
    /// Human-readable license name (e.g. "MIT License")
    pub name: String,
    /// Raw license text with `[year]` and `[fullname]` placeholders
    pub body: String,
}

/// Thin authenticated wrapper over the GitHub REST API
///
/// Issues one GET per call and classifies non-2xx responses into typed
/// failures. A bearer token is optional; anonymous calls work but are
/// rate-limited more aggressively by GitHub.
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Creates a client against the API base configured in `config`
    pub fn new(config: &Config, token: Option<String>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.github_api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Fetches repository metadata: `GET /repos/{owner}/{name}`
    pub async fn fetch_repository(&self, repo: &RepoPath) -> Result<RepositoryMetadata> {
        self.get_json(&format!("/repos/{}/{}", repo.owner, repo.name))
            .await
    }

    /// Fetches the recursive file tree at the given branch and returns its paths
    pub async fn fetch_tree(&self, repo: &RepoPath, branch: &str) -> Result<Vec<String>> {
        let tree: TreeResponse = self
            .get_json(&format!(
                "/repos/{}/{}/git/trees/{}?recursive=1",
                repo.owner, repo.name, branch
            ))
            .await?;
        Ok(tree.tree.into_iter().map(|e| e.path).collect())
    }

    /// Fetches a file's content at the given branch, base64-decoded
    pub async fn fetch_content(&self, repo: &RepoPath, path: &str, branch: &str) -> Result<String> {
        let content: ContentResponse = self
            .get_json(&format!(
                "/repos/{}/{}/contents/{}?ref={}",
                repo.owner, repo.name, path, branch
            ))
            .await?;

        if content.encoding != "base64" {
            return Err(GeneratorError::Parse(format!(
                "Unsupported content encoding: {}",
                content.encoding
            )));
        }

        let decoded = BASE64
            .decode(content.content.replace(['\n', '\r'], ""))
            .map_err(|e| GeneratorError::Parse(format!("Invalid base64 content: {}", e)))?;

        String::from_utf8(decoded)
            .map_err(|e| GeneratorError::Parse(format!("Content is not valid UTF-8: {}", e)))
    }

    /// Fetches a license template by identifier: `GET /licenses/{identifier}`
    pub async fn fetch_license(&self, identifier: &str) -> Result<LicenseTemplate> {
        self.get_json(&format!("/licenses/{}", identifier)).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = extract_remote_message(response).await;
            return Err(classify_status(status, message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GeneratorError::Parse(format!("Malformed GitHub response: {}", e)))
    }
}

/// Maps a non-2xx GitHub status into the matching typed failure
fn classify_status(status: StatusCode, message: String) -> GeneratorError {
    match status {
        StatusCode::UNAUTHORIZED => {
            GeneratorError::Authentication("Invalid GitHub token. Please check your token".into())
        }
        StatusCode::NOT_FOUND => {
            GeneratorError::NotFound("Repository or ref not found".into())
        }
        StatusCode::FORBIDDEN => GeneratorError::RateLimit(
            "GitHub API rate limit exceeded. Please check your token or wait".into(),
        ),
        _ => GeneratorError::Remote {
            status: status.as_u16(),
            message,
        },
    }
}

async fn extract_remote_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) => serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| format!("GitHub API error (status: {})", status)),
        Err(_) => format!("GitHub API error (status: {})", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            GeneratorError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, String::new()),
            GeneratorError::NotFound(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, String::new()),
            GeneratorError::RateLimit(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, String::new()),
            GeneratorError::Remote { status: 502, .. }
        ));
    }

    #[test]
    fn test_metadata_deserialization() {
        let body = r#"{
            "name": "rust",
            "description": "The Rust language",
            "language": "Rust",
            "html_url": "https://github.com/rust-lang/rust",
            "default_branch": "master",
            "license": {"name": "MIT License"},
            "owner": {"login": "rust-lang"}
        }"#;
        let meta: RepositoryMetadata = serde_json::from_str(body).unwrap();
        assert_eq!(meta.default_branch.as_deref(), Some("master"));
        assert_eq!(meta.owner_login(), Some("rust-lang"));
        assert_eq!(meta.license.unwrap().name, "MIT License");
    }

    #[test]
    fn test_metadata_with_nulls() {
        let body = r#"{
            "name": "thing",
            "description": null,
            "language": null,
            "html_url": "https://github.com/o/thing",
            "default_branch": "main",
            "license": null,
            "owner": null
        }"#;
        let meta: RepositoryMetadata = serde_json::from_str(body).unwrap();
        assert!(meta.description.is_none());
        assert!(meta.owner_login().is_none());
    }
}
