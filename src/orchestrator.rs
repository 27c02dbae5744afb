use crate::config::Config;
use crate::credentials::Credentials;
use crate::error::{GeneratorError, Result};
use crate::gather;
use crate::gemini::GeminiClient;
use crate::github::GitHubClient;
use crate::prompt::{self, Language, PromptRequest};
use crate::resolver::parse_repo_url;
use log::info;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// Workflow stage, used for progress logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Checking credentials and the repository URL; no network calls yet
    Validating,
    /// Fetching metadata, tree, and optional license/config file
    Fetching,
    /// Building the prompt from gathered context
    Composing,
    /// Calling the generative API
    Generating,
    /// Stripping fence wrappers from the generated text
    PostProcessing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validating => "validating",
            Phase::Fetching => "fetching",
            Phase::Composing => "composing",
            Phase::Generating => "generating",
            Phase::PostProcessing => "post-processing",
        };
        f.write_str(name)
    }
}

/// User-supplied inputs for one generation request
#[derive(Debug, Clone)]
pub struct GenerationInput {
    /// Raw repository URL as typed by the user
    pub repo_url: String,
    /// Gallery image URLs, in order
    pub image_urls: Vec<String>,
    /// Free-text context tags; lowercased and deduplicated before use
    pub tags: Vec<String>,
    /// Target output language
    pub language: Language,
    /// License identifier; `None` or "none" means no license handling
    pub license_id: Option<String>,
}

/// The result of a successful generation workflow
#[derive(Debug)]
pub struct GenerationOutcome {
    /// The post-processed README markdown
    pub readme: String,
    /// Substituted license text, when a license was requested and fetched
    pub license_text: Option<String>,
    /// Non-fatal problems encountered along the way (e.g. a failed license
    /// template fetch)
    pub warnings: Vec<String>,
}

/// Top-level workflow tying resolver, gatherer, composer, and the generation
/// call together
///
/// Credentials are read once at construction and treated as immutable for
/// the workflow's duration. A second request issued while one is in flight
/// is rejected with a busy error.
pub struct Orchestrator {
    config: Config,
    credentials: Credentials,
    in_flight: AtomicBool,
}

impl Orchestrator {
    /// Creates an orchestrator with explicit configuration and credentials
    pub fn new(config: Config, credentials: Credentials) -> Self {
        Self {
            config,
            credentials,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs the full workflow for one generation request
    pub async fn run(&self, input: GenerationInput) -> Result<GenerationOutcome> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(GeneratorError::Busy);
        }

        let result = self.run_inner(input).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn run_inner(&self, input: GenerationInput) -> Result<GenerationOutcome> {
        info!("Workflow phase: {}", Phase::Validating);
        let api_key = self.credentials.gemini_api_key()?.to_string();

        let url = input.repo_url.trim();
        if url.is_empty() {
            return Err(GeneratorError::validation("GitHub URL must not be empty"));
        }
        let repo = parse_repo_url(url)
            .ok_or_else(|| GeneratorError::validation("Invalid GitHub URL format"))?;

        let license_id = input
            .license_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case("none"))
            .map(str::to_string);

        info!("Workflow phase: {} ({})", Phase::Fetching, repo);
        let github = GitHubClient::new(
            &self.config,
            self.credentials.github_token().map(str::to_string),
        )?;
        let context = gather::gather(&github, &repo, license_id.as_deref()).await?;

        let mut warnings = Vec::new();
        if let Some(problem) = &context.license_error {
            warnings.push(problem.clone());
        }

        info!("Workflow phase: {}", Phase::Composing);
        let request = PromptRequest {
            metadata: context.metadata,
            file_paths: context.file_paths,
            image_urls: input.image_urls,
            tags: prompt::normalize_tags(input.tags),
            language: input.language,
            license_id,
            config_file: context.config_file,
            max_file_entries: self.config.prompt.max_file_entries,
        };
        let prompt_text = prompt::compose(&request);

        info!("Workflow phase: {}", Phase::Generating);
        let gemini = GeminiClient::new(&self.config)?;
        let raw = gemini.generate(&prompt_text, &api_key).await?;

        info!("Workflow phase: {}", Phase::PostProcessing);
        let readme = strip_markdown_fences(&raw);

        Ok(GenerationOutcome {
            readme,
            license_text: context.license_text,
            warnings,
        })
    }
}

/// Strips a leading ` ```markdown ` fence and a trailing ` ``` ` fence, then
/// trims surrounding whitespace
///
/// A pure string transform, not a Markdown parser; tolerant of a missing
/// closing fence.
pub fn strip_markdown_fences(text: &str) -> String {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```markdown") {
        s = rest.trim_start();
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s.trim().to_string()
}
