#![warn(missing_docs)]
#![warn(clippy::all)]

//! readmegen - README and LICENSE generation for GitHub repositories
//!
//! This library orchestrates the full generation pipeline: resolving a
//! repository URL, gathering repository context from the GitHub REST API,
//! composing a structured natural-language prompt, and invoking a generative
//! text API with bounded retry and exponential backoff.
//!
//! ## Usage
//! ```rust,ignore
//! use readmegen::{Config, Credentials, GenerationInput, Language, Orchestrator};
//!
//! async fn example() -> readmegen::Result<()> {
//!     let orchestrator = Orchestrator::new(Config::load()?, Credentials::load()?);
//!     let outcome = orchestrator
//!         .run(GenerationInput {
//!             repo_url: "https://github.com/owner/repo".into(),
//!             image_urls: vec![],
//!             tags: vec![],
//!             language: Language::English,
//!             license_id: Some("mit".into()),
//!         })
//!         .await?;
//!     println!("{}", outcome.readme);
//!     Ok(())
//! }
//! ```

/// Configuration loading and defaults
pub mod config;
/// Persistent credential storage (GitHub token, generation API key)
pub mod credentials;
/// Error handling types and utilities
pub mod error;
/// Context gathering: metadata, tree, license template, config file
pub mod gather;
/// Generative text API client with retry/backoff
pub mod gemini;
/// GitHub REST API client
pub mod github;
/// Logging configuration and utilities
pub mod logging;
/// Top-level generation workflow
pub mod orchestrator;
/// Prompt composition (pure, bilingual)
pub mod prompt;
/// Repository URL resolution
pub mod resolver;

// Re-export common types
pub use config::Config;
pub use credentials::Credentials;
pub use error::{GeneratorError, Result};
pub use gather::{ConfigFileSelection, GatheredContext, CONFIG_FILE_PRIORITY};
pub use gemini::{GeminiClient, RetryPolicy};
pub use github::{GitHubClient, RepositoryMetadata};
pub use orchestrator::{
    strip_markdown_fences, GenerationInput, GenerationOutcome, Orchestrator, Phase,
};
pub use prompt::{compose, normalize_tags, Language, PromptRequest};
pub use resolver::{parse_repo_url, RepoPath};
