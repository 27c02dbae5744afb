use crate::error::{GeneratorError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration struct for the application
///
/// Holds API endpoints, retry settings, and prompt limits. Endpoints are
/// overridable so tests can point the clients at a local mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the GitHub REST API
    pub github_api_base: String,
    /// Base URL of the generative text API
    pub gemini_api_base: String,
    /// Model identifier used for generation requests
    pub gemini_model: String,
    /// Request timeout in seconds for all remote calls
    pub request_timeout_secs: u64,
    /// Retry settings for the generation call
    pub retry: RetryConfig,
    /// Prompt assembly limits
    pub prompt: PromptConfig,
}

/// Retry settings for the generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Base backoff delay in milliseconds, doubled on each retry
    pub base_delay_ms: u64,
}

/// Limits applied when assembling the prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Maximum number of file tree entries embedded in the prompt
    pub max_file_entries: usize,
}

impl Config {
    /// Loads configuration from the default config file location
    ///
    /// If the config file doesn't exist, returns the default configuration.
    /// The config file is expected to be in TOML format.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| GeneratorError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| GeneratorError::Config(format!("Failed to parse config file: {}", e)))
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "readmegen", "readmegen")
            .ok_or_else(|| GeneratorError::Config("Could not determine config directory".into()))?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_api_base: "https://api.github.com".to_string(),
            gemini_api_base: "https://generativelanguage.googleapis.com".to_string(),
            gemini_model: "gemini-1.5-flash-latest".to_string(),
            request_timeout_secs: 30,
            retry: RetryConfig::default(),
            prompt: PromptConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_file_entries: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github_api_base, "https://api.github.com");
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay_ms, 1000);
        assert_eq!(config.prompt.max_file_entries, 30);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            github_api_base = "http://localhost:9999"

            [retry]
            base_delay_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.github_api_base, "http://localhost:9999");
        assert_eq!(config.retry.base_delay_ms, 10);
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.gemini_model, "gemini-1.5-flash-latest");
    }
}
