use crate::error::{GeneratorError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Stored API credentials for the two remote services
///
/// The CLI counterpart of the browser's key-value storage: two opaque string
/// slots, written by an explicit save action and read once at workflow start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// GitHub API token for authenticated requests (optional, raises rate limits)
    pub github_token: Option<String>,
    /// API key for the generative text service (required for generation)
    pub gemini_api_key: Option<String>,
}

impl Credentials {
    /// Loads credentials from the credentials file, or empty slots if absent
    pub fn load() -> Result<Self> {
        let path = Self::store_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read credentials file: {}", e))
        })?;

        toml::from_str(&content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse credentials file: {}", e))
        })
    }

    /// Persists the current credentials, overwriting any previous values
    pub fn save(&self) -> Result<()> {
        let path = Self::store_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GeneratorError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            GeneratorError::Config(format!("Failed to serialize credentials: {}", e))
        })?;

        fs::write(&path, content)
            .map_err(|e| GeneratorError::Config(format!("Failed to write credentials: {}", e)))
    }

    /// Deletes the credentials file, clearing both slots
    pub fn clear() -> Result<()> {
        let path = Self::store_path()?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                GeneratorError::Config(format!("Failed to remove credentials file: {}", e))
            })?;
        }
        Ok(())
    }

    /// Returns the GitHub token if a non-empty one is stored
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Returns the generation API key, or a config error if absent
    pub fn gemini_api_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                GeneratorError::Config(
                    "Gemini API key not found. Save it with `readmegen auth`".into(),
                )
            })
    }

    fn store_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "readmegen", "readmegen")
            .ok_or_else(|| GeneratorError::Config("Could not determine config directory".into()))?;
        Ok(proj_dirs.config_dir().join("credentials.toml"))
    }
}
