use std::io;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur while generating a README
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input validation errors, raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote rejected the supplied token (HTTP 401)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Repository, ref, or license not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// API rate limit exceeded (HTTP 403)
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Any other non-2xx remote response
    #[error("Remote error (status {status}): {message}")]
    Remote {
        /// HTTP status code returned by the remote
        status: u16,
        /// Message extracted from the response body, if any
        message: String,
    },

    /// A 2xx response whose body could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required credential or setting is missing before a call is attempted
    #[error("Config error: {0}")]
    Config(String),

    /// The generation was withheld for safety reasons; retrying will not help
    #[error("Generation blocked by safety filter: {0}")]
    GenerationBlocked(String),

    /// A successful generation response without extractable text
    #[error("Failed to extract generated text: {0}")]
    Extraction(String),

    /// The retry budget was spent on transient failures
    #[error("Retries exhausted: {0}")]
    RetriesExhausted(Box<GeneratorError>),

    /// A generation workflow is already in flight
    #[error("A generation request is already in progress")]
    Busy,
}

impl GeneratorError {
    /// Creates a validation error with the specified message
    pub fn validation(message: &str) -> Self {
        Self::Validation(message.to_string())
    }

    /// Checks if this error is transient and worth retrying
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Remote { status, .. } => matches!(status, 500 | 503),
            Self::Http(e) => !e.is_builder() && !e.is_status(),
            _ => false,
        }
    }

    /// Checks if this error should terminate the attempt loop immediately
    pub fn is_fatal(&self) -> bool {
        !self.is_transient()
    }
}
