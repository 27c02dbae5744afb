use crate::config::Config;
use crate::error::{GeneratorError, Result};
use log::{info, warn};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;

/// Bounded exponential-backoff policy for the generation call
///
/// One initial attempt plus up to `max_retries` retries; the wait before
/// retry `n` is `base_delay * 2^(n-1)`, so the defaults give 1s, 2s, 4s.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Backoff base, doubled on each retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Builds the policy from application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.retry.max_retries,
            base_delay: Duration::from_millis(config.retry.base_delay_ms),
        }
    }

    /// Wait before the given 1-based retry
    fn delay(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }
}

/// Client for the generative text API
///
/// Sends a single blocking generation request per workflow; transient
/// server-side failures (HTTP 500/503) and network-level errors are retried
/// with exponential backoff, everything else fails on first occurrence.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl GeminiClient {
    /// Creates a client against the endpoint configured in `config`
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.gemini_api_base.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            retry: RetryPolicy::from_config(config),
        })
    }

    /// Generates text for the given prompt, returning the complete reply
    ///
    /// Fails immediately with a config error when the API key is empty; no
    /// network call or retry is attempted in that case.
    pub async fn generate(&self, prompt: &str, api_key: &str) -> Result<String> {
        if api_key.trim().is_empty() {
            return Err(GeneratorError::Config(
                "Gemini API key not found. Please add it in the settings".into(),
            ));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        let payload = build_payload(prompt);

        let mut last_error: Option<GeneratorError> = None;

        for retry in 0..=self.retry.max_retries {
            if retry > 0 {
                let delay = self.retry.delay(retry);
                warn!(
                    "Generation attempt {} failed transiently, retrying in {:?}",
                    retry, delay
                );
                sleep(delay).await;
            }

            match self.attempt(&url, &payload).await {
                Ok(text) => {
                    info!("Generation succeeded on attempt {}", retry + 1);
                    return Ok(text);
                }
                Err(e) if e.is_transient() => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        // last_error is always set here: the loop only falls through on
        // transient failures
        Err(GeneratorError::RetriesExhausted(Box::new(
            last_error.unwrap_or_else(|| {
                GeneratorError::Extraction("retry loop ended without an error".into())
            }),
        )))
    }

    async fn attempt(&self, url: &str, payload: &Value) -> Result<String> {
        let response = self.client.post(url).json(payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = extract_error_message(response).await;
            return Err(GeneratorError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GeneratorError::Parse(format!("Malformed generation response: {}", e)))?;

        extract_generated_text(&body)
    }
}

fn build_payload(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "safetySettings": [
            { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_NONE" },
            { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_NONE" },
            { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_NONE" },
            { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_NONE" }
        ]
    })
}

/// Pulls generated text out of a 2xx response body
///
/// A response without text at the expected location is inspected for a
/// safety verdict first: a safety block is final and must not be retried.
fn extract_generated_text(body: &Value) -> Result<String> {
    if let Some(text) = body["candidates"][0]["content"]["parts"][0]["text"].as_str() {
        return Ok(text.to_string());
    }

    let finish_reason = body["candidates"][0]["finishReason"].as_str();
    let block_reason = body["promptFeedback"]["blockReason"].as_str();

    if finish_reason == Some("SAFETY") || block_reason.is_some() {
        let reason = block_reason.or(finish_reason).unwrap_or("SAFETY");
        return Err(GeneratorError::GenerationBlocked(reason.to_string()));
    }

    Err(GeneratorError::Extraction(
        "Failed to extract content from the AI response".into(),
    ))
}

async fn extract_error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) => serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| format!("Gemini API error (status: {})", status)),
        Err(_) => format!("Gemini API error (status: {})", status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_schedule() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        };
        assert_eq!(policy.delay(1), Duration::from_millis(1000));
        assert_eq!(policy.delay(2), Duration::from_millis(2000));
        assert_eq!(policy.delay(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_extracts_text_from_expected_location() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "X" }] } }]
        });
        assert_eq!(extract_generated_text(&body).unwrap(), "X");
    }

    #[test]
    fn test_safety_finish_reason_is_blocked() {
        let body = json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        });
        assert!(matches!(
            extract_generated_text(&body),
            Err(GeneratorError::GenerationBlocked(_))
        ));
    }

    #[test]
    fn test_prompt_feedback_block_reason_is_blocked() {
        let body = json!({
            "promptFeedback": { "blockReason": "OTHER" }
        });
        let err = extract_generated_text(&body).unwrap_err();
        assert!(matches!(err, GeneratorError::GenerationBlocked(ref r) if r == "OTHER"));
    }

    #[test]
    fn test_missing_text_without_safety_is_extraction_error() {
        let body = json!({ "candidates": [{ "content": { "parts": [] } }] });
        assert!(matches!(
            extract_generated_text(&body),
            Err(GeneratorError::Extraction(_))
        ));
    }

    #[test]
    fn test_payload_has_permissive_safety_settings() {
        let payload = build_payload("hello");
        let settings = payload["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert!(settings
            .iter()
            .all(|s| s["threshold"] == "BLOCK_NONE"));
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "hello");
    }
}
