//! Completion model client — the single point of entry for generative
//! model calls.
//!
//! ARCHITECTURAL RULE: no other module may talk to the model endpoint
//! directly. Everything goes through `CompletionModel`, and every
//! structured call goes through `run_structured` so that output recovery
//! is applied uniformly.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod recovery;

use crate::errors::AppError;

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Model returned empty content")]
    EmptyContent,
}

/// Abstract completion seam. The only assumption callers may make about
/// the returned text is that it *may* contain zero, one, or several
/// JSON-looking substrings, possibly malformed.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    /// Greedy decoding keeps structured outputs as stable as the model allows.
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    text: String,
}

/// HTTP-backed completion model speaking the OpenAI-compatible
/// `/v1/completions` protocol (llama.cpp, vLLM, TGI all serve it).
/// Retries on 429 and 5xx with exponential backoff.
#[derive(Clone)]
pub struct HttpCompletionModel {
    client: Client,
    completions_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpCompletionModel {
    pub fn new(base_url: &str, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            completions_url: format!("{}/v1/completions", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl CompletionModel for HttpCompletionModel {
    async fn complete(&self, prompt: &str, max_new_tokens: u32) -> Result<String, LlmError> {
        let request_body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: max_new_tokens,
            temperature: 0.0,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Completion attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.completions_url).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Completion API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let completion: CompletionResponse = response.json().await?;
            let text = completion
                .choices
                .into_iter()
                .next()
                .map(|c| c.text)
                .ok_or(LlmError::EmptyContent)?;

            if text.trim().is_empty() {
                return Err(LlmError::EmptyContent);
            }

            debug!("Completion succeeded: {} chars", text.len());
            return Ok(text.trim().to_string());
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

/// Runs a prompt and recovers the canonical JSON object from the raw
/// completion. Every service that expects structured output calls this.
pub async fn run_structured(
    model: &dyn CompletionModel,
    prompt: &str,
    max_new_tokens: u32,
) -> Result<Value, AppError> {
    let raw = model.complete(prompt, max_new_tokens).await?;
    let value = recovery::recover(&raw)?;
    Ok(value)
}
