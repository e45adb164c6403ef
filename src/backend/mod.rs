//! Provider trait and shared HTTP plumbing.
//!
//! The [`Provider`] trait abstracts over LLM services. Each implementation
//! builds its own request body, issues exactly one POST, and unwraps the
//! provider-specific envelope into a single raw string. Interpretation of
//! that string is left to [`Normalizer`](crate::normalize::Normalizer).
//!
//! ```text
//!   system + user prompt ──► Provider::generate() ──► raw text
//!                                   │
//!                  ┌────────────────┴────────────────┐
//!            OpenAiProvider                    OllamaProvider
//!        /v1/chat/completions                  /api/generate
//!   choices[0].message.content                   response
//! ```

pub mod mock;
pub mod ollama;
pub mod openai;

pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::config::ProviderConfig;
use crate::error::{PageGenError, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use std::sync::Arc;

/// Abstraction over LLM providers.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send the prompts and return the unwrapped raw text.
    ///
    /// Performs exactly one HTTP call; never retries.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Send a minimal fixed prompt and report whether a well-formed
    /// envelope came back. Never fails; every error becomes `false`.
    async fn test_connection(&self) -> bool;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Build the provider described by `config`, sharing `client`.
pub fn provider_from_config(config: &ProviderConfig, client: reqwest::Client) -> Arc<dyn Provider> {
    match config {
        ProviderConfig::OpenAi(c) => Arc::new(OpenAiProvider::new(client, c.clone())),
        ProviderConfig::Ollama(c) => Arc::new(OllamaProvider::new(client, c.clone())),
    }
}

/// Send a prepared POST and decode the JSON body of a 200 response.
///
/// `label` names the provider in error messages. `error_message` pulls the
/// provider's own error text out of a non-200 JSON body.
pub(crate) async fn send_json(
    request: RequestBuilder,
    label: &'static str,
    error_message: fn(&Value) -> Option<String>,
) -> Result<Value> {
    let resp = request.send().await.map_err(|e| {
        tracing::error!(provider = label, error = %e, "provider request failed");
        PageGenError::Transport(e)
    })?;

    let status = resp.status();
    let body = resp.text().await?;

    tracing::debug!(
        provider = label,
        status = status.as_u16(),
        response_length = body.len(),
        "provider response received"
    );

    if status != StatusCode::OK {
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .as_ref()
            .and_then(error_message);
        tracing::error!(
            provider = label,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "provider returned error status"
        );
        return Err(PageGenError::Provider {
            provider: label,
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str::<Value>(&body).map_err(|e| {
        tracing::error!(provider = label, error = %e, "provider body is not JSON");
        PageGenError::decode(format!("{} response is not valid JSON: {}", label, e), &body)
    })
}
