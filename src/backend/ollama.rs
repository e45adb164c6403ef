//! Provider for Ollama's native generate API.
//!
//! Endpoint: `/api/generate`, no auth. System and user prompts are joined
//! into one prompt string; the generated text lives in the top-level
//! `response` field.

use super::{send_json, Provider};
use crate::config::{normalize_base_url, OllamaConfig};
use crate::error::{PageGenError, Result};
use crate::prompt::combine_for_generate;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const LABEL: &str = "Ollama";
const TEST_PROMPT: &str = "Hello, this is a test. Please respond with \"Test successful\".";

/// Provider for a local or remote Ollama server.
///
/// Local inference is slow, so the default timeout is 120 seconds.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(client: Client, config: OllamaConfig) -> Self {
        Self { client, config }
    }

    fn base_url(&self) -> String {
        normalize_base_url(&self.config.base_url)
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.base_url().is_empty() {
            tracing::error!("Ollama URL not configured");
            return Err(PageGenError::Configuration(
                "Ollama URL is not configured. Please set it in plugin settings.".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the `/api/generate` body.
    fn build_body(&self, system_prompt: &str, user_prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "prompt": combine_for_generate(system_prompt, user_prompt),
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "top_p": self.config.top_p,
                "stop": self.config.stop,
            },
        })
    }

    fn build_test_body(&self) -> Value {
        json!({
            "model": self.config.model,
            "prompt": TEST_PROMPT,
            "stream": false,
            "options": {"temperature": 0.1},
        })
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        let url = format!("{}/api/generate", self.base_url());
        tracing::debug!(url = %url, timeout_secs = self.config.timeout_secs, "making Ollama request");
        let request = self
            .client
            .post(&url)
            .timeout(self.config.timeout())
            .json(body);
        send_json(request, LABEL, error_message).await
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error").and_then(|e| e.as_str()).map(str::to_string)
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.ensure_configured()?;

        let body = self.build_body(system_prompt, user_prompt);
        tracing::debug!(
            model = %self.config.model,
            prompt_length = body["prompt"].as_str().map(str::len).unwrap_or(0),
            "Ollama request prepared"
        );

        let response = self.post(&body).await?;
        match response.get("response").and_then(|v| v.as_str()) {
            Some(text) => Ok(text.to_string()),
            None => {
                let raw = response.to_string();
                tracing::error!("invalid Ollama response structure");
                Err(PageGenError::decode("Ollama response lacks the response field", &raw))
            }
        }
    }

    async fn test_connection(&self) -> bool {
        if self.ensure_configured().is_err() {
            return false;
        }
        match self.post(&self.build_test_body()).await {
            Ok(response) => {
                let ok = response.get("response").is_some_and(Value::is_string);
                if ok {
                    tracing::info!("Ollama connection test successful");
                } else {
                    tracing::error!("Ollama connection test failed: invalid response");
                }
                ok
            }
            Err(e) => {
                tracing::error!(error = %e, "Ollama connection test failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
