//! Provider for OpenAI's chat-completions API.
//!
//! Endpoint: `/v1/chat/completions`, bearer-token auth. The generated text
//! lives at `choices[0].message.content`.

use super::{send_json, Provider};
use crate::config::{normalize_base_url, OpenAiConfig};
use crate::error::{PageGenError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const LABEL: &str = "OpenAI";
const TEST_PROMPT: &str = "Hello, this is a test.";

/// Provider for OpenAI-compatible chat-completions endpoints.
///
/// # Example
///
/// ```
/// use pagegen::backend::OpenAiProvider;
/// use pagegen::config::OpenAiConfig;
///
/// let provider = OpenAiProvider::new(
///     reqwest::Client::new(),
///     OpenAiConfig::default().with_api_key("sk-..."),
/// );
/// assert!(provider.has_api_key());
/// ```
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("config", &self.config)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(client: Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    pub fn has_api_key(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", normalize_base_url(&self.config.base_url))
    }

    fn ensure_configured(&self) -> Result<()> {
        if !self.has_api_key() {
            tracing::error!("OpenAI API key not configured");
            return Err(PageGenError::Configuration(
                "OpenAI API key is not configured. Please set it in plugin settings.".to_string(),
            ));
        }
        if normalize_base_url(&self.config.base_url).is_empty() {
            return Err(PageGenError::Configuration(
                "OpenAI API URL is not configured. Please set it in plugin settings.".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the chat-completions body.
    fn build_body(&self, system_prompt: &str, user_prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt},
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }

    fn build_test_body(&self) -> Value {
        json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": TEST_PROMPT}],
            "max_tokens": 10,
        })
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        let request = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout())
            .json(body);
        send_json(request, LABEL, error_message).await
    }

    /// Pull `choices[0].message.content` out of a response.
    fn extract_content(response: &Value) -> Option<&str> {
        response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.ensure_configured()?;

        tracing::debug!(
            model = %self.config.model,
            system_prompt_length = system_prompt.len(),
            prompt_length = user_prompt.len(),
            "OpenAI request prepared"
        );

        let response = self.post(&self.build_body(system_prompt, user_prompt)).await?;
        match Self::extract_content(&response) {
            Some(text) => Ok(text.to_string()),
            None => {
                let raw = response.to_string();
                tracing::error!("invalid OpenAI response structure");
                Err(PageGenError::decode(
                    "OpenAI response lacks choices[0].message.content",
                    &raw,
                ))
            }
        }
    }

    async fn test_connection(&self) -> bool {
        if self.ensure_configured().is_err() {
            return false;
        }
        match self.post(&self.build_test_body()).await {
            Ok(response) => Self::extract_content(&response).is_some(),
            Err(e) => {
                tracing::error!(error = %e, "OpenAI connection test failed");
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::{request_body, serve_once, serve_silent};

    fn provider(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::new(
            Client::new(),
            OpenAiConfig::default()
                .with_api_key("sk-test123")
                .with_base_url(base_url),
        )
    }

    const OK_BODY: &str =
        r#"{"id":"c1","choices":[{"index":0,"message":{"role":"assistant","content":"{\"title\":\"Hi\"}"}}]}"#;

    #[test]
    fn test_openai_chat_payload() {
        let body = provider("https://api.openai.com").build_body("SYS", "make a page");
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["temperature"], 0.7);
        let messages = body["messages"].as_array().expect("messages");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], "SYS");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "make a page");
    }

    #[test]
    fn test_endpoint_normalizes_base_url() {
        assert_eq!(
            provider("https://api.openai.com/v1/").endpoint(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        let provider = OpenAiProvider::new(Client::new(), OpenAiConfig::default());
        let err = provider.generate("s", "u").await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert_eq!(
            err.to_string(),
            "OpenAI API key is not configured. Please set it in plugin settings."
        );
        assert!(!provider.test_connection().await);
    }

    #[tokio::test]
    async fn test_generate_unwraps_envelope_and_sends_bearer() {
        let (url, server) = serve_once(200, OK_BODY).await;
        let text = provider(&url).generate("SYS", "USER").await.unwrap();
        assert_eq!(text, r#"{"title":"Hi"}"#);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request
            .lines()
            .any(|l| l.eq_ignore_ascii_case("authorization: Bearer sk-test123")));
        let body = request_body(&request);
        assert_eq!(body["messages"][1]["content"], "USER");
    }

    #[tokio::test]
    async fn test_generate_surfaces_provider_error_message() {
        let (url, server) = serve_once(
            401,
            r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#,
        )
        .await;
        let err = provider(&url).generate("s", "u").await.unwrap_err();
        server.await.unwrap();
        assert!(err.is_auth_failure());
        assert_eq!(
            err.to_string(),
            "OpenAI API Error (Code: 401): Incorrect API key provided"
        );
    }

    #[tokio::test]
    async fn test_generate_missing_envelope_is_decode_error() {
        let (url, server) = serve_once(200, r#"{"choices":[]}"#).await;
        let err = provider(&url).generate("s", "u").await.unwrap_err();
        server.await.unwrap();
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_generate_timeout_is_transport_error() {
        let (url, _server) = serve_silent().await;
        let mut config = OpenAiConfig::default().with_api_key("sk-x").with_base_url(url);
        config.timeout_secs = 1;
        let err = OpenAiProvider::new(Client::new(), config)
            .generate("s", "u")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_connection_uses_minimal_prompt() {
        let (url, server) = serve_once(200, OK_BODY).await;
        assert!(provider(&url).test_connection().await);
        let body = request_body(&server.await.unwrap());
        assert_eq!(body["max_tokens"], 10);
        assert_eq!(body["messages"][0]["content"], "Hello, this is a test.");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_connection_false_on_error_status() {
        let (url, server) = serve_once(500, "{}").await;
        assert!(!provider(&url).test_connection().await);
        server.await.unwrap();
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let provider = OpenAiProvider::new(
            Client::new(),
            OpenAiConfig::default().with_api_key("sk-1234567890abcdef"),
        );
        let debug_output = format!("{:?}", provider);
        assert!(!debug_output.contains("1234567890abcdef"), "API key must not appear in Debug output");
        assert!(debug_output.contains("***"), "Redaction marker must be present");
    }
}
