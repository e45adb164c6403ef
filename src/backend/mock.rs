//! Mock provider for testing without a live LLM.
//!
//! [`MockProvider`] returns pre-configured replies in order and counts
//! calls, so tests can assert that a request never reached the provider.
//!
//! # Example
//!
//! ```
//! use pagegen::backend::MockProvider;
//!
//! let mock = MockProvider::fixed(r#"{"title": "Hello", "content": "<p>World</p>"}"#);
//! assert_eq!(mock.calls(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::Provider;
use crate::error::{PageGenError, Result};

/// One canned reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful generation returning this raw text.
    Text(String),
    /// Provider answered with a non-200 status.
    Status { status: u16, message: Option<String> },
    /// Provider body lacked the expected envelope.
    Malformed(String),
}

/// A test provider that returns canned replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockProvider {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    calls: AtomicUsize,
    last_prompts: Mutex<Option<(String, String)>>,
}

impl MockProvider {
    /// Create a mock with the given replies.
    pub fn new(replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "MockProvider requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            last_prompts: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(text.into())])
    }

    /// Create a mock that always fails with `status`.
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Status {
            status,
            message: Some(message.into()),
        }])
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// The `(system, user)` prompts of the most recent `generate` call.
    pub fn last_prompts(&self) -> Option<(String, String)> {
        self.last_prompts.lock().ok().and_then(|p| p.clone())
    }

    fn next_reply(&self) -> MockReply {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_prompts.lock() {
            *last = Some((system_prompt.to_string(), user_prompt.to_string()));
        }
        match self.next_reply() {
            MockReply::Text(text) => Ok(text),
            MockReply::Status { status, message } => Err(PageGenError::Provider {
                provider: "Mock",
                status,
                message,
            }),
            MockReply::Malformed(body) => Err(PageGenError::decode("mock envelope missing", &body)),
        }
    }

    async fn test_connection(&self) -> bool {
        matches!(self.replies.first(), Some(MockReply::Text(_)))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fixed_response() {
        let mock = MockProvider::fixed("Hello!");
        let text = mock.generate("sys", "user").await.unwrap();
        assert_eq!(text, "Hello!");
        assert_eq!(mock.calls(), 1);
        assert_eq!(mock.last_prompts(), Some(("sys".into(), "user".into())));
    }

    #[tokio::test]
    async fn test_mock_cycles_replies() {
        let mock = MockProvider::new(vec![
            MockReply::Text("first".into()),
            MockReply::Status { status: 429, message: None },
        ]);
        assert_eq!(mock.generate("s", "u").await.unwrap(), "first");
        assert!(mock.generate("s", "u").await.unwrap_err().is_rate_limited());
        assert_eq!(mock.generate("s", "u").await.unwrap(), "first");
        assert_eq!(mock.calls(), 3);
    }

    #[test]
    fn test_mock_connection_reflects_first_reply() {
        assert!(tokio_test::block_on(MockProvider::fixed("ok").test_connection()));
        assert!(!tokio_test::block_on(MockProvider::failing(500, "down").test_connection()));
    }
}
