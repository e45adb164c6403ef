use thiserror::Error;

/// Errors produced by the generation pipeline and its collaborators.
#[derive(Error, Debug)]
pub enum PageGenError {
    /// Bad input the caller can fix (short prompt, malformed options).
    #[error("{0}")]
    Validation(String),

    /// A free-tier request used options that require a pro entitlement.
    #[error("Pro upgrade required for: {}", .features.join(", "))]
    ProUpgradeRequired {
        /// Names of the non-default option fields that were set.
        features: Vec<&'static str>,
    },

    /// Provider credentials, endpoint or a config document are missing or invalid.
    #[error("{0}")]
    Configuration(String),

    /// Network-level failure: DNS, connection refused, timeout.
    #[error("Provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-200 status.
    #[error("{provider} API Error (Code: {status}){}", format_message(.message))]
    Provider {
        /// Provider display label (`"OpenAI"`, `"Ollama"`).
        provider: &'static str,
        /// HTTP status code.
        status: u16,
        /// Error message embedded in the provider's body, if any.
        message: Option<String>,
    },

    /// The provider body was not JSON or lacked the expected envelope field.
    #[error("Failed to decode provider response: {message}")]
    Decode {
        /// What was wrong with the body.
        message: String,
        /// Leading part of the raw body, for diagnosis.
        excerpt: String,
    },

    /// The CMS rejected the document insert.
    #[error("Failed to create document: {0}")]
    Persistence(String),
}

fn format_message(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

/// Coarse error categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Transport,
    Provider,
    Decode,
    Persistence,
}

impl PageGenError {
    /// Collapse the variant into its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            PageGenError::Validation(_) | PageGenError::ProUpgradeRequired { .. } => {
                ErrorKind::Validation
            }
            PageGenError::Configuration(_) => ErrorKind::Configuration,
            PageGenError::Transport(_) => ErrorKind::Transport,
            PageGenError::Provider { .. } => ErrorKind::Provider,
            PageGenError::Decode { .. } => ErrorKind::Decode,
            PageGenError::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// The provider rejected the call with HTTP 429.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, PageGenError::Provider { status: 429, .. })
    }

    /// The provider rejected the credentials (HTTP 401 or 403).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, PageGenError::Provider { status: 401 | 403, .. })
    }

    /// Transient failures that are safe for the user to resubmit manually.
    pub fn is_retryable_by_user(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport) || self.is_rate_limited()
    }

    pub(crate) fn decode(message: impl Into<String>, body: &str) -> Self {
        PageGenError::Decode {
            message: message.into(),
            excerpt: crate::html::truncate_chars(body, 200),
        }
    }
}

impl From<anyhow::Error> for PageGenError {
    fn from(err: anyhow::Error) -> Self {
        PageGenError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PageGenError>;
