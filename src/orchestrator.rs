//! Request orchestration: validate → prompt → provider → normalize, and on a
//! separate call, materialize.
//!
//! Each request walks a small state machine:
//!
//! ```text
//! Received ─► Validated ─► Generating ─► Generated ─► Materializing ─► Done
//!    │                         │                            │
//!    └─► Rejected              └─► Failed                   └─► Failed
//! ```
//!
//! Preview stops at `Generated`; [`Orchestrator::create_document`] picks up
//! from there. Every transition is logged and emitted as
//! [`Event::StateChanged`].

use std::sync::Arc;

use reqwest::Client;

use crate::backend::{provider_from_config, Provider};
use crate::config::{PipelineConfig, ProviderConfig};
use crate::error::{PageGenError, Result};
use crate::events::{emit, Event, EventHandler, RequestState};
use crate::materialize::{DocumentHandle, MaterializeOptions, Materializer};
use crate::normalize::Normalizer;
use crate::prompt::{build_system_prompt, build_user_prompt};
use crate::types::{ContentRecord, Entitlement, GenerationRequest, MIN_PROMPT_CHARS};

/// Tracks one request's state and reports each transition.
struct Lifecycle<'a> {
    state: RequestState,
    handler: &'a Option<Arc<dyn EventHandler>>,
}

impl<'a> Lifecycle<'a> {
    fn start(state: RequestState, handler: &'a Option<Arc<dyn EventHandler>>) -> Self {
        Self { state, handler }
    }

    fn advance(&mut self, to: RequestState) {
        tracing::debug!(from = %self.state, state = %to, "request state changed");
        emit(self.handler, Event::StateChanged { from: self.state, to });
        self.state = to;
    }
}

/// Drives generation requests through a provider and, optionally, into a
/// document store.
///
/// Holds only immutable configuration, so one instance can serve many
/// concurrent requests behind an `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pagegen::backend::MockProvider;
/// use pagegen::orchestrator::Orchestrator;
/// use pagegen::types::{Entitlement, GenerationRequest};
///
/// # tokio_test::block_on(async {
/// let provider = Arc::new(MockProvider::fixed(
///     r#"{"title": "Hello", "content": "<p>World</p>"}"#,
/// ));
/// let orchestrator = Orchestrator::builder(provider)
///     .entitlement(Entitlement::Free)
///     .build();
///
/// let record = orchestrator
///     .generate_preview(&GenerationRequest::new("A page that says hello"))
///     .await
///     .unwrap();
/// assert_eq!(record.title, "Hello");
/// # });
/// ```
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    entitlement: Entitlement,
    normalizer: Normalizer,
    materializer: Option<Materializer>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.provider.name())
            .field("entitlement", &self.entitlement)
            .field("normalizer", &self.normalizer)
            .field("materializer", &self.materializer)
            .field("has_event_handler", &self.event_handler.is_some())
            .finish()
    }
}

impl Orchestrator {
    pub fn builder(provider: Arc<dyn Provider>) -> OrchestratorBuilder {
        OrchestratorBuilder {
            provider,
            entitlement: Entitlement::default(),
            normalizer: Normalizer::default(),
            materializer: None,
            event_handler: None,
        }
    }

    /// Builder preset from a configuration snapshot: provider, entitlement
    /// and fallback title.
    pub fn from_config(config: &PipelineConfig, client: Client) -> OrchestratorBuilder {
        Self::builder(provider_from_config(&config.provider, client))
            .entitlement(config.entitlement)
            .normalizer(Normalizer::new().with_fallback_title(config.fallback_title.clone()))
    }

    /// Check a request before any provider call.
    ///
    /// The prompt must have at least [`MIN_PROMPT_CHARS`] characters after
    /// trimming, and a free caller may only use the default option set.
    pub fn validate(request: &GenerationRequest, entitlement: Entitlement) -> Result<()> {
        if request.prompt.trim().chars().count() < MIN_PROMPT_CHARS {
            return Err(PageGenError::Validation(format!(
                "Please provide a detailed prompt (at least {} characters).",
                MIN_PROMPT_CHARS
            )));
        }
        if entitlement == Entitlement::Free {
            let features = request.options.pro_features_in_use();
            if !features.is_empty() {
                return Err(PageGenError::ProUpgradeRequired { features });
            }
        }
        Ok(())
    }

    /// Generate a [`ContentRecord`] without persisting anything.
    ///
    /// Makes exactly one provider call. Provider errors are returned as-is;
    /// nothing is retried.
    pub async fn generate_preview(&self, request: &GenerationRequest) -> Result<ContentRecord> {
        let mut lifecycle = Lifecycle::start(RequestState::Received, &self.event_handler);
        let prompt_len = request.prompt.chars().count();

        if let Err(e) = Self::validate(request, self.entitlement) {
            tracing::warn!(prompt_len, error = %e, "request rejected");
            lifecycle.advance(RequestState::Rejected);
            return Err(e);
        }
        lifecycle.advance(RequestState::Validated);

        let system_prompt = build_system_prompt(&request.options);
        let user_prompt = build_user_prompt(&request.prompt);
        tracing::debug!(
            provider = self.provider.name(),
            prompt_len,
            post_type = request.options.post_type.as_str(),
            seo = request.options.seo_enabled,
            elementor = request.options.elementor_compatible,
            "generation request prepared"
        );

        lifecycle.advance(RequestState::Generating);
        let raw = match self.provider.generate(&system_prompt, user_prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(provider = self.provider.name(), error = %e, "content generation failed");
                lifecycle.advance(RequestState::Failed);
                return Err(e);
            }
        };

        let (record, path) = self.normalizer.normalize_with_path(&raw, &request.options);
        emit(&self.event_handler, Event::Normalized { path });
        lifecycle.advance(RequestState::Generated);

        tracing::info!(
            provider = self.provider.name(),
            path = ?path,
            content_length = record.content.len(),
            "content generated successfully"
        );
        Ok(record)
    }

    /// Persist a previously generated record as a draft.
    ///
    /// Fails with [`PageGenError::Configuration`] when no materializer was
    /// supplied and with [`PageGenError::Validation`] when the record has
    /// neither title nor content.
    pub async fn create_document(
        &self,
        record: &ContentRecord,
        options: &MaterializeOptions,
    ) -> Result<DocumentHandle> {
        let Some(materializer) = &self.materializer else {
            return Err(PageGenError::Configuration("Document store is not configured".to_string()));
        };
        if record.title.trim().is_empty() && record.content.trim().is_empty() {
            return Err(PageGenError::Validation("Invalid content data.".to_string()));
        }

        let mut lifecycle = Lifecycle::start(RequestState::Generated, &self.event_handler);
        lifecycle.advance(RequestState::Materializing);

        match materializer.materialize(record, options).await {
            Ok(handle) => {
                emit(&self.event_handler, Event::DocumentCreated { id: handle.id });
                lifecycle.advance(RequestState::Done);
                tracing::info!(
                    document_id = handle.id,
                    doc_type = options.post_type.as_str(),
                    "document created successfully"
                );
                Ok(handle)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create document");
                lifecycle.advance(RequestState::Failed);
                Err(e)
            }
        }
    }

    /// Probe a provider configuration with its fixed test prompt.
    pub async fn test_provider_connection(config: &ProviderConfig, client: &Client) -> bool {
        let provider = provider_from_config(config, client.clone());
        let ok = provider.test_connection().await;
        tracing::info!(provider = provider.name(), ok, "provider connection tested");
        ok
    }

    pub fn entitlement(&self) -> Entitlement {
        self.entitlement
    }
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    provider: Arc<dyn Provider>,
    entitlement: Entitlement,
    normalizer: Normalizer,
    materializer: Option<Materializer>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl OrchestratorBuilder {
    /// Set the caller's entitlement. Default: [`Entitlement::Free`].
    pub fn entitlement(mut self, entitlement: Entitlement) -> Self {
        self.entitlement = entitlement;
        self
    }

    pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Enable [`Orchestrator::create_document`].
    pub fn materializer(mut self, materializer: Materializer) -> Self {
        self.materializer = Some(materializer);
        self
    }

    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            provider: self.provider,
            entitlement: self.entitlement,
            normalizer: self.normalizer,
            materializer: self.materializer,
            event_handler: self.event_handler,
        }
    }
}
