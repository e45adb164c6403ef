//! # pagegen
//!
//! AI-assisted page and post generation for WordPress-style CMSs.
//!
//! A natural-language prompt plus style options go in; a normalized
//! [`ContentRecord`] comes out, and can then be persisted as a draft
//! document with SEO metadata, editor-specific structure (Gutenberg blocks
//! or an Elementor tree) and scoped styling.
//!
//! ## Core Concepts
//!
//! - **[`Provider`]**: object-safe trait over LLM services. OpenAI
//!   (chat completions) and Ollama (native generate) are built in;
//!   [`MockProvider`] serves tests.
//! - **[`Normalizer`]**: turns whatever text the model returned into a
//!   [`ContentRecord`], via JSON when possible and heuristics otherwise.
//! - **[`Materializer`]**: maps a record to a draft [`Document`] and writes
//!   it through a [`DocumentStore`].
//! - **[`Orchestrator`]**: validates requests against the caller's
//!   [`Entitlement`], makes exactly one provider call per preview, and
//!   reports state transitions to an optional [`EventHandler`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pagegen::{
//!     GenerationOptions, GenerationRequest, InMemoryStore, MaterializeOptions,
//!     Materializer, Orchestrator, PipelineConfig, PostType, Entitlement,
//! };
//! use pagegen::config::{OllamaConfig, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::default()
//!         .with_provider(ProviderConfig::Ollama(OllamaConfig::default()))
//!         .with_entitlement(Entitlement::Pro);
//!     let store = Arc::new(InMemoryStore::default());
//!     let orchestrator = Orchestrator::from_config(&config, reqwest::Client::new())
//!         .materializer(Materializer::new(store))
//!         .build();
//!
//!     let options = GenerationOptions::new()
//!         .with_post_type(PostType::Page)
//!         .with_seo(vec!["fitness".into()]);
//!     let request = GenerationRequest::new("Landing page for a fitness app")
//!         .with_options(options.clone());
//!
//!     let record = orchestrator.generate_preview(&request).await?;
//!     let handle = orchestrator
//!         .create_document(&record, &MaterializeOptions::from_generation(&options, 1))
//!         .await?;
//!     println!("edit at {}", handle.edit_url);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod blocks;
pub mod cms;
pub mod config;
pub mod error;
pub mod events;
pub mod html;
pub mod materialize;
pub mod normalize;
pub mod orchestrator;
pub mod prompt;
pub mod styling;
pub mod types;

pub use backend::{provider_from_config, MockProvider, OllamaProvider, OpenAiProvider, Provider};
pub use cms::{DocumentStore, InMemoryStore, RankMathMirror, SeoMirror, YoastMirror};
pub use config::{OllamaConfig, OpenAiConfig, PipelineConfig, ProviderConfig};
pub use error::{ErrorKind, PageGenError, Result};
pub use events::{Event, EventHandler, FnEventHandler, RequestState};
pub use materialize::{Document, DocumentBody, DocumentHandle, MaterializeOptions, Materializer};
pub use normalize::{Normalizer, ParsePath};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use types::{
    ContentRecord, Entitlement, GenerationOptions, GenerationRequest, HeaderFooterStyle, PostType,
};
