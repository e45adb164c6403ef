//! Example: generate a blog post with a local Ollama server.
//!
//! Requires Ollama running at http://localhost:11434 with the `llama2` model.
//! Run with: `cargo run --example ollama_page -- "Write about sourdough baking"`

use pagegen::config::{OllamaConfig, ProviderConfig};
use pagegen::{GenerationRequest, Orchestrator, PipelineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Write a short post about sourdough baking for beginners".to_string());

    let mut config = PipelineConfig::default()
        .with_provider(ProviderConfig::Ollama(OllamaConfig::default()));
    config.fallback_title = "AI Generated Content (Ollama)".to_string();

    let client = reqwest::Client::new();
    if !Orchestrator::test_provider_connection(&config.provider, &client).await {
        eprintln!("Ollama is not reachable; is `ollama serve` running?");
        return Ok(());
    }

    let orchestrator = Orchestrator::from_config(&config, client).build();
    let record = orchestrator.generate_preview(&GenerationRequest::new(prompt)).await?;

    println!("# {}\n", record.title);
    println!("{}", record.content);
    Ok(())
}
