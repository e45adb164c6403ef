//! Example: preview and create a page with a mock provider and an in-memory store.
//!
//! Run with: `RUST_LOG=debug cargo run --example mock_preview`

use std::sync::Arc;

use pagegen::cms::meta_keys;
use pagegen::{
    Entitlement, Event, FnEventHandler, GenerationOptions, GenerationRequest, InMemoryStore,
    MaterializeOptions, Materializer, MockProvider, Orchestrator, PostType, YoastMirror,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pagegen=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Canned model output in the shape the system prompt asks for
    let mock = MockProvider::fixed(
        r#"{
            "title": "Fitness App",
            "content": "<h1>Fitness App</h1><p>Get fit with guided workouts.</p><ul><li>Plans</li><li>Tracking</li></ul>",
            "excerpt": "Get fit with guided workouts.",
            "seo_title": "Fitness App | Train Smarter",
            "meta_description": "Guided workouts and progress tracking in one app."
        }"#,
    );

    let store = Arc::new(InMemoryStore::new("https://example.test"));
    let orchestrator = Orchestrator::builder(Arc::new(mock))
        .entitlement(Entitlement::Pro)
        .materializer(Materializer::new(store.clone()).with_mirror(Arc::new(YoastMirror)))
        .event_handler(Arc::new(FnEventHandler(|event: Event| {
            if let Event::StateChanged { from, to } = event {
                println!("[state] {} -> {}", from, to);
            }
        })))
        .build();

    let options = GenerationOptions::new()
        .with_post_type(PostType::Page)
        .with_seo(GenerationOptions::split_list("fitness, workouts"))
        .with_color_scheme(vec!["dark theme".into()]);
    let request = GenerationRequest::new("Landing page for a fitness app").with_options(options.clone());

    let record = orchestrator.generate_preview(&request).await?;
    println!("Title:   {}", record.title);
    println!("Excerpt: {}", record.excerpt.as_deref().unwrap_or("-"));

    let handle = orchestrator
        .create_document(&record, &MaterializeOptions::from_generation(&options, 1))
        .await?;
    println!("Created #{} ({})", handle.id, handle.edit_url);

    if let Some(stored) = store.get(handle.id) {
        println!("\n{}", stored.document.body.post_content());
        println!("\nYoast focus keyword: {:?}", stored.meta.get("_yoast_wpseo_focuskw"));
        println!("Custom CSS stored: {}", stored.meta.contains_key(meta_keys::CUSTOM_CSS));
    }

    Ok(())
}
