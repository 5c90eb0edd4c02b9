use recommendation_service::models::RecommendationRequest;
use recommendation_service::storage::{InMemoryCatalog, InMemoryInteractions};
use recommendation_service::{Config, RecommendationEngine};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Demo runner: initializes the engine against the in-memory stores and
/// prints one recommendation pass. The HTTP layer lives in a separate
/// service and talks to this crate through `RecommendationEngine`.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env().expect("Failed to load config");

    info!(
        "Starting {} v{}",
        config.service.service_name,
        env!("CARGO_PKG_VERSION")
    );

    let catalog = Arc::new(InMemoryCatalog::demo());
    let interactions = Arc::new(InMemoryInteractions::demo());

    let mut engine = RecommendationEngine::new(catalog, interactions, config);
    if let Err(e) = engine.init().await {
        // The engine still serves fallback recommendations when
        // initialization fails, so this is not fatal.
        error!("Engine initialization failed: {}", e);
    }

    let request = RecommendationRequest {
        user_id: Some(1),
        age: Some(serde_json::json!(28)),
        gender: Some("female".to_string()),
        color_pref: Some("black".to_string()),
        style_pref: Some("elegant".to_string()),
        budget: Some(serde_json::json!(16000)),
        k: Some(5),
    };

    let request_id = Uuid::new_v4();
    let started = chrono::Utc::now();

    info!(%request_id, "Running demo recommendation request");
    let outfits = engine.recommend(&request).await;

    let elapsed_ms = (chrono::Utc::now() - started).num_milliseconds();
    info!(%request_id, outfits = outfits.len(), elapsed_ms, "Request completed");

    println!("{}", serde_json::to_string_pretty(&outfits)?);

    Ok(())
}
