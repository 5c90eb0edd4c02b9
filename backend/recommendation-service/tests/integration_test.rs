use recommendation_service::models::{Interaction, RecommendationRequest};
use recommendation_service::storage::{InMemoryCatalog, InMemoryInteractions};
use recommendation_service::{Config, RecommendationEngine};
use std::collections::HashSet;
use std::sync::Arc;

fn config() -> Config {
    Config::from_env().expect("config should load from defaults")
}

async fn initialized_engine() -> RecommendationEngine {
    let mut engine = RecommendationEngine::new(
        Arc::new(InMemoryCatalog::demo()),
        Arc::new(InMemoryInteractions::demo()),
        config(),
    );
    engine.init().await.expect("engine init should succeed");
    engine
}

#[tokio::test]
async fn test_basic_workflow() {
    let engine = initialized_engine().await;

    let request = RecommendationRequest {
        user_id: Some(1),
        age: Some(serde_json::json!(25)),
        gender: Some("male".to_string()),
        color_pref: Some("blue".to_string()),
        style_pref: Some("casual".to_string()),
        budget: Some(serde_json::json!(10000)),
        k: Some(8),
    };

    let outfits = engine.recommend(&request).await;

    assert!(!outfits.is_empty());
    assert!(outfits.len() <= 8);

    for outfit in &outfits {
        // One item per slot, at least two slots filled
        let mut slots = HashSet::new();
        for item in &outfit.items {
            assert!(slots.insert(item.slot), "duplicate slot in {}", outfit.outfit_id);
        }
        assert!(outfit.items.len() >= 2);
        assert_eq!(
            outfit.total_price,
            outfit.items.iter().map(|i| i.price).sum::<i64>()
        );
    }
}

#[tokio::test]
async fn test_response_is_json_serializable() {
    let engine = initialized_engine().await;
    let outfits = engine.recommend(&RecommendationRequest::default()).await;

    let payload = serde_json::to_string(&outfits).expect("outfits must serialize");
    assert!(payload.contains("outfit_id"));
    assert!(payload.contains("total_price"));
}

#[tokio::test]
async fn test_unknown_user_still_gets_recommendations() {
    let engine = initialized_engine().await;

    let request = RecommendationRequest {
        user_id: Some(424242),
        k: Some(4),
        ..Default::default()
    };

    let outfits = engine.recommend(&request).await;
    assert!(!outfits.is_empty());
    assert!(outfits.len() <= 4);
}

#[tokio::test]
async fn test_malformed_fields_are_coerced_not_fatal() {
    let engine = initialized_engine().await;

    let request = RecommendationRequest {
        user_id: Some(1),
        age: Some(serde_json::json!("twenty-five")),
        budget: Some(serde_json::json!({"amount": 100})),
        gender: Some("martian".to_string()),
        ..Default::default()
    };

    let outfits = engine.recommend(&request).await;
    assert!(!outfits.is_empty());
}

#[tokio::test]
async fn test_empty_stores_fall_back_to_static_outfits() {
    let mut engine = RecommendationEngine::new(
        Arc::new(InMemoryCatalog::new(Vec::new())),
        Arc::new(InMemoryInteractions::new(Vec::new())),
        config(),
    );
    engine.init().await.expect("init should tolerate empty data");

    let request = RecommendationRequest {
        k: Some(8),
        ..Default::default()
    };
    let outfits = engine.recommend(&request).await;

    assert_eq!(outfits.len(), 8);
    assert!(outfits.iter().all(|o| o.items.len() >= 2));
}

#[tokio::test]
async fn test_identical_requests_are_reproducible() {
    let engine = initialized_engine().await;

    let request = RecommendationRequest {
        user_id: Some(2),
        age: Some(serde_json::json!(30)),
        gender: Some("male".to_string()),
        color_pref: Some("black".to_string()),
        style_pref: Some("sporty".to_string()),
        budget: Some(serde_json::json!(8000)),
        k: Some(6),
    };

    let first = serde_json::to_string(&engine.recommend(&request).await).unwrap();
    let second = serde_json::to_string(&engine.recommend(&request).await).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_interaction_history_feeds_collaborative_source() {
    // A user whose history covers most of the catalog: the collaborative
    // source should still never recommend an already-rated product as part
    // of a personalized outfit pass.
    let history: Vec<Interaction> = (1..=4u32)
        .map(|product_id| Interaction {
            user_id: 7,
            product_id,
            rating: 5.0,
            interaction_type: "purchase".to_string(),
        })
        .chain(
            [5u32, 7, 8]
                .into_iter()
                .map(|product_id| Interaction {
                    user_id: 8,
                    product_id,
                    rating: 4.0,
                    interaction_type: "purchase".to_string(),
                }),
        )
        .collect();

    let mut engine = RecommendationEngine::new(
        Arc::new(InMemoryCatalog::demo()),
        Arc::new(InMemoryInteractions::new(history)),
        config(),
    );
    engine.init().await.expect("engine init should succeed");

    let request = RecommendationRequest {
        user_id: Some(7),
        k: Some(8),
        ..Default::default()
    };
    let outfits = engine.recommend(&request).await;
    assert!(!outfits.is_empty());
}
