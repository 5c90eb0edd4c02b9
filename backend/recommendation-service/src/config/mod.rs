use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub blend: BlendConfig,
    pub model: ModelConfig,
    pub defaults: ProfileDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlendConfig {
    pub collaborative_weight: f32,
    pub preference_weight: f32,
    /// How many blended candidates to request before outfit assembly
    pub candidate_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Latent rank for the truncated SVD (capped by catalog size)
    pub latent_rank: usize,
    pub svd_iterations: usize,
    /// Path to the optional trained ONNX scorer artifact
    pub scorer_path: String,
}

/// Documented defaults applied to missing or malformed request fields
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDefaults {
    pub user_id: u32,
    pub age: u32,
    pub gender: String,
    pub color: String,
    pub style: String,
    pub budget: i64,
    pub top_k: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenv::dotenv().ok();

        Ok(Config {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "recommendation-service".to_string()),
            },
            blend: BlendConfig {
                collaborative_weight: env::var("COLLABORATIVE_WEIGHT")
                    .unwrap_or_else(|_| "0.6".to_string())
                    .parse()
                    .expect("COLLABORATIVE_WEIGHT must be a valid f32"),
                preference_weight: env::var("PREFERENCE_WEIGHT")
                    .unwrap_or_else(|_| "0.4".to_string())
                    .parse()
                    .expect("PREFERENCE_WEIGHT must be a valid f32"),
                candidate_limit: env::var("CANDIDATE_LIMIT")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()
                    .expect("CANDIDATE_LIMIT must be a valid usize"),
            },
            model: ModelConfig {
                latent_rank: env::var("LATENT_RANK")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()
                    .expect("LATENT_RANK must be a valid usize"),
                svd_iterations: env::var("SVD_ITERATIONS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("SVD_ITERATIONS must be a valid usize"),
                scorer_path: env::var("SCORER_PATH")
                    .unwrap_or_else(|_| "models/outfit_scorer.onnx".to_string()),
            },
            defaults: ProfileDefaults {
                user_id: env::var("DEFAULT_USER_ID")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()
                    .expect("DEFAULT_USER_ID must be a valid u32"),
                age: env::var("DEFAULT_AGE")
                    .unwrap_or_else(|_| "25".to_string())
                    .parse()
                    .expect("DEFAULT_AGE must be a valid u32"),
                gender: env::var("DEFAULT_GENDER").unwrap_or_else(|_| "male".to_string()),
                color: env::var("DEFAULT_COLOR").unwrap_or_else(|_| "blue".to_string()),
                style: env::var("DEFAULT_STYLE").unwrap_or_else(|_| "casual".to_string()),
                budget: env::var("DEFAULT_BUDGET")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()
                    .expect("DEFAULT_BUDGET must be a valid i64"),
                top_k: env::var("DEFAULT_TOP_K")
                    .unwrap_or_else(|_| "8".to_string())
                    .parse()
                    .expect("DEFAULT_TOP_K must be a valid usize"),
            },
        })
    }
}
