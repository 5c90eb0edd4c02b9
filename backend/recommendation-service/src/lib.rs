pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use engine::RecommendationEngine;
pub use error::{RecommendError, Result};
pub use services::{FallbackGenerator, HybridBlender, OutfitAssembler, PreferenceMatcher};
