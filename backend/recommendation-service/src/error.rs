use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommendError>;

/// Error taxonomy for the recommendation core.
///
/// Only `DependencyUnavailable` is meant to reach the engine top level, where
/// it routes the request to the fallback generator. The other variants are
/// handled at the component boundary that produced them.
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Model not trained: {0}")]
    UntrainedModel(&'static str),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}
