// ============================================
// Opaque Scorer Strategy
// ============================================
//
// Loads and runs the trained ONNX affinity scorer using tract-onnx.
// The artifact is optional: when it cannot be loaded the deterministic
// scorer takes its place, selected once at construction time by a
// capability probe rather than branched on at each call site.

use crate::config::ProfileDefaults;
use crate::error::{RecommendError, Result};
use crate::models::{Gender, UserPreference};
use crate::services::fallback::{color_index, style_index, COLOR_POOL, STYLE_POOL};
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Profile feature vector layout: [age, gender, color, style, budget]
/// followed by zero padding up to the model input width.
pub const FEATURE_DIM: usize = 16;

type OnnxPlan = tract_onnx::prelude::SimplePlan<
    tract_onnx::prelude::TypedFact,
    Box<dyn tract_onnx::prelude::TypedOp>,
    tract_onnx::prelude::Graph<
        tract_onnx::prelude::TypedFact,
        Box<dyn tract_onnx::prelude::TypedOp>,
    >,
>;

/// Affinity scorer over a normalized profile feature vector
pub trait Scorer: Send + Sync {
    fn score(&self, features: &[f32]) -> Result<f32>;
    fn is_available(&self) -> bool;
    fn name(&self) -> &'static str;
}

/// Build the normalized profile feature vector consumed by both scorers
pub fn profile_features(prefs: &UserPreference, defaults: &ProfileDefaults) -> [f32; FEATURE_DIM] {
    let age = prefs.age.unwrap_or(defaults.age) as f32 / 100.0;
    let gender = match prefs.gender {
        Some(Gender::Female) => 1.0,
        _ => 0.0,
    };
    let color = prefs.color.as_deref().unwrap_or(&defaults.color);
    let style = prefs.style.as_deref().unwrap_or(&defaults.style);
    let budget = prefs.budget.unwrap_or(defaults.budget) as f32 / 1000.0;

    let mut features = [0.0; FEATURE_DIM];
    features[0] = age;
    features[1] = gender;
    features[2] = color_index(color) as f32 / COLOR_POOL.len() as f32;
    features[3] = style_index(style) as f32 / STYLE_POOL.len() as f32;
    features[4] = budget;
    features
}

/// ONNX-backed trained scorer
pub struct TrainedScorer {
    plan: Arc<OnnxPlan>,
}

impl TrainedScorer {
    /// Load the artifact; a missing or unreadable model is the documented
    /// trigger for falling back to the deterministic scorer.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(RecommendError::DependencyUnavailable(format!(
                "scorer artifact not found: {}",
                path.display()
            )));
        }

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                RecommendError::DependencyUnavailable(format!("scorer artifact load failed: {e}"))
            })?;

        Ok(Self {
            plan: Arc::new(plan),
        })
    }
}

impl Scorer for TrainedScorer {
    fn score(&self, features: &[f32]) -> Result<f32> {
        if features.len() != FEATURE_DIM {
            return Err(RecommendError::MalformedInput(format!(
                "expected {} features, got {}",
                FEATURE_DIM,
                features.len()
            )));
        }

        let input = tract_onnx::prelude::tract_ndarray::Array2::from_shape_fn(
            (1, FEATURE_DIM),
            |(_, col)| features[col],
        );

        let output = self
            .plan
            .run(tract_onnx::prelude::tvec![input.into_dyn().into_tvalue()])
            .map_err(|e| {
                RecommendError::DependencyUnavailable(format!("scorer inference failed: {e}"))
            })?;

        let scores = output[0].to_array_view::<f32>().map_err(|e| {
            RecommendError::DependencyUnavailable(format!("scorer output extraction failed: {e}"))
        })?;

        scores
            .iter()
            .copied()
            .next()
            .ok_or_else(|| RecommendError::DependencyUnavailable("empty scorer output".to_string()))
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "trained"
    }
}

/// Deterministic backstop scorer: a fixed weighted combination of the
/// profile features. No hidden randomness, identical input gives identical
/// output on every run.
pub struct DeterministicScorer;

impl Scorer for DeterministicScorer {
    fn score(&self, features: &[f32]) -> Result<f32> {
        if features.len() != FEATURE_DIM {
            return Err(RecommendError::MalformedInput(format!(
                "expected {} features, got {}",
                FEATURE_DIM,
                features.len()
            )));
        }

        Ok(features[0] * 0.4
            + features[1] * 0.1
            + features[2] * 0.25
            + features[3] * 0.15
            + features[4] * 0.1)
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "deterministic"
    }
}

/// Capability probe: prefer the trained artifact, fall back to the
/// deterministic scorer when it is absent.
pub fn select_scorer(model_path: &str) -> Arc<dyn Scorer> {
    match TrainedScorer::load(model_path) {
        Ok(scorer) => {
            debug!("✅ Loaded trained scorer from: {}", model_path);
            Arc::new(scorer)
        }
        Err(e) => {
            warn!("⚠️  Trained scorer unavailable: {}", e);
            warn!("   Falling back to deterministic scoring");
            Arc::new(DeterministicScorer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs() -> UserPreference {
        UserPreference {
            user_id: Some(1),
            age: Some(30),
            gender: Some(Gender::Female),
            color: Some("black".to_string()),
            style: Some("elegant".to_string()),
            budget: Some(2000),
        }
    }

    fn defaults() -> ProfileDefaults {
        ProfileDefaults {
            user_id: 1,
            age: 25,
            gender: "male".to_string(),
            color: "blue".to_string(),
            style: "casual".to_string(),
            budget: 5000,
            top_k: 8,
        }
    }

    #[test]
    fn test_profile_features_layout() {
        let features = profile_features(&prefs(), &defaults());

        assert_eq!(features.len(), FEATURE_DIM);
        assert!((features[0] - 0.3).abs() < 0.001);
        assert_eq!(features[1], 1.0);
        assert!((features[4] - 2.0).abs() < 0.001);
        assert!(features[5..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_deterministic_scorer_is_reproducible() {
        let scorer = DeterministicScorer;
        let features = profile_features(&prefs(), &defaults());

        let first = scorer.score(&features).unwrap();
        let second = scorer.score(&features).unwrap();
        assert_eq!(first, second);
        assert!(!scorer.is_available());
    }

    #[test]
    fn test_deterministic_scorer_rejects_wrong_width() {
        let scorer = DeterministicScorer;
        let result = scorer.score(&[1.0, 2.0]);
        assert!(matches!(result, Err(RecommendError::MalformedInput(_))));
    }

    #[test]
    fn test_select_scorer_falls_back_without_artifact() {
        let scorer = select_scorer("models/definitely_missing.onnx");
        assert_eq!(scorer.name(), "deterministic");
        assert!(!scorer.is_available());
    }
}
