use crate::config::BlendConfig;
use crate::models::{BlendStats, RecommendationSource, ScoredRecommendation, UserPreference};
use crate::services::collaborative::{CollaborativeFilter, Prediction};
use crate::services::preference::PreferenceMatcher;
use crate::storage::CatalogStore;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Hybrid Blender: merges collaborative predictions with rule-based catalog
/// matches into one deduplicated ranking.
///
/// Each source is weighted, and failures are contained at this boundary: a
/// failing source contributes nothing while the others still blend. Both
/// sources failing yields an empty list, never an error.
pub struct HybridBlender {
    collaborative: Arc<CollaborativeFilter>,
    matcher: Arc<PreferenceMatcher>,
    catalog: Arc<dyn CatalogStore>,
    config: BlendConfig,
}

impl HybridBlender {
    pub fn new(
        collaborative: Arc<CollaborativeFilter>,
        matcher: Arc<PreferenceMatcher>,
        catalog: Arc<dyn CatalogStore>,
        config: BlendConfig,
    ) -> Self {
        Self {
            collaborative,
            matcher,
            catalog,
            config,
        }
    }

    pub async fn blend(
        &self,
        user_id: u32,
        prefs: &UserPreference,
        n: usize,
    ) -> (Vec<ScoredRecommendation>, BlendStats) {
        let mut candidates: Vec<ScoredRecommendation> = Vec::new();
        let mut stats = BlendStats::default();
        let per_source = (n / 2).max(1);

        // Collaborative predictions run first: deduplication keeps the first
        // occurrence, so on duplicate product ids the collaborative entry
        // takes precedence over the rule entry.
        match self.collaborative.predict(user_id, per_source).await {
            Ok(prediction) => {
                if matches!(prediction, Prediction::ColdStart(_)) {
                    info!(user_id, "Cold-start user, popularity list substituted");
                }
                let predictions = prediction.into_inner();
                stats.collaborative_count = predictions.len() as i32;
                candidates.extend(predictions.into_iter().map(|(product_id, score)| {
                    ScoredRecommendation {
                        product_id,
                        score: score * self.config.collaborative_weight,
                        source: RecommendationSource::Collaborative,
                    }
                }));
            }
            Err(e) => {
                warn!("Collaborative filtering failed: {}", e);
            }
        }

        match self.preference_candidates(prefs, per_source).await {
            Ok(matches) => {
                stats.rule_count = matches.len() as i32;
                candidates.extend(matches.into_iter().map(|(product_id, score)| {
                    ScoredRecommendation {
                        product_id,
                        score: score * self.config.preference_weight,
                        source: RecommendationSource::Rule,
                    }
                }));
            }
            Err(e) => {
                warn!("Preference matching failed: {}", e);
            }
        }

        stats.total_candidates = candidates.len() as i32;

        // 去重：保留首次出現
        let mut seen: HashSet<u32> = HashSet::new();
        let mut unique: Vec<ScoredRecommendation> = Vec::new();
        for candidate in candidates {
            if seen.insert(candidate.product_id) {
                unique.push(candidate);
            }
        }

        unique.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        unique.truncate(n);
        stats.final_count = unique.len() as i32;

        info!(
            user_id,
            collaborative = stats.collaborative_count,
            rule = stats.rule_count,
            total = stats.total_candidates,
            blended = stats.final_count,
            "Blend completed"
        );

        (unique, stats)
    }

    async fn preference_candidates(
        &self,
        prefs: &UserPreference,
        limit: usize,
    ) -> anyhow::Result<Vec<(u32, f32)>> {
        let products = self.catalog.list_in_stock().await?;
        Ok(self.matcher.search(&products, prefs, limit))
    }
}
