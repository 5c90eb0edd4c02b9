use crate::models::{Gender, Product, UserPreference};
use tracing::debug;

/// Additive rule weights for product-level preference matching.
///
/// These values are part of the scoring contract and must stay in sync with
/// the outfit-level weights used by the fallback generator.
#[derive(Debug, Clone)]
pub struct MatchWeights {
    pub gender_match: f32,
    pub gender_mismatch: f32,
    pub color_match: f32,
    pub style_match: f32,
    pub budget_half: f32,
    pub budget_within: f32,
    pub budget_over: f32,
    pub age_in_range: f32,
    pub age_near: f32,
    pub popularity_factor: f32,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            gender_match: 30.0,
            gender_mismatch: -20.0,
            color_match: 25.0,
            style_match: 25.0,
            budget_half: 15.0,
            budget_within: 10.0,
            budget_over: -15.0,
            age_in_range: 20.0,
            age_near: 10.0,
            popularity_factor: 0.1,
        }
    }
}

/// Rule-based preference scorer. Pure function of its inputs: identical
/// product/preference pairs always produce identical scores.
pub struct PreferenceMatcher {
    weights: MatchWeights,
}

impl Default for PreferenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceMatcher {
    pub fn new() -> Self {
        Self {
            weights: MatchWeights::default(),
        }
    }

    pub fn with_weights(weights: MatchWeights) -> Self {
        Self { weights }
    }

    /// Score a single product against the preference record. Missing
    /// preference fields skip their rule; popularity always contributes.
    pub fn score(&self, product: &Product, prefs: &UserPreference) -> f32 {
        let mut score = 0.0;

        if let Some(gender) = prefs.gender {
            if product.target_gender == Gender::Unisex || product.target_gender == gender {
                score += self.weights.gender_match;
            } else {
                score += self.weights.gender_mismatch;
            }
        }

        if let Some(color) = prefs.color.as_deref() {
            if product.color.eq_ignore_ascii_case(color) {
                score += self.weights.color_match;
            }
        }

        if let Some(style) = prefs.style.as_deref() {
            if product.category.eq_ignore_ascii_case(style) {
                score += self.weights.style_match;
            }
        }

        if let Some(budget) = prefs.budget {
            if product.price <= budget {
                if product.price * 2 <= budget {
                    score += self.weights.budget_half;
                } else {
                    score += self.weights.budget_within;
                }
            } else {
                score += self.weights.budget_over;
            }
        }

        if let Some(age) = prefs.age {
            let age = age as i64;
            let min = product.target_age_min as i64;
            let max = product.target_age_max as i64;
            if min <= age && age <= max {
                score += self.weights.age_in_range;
            } else if (age - min).abs() <= 5 || (age - max).abs() <= 5 {
                score += self.weights.age_near;
            }
        }

        score += product.popularity_score * self.weights.popularity_factor;

        score
    }

    /// Preference-driven catalog search: filter by the available preference
    /// fields, pre-order by popularity, then re-score and sort by match score.
    pub fn search(
        &self,
        products: &[Product],
        prefs: &UserPreference,
        limit: usize,
    ) -> Vec<(u32, f32)> {
        let mut matching: Vec<&Product> = products
            .iter()
            .filter(|p| self.passes_filters(p, prefs))
            .collect();

        // 按熱度降序作為預過濾
        matching.sort_by(|a, b| {
            b.popularity_score
                .partial_cmp(&a.popularity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matching.truncate(limit);

        let mut scored: Vec<(u32, f32)> = matching
            .into_iter()
            .map(|p| (p.id, self.score(p, prefs)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        debug!(candidates = scored.len(), "Preference search completed");

        scored
    }

    /// Hard filters applied before scoring, mirroring the catalog query
    fn passes_filters(&self, product: &Product, prefs: &UserPreference) -> bool {
        if let Some(gender) = prefs.gender {
            if product.target_gender != Gender::Unisex && product.target_gender != gender {
                return false;
            }
        }
        if let Some(color) = prefs.color.as_deref() {
            if !product.color.eq_ignore_ascii_case(color) {
                return false;
            }
        }
        if let Some(style) = prefs.style.as_deref() {
            if !product.category.eq_ignore_ascii_case(style) {
                return false;
            }
        }
        if let Some(budget) = prefs.budget {
            if product.price > budget {
                return false;
            }
        }
        if let Some(age) = prefs.age {
            if product.target_age_min > age || product.target_age_max < age {
                return false;
            }
        }
        true
    }
}
