// ============================================
// Fallback Generator
// ============================================
//
// The always-available recommendation path. Two tiers:
// - static: the curated outfit pool scored with outfit-level rule weights,
//   used when personalization data is present but the ML path is not
// - generated: fully deterministic pseudo-recommendations derived from the
//   profile seed, the ultimate backstop that can never fail

mod static_catalog;

pub use static_catalog::static_outfits;

use crate::config::ProfileDefaults;
use crate::models::{Gender, Outfit, OutfitItem, OutfitSlot, UserPreference};
use crate::services::scorer::{profile_features, DeterministicScorer, Scorer};
use crate::utils::{capitalize, round2, round4};
use std::sync::Arc;
use tracing::warn;

/// Fixed style table; index position stands in for the hash-based variety
/// of earlier revisions so the sequence is identical on every runtime.
pub const STYLE_POOL: [&str; 8] = [
    "casual",
    "formal",
    "streetwear",
    "business",
    "sporty",
    "elegant",
    "vintage",
    "modern",
];

/// Fixed color table, same role as STYLE_POOL
pub const COLOR_POOL: [&str; 10] = [
    "black", "white", "blue", "red", "green", "purple", "brown", "gray", "yellow", "pink",
];

/// Index of a style in the fixed table; unknown styles map to 0
pub fn style_index(style: &str) -> usize {
    STYLE_POOL
        .iter()
        .position(|s| s.eq_ignore_ascii_case(style))
        .unwrap_or(0)
}

/// Index of a color in the fixed table; unknown colors map to 0
pub fn color_index(color: &str) -> usize {
    COLOR_POOL
        .iter()
        .position(|c| c.eq_ignore_ascii_case(color))
        .unwrap_or(0)
}

/// Outfit-level rule weights for the static tier
#[derive(Debug, Clone)]
pub struct OutfitWeights {
    pub gender_match: f32,
    pub gender_mismatch: f32,
    pub category_exact: f32,
    pub category_partial: f32,
    pub color_exact: f32,
    pub color_partial: f32,
    pub age_in_range: f32,
    pub age_near: f32,
    pub budget_half: f32,
    pub budget_within: f32,
    pub budget_over: f32,
    pub in_stock: f32,
    pub out_of_stock: f32,
}

impl Default for OutfitWeights {
    fn default() -> Self {
        Self {
            gender_match: 50.0,
            gender_mismatch: -30.0,
            category_exact: 40.0,
            category_partial: 20.0,
            color_exact: 30.0,
            color_partial: 15.0,
            age_in_range: 20.0,
            age_near: 10.0,
            budget_half: 15.0,
            budget_within: 10.0,
            budget_over: -20.0,
            in_stock: 10.0,
            out_of_stock: -30.0,
        }
    }
}

pub struct FallbackGenerator {
    weights: OutfitWeights,
    defaults: ProfileDefaults,
    scorer: Arc<dyn Scorer>,
}

impl FallbackGenerator {
    pub fn new(defaults: ProfileDefaults, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            weights: OutfitWeights::default(),
            defaults,
            scorer,
        }
    }

    /// Static tier: score the curated pool against the preferences and
    /// return exactly k outfits, cycling the pool when k exceeds it.
    pub fn recommend_static(&self, prefs: &UserPreference, k: usize) -> Vec<Outfit> {
        let mut scored: Vec<(f32, Outfit)> = static_outfits()
            .into_iter()
            .map(|outfit| (self.score_outfit(&outfit, prefs), outfit))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .iter()
            .cycle()
            .take(k)
            .map(|(score, outfit)| {
                let mut outfit = outfit.clone();
                outfit.score = round2(*score);
                outfit
            })
            .collect()
    }

    /// Outfit-level preference score; same rule family as the product-level
    /// matcher but with outfit weights.
    pub fn score_outfit(&self, outfit: &Outfit, prefs: &UserPreference) -> f32 {
        let mut score = 0.0;

        let gender = match prefs.gender {
            Some(g) => g,
            None => Gender::parse(&self.defaults.gender).unwrap_or(Gender::Male),
        };
        if outfit.target_gender == Gender::Unisex || outfit.target_gender == gender {
            score += self.weights.gender_match;
        } else {
            score += self.weights.gender_mismatch;
        }

        let style = prefs
            .style
            .as_deref()
            .unwrap_or(&self.defaults.style)
            .to_ascii_lowercase();
        let outfit_style = outfit.style.to_ascii_lowercase();
        if outfit_style == style {
            score += self.weights.category_exact;
        } else if outfit_style.contains(&style) {
            score += self.weights.category_partial;
        }

        let color = prefs
            .color
            .as_deref()
            .unwrap_or(&self.defaults.color)
            .to_ascii_lowercase();
        let outfit_color = outfit.color_scheme.to_ascii_lowercase();
        if outfit_color == color {
            score += self.weights.color_exact;
        } else if outfit_color.contains(&color) {
            score += self.weights.color_partial;
        }

        let age = prefs.age.unwrap_or(self.defaults.age) as i64;
        if let Some((min, max)) = parse_age_range(&outfit.target_age) {
            if min <= age && age <= max {
                score += self.weights.age_in_range;
            } else if (age - min).abs() <= 5 || (age - max).abs() <= 5 {
                score += self.weights.age_near;
            }
        }

        let budget = prefs.budget.unwrap_or(self.defaults.budget);
        if outfit.total_price <= budget {
            if outfit.total_price * 2 <= budget {
                score += self.weights.budget_half;
            } else {
                score += self.weights.budget_within;
            }
        } else {
            score += self.weights.budget_over;
        }

        if outfit.in_stock {
            score += self.weights.in_stock;
        } else {
            score += self.weights.out_of_stock;
        }

        score
    }

    /// Generated tier: k deterministic pseudo-outfits seeded from the
    /// profile. Entry 0 mirrors the exact style/color, entry 1 varies the
    /// color, entry 2 varies the style, the rest draw from age- and
    /// budget-conditioned style pools with cycled colors.
    pub fn generate(&self, prefs: &UserPreference, k: usize) -> Vec<Outfit> {
        let features = profile_features(prefs, &self.defaults);
        let base = match self.scorer.score(&features) {
            Ok(score) => score,
            Err(e) => {
                warn!("Scorer failed during fallback generation: {}", e);
                DeterministicScorer.score(&features).unwrap_or(0.0)
            }
        };

        let user_style = prefs
            .style
            .as_deref()
            .unwrap_or(&self.defaults.style)
            .to_ascii_lowercase();
        let user_color = prefs
            .color
            .as_deref()
            .unwrap_or(&self.defaults.color)
            .to_ascii_lowercase();
        let age = prefs.age.unwrap_or(self.defaults.age);
        let budget = prefs.budget.unwrap_or(self.defaults.budget);
        let gender = match prefs.gender {
            Some(g) => g,
            None => Gender::parse(&self.defaults.gender).unwrap_or(Gender::Male),
        };

        let pooled = pooled_styles(age, budget);

        (0..k)
            .map(|i| {
                let (style, color) = match i {
                    0 => (user_style.clone(), user_color.clone()),
                    1 => (
                        user_style.clone(),
                        COLOR_POOL[(color_index(&user_color) + 1) % COLOR_POOL.len()].to_string(),
                    ),
                    2 => (
                        STYLE_POOL[(style_index(&user_style) + 1) % STYLE_POOL.len()].to_string(),
                        user_color.clone(),
                    ),
                    _ => (
                        pooled[i % pooled.len()].to_string(),
                        COLOR_POOL[(i * 2) % COLOR_POOL.len()].to_string(),
                    ),
                };

                self.generated_outfit(i, &style, &color, age, budget, gender, base)
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn generated_outfit(
        &self,
        index: usize,
        style: &str,
        color: &str,
        age: u32,
        budget: i64,
        gender: Gender,
        base: f32,
    ) -> Outfit {
        let item = |slot: OutfitSlot, label: &str, share: i64| OutfitItem {
            slot,
            name: format!("{} {} {}", capitalize(color), capitalize(style), label),
            brand: "Wardrobe Essentials".to_string(),
            price: budget * share / 100,
            image_url: format!(
                "https://img.moda.dev/generated/{}-{}-{}.jpg",
                style,
                color,
                slot.as_str()
            ),
        };

        let items = vec![
            item(OutfitSlot::Top, "Top", 30),
            item(OutfitSlot::Bottom, "Bottom", 30),
            item(OutfitSlot::Shoes, "Shoes", 40),
        ];
        let total_price = items.iter().map(|i| i.price).sum();

        Outfit {
            outfit_id: format!("itm_{index:03}"),
            name: format!("Recommended Outfit {}", index + 1),
            description: format!("Complete {style} outfit with {} items", items.len()),
            items,
            total_price,
            score: round4(base - index as f32 * 0.02),
            style: style.to_string(),
            color_scheme: color.to_string(),
            target_gender: gender,
            target_age: age.to_string(),
            in_stock: true,
        }
    }
}

/// Age-and-budget conditioned style pool, deduplicated in insertion order
/// so the sequence is reproducible.
fn pooled_styles(age: u32, budget: i64) -> Vec<&'static str> {
    let age_styles: [&str; 4] = if age < 25 {
        ["casual", "sporty", "streetwear", "modern"]
    } else if age < 35 {
        ["casual", "business", "modern", "elegant"]
    } else {
        ["formal", "business", "elegant", "vintage"]
    };

    let budget_styles: &[&str] = if budget > 5000 {
        &["formal", "elegant", "business", "vintage"]
    } else if budget > 2000 {
        &["business", "modern", "casual", "elegant"]
    } else {
        &["casual", "sporty", "streetwear"]
    };

    let mut pooled: Vec<&'static str> = Vec::new();
    for &style in age_styles.iter().chain(budget_styles.iter()) {
        if !pooled.contains(&style) {
            pooled.push(style);
        }
    }
    pooled
}

/// Parse a "min-max" age range label
fn parse_age_range(label: &str) -> Option<(i64, i64)> {
    let (min, max) = label.split_once('-')?;
    Some((min.trim().parse().ok()?, max.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> FallbackGenerator {
        FallbackGenerator::new(defaults(), Arc::new(DeterministicScorer))
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

    fn prefs(gender: Gender, color: &str, style: &str, budget: i64, age: u32) -> UserPreference {
        UserPreference {
            user_id: Some(1),
            age: Some(age),
            gender: Some(gender),
            color: Some(color.to_string()),
            style: Some(style.to_string()),
            budget: Some(budget),
        }
    }

    #[test]
    fn test_elegant_evening_ranks_first() {
        let generator = generator();
        let user = prefs(Gender::Female, "black", "elegant", 15497, 30);

        let outfits = generator.recommend_static(&user, 8);

        assert_eq!(outfits.len(), 8);
        assert_eq!(outfits[0].name, "Elegant Evening Look");
    }

    #[test]
    fn test_static_tier_repeats_to_k() {
        let generator = generator();
        let user = prefs(Gender::Male, "blue", "casual", 5000, 25);

        let outfits = generator.recommend_static(&user, 20);
        assert_eq!(outfits.len(), 20);

        // Cycled entries keep the ranked order
        assert_eq!(outfits[0].outfit_id, outfits[8].outfit_id);
    }

    #[test]
    fn test_over_budget_penalty_replaces_bonus() {
        let generator = generator();
        let outfit = static_outfits().into_iter().next().unwrap();

        let tight = prefs(Gender::Male, "navy", "business", 500, 30);
        let mut roomy = tight.clone();
        roomy.budget = Some(outfit.total_price * 2);

        let tight_score = generator.score_outfit(&outfit, &tight);
        let roomy_score = generator.score_outfit(&outfit, &roomy);

        // -20 over budget versus +15 well within budget
        assert!((roomy_score - tight_score - 35.0).abs() < 0.001);
    }

    #[test]
    fn test_out_of_stock_costs_forty_points() {
        let generator = generator();
        let outfit = static_outfits().into_iter().next().unwrap();
        let mut unavailable = outfit.clone();
        unavailable.in_stock = false;

        let user = prefs(Gender::Male, "navy", "business", 20000, 30);
        let in_stock = generator.score_outfit(&outfit, &user);
        let out_of_stock = generator.score_outfit(&unavailable, &user);

        assert!((in_stock - out_of_stock - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_generated_tier_is_deterministic() {
        let generator = generator();
        let user = prefs(Gender::Female, "red", "sporty", 3000, 22);

        let first = generator.generate(&user, 8);
        let second = generator.generate(&user, 8);

        assert_eq!(first.len(), 8);
        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn test_generated_variety_pattern() {
        let generator = generator();
        let user = prefs(Gender::Male, "blue", "casual", 3000, 22);

        let outfits = generator.generate(&user, 6);

        // exact match, then color varied, then style varied
        assert_eq!(outfits[0].style, "casual");
        assert_eq!(outfits[0].color_scheme, "blue");
        assert_eq!(outfits[1].style, "casual");
        assert_eq!(outfits[1].color_scheme, "red");
        assert_eq!(outfits[2].style, "formal");
        assert_eq!(outfits[2].color_scheme, "blue");

        // descending pseudo-scores, every outfit valid
        for pair in outfits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(outfits.iter().all(|o| o.items.len() >= 2));
    }

    #[test]
    fn test_pooled_styles_are_deduplicated() {
        let pooled = pooled_styles(30, 6000);
        let mut unique = pooled.clone();
        unique.dedup();
        assert_eq!(pooled.len(), unique.len());
        assert!(pooled.contains(&"business"));
    }

    #[test]
    fn test_generate_never_returns_short() {
        let generator = generator();
        let empty = UserPreference::default();

        assert_eq!(generator.generate(&empty, 1).len(), 1);
        assert_eq!(generator.generate(&empty, 17).len(), 17);
    }
}
