use serde::{Deserialize, Serialize};

use crate::config::ProfileDefaults;

/// Gender targeting for products and outfits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unisex => "unisex",
        }
    }

    /// Case-insensitive parse; unknown values map to None so the caller can
    /// coerce to its configured default.
    pub fn parse(value: &str) -> Option<Gender> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "unisex" => Some(Gender::Unisex),
            _ => None,
        }
    }
}

/// Catalog product, immutable for the duration of a scoring pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub subcategory: String,
    pub color: String,
    /// Price in minor currency units
    pub price: i64,
    pub target_gender: Gender,
    pub target_age_min: u32,
    pub target_age_max: u32,
    pub season: String,
    pub material: String,
    pub popularity_score: f32,
    pub in_stock: bool,
    pub image_url: String,
}

/// Per-request user preference record. Every field is optional; a missing
/// field simply skips the matching rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPreference {
    pub user_id: Option<u32>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub budget: Option<i64>,
}

/// A rated user-product interaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: u32,
    pub product_id: u32,
    pub rating: f32,
    pub interaction_type: String,
}

/// Which scoring source produced a recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecommendationSource {
    Collaborative,
    Content,
    Rule,
}

impl RecommendationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationSource::Collaborative => "collaborative",
            RecommendationSource::Content => "content",
            RecommendationSource::Rule => "rule",
        }
    }
}

/// A scored candidate product; unique by product_id after blending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub product_id: u32,
    pub score: f32,
    pub source: RecommendationSource,
}

/// Outfit slot; an outfit holds at most one item per slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitSlot {
    Top,
    Bottom,
    Shoes,
    Accessory,
}

impl OutfitSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutfitSlot::Top => "top",
            OutfitSlot::Bottom => "bottom",
            OutfitSlot::Shoes => "shoes",
            OutfitSlot::Accessory => "accessory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutfitItem {
    #[serde(rename = "type")]
    pub slot: OutfitSlot,
    pub name: String,
    pub brand: String,
    pub price: i64,
    pub image_url: String,
}

/// A complete outfit as returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outfit {
    pub outfit_id: String,
    pub name: String,
    pub description: String,
    pub items: Vec<OutfitItem>,
    pub total_price: i64,
    pub score: f32,
    pub style: String,
    pub color_scheme: String,
    pub target_gender: Gender,
    pub target_age: String,
    pub in_stock: bool,
}

/// Raw request shape accepted by the engine entry point.
///
/// age and budget are kept as raw JSON values: non-numeric input is coerced
/// to the configured default instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    pub user_id: Option<u32>,
    pub age: Option<serde_json::Value>,
    pub gender: Option<String>,
    pub color_pref: Option<String>,
    pub style_pref: Option<String>,
    pub budget: Option<serde_json::Value>,
    pub k: Option<usize>,
}

impl RecommendationRequest {
    /// Resolve the raw request into a fully-populated preference record,
    /// applying documented defaults for missing or malformed fields.
    pub fn resolve(&self, defaults: &ProfileDefaults) -> (UserPreference, usize) {
        let age = self
            .age
            .as_ref()
            .and_then(coerce_u64)
            .map(|v| v as u32)
            .unwrap_or(defaults.age);

        let budget = self
            .budget
            .as_ref()
            .and_then(coerce_u64)
            .map(|v| v as i64)
            .unwrap_or(defaults.budget);

        let gender = self
            .gender
            .as_deref()
            .and_then(Gender::parse)
            .or_else(|| Gender::parse(&defaults.gender))
            .unwrap_or(Gender::Male);

        let prefs = UserPreference {
            user_id: Some(self.user_id.unwrap_or(defaults.user_id)),
            age: Some(age),
            gender: Some(gender),
            color: Some(
                self.color_pref
                    .clone()
                    .unwrap_or_else(|| defaults.color.clone()),
            ),
            style: Some(
                self.style_pref
                    .clone()
                    .unwrap_or_else(|| defaults.style.clone()),
            ),
            budget: Some(budget),
        };

        let k = self.k.unwrap_or(defaults.top_k).max(1);

        (prefs, k)
    }
}

/// Accept numbers and numeric strings, reject everything else
fn coerce_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok().or_else(|| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|f| *f >= 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

/// Per-source counts for one blend pass
#[derive(Debug, Clone, Default)]
pub struct BlendStats {
    pub collaborative_count: i32,
    pub rule_count: i32,
    pub total_candidates: i32,
    pub final_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_resolve_empty_request_applies_defaults() {
        let request = RecommendationRequest::default();
        let (prefs, k) = request.resolve(&defaults());

        assert_eq!(prefs.age, Some(25));
        assert_eq!(prefs.gender, Some(Gender::Male));
        assert_eq!(prefs.color.as_deref(), Some("blue"));
        assert_eq!(prefs.style.as_deref(), Some("casual"));
        assert_eq!(prefs.budget, Some(5000));
        assert_eq!(k, 8);
    }

    #[test]
    fn test_resolve_coerces_malformed_numbers() {
        let request = RecommendationRequest {
            age: Some(serde_json::json!("not a number")),
            budget: Some(serde_json::json!([1, 2, 3])),
            ..Default::default()
        };
        let (prefs, _) = request.resolve(&defaults());

        assert_eq!(prefs.age, Some(25));
        assert_eq!(prefs.budget, Some(5000));
    }

    #[test]
    fn test_resolve_accepts_numeric_strings() {
        let request = RecommendationRequest {
            age: Some(serde_json::json!("31")),
            budget: Some(serde_json::json!(12000)),
            gender: Some("FEMALE".to_string()),
            ..Default::default()
        };
        let (prefs, _) = request.resolve(&defaults());

        assert_eq!(prefs.age, Some(31));
        assert_eq!(prefs.budget, Some(12000));
        assert_eq!(prefs.gender, Some(Gender::Female));
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse("f"), Some(Gender::Female));
        assert_eq!(Gender::parse("UNISEX"), Some(Gender::Unisex));
        assert_eq!(Gender::parse("other"), None);
    }

    #[test]
    fn test_source_as_str() {
        assert_eq!(RecommendationSource::Collaborative.as_str(), "collaborative");
        assert_eq!(RecommendationSource::Rule.as_str(), "rule");
    }
}
