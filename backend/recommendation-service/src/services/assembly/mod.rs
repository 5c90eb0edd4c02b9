use crate::models::{
    Gender, Outfit, OutfitItem, OutfitSlot, Product, ScoredRecommendation, UserPreference,
};
use crate::storage::CatalogStore;
use crate::utils::{capitalize, round2};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Categories classified as tops and bottoms; everything else falls back to
/// the subcategory check and finally the accessory slot.
const TOP_CATEGORIES: [&str; 4] = ["shirts", "tops", "hoodies", "jackets"];
const BOTTOM_CATEGORIES: [&str; 3] = ["jeans", "trousers", "shorts"];

const MAX_OUTFITS: usize = 5;
const MIN_ITEMS_PER_OUTFIT: usize = 2;

/// Groups a ranked item list into complete outfits under the
/// one-item-per-slot constraint.
pub struct OutfitAssembler {
    catalog: Arc<dyn CatalogStore>,
}

impl OutfitAssembler {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Resolve scored items to full products, group them by category and
    /// emit at most five outfits in group-iteration order.
    pub async fn assemble(
        &self,
        scored: &[ScoredRecommendation],
        prefs: &UserPreference,
    ) -> Vec<Outfit> {
        let resolved = self.resolve_products(scored).await;

        // 按類別分組，保持首次出現順序
        let mut group_order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<(Product, f32)>> = HashMap::new();
        for (product, score) in resolved {
            let key = product.category.clone();
            if !groups.contains_key(&key) {
                group_order.push(key.clone());
            }
            groups.entry(key).or_default().push((product, score));
        }

        let mut outfits = Vec::new();
        for key in group_order {
            if outfits.len() >= MAX_OUTFITS {
                break;
            }
            if let Some(members) = groups.remove(&key) {
                if let Some(outfit) = self.build_outfit(outfits.len(), &members, prefs) {
                    outfits.push(outfit);
                }
            }
        }

        info!(outfits = outfits.len(), "Outfit assembly completed");

        outfits
    }

    /// Items without resolvable detail are dropped silently
    async fn resolve_products(&self, scored: &[ScoredRecommendation]) -> Vec<(Product, f32)> {
        let mut resolved = Vec::with_capacity(scored.len());
        for recommendation in scored {
            match self.catalog.get_product(recommendation.product_id).await {
                Ok(Some(product)) => resolved.push((product, recommendation.score)),
                Ok(None) => {
                    debug!(
                        product_id = recommendation.product_id,
                        "Dropping unresolvable recommendation"
                    );
                }
                Err(e) => {
                    debug!(
                        product_id = recommendation.product_id,
                        "Product lookup failed: {}", e
                    );
                }
            }
        }
        resolved
    }

    /// Slot assignment within one style group; the first item seen for a
    /// slot wins and later items of the same slot are discarded.
    fn build_outfit(
        &self,
        index: usize,
        members: &[(Product, f32)],
        prefs: &UserPreference,
    ) -> Option<Outfit> {
        let mut filled: HashSet<OutfitSlot> = HashSet::new();
        let mut items = Vec::new();
        let mut total_price = 0;
        let mut score_sum = 0.0;

        for (product, score) in members {
            let slot = classify_slot(product);
            if !filled.insert(slot) {
                continue;
            }
            items.push(OutfitItem {
                slot,
                name: product.name.clone(),
                brand: product.brand.clone(),
                price: product.price,
                image_url: product.image_url.clone(),
            });
            total_price += product.price;
            score_sum += score;
        }

        if items.len() < MIN_ITEMS_PER_OUTFIT {
            return None;
        }

        let style = prefs.style.as_deref().unwrap_or("casual");
        let color = prefs.color.as_deref().unwrap_or("multi");
        let item_count = items.len();

        Some(Outfit {
            outfit_id: format!("generated_{}", index + 1),
            name: format!("{} {} Outfit", capitalize(style), capitalize(color)),
            description: format!("Complete {style} outfit with {item_count} items"),
            items,
            total_price,
            score: round2(score_sum / item_count as f32),
            style: style.to_string(),
            color_scheme: color.to_string(),
            target_gender: prefs.gender.unwrap_or(Gender::Unisex),
            target_age: prefs.age.map(|a| a.to_string()).unwrap_or_default(),
            in_stock: true,
        })
    }
}

/// Fixed category membership tables decide the slot; the subcategory only
/// breaks out shoes for categories outside the tables.
fn classify_slot(product: &Product) -> OutfitSlot {
    let category = product.category.to_ascii_lowercase();
    if TOP_CATEGORIES.contains(&category.as_str()) {
        OutfitSlot::Top
    } else if BOTTOM_CATEGORIES.contains(&category.as_str()) {
        OutfitSlot::Bottom
    } else if product.subcategory.eq_ignore_ascii_case("shoes") {
        OutfitSlot::Shoes
    } else {
        OutfitSlot::Accessory
    }
}
