use crate::config::Config;
use crate::models::{Outfit, RecommendationRequest, UserPreference};
use crate::services::assembly::OutfitAssembler;
use crate::services::collaborative::CollaborativeFilter;
use crate::services::content::ItemFeatureIndex;
use crate::services::fallback::FallbackGenerator;
use crate::services::hybrid::HybridBlender;
use crate::services::preference::PreferenceMatcher;
use crate::services::scorer::select_scorer;
use crate::storage::{CatalogStore, InteractionStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Recommendation engine context object.
///
/// Explicitly constructed and initialized by the caller; one instance per
/// process or per request, never a process-wide singleton. `init` loads the
/// interaction history and catalog snapshot and fits the matrices; until it
/// runs, every request is served by the fallback generator.
pub struct RecommendationEngine {
    config: Config,
    catalog: Arc<dyn CatalogStore>,
    interactions: Arc<dyn InteractionStore>,
    assembler: OutfitAssembler,
    fallback: FallbackGenerator,
    blender: Option<HybridBlender>,
    content: Option<ItemFeatureIndex>,
}

impl RecommendationEngine {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        interactions: Arc<dyn InteractionStore>,
        config: Config,
    ) -> Self {
        let scorer = select_scorer(&config.model.scorer_path);
        let assembler = OutfitAssembler::new(catalog.clone());
        let fallback = FallbackGenerator::new(config.defaults.clone(), scorer);

        Self {
            config,
            catalog,
            interactions,
            assembler,
            fallback,
            blender: None,
            content: None,
        }
    }

    /// Load data and fit the scoring matrices for this session
    pub async fn init(&mut self) -> anyhow::Result<()> {
        let interactions = self.interactions.list_rated().await?;
        let mut collaborative = CollaborativeFilter::new(
            self.catalog.clone(),
            self.config.model.latent_rank,
            self.config.model.svd_iterations,
        );
        collaborative.fit(&interactions)?;

        let products = self.catalog.list_in_stock().await?;
        self.content = Some(ItemFeatureIndex::build(&products));

        self.blender = Some(HybridBlender::new(
            Arc::new(collaborative),
            Arc::new(PreferenceMatcher::new()),
            self.catalog.clone(),
            self.config.blend.clone(),
        ));

        info!(
            interactions = interactions.len(),
            products = products.len(),
            "Recommendation engine initialized"
        );

        Ok(())
    }

    /// Top-level entry point. Always returns a non-empty outfit list: the
    /// personalized path is attempted first and any total failure falls
    /// through to the fallback generator.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Vec<Outfit> {
        let (prefs, k) = request.resolve(&self.config.defaults);

        let mut outfits = match self.personalized(&prefs, k).await {
            Ok(outfits) if !outfits.is_empty() => outfits,
            Ok(_) => {
                info!("Personalized path produced no outfits, using fallback");
                self.fallback_outfits(&prefs, k)
            }
            Err(e) => {
                warn!("Personalized path unavailable: {}", e);
                self.fallback_outfits(&prefs, k)
            }
        };

        outfits.truncate(k);
        outfits
    }

    /// Content-similarity lookup for a reference product
    pub fn similar_products(&self, product_id: u32, n: usize) -> Vec<(u32, f32)> {
        match &self.content {
            Some(index) => index.similar(product_id, n),
            None => Vec::new(),
        }
    }

    async fn personalized(&self, prefs: &UserPreference, k: usize) -> anyhow::Result<Vec<Outfit>> {
        let blender = self
            .blender
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("engine not initialized"))?;

        let user_id = prefs.user_id.unwrap_or(self.config.defaults.user_id);
        let candidates = self.config.blend.candidate_limit.max(k);
        let (blended, _stats) = blender.blend(user_id, prefs, candidates).await;

        Ok(self.assembler.assemble(&blended, prefs).await)
    }

    /// Static tier first; the deterministic generated tier backstops an
    /// empty pool so this path can never come back short.
    fn fallback_outfits(&self, prefs: &UserPreference, k: usize) -> Vec<Outfit> {
        let outfits = self.fallback.recommend_static(prefs, k);
        if outfits.is_empty() {
            return self.fallback.generate(prefs, k);
        }
        outfits
    }
}
