use crate::models::Product;
use crate::utils::{cosine_similarity, z_scores};
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Content-based feature index over the current catalog.
///
/// Each product is embedded as a weighted-term signature over its text
/// attributes plus two z-score-normalized numeric columns (price,
/// popularity). Vector length is identical for every product in a session.
pub struct ItemFeatureIndex {
    ids: Vec<u32>,
    positions: HashMap<u32, usize>,
    vectors: Array2<f32>,
}

impl ItemFeatureIndex {
    /// Build the index over the full catalog, in catalog order.
    pub fn build(products: &[Product]) -> Self {
        let ids: Vec<u32> = products.iter().map(|p| p.id).collect();
        let positions: HashMap<u32, usize> = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx))
            .collect();

        // Vocabulary in sorted order so feature positions are stable
        let documents: Vec<Vec<String>> = products.iter().map(terms).collect();
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for document in &documents {
            let mut seen: Vec<&str> = Vec::new();
            for term in document {
                if !seen.contains(&term.as_str()) {
                    seen.push(term);
                    *document_frequency.entry(term).or_insert(0) += 1;
                }
            }
        }
        let vocabulary: Vec<(&str, usize)> = document_frequency
            .iter()
            .map(|(term, df)| (*term, *df))
            .collect();
        let term_position: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, (term, _))| (*term, idx))
            .collect();

        let n_products = products.len();
        let n_terms = vocabulary.len();
        let dimension = n_terms + 2;
        let mut vectors = Array2::zeros((n_products, dimension));

        // Term weight: tf * idf over the current catalog
        for (row, document) in documents.iter().enumerate() {
            for term in document {
                let col = term_position[term.as_str()];
                vectors[[row, col]] += 1.0;
            }
            for (term, df) in &vocabulary {
                let col = term_position[term];
                if vectors[[row, col]] > 0.0 {
                    let idf = (n_products as f32 / *df as f32).ln() + 1.0;
                    vectors[[row, col]] *= idf;
                }
            }
        }

        let prices: Vec<f32> = products.iter().map(|p| p.price as f32).collect();
        let popularity: Vec<f32> = products.iter().map(|p| p.popularity_score).collect();
        for (row, (price, pop)) in z_scores(&prices)
            .into_iter()
            .zip(z_scores(&popularity))
            .enumerate()
        {
            vectors[[row, n_terms]] = price;
            vectors[[row, n_terms + 1]] = pop;
        }

        info!(
            products = n_products,
            dimension, "Item feature index built"
        );

        Self {
            ids,
            positions,
            vectors,
        }
    }

    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Top-n most similar products to the query, query excluded. Unknown
    /// product ids yield an empty result rather than an error.
    pub fn similar(&self, product_id: u32, n: usize) -> Vec<(u32, f32)> {
        let query_row = match self.positions.get(&product_id) {
            Some(row) => *row,
            None => return Vec::new(),
        };

        let query = self.vectors.row(query_row);
        let mut scored: Vec<(u32, f32)> = (0..self.ids.len())
            .filter(|row| *row != query_row)
            .map(|row| {
                (
                    self.ids[row],
                    cosine_similarity(query, self.vectors.row(row)),
                )
            })
            .collect();

        // Stable sort preserves catalog order on similarity ties
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(n);
        scored
    }
}

/// Lowercased text terms contributing to a product's signature
fn terms(product: &Product) -> Vec<String> {
    [
        &product.brand,
        &product.category,
        &product.subcategory,
        &product.color,
        &product.material,
        &product.season,
    ]
    .iter()
    .flat_map(|field| field.split_whitespace())
    .map(|term| term.to_ascii_lowercase())
    .collect()
}
