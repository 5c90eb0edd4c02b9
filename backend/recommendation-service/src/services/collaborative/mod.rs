mod matrix;

pub use matrix::UserItemMatrix;

use crate::error::{RecommendError, Result};
use crate::models::Interaction;
use crate::storage::CatalogStore;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

/// Deterministic seed for the factor initialization; fixed so identical
/// interaction data always yields identical latent factors.
const FACTOR_SEED: u64 = 42;

/// Outcome of a collaborative prediction. Cold start is an expected branch
/// with its own recovery, not an error.
#[derive(Debug, Clone)]
pub enum Prediction {
    /// Latent-factor predictions for a user present in the matrix
    Trained(Vec<(u32, f32)>),
    /// Popularity-ordered substitute for a user with no history
    ColdStart(Vec<(u32, f32)>),
}

impl Prediction {
    pub fn into_inner(self) -> Vec<(u32, f32)> {
        match self {
            Prediction::Trained(items) | Prediction::ColdStart(items) => items,
        }
    }
}

/// Collaborative filter backed by a truncated SVD of the user-item matrix.
///
/// The top latent item directions are extracted with seeded subspace
/// iteration on the item Gram matrix; a user's predicted ratings are the
/// projection of their rating row onto that subspace.
pub struct CollaborativeFilter {
    catalog: Arc<dyn CatalogStore>,
    rank: usize,
    iterations: usize,
    matrix: Option<UserItemMatrix>,
    item_factors: Option<Vec<Array1<f32>>>,
}

impl CollaborativeFilter {
    pub fn new(catalog: Arc<dyn CatalogStore>, rank: usize, iterations: usize) -> Self {
        Self {
            catalog,
            rank,
            iterations,
            matrix: None,
            item_factors: None,
        }
    }

    /// Build the rating matrix and factorize it. Must run before predict.
    pub fn fit(&mut self, interactions: &[Interaction]) -> Result<()> {
        let matrix = UserItemMatrix::from_interactions(interactions);
        let rank = self
            .rank
            .min(matrix.num_users())
            .min(matrix.num_items());

        let factors = if rank == 0 {
            Vec::new()
        } else {
            top_right_singular_vectors(matrix.ratings(), rank, self.iterations)
        };

        info!(
            users = matrix.num_users(),
            items = matrix.num_items(),
            rank,
            "Collaborative filter fitted"
        );

        self.matrix = Some(matrix);
        self.item_factors = Some(factors);
        Ok(())
    }

    /// Predict top-n unrated items for a user, or the popularity fallback
    /// for a user absent from the matrix.
    pub async fn predict(&self, user_id: u32, n: usize) -> Result<Prediction> {
        let matrix = self
            .matrix
            .as_ref()
            .ok_or(RecommendError::UntrainedModel("collaborative filter"))?;
        let factors = self
            .item_factors
            .as_ref()
            .ok_or(RecommendError::UntrainedModel("collaborative filter"))?;

        let user_row = match matrix.user_row(user_id) {
            Some(row) => row,
            None => {
                debug!(user_id, "Cold-start user, returning popularity list");
                return Ok(Prediction::ColdStart(self.popular_items(n).await?));
            }
        };

        // 潛在因子重建：predicted = Σ (row·v_k) v_k
        let mut predicted = Array1::<f32>::zeros(matrix.num_items());
        for factor in factors {
            let coefficient = user_row.dot(factor);
            predicted.scaled_add(coefficient, factor);
        }

        let mut recommendations: Vec<(u32, f32)> = (0..matrix.num_items())
            .filter(|col| user_row[*col] <= 0.0) // exclude already-rated items
            .map(|col| (matrix.item_id(col), predicted[col]))
            .collect();

        // Stable sort keeps the original column order on score ties
        recommendations
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        recommendations.truncate(n);

        Ok(Prediction::Trained(recommendations))
    }

    async fn popular_items(&self, n: usize) -> Result<Vec<(u32, f32)>> {
        let popular = self
            .catalog
            .list_popular(n)
            .await
            .map_err(|e| RecommendError::DependencyUnavailable(format!("catalog store: {e}")))?;
        Ok(popular
            .into_iter()
            .map(|p| (p.id, p.popularity_score))
            .collect())
    }
}

/// Top-k right singular vectors of `ratings` via subspace iteration on the
/// item Gram matrix, with deterministic seeded initialization.
fn top_right_singular_vectors(
    ratings: &Array2<f32>,
    rank: usize,
    iterations: usize,
) -> Vec<Array1<f32>> {
    let n_items = ratings.ncols();
    let gram = ratings.t().dot(ratings);

    let mut rng = StdRng::seed_from_u64(FACTOR_SEED);
    let mut basis: Vec<Array1<f32>> = (0..rank)
        .map(|_| Array1::from_shape_fn(n_items, |_| rng.gen_range(-1.0f32..1.0)))
        .collect();
    orthonormalize(&mut basis);

    for _ in 0..iterations {
        for vector in basis.iter_mut() {
            *vector = gram.dot(vector);
        }
        orthonormalize(&mut basis);
    }

    basis
}

/// Modified Gram-Schmidt; vectors that collapse to zero norm are zeroed out
/// so they contribute nothing to the reconstruction.
fn orthonormalize(vectors: &mut [Array1<f32>]) {
    for current in 0..vectors.len() {
        for prior in 0..current {
            let projection = vectors[current].dot(&vectors[prior]);
            let prior_vector = vectors[prior].clone();
            vectors[current].scaled_add(-projection, &prior_vector);
        }
        let norm = vectors[current].dot(&vectors[current]).sqrt();
        if norm > f32::EPSILON {
            vectors[current].mapv_inplace(|v| v / norm);
        } else {
            vectors[current].fill(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryCatalog;

    fn interaction(user_id: u32, product_id: u32, rating: f32) -> Interaction {
        Interaction {
            user_id,
            product_id,
            rating,
            interaction_type: "purchase".to_string(),
        }
    }

    fn catalog() -> Arc<dyn CatalogStore> {
        Arc::new(InMemoryCatalog::demo())
    }

    #[tokio::test]
    async fn test_predict_before_fit_is_untrained() {
        let filter = CollaborativeFilter::new(catalog(), 50, 30);
        let result = filter.predict(1, 5).await;

        assert!(matches!(result, Err(RecommendError::UntrainedModel(_))));
    }

    #[tokio::test]
    async fn test_cold_start_returns_popularity_list() {
        let mut filter = CollaborativeFilter::new(catalog(), 50, 30);
        filter
            .fit(&[interaction(1, 1, 5.0), interaction(2, 2, 4.0)])
            .unwrap();

        let prediction = filter.predict(999, 3).await.unwrap();

        let items = match prediction {
            Prediction::ColdStart(items) => items,
            Prediction::Trained(_) => panic!("expected cold-start branch"),
        };
        let expected = catalog().list_popular(3).await.unwrap();
        let expected: Vec<(u32, f32)> = expected
            .into_iter()
            .map(|p| (p.id, p.popularity_score))
            .collect();
        assert_eq!(items, expected);
    }

    #[tokio::test]
    async fn test_trained_prediction_excludes_rated_items() {
        let mut filter = CollaborativeFilter::new(catalog(), 50, 30);
        // Two users with overlapping taste: user 1's unrated item 3 should
        // surface because user 2 co-rates items 1 and 3.
        filter
            .fit(&[
                interaction(1, 1, 5.0),
                interaction(1, 2, 4.0),
                interaction(2, 1, 5.0),
                interaction(2, 3, 5.0),
            ])
            .unwrap();

        let prediction = filter.predict(1, 10).await.unwrap();
        let items = match prediction {
            Prediction::Trained(items) => items,
            Prediction::ColdStart(_) => panic!("expected trained branch"),
        };

        assert!(items.iter().all(|(id, _)| *id != 1 && *id != 2));
        assert!(items.iter().any(|(id, _)| *id == 3));
        assert!(items.iter().all(|(_, score)| score.is_finite()));
    }

    #[tokio::test]
    async fn test_prediction_is_deterministic() {
        let history = vec![
            interaction(1, 1, 5.0),
            interaction(1, 2, 3.0),
            interaction(2, 2, 4.0),
            interaction(2, 3, 5.0),
            interaction(3, 1, 2.0),
            interaction(3, 3, 4.0),
        ];

        let mut first = CollaborativeFilter::new(catalog(), 50, 30);
        first.fit(&history).unwrap();
        let mut second = CollaborativeFilter::new(catalog(), 50, 30);
        second.fit(&history).unwrap();

        let a = first.predict(1, 5).await.unwrap().into_inner();
        let b = second.predict(1, 5).await.unwrap().into_inner();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_fit_on_empty_history() {
        let mut filter = CollaborativeFilter::new(catalog(), 50, 30);
        filter.fit(&[]).unwrap();

        // No known users: everything is a cold start
        let prediction = filter.predict(1, 4).await.unwrap();
        assert!(matches!(prediction, Prediction::ColdStart(_)));
    }

    #[test]
    fn test_orthonormalize_produces_unit_vectors() {
        let mut vectors = vec![
            Array1::from(vec![3.0f32, 0.0, 0.0]),
            Array1::from(vec![1.0f32, 2.0, 0.0]),
        ];
        orthonormalize(&mut vectors);

        assert!((vectors[0].dot(&vectors[0]) - 1.0).abs() < 1e-5);
        assert!((vectors[1].dot(&vectors[1]) - 1.0).abs() < 1e-5);
        assert!(vectors[0].dot(&vectors[1]).abs() < 1e-5);
    }
}
