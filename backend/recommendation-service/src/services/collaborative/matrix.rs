use crate::models::Interaction;
use ndarray::{Array2, ArrayView1};
use std::collections::{BTreeSet, HashMap};

/// Dense user-item rating matrix with stable index maps.
///
/// Rows are users, columns are items, both ordered by ascending id so the
/// column order (and therefore tie-breaking downstream) is reproducible for
/// identical interaction data. Absent pairs are 0.0.
#[derive(Debug, Clone)]
pub struct UserItemMatrix {
    ratings: Array2<f32>,
    user_index: HashMap<u32, usize>,
    item_ids: Vec<u32>,
}

impl UserItemMatrix {
    pub fn from_interactions(interactions: &[Interaction]) -> Self {
        let users: BTreeSet<u32> = interactions.iter().map(|i| i.user_id).collect();
        let items: BTreeSet<u32> = interactions.iter().map(|i| i.product_id).collect();

        let user_index: HashMap<u32, usize> =
            users.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();
        let item_ids: Vec<u32> = items.into_iter().collect();
        let item_index: HashMap<u32, usize> = item_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx))
            .collect();

        let mut ratings = Array2::zeros((user_index.len(), item_ids.len()));
        for interaction in interactions {
            let row = user_index[&interaction.user_id];
            let col = item_index[&interaction.product_id];
            ratings[[row, col]] = interaction.rating;
        }

        Self {
            ratings,
            user_index,
            item_ids,
        }
    }

    pub fn num_users(&self) -> usize {
        self.ratings.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.ratings.ncols()
    }

    pub fn ratings(&self) -> &Array2<f32> {
        &self.ratings
    }

    /// Rating row for a known user; None signals the cold-start case
    pub fn user_row(&self, user_id: u32) -> Option<ArrayView1<f32>> {
        self.user_index
            .get(&user_id)
            .map(|row| self.ratings.row(*row))
    }

    pub fn item_id(&self, column: usize) -> u32 {
        self.item_ids[column]
    }
}
