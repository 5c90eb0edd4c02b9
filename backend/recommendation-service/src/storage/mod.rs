// ============================================
// Storage Collaborators
// ============================================
// The SQL layer lives outside this service; the core only sees these
// data-access contracts. Every call is a potential failure point and is
// handled as such by the calling layer.

mod memory;

pub use memory::{InMemoryCatalog, InMemoryInteractions};

use crate::models::{Interaction, Product};
use anyhow::Result;
use async_trait::async_trait;

/// Read path into the product catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All in-stock products, the working set for one scoring pass
    async fn list_in_stock(&self) -> Result<Vec<Product>>;

    /// Full detail for a single product; None when absent or out of stock
    async fn get_product(&self, id: u32) -> Result<Option<Product>>;

    /// Top-n products by popularity_score descending
    async fn list_popular(&self, n: usize) -> Result<Vec<Product>>;
}

/// Read path into recorded user-product interactions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// All interactions that carry a rating
    async fn list_rated(&self) -> Result<Vec<Interaction>>;
}
