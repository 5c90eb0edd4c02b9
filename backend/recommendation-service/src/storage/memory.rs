use crate::models::{Gender, Interaction, Product};
use anyhow::Result;
use async_trait::async_trait;

use super::{CatalogStore, InteractionStore};

/// In-memory catalog used by the demo binary and tests; the production
/// deployment substitutes a SQL-backed implementation of the same trait.
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Small demo catalog covering every outfit slot across a few styles
    pub fn demo() -> Self {
        let mut products = Vec::new();

        let mut push = |id: u32,
                        name: &str,
                        brand: &str,
                        category: &str,
                        subcategory: &str,
                        color: &str,
                        price: i64,
                        gender: Gender,
                        ages: (u32, u32),
                        popularity: f32| {
            products.push(Product {
                id,
                name: name.to_string(),
                brand: brand.to_string(),
                category: category.to_string(),
                subcategory: subcategory.to_string(),
                color: color.to_string(),
                price,
                target_gender: gender,
                target_age_min: ages.0,
                target_age_max: ages.1,
                season: "all".to_string(),
                material: "cotton".to_string(),
                popularity_score: popularity,
                in_stock: true,
                image_url: format!("https://img.moda.dev/products/{id}.jpg"),
            });
        };

        push(1, "White T-Shirt", "Comfort Wear", "casual", "tshirt", "white", 799, Gender::Unisex, (16, 45), 92.0);
        push(2, "Blue Denim Jeans", "Denim Co", "casual", "jeans", "blue", 2499, Gender::Unisex, (16, 45), 95.0);
        push(3, "White Sneakers", "Street Kicks", "casual", "shoes", "white", 3999, Gender::Unisex, (16, 40), 98.0);
        push(4, "Canvas Belt", "Accessories Plus", "casual", "belt", "brown", 899, Gender::Unisex, (16, 50), 61.0);
        push(5, "Gray Athletic T-Shirt", "Athletic Pro", "sporty", "tshirt", "gray", 1299, Gender::Male, (16, 35), 84.0);
        push(6, "Black Track Pants", "Athletic Pro", "sporty", "trackpants", "black", 1499, Gender::Male, (16, 35), 78.0);
        push(7, "Red Running Shoes", "Athletic Pro", "sporty", "shoes", "red", 5499, Gender::Unisex, (16, 40), 90.0);
        push(8, "Sports Watch", "Time Style", "sporty", "watch", "black", 1999, Gender::Unisex, (16, 50), 72.0);
        push(9, "White Formal Shirt", "Office Wear", "business", "shirt", "white", 1899, Gender::Male, (25, 45), 76.0);
        push(10, "Navy Blue Trousers", "Formal Wear Co", "business", "trousers", "navy", 3499, Gender::Male, (25, 45), 69.0);
        push(11, "Brown Formal Shoes", "Executive Style", "business", "shoes", "brown", 3999, Gender::Male, (25, 50), 74.0);
        push(12, "Black Evening Dress", "Sophisticate", "elegant", "dress", "black", 5799, Gender::Female, (25, 40), 88.0);
        push(13, "Black Heels", "Elegant Steps", "elegant", "shoes", "black", 3299, Gender::Female, (20, 45), 81.0);
        push(14, "Gold Clutch Bag", "Luxury Bags", "elegant", "bag", "gold", 4499, Gender::Female, (25, 45), 66.0);

        Self::new(products)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_in_stock(&self) -> Result<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.in_stock)
            .cloned()
            .collect())
    }

    async fn get_product(&self, id: u32) -> Result<Option<Product>> {
        Ok(self
            .products
            .iter()
            .find(|p| p.id == id && p.in_stock)
            .cloned())
    }

    async fn list_popular(&self, n: usize) -> Result<Vec<Product>> {
        let mut popular: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.in_stock)
            .cloned()
            .collect();
        popular.sort_by(|a, b| {
            b.popularity_score
                .partial_cmp(&a.popularity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        popular.truncate(n);
        Ok(popular)
    }
}

/// In-memory interaction log, mirroring the rated-interactions join
pub struct InMemoryInteractions {
    interactions: Vec<Interaction>,
}

impl InMemoryInteractions {
    pub fn new(interactions: Vec<Interaction>) -> Self {
        Self { interactions }
    }

    /// Demo interaction history for a handful of users
    pub fn demo() -> Self {
        let rate = |user_id: u32, product_id: u32, rating: f32| Interaction {
            user_id,
            product_id,
            rating,
            interaction_type: "purchase".to_string(),
        };

        Self::new(vec![
            rate(1, 1, 5.0),
            rate(1, 2, 4.5),
            rate(1, 3, 5.0),
            rate(2, 2, 4.0),
            rate(2, 7, 4.5),
            rate(2, 8, 3.5),
            rate(3, 9, 4.0),
            rate(3, 10, 4.5),
            rate(3, 11, 5.0),
            rate(4, 12, 5.0),
            rate(4, 13, 4.5),
        ])
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractions {
    async fn list_rated(&self) -> Result<Vec<Interaction>> {
        Ok(self
            .interactions
            .iter()
            .filter(|i| i.rating > 0.0)
            .cloned()
            .collect())
    }
}
