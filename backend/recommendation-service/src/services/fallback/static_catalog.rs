use crate::models::{Gender, Outfit, OutfitItem, OutfitSlot};

fn item(slot: OutfitSlot, name: &str, brand: &str, price: i64, image: &str) -> OutfitItem {
    OutfitItem {
        slot,
        name: name.to_string(),
        brand: brand.to_string(),
        price,
        image_url: format!("https://img.moda.dev/items/{image}.jpg"),
    }
}

#[allow(clippy::too_many_arguments)]
fn outfit(
    outfit_id: &str,
    name: &str,
    description: &str,
    style: &str,
    color_scheme: &str,
    target_gender: Gender,
    target_age: &str,
    items: Vec<OutfitItem>,
) -> Outfit {
    let total_price = items.iter().map(|i| i.price).sum();
    Outfit {
        outfit_id: outfit_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        items,
        total_price,
        score: 0.0,
        style: style.to_string(),
        color_scheme: color_scheme.to_string(),
        target_gender,
        target_age: target_age.to_string(),
        in_stock: true,
    }
}

/// Curated outfit pool for the rule-only fallback tier. Kept in code so the
/// fallback path has no storage dependency at all.
pub fn static_outfits() -> Vec<Outfit> {
    vec![
        outfit(
            "outfit_001",
            "Business Professional Outfit",
            "Complete professional business outfit for office meetings",
            "business",
            "navy",
            Gender::Male,
            "25-45",
            vec![
                item(OutfitSlot::Top, "White Formal Shirt", "Office Wear", 1899, "white-formal-shirt"),
                item(OutfitSlot::Bottom, "Navy Blue Trousers", "Formal Wear Co", 3499, "navy-trousers"),
                item(OutfitSlot::Shoes, "Brown Formal Shoes", "Executive Style", 3999, "brown-formal-shoes"),
                item(OutfitSlot::Accessory, "Brown Leather Belt", "Accessories Plus", 1499, "brown-leather-belt"),
                item(OutfitSlot::Accessory, "Silver Watch", "Time Style", 2599, "silver-watch"),
            ],
        ),
        outfit(
            "outfit_002",
            "Casual Streetwear Look",
            "Trendy streetwear outfit for casual outings",
            "streetwear",
            "blue",
            Gender::Male,
            "18-30",
            vec![
                item(OutfitSlot::Top, "Blue Streetwear Hoodie", "Urban Style", 2999, "blue-hoodie"),
                item(OutfitSlot::Bottom, "Black Denim Jeans", "Denim Co", 2499, "black-jeans"),
                item(OutfitSlot::Shoes, "White Sneakers", "Street Kicks", 3999, "white-sneakers"),
            ],
        ),
        outfit(
            "outfit_003",
            "Sporty Athletic Look",
            "Comfortable athletic outfit for workouts and sports",
            "sporty",
            "gray",
            Gender::Male,
            "16-35",
            vec![
                item(OutfitSlot::Top, "Gray Athletic T-Shirt", "Athletic Pro", 1299, "gray-athletic-tshirt"),
                item(OutfitSlot::Bottom, "Black Track Pants", "Athletic Pro", 1499, "black-track-pants"),
                item(OutfitSlot::Shoes, "Red Running Shoes", "Athletic Pro", 5499, "red-running-shoes"),
            ],
        ),
        outfit(
            "outfit_004",
            "Elegant Evening Look",
            "Elegant evening outfit for special occasions",
            "elegant",
            "black",
            Gender::Female,
            "25-40",
            vec![
                item(OutfitSlot::Top, "Black Evening Dress", "Sophisticate", 5799, "black-evening-dress"),
                item(OutfitSlot::Shoes, "Black Heels", "Elegant Steps", 3299, "black-heels"),
                item(OutfitSlot::Accessory, "Gold Clutch Bag", "Luxury Bags", 4499, "gold-clutch"),
                item(OutfitSlot::Accessory, "Gold Earrings", "Jewelry Plus", 1899, "gold-earrings"),
            ],
        ),
        outfit(
            "outfit_005",
            "Casual Summer Look",
            "Bright and comfortable summer outfit",
            "casual",
            "yellow",
            Gender::Female,
            "18-30",
            vec![
                item(OutfitSlot::Top, "Yellow Summer Dress", "Sunny Style", 2299, "yellow-summer-dress"),
                item(OutfitSlot::Shoes, "Beige Flats", "Comfort Zone", 1999, "beige-flats"),
                item(OutfitSlot::Accessory, "Brown Sunglasses", "Sun Style", 2499, "brown-sunglasses"),
            ],
        ),
        outfit(
            "outfit_006",
            "Modern Office Look",
            "Professional business outfit for modern women",
            "business",
            "gray",
            Gender::Female,
            "25-35",
            vec![
                item(OutfitSlot::Top, "Gray Business Blazer", "Power Dress", 4499, "gray-blazer"),
                item(OutfitSlot::Bottom, "Black Formal Trousers", "Power Dress", 2999, "black-formal-trousers"),
                item(OutfitSlot::Top, "White Blouse", "Office Wear", 1899, "white-blouse"),
                item(OutfitSlot::Shoes, "Black Pumps", "Elegant Steps", 2599, "black-pumps"),
                item(OutfitSlot::Accessory, "Black Handbag", "Fashion Hub", 1499, "black-handbag"),
            ],
        ),
        outfit(
            "outfit_007",
            "Casual Weekend Look",
            "Comfortable casual outfit for weekends",
            "casual",
            "blue",
            Gender::Unisex,
            "18-35",
            vec![
                item(OutfitSlot::Top, "Blue Denim Jacket", "Retro Style", 3499, "blue-denim-jacket"),
                item(OutfitSlot::Top, "White T-Shirt", "Comfort Wear", 799, "white-tshirt"),
                item(OutfitSlot::Bottom, "Blue Denim Jeans", "Denim Co", 2499, "blue-jeans"),
                item(OutfitSlot::Shoes, "White Sneakers", "Street Kicks", 3999, "white-sneakers"),
            ],
        ),
        outfit(
            "outfit_008",
            "Sporty Fitness Look",
            "Complete fitness outfit for workouts",
            "sporty",
            "black",
            Gender::Unisex,
            "16-40",
            vec![
                item(OutfitSlot::Top, "Black Athletic Top", "Fit Gear", 1999, "black-athletic-top"),
                item(OutfitSlot::Bottom, "Black Sports Shorts", "Athletic Pro", 1299, "black-sports-shorts"),
                item(OutfitSlot::Shoes, "White Running Shoes", "Athletic Pro", 4499, "white-running-shoes"),
                item(OutfitSlot::Accessory, "Sports Watch", "Time Style", 1999, "sports-watch"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_size_and_prices() {
        let outfits = static_outfits();
        assert_eq!(outfits.len(), 8);

        for outfit in &outfits {
            let expected: i64 = outfit.items.iter().map(|i| i.price).sum();
            assert_eq!(outfit.total_price, expected);
            assert!(outfit.items.len() >= 2);
        }
    }

    #[test]
    fn test_elegant_evening_total() {
        let outfits = static_outfits();
        let elegant = outfits
            .iter()
            .find(|o| o.outfit_id == "outfit_004")
            .unwrap();
        assert_eq!(elegant.total_price, 15496);
    }
}
