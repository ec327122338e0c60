//! Public catalog views
//!
//! Pure functions over already-loaded products and collections. Storefront
//! listings order by `display_order` ascending, newest first among equal
//! ranks (same as [`ListOrder::by_display_order`](shared::ListOrder::by_display_order)).

use std::cmp::Ordering;

use rust_decimal::{Decimal, RoundingStrategy};
use shared::Searchable;
use shared::models::{Collection, Product};

/// Minimum search term length, in characters
pub const MIN_SEARCH_LEN: usize = 2;
/// Maximum products returned by the search box
pub const SEARCH_PRODUCT_LIMIT: usize = 5;
/// Maximum collections returned by the search box
pub const SEARCH_COLLECTION_LIMIT: usize = 3;

/// Search box result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub products: Vec<Product>,
    pub collections: Vec<Collection>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.collections.is_empty()
    }
}

fn storefront_cmp(a: &Product, b: &Product) -> Ordering {
    a.display_order
        .cmp(&b.display_order)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

/// Sort products into storefront order
pub fn sort_for_storefront(products: &mut [Product]) {
    products.sort_by(storefront_cmp);
}

fn ordered<'a>(products: impl Iterator<Item = &'a Product>) -> Vec<Product> {
    let mut list: Vec<Product> = products.cloned().collect();
    sort_for_storefront(&mut list);
    list
}

/// Featured products, up to `limit`
pub fn featured(products: &[Product], limit: usize) -> Vec<Product> {
    let mut list = ordered(products.iter().filter(|p| p.featured));
    list.truncate(limit);
    list
}

/// Products in `category` (exact match), up to `limit`
pub fn by_category(products: &[Product], category: &str, limit: usize) -> Vec<Product> {
    let mut list = ordered(products.iter().filter(|p| p.category == category));
    list.truncate(limit);
    list
}

/// Members of a collection that still exist in the catalog
pub fn collection_products(collection: &Collection, products: &[Product]) -> Vec<Product> {
    ordered(products.iter().filter(|p| collection.contains(&p.id)))
}

/// Distinct categories in first-seen storefront order
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in ordered(products.iter()) {
        if !product.category.is_empty() && !seen.contains(&product.category) {
            seen.push(product.category);
        }
    }
    seen
}

/// Search-box lookup over products (name, category) and collections
/// (name, description)
///
/// Terms shorter than two characters return nothing.
pub fn search(products: &[Product], collections: &[Collection], term: &str) -> SearchResults {
    if term.chars().count() < MIN_SEARCH_LEN {
        return SearchResults::default();
    }
    let needle = term.to_lowercase();

    let mut products = ordered(products.iter().filter(|p| p.matches_search(&needle)));
    products.truncate(SEARCH_PRODUCT_LIMIT);

    let mut collections: Vec<Collection> = collections
        .iter()
        .filter(|c| c.matches_search(&needle))
        .cloned()
        .collect();
    collections.sort_by_key(|c| c.display_order);
    collections.truncate(SEARCH_COLLECTION_LIMIT);

    SearchResults {
        products,
        collections,
    }
}

/// `$12.50`
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn product(id: &str, category: &str, order: u32, day: u32, featured: bool) -> Product {
        Product {
            id: id.into(),
            name: format!("Producto {id}"),
            description: String::new(),
            price: Decimal::new(1250, 2),
            images: vec![],
            category: category.into(),
            stock: 1,
            featured,
            display_order: order,
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    fn collection(id: &str, name: &str, description: &str, ids: &[&str]) -> Collection {
        Collection {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            image: String::new(),
            product_ids: ids.iter().map(|s| s.to_string()).collect(),
            display_order: 0,
            created_at: None,
            updated_at: None,
        }
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_featured_uses_storefront_order_and_limit() {
        let products = vec![
            product("a", "ceramica", 2, 1, true),
            product("b", "ceramica", 0, 1, false),
            product("c", "textil", 1, 1, true),
            product("d", "textil", 1, 9, true),
        ];

        // equal rank: newer first
        assert_eq!(ids(&featured(&products, 10)), vec!["d", "c", "a"]);
        assert_eq!(ids(&featured(&products, 2)), vec!["d", "c"]);
    }

    #[test]
    fn test_by_category_and_categories() {
        let products = vec![
            product("a", "ceramica", 1, 1, false),
            product("b", "textil", 0, 1, false),
            product("c", "ceramica", 0, 1, false),
        ];

        assert_eq!(ids(&by_category(&products, "ceramica", 4)), vec!["c", "a"]);
        assert!(by_category(&products, "joyeria", 4).is_empty());
        assert_eq!(categories(&products), vec!["textil", "ceramica"]);
    }

    #[test]
    fn test_collection_products_skips_missing_ids() {
        let products = vec![
            product("a", "x", 1, 1, false),
            product("b", "x", 0, 1, false),
        ];
        let col = collection("c1", "Verano", "", &["a", "b", "gone"]);

        assert_eq!(ids(&collection_products(&col, &products)), vec!["b", "a"]);
    }

    #[test]
    fn test_search_limits_and_min_length() {
        let products: Vec<Product> = (0..8)
            .map(|i| product(&format!("p{i}"), "ceramica", i, 1, false))
            .collect();
        let collections = vec![
            collection("c1", "Cerámica", "", &[]),
            collection("c2", "Hogar", "piezas de ceramica", &[]),
            collection("c3", "Ceramica fina", "", &[]),
            collection("c4", "Ceramica rustica", "", &[]),
            collection("c5", "Textiles", "mantas", &[]),
        ];

        let results = search(&products, &collections, "CERAMICA");
        assert_eq!(results.products.len(), SEARCH_PRODUCT_LIMIT);
        assert_eq!(ids(&results.products), vec!["p0", "p1", "p2", "p3", "p4"]);
        assert_eq!(results.collections.len(), SEARCH_COLLECTION_LIMIT);

        assert!(search(&products, &collections, "c").is_empty());
        assert!(search(&products, &collections, "  ").is_empty());
        assert!(search(&products, &collections, "zzz").is_empty());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Decimal::new(1250, 2)), "$12.50");
        assert_eq!(format_price(Decimal::new(7, 0)), "$7.00");
        assert_eq!(format_price(Decimal::new(19999, 3)), "$20.00");
        assert_eq!(format_price(Decimal::new(1005, 3)), "$1.01");
    }
}
