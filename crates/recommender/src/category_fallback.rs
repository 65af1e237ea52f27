//! Same-category fallback
//!
//! Used when the seed product has no co-purchase signal: recommend other
//! products from the seed's category instead.
//!
//! The store returns category members in no particular order, so results
//! are ranked here by aggregate rating (descending), then by id (ascending).

use crate::bought_together::DEFAULT_LIMIT;
use catalog::Product;
use std::cmp::Ordering;
use tracing::{debug, instrument};

/// Recommends products sharing the seed's category
#[derive(Debug, Clone)]
pub struct CategoryFallback {
    limit: usize,
}

impl CategoryFallback {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }

    /// Configure how many products to return (default: 3)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Pick up to `limit` products from `candidates` that share the seed's
    /// category, excluding the seed itself.
    ///
    /// A seed without a category yields nothing.
    #[instrument(skip(self, seed, candidates), fields(seed = %seed.id))]
    pub fn get_products<'a>(&self, seed: &Product, candidates: &[&'a Product]) -> Vec<&'a Product> {
        let Some(category) = seed.category.as_deref() else {
            debug!("Seed has no category, nothing to fall back on");
            return Vec::new();
        };

        let mut products: Vec<&'a Product> = candidates
            .iter()
            .copied()
            .filter(|p| p.id != seed.id && p.category.as_deref() == Some(category))
            .collect();

        products.sort_by(|a, b| {
            b.rating
                .partial_cmp(&a.rating)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        products.truncate(self.limit);

        debug!("Category fallback produced {} products", products.len());
        products
    }
}

impl Default for CategoryFallback {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, category: Option<&str>, rating: f64) -> Product {
        let mut p = Product::new(id, id);
        p.category = category.map(str::to_string);
        p.rating = rating;
        p
    }

    #[test]
    fn test_excludes_seed_and_other_categories() {
        let seed = product("P1", Some("desks"), 4.0);
        let same = product("P2", Some("desks"), 3.0);
        let other = product("P3", Some("lamps"), 5.0);
        let candidates = vec![&seed, &same, &other];

        let result = CategoryFallback::new().get_products(&seed, &candidates);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P2"]);
    }

    #[test]
    fn test_orders_by_rating_then_id() {
        let seed = product("S", Some("c"), 0.0);
        let b = product("B", Some("c"), 4.5);
        let a = product("A", Some("c"), 4.5);
        let c = product("C", Some("c"), 4.9);
        let d = product("D", Some("c"), 1.0);
        let candidates = vec![&b, &d, &a, &c];

        let result = CategoryFallback::new().get_products(&seed, &candidates);
        let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_seed_without_category() {
        let seed = product("S", None, 0.0);
        let other = product("O", None, 5.0);

        let result = CategoryFallback::new().get_products(&seed, &[&other]);
        assert!(result.is_empty());
    }
}
