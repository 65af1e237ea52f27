//! Frequently-bought-together recommender
//!
//! "Customers who bought this also bought..."
//!
//! ## Algorithm
//! 1. Keep only orders that contain the seed product
//! 2. Within each such order, collect every *other* distinct product
//! 3. Count, per product, how many qualifying orders it appeared in
//! 4. Rank by that count (descending), ties broken by product id (ascending)
//! 5. Return the first `limit` ids
//!
//! The seed never appears in the result. A product listed on several lines
//! of one order counts once for that order.

use crate::types::CoPurchase;
use catalog::{Order, Product, ProductId};
use rayon::prelude::*;
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Default number of co-purchased products returned
pub const DEFAULT_LIMIT: usize = 3;

/// Co-occurrence recommender over order history
#[derive(Debug, Clone)]
pub struct BoughtTogether {
    limit: usize,
}

impl BoughtTogether {
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

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Ids of the products most often bought with `seed`, best first.
    ///
    /// `orders` may hold owned orders or references, and may include orders
    /// that don't contain the seed at all; those are ignored.
    #[instrument(skip(self, seed, orders), fields(seed = %seed.id, orders = orders.len()))]
    pub fn get_products<O>(&self, seed: &Product, orders: &[O]) -> Vec<ProductId>
    where
        O: Borrow<Order> + Sync,
    {
        let ranked = self.co_occurrence_counts(seed, orders);
        debug!("Ranked {} co-purchased products", ranked.len());

        ranked
            .into_iter()
            .take(self.limit)
            .map(|co| co.product_id)
            .collect()
    }

    /// Every co-purchased product with its order count, fully ranked.
    pub fn co_occurrence_counts<O>(&self, seed: &Product, orders: &[O]) -> Vec<CoPurchase>
    where
        O: Borrow<Order> + Sync,
    {
        let seed_id = seed.id.as_str();

        let counts: HashMap<&str, u32> = orders
            .par_iter()
            .map(<O as Borrow<Order>>::borrow)
            .filter(|order| order.contains(seed_id))
            .fold(HashMap::new, |mut local_counts, order| {
                let mut seen: HashSet<&str> = HashSet::with_capacity(order.items.len());
                for item in &order.items {
                    let product = item.product.as_str();
                    if product != seed_id && seen.insert(product) {
                        *local_counts.entry(product).or_insert(0) += 1;
                    }
                }
                local_counts
            })
            .reduce(HashMap::new, |mut acc, local_counts| {
                for (product, count) in local_counts {
                    *acc.entry(product).or_insert(0) += count;
                }
                acc
            });

        let mut ranked: Vec<CoPurchase> = counts
            .into_iter()
            .map(|(product, count)| CoPurchase::new(product, count))
            .collect();
        ranked.sort_unstable_by(|a, b| {
            b.orders
                .cmp(&a.orders)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        ranked
    }
}

impl Default for BoughtTogether {
    fn default() -> Self {
        Self::new()
    }
}

/// Functional form of [`BoughtTogether::get_products`].
pub fn get_frequently_bought_together<O>(
    seed: &Product,
    orders: &[O],
    limit: usize,
) -> Vec<ProductId>
where
    O: Borrow<Order> + Sync,
{
    BoughtTogether::new().with_limit(limit).get_products(seed, orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(id: &str) -> Product {
        Product::new(id, format!("Product {}", id))
    }

    #[test]
    fn test_ranks_by_co_occurrence() {
        // P1 appears in 3 orders: P2 in two of them, P3 in one
        let orders = vec![
            Order::from_products(["P1", "P2"]),
            Order::from_products(["P1", "P2", "P3"]),
            Order::from_products(["P1"]),
            Order::from_products(["P2", "P3", "P4"]),
        ];

        let result = get_frequently_bought_together(&seed("P1"), &orders, 2);
        assert_eq!(result, vec!["P2".to_string(), "P3".to_string()]);
    }

    #[test]
    fn test_no_co_purchases_is_empty() {
        let orders = vec![
            Order::from_products(["P4"]),
            Order::from_products(["P5", "P6"]),
        ];

        let result = get_frequently_bought_together(&seed("P4"), &orders, 3);
        assert!(result.is_empty());
    }

    #[test]
    fn test_ties_break_by_product_id() {
        let orders = vec![Order::from_products(["P1", "Z", "A", "M"])];

        let result = BoughtTogether::new().get_products(&seed("P1"), &orders);
        assert_eq!(result, vec!["A".to_string(), "M".to_string(), "Z".to_string()]);
    }

    #[test]
    fn test_repeated_lines_count_once_per_order() {
        let orders = vec![
            Order::from_products(["P1", "P2", "P2", "P2"]),
            Order::from_products(["P1", "P3"]),
            Order::from_products(["P1", "P3"]),
        ];

        let counts = BoughtTogether::new().co_occurrence_counts(&seed("P1"), &orders);
        assert_eq!(counts[0], CoPurchase::new("P3", 2));
        assert_eq!(counts[1], CoPurchase::new("P2", 1));
    }

    #[test]
    fn test_seed_never_returned() {
        let orders = vec![
            Order::from_products(["P1", "P1", "P2"]),
            Order::from_products(["P1"]),
        ];

        let result = BoughtTogether::new().get_products(&seed("P1"), &orders);
        assert_eq!(result, vec!["P2".to_string()]);
    }

    #[test]
    fn test_accepts_borrowed_orders() {
        let owned = vec![Order::from_products(["P1", "P2"])];
        let borrowed: Vec<&Order> = owned.iter().collect();

        let result = BoughtTogether::new().get_products(&seed("P1"), &borrowed);
        assert_eq!(result, vec!["P2".to_string()]);
    }

    #[test]
    fn test_zero_limit() {
        let orders = vec![Order::from_products(["P1", "P2"])];
        assert!(get_frequently_bought_together(&seed("P1"), &orders, 0).is_empty());
    }
}
