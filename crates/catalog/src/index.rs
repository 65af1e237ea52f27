//! Catalog loading and indexing.
//!
//! Loading a snapshot directory runs in three steps:
//! 1. Parse the JSON-Lines collections in parallel
//! 2. Resolve references (users first, since reviews and orders point at them)
//! 3. Insert into the [`Catalog`] and build the secondary indices

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::resolve::{Resolver, resolve_categories, resolve_users};
use crate::types::*;
use std::path::Path;
use tracing::{info, warn};

pub const PRODUCTS_FILE: &str = "products.jsonl";
pub const ORDERS_FILE: &str = "orders.jsonl";
pub const USERS_FILE: &str = "users.jsonl";
pub const CATEGORIES_FILE: &str = "categories.jsonl";

impl Catalog {
    /// Load a store snapshot from a directory.
    ///
    /// `products.jsonl` is required; the other collections are optional.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading storefront snapshot from {:?}", data_dir);

        let products_path = data_dir.join(PRODUCTS_FILE);
        let orders_path = data_dir.join(ORDERS_FILE);
        let users_path = data_dir.join(USERS_FILE);
        let categories_path = data_dir.join(CATEGORIES_FILE);

        let ((raw_products, raw_orders), (raw_users, raw_categories)) = rayon::join(
            || {
                rayon::join(
                    || parser::read_collection::<RawProduct>(&products_path),
                    || parser::read_optional_collection::<RawOrder>(&orders_path),
                )
            },
            || {
                rayon::join(
                    || parser::read_optional_collection::<UserDoc>(&users_path),
                    || parser::read_optional_collection::<CategoryDoc>(&categories_path),
                )
            },
        );

        let raw_products = raw_products?;
        let raw_orders = raw_orders?;
        let users = resolve_users(raw_users?)?;
        let categories = resolve_categories(raw_categories?);

        info!(
            "Parsed {} products, {} orders, {} users, {} categories",
            raw_products.len(),
            raw_orders.len(),
            users.len(),
            categories.len()
        );

        let resolver = Resolver::new(users.keys());
        let products = resolver.resolve_products(raw_products)?;
        let orders: Vec<Order> = raw_orders
            .into_iter()
            .map(|order| resolver.resolve_order(order))
            .collect();

        let mut catalog = Catalog::new();
        catalog.users = users;
        for category in categories {
            catalog.insert_category(category);
        }
        for product in products {
            if catalog.products.contains_key(&product.id) {
                return Err(CatalogError::DuplicateId {
                    entity: "Product".to_string(),
                    id: product.id,
                });
            }
            catalog.insert_product(product);
        }
        for order in orders {
            catalog.insert_order(order);
        }

        catalog.build_secondary_indices();

        let dangling = catalog.dangling_order_references();
        if dangling > 0 {
            warn!("{} order line(s) reference products missing from the snapshot", dangling);
        }

        info!("Catalog successfully built");
        Ok(catalog)
    }

    /// Rebuild the category index from the current product set.
    pub fn build_secondary_indices(&mut self) {
        self.category_index.clear();
        for (product_id, product) in &self.products {
            if let Some(category) = &product.category {
                self.category_index
                    .entry(category.clone())
                    .or_default()
                    .push(product_id.clone());
            }
        }
        for ids in self.category_index.values_mut() {
            ids.sort_unstable();
        }
    }

    /// Number of order lines pointing at products this catalog doesn't hold.
    pub fn dangling_order_references(&self) -> usize {
        self.orders
            .iter()
            .flat_map(|order| &order.items)
            .filter(|item| !self.products.contains_key(&item.product))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_in(id: &str, category: Option<&str>) -> Product {
        let mut product = Product::new(id, id);
        product.category = category.map(str::to_string);
        product
    }

    #[test]
    fn test_category_index_sorted_and_complete() {
        let catalog = Catalog::from_documents(
            vec![
                product_in("p3", Some("c1")),
                product_in("p1", Some("c1")),
                product_in("p2", Some("c2")),
                product_in("p4", None),
            ],
            vec![],
            vec![],
        );

        assert_eq!(catalog.get_products_by_category("c1"), &["p1", "p3"]);
        assert_eq!(catalog.get_products_by_category("c2"), &["p2"]);
        assert!(catalog.get_products_by_category("missing").is_empty());
    }

    #[test]
    fn test_order_index_counts_each_order_once() {
        let catalog = Catalog::from_documents(
            vec![product_in("p1", None), product_in("p2", None)],
            vec![
                Order::from_products(["p1", "p1", "p2"]),
                Order::from_products(["p2"]),
            ],
            vec![],
        );

        assert_eq!(catalog.get_orders_containing("p1").count(), 1);
        assert_eq!(catalog.get_orders_containing("p2").count(), 2);
        assert_eq!(catalog.get_orders_containing("p9").count(), 0);
    }

    #[test]
    fn test_dangling_order_references() {
        let catalog = Catalog::from_documents(
            vec![product_in("p1", None)],
            vec![Order::from_products(["p1", "gone", "also-gone"])],
            vec![],
        );
        assert_eq!(catalog.dangling_order_references(), 2);
    }

    #[test]
    fn test_load_snapshot() {
        // Place a snapshot export in ../../data/snapshot/ to exercise this
        let data_dir = Path::new("../../data/snapshot");

        if data_dir.exists() {
            let catalog = Catalog::load_from_dir(data_dir).unwrap();
            let (products, _orders, _users) = catalog.counts();
            assert!(products > 0);
        }
    }
}
