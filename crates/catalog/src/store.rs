//! Query interface the service layer uses to reach the document store.
//!
//! The recommenders never talk to the store directly: a handler fetches the
//! documents it needs through this trait and passes them on. [`Catalog`]
//! implements it over an in-memory snapshot.

use crate::types::*;

/// Row counts of the main collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub products: usize,
    pub orders: usize,
    pub users: usize,
}

/// Read-only queries over products, orders and users.
///
/// `Send + Sync` so a store handle can be shared behind an `Arc` and queried
/// from blocking worker threads.
pub trait DocumentStore: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    fn find_product(&self, id: &str) -> Option<&Product>;

    fn find_user(&self, id: &str) -> Option<&User>;

    /// Every order with at least one line referencing `product_id`
    fn find_orders_containing(&self, product_id: &str) -> Vec<&Order>;

    /// Every product in `category`, in whatever order the store keeps them
    fn find_products_by_category(&self, category: &str) -> Vec<&Product>;

    /// Every product carrying at least one review
    fn find_reviewed_products(&self) -> Vec<&Product>;

    fn counts(&self) -> StoreCounts;
}

impl DocumentStore for Catalog {
    fn name(&self) -> &str {
        "in-memory catalog"
    }

    fn find_product(&self, id: &str) -> Option<&Product> {
        self.get_product(id)
    }

    fn find_user(&self, id: &str) -> Option<&User> {
        self.get_user(id)
    }

    fn find_orders_containing(&self, product_id: &str) -> Vec<&Order> {
        self.get_orders_containing(product_id).collect()
    }

    fn find_products_by_category(&self, category: &str) -> Vec<&Product> {
        self.get_products_by_category(category)
            .iter()
            .filter_map(|id| self.get_product(id))
            .collect()
    }

    fn find_reviewed_products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .values()
            .filter(|product| !product.reviews.is_empty())
            .collect();
        products.sort_unstable_by(|a, b| a.id.cmp(&b.id));
        products
    }

    fn counts(&self) -> StoreCounts {
        let (products, orders, users) = Catalog::counts(self);
        StoreCounts {
            products,
            orders,
            users,
        }
    }
}
