//! # Recommender Crate
//!
//! Product-to-product recommendations for the storefront.
//!
//! ## Components
//!
//! ### Bought Together
//! Co-occurrence over order history:
//! - "Customers who bought this also bought..."
//! - Ranked by number of shared orders
//!
//! ### Category Fallback
//! When a product has never been bought alongside anything else, fall back
//! to the best-rated products in the same category.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{BoughtTogether, CategoryFallback};
//! use catalog::DocumentStore;
//!
//! let seed = store.find_product(product_id).ok_or(NotFound)?;
//! let orders = store.find_orders_containing(&seed.id);
//!
//! let mut ids = BoughtTogether::new().get_products(seed, &orders);
//! if ids.is_empty() {
//!     let same_category = store.find_products_by_category(category);
//!     let fallback = CategoryFallback::new().get_products(seed, &same_category);
//! }
//! ```

pub mod bought_together;
pub mod category_fallback;
pub mod types;

pub use bought_together::{BoughtTogether, DEFAULT_LIMIT, get_frequently_bought_together};
pub use category_fallback::CategoryFallback;
pub use types::{CoPurchase, RecommendationSource};
