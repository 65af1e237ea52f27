//! # Catalog Crate
//!
//! Loads a storefront document-store snapshot and exposes it as typed,
//! fully resolved documents.
//!
//! ## Main Components
//!
//! - **types**: Raw document shapes, tagged references, resolved types, `Catalog`
//! - **resolve**: Reduce populated/reference-only fields to ids
//! - **parser**: Parse JSON-Lines collection exports
//! - **index**: Build the `Catalog` and its secondary indices
//! - **store**: `DocumentStore` query trait
//! - **error**: Error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{Catalog, DocumentStore};
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_dir(Path::new("data/snapshot"))?;
//! let product = catalog.find_product("64b7f0c2a1").unwrap();
//! let orders = catalog.find_orders_containing(&product.id);
//! ```

pub mod error;
pub mod index;
pub mod parser;
pub mod resolve;
pub mod store;
pub mod types;

pub use error::{CatalogError, Result};
pub use store::{DocumentStore, StoreCounts};
pub use types::{
    // Type aliases
    CategoryId,
    OrderId,
    ProductId,
    UserId,
    // Resolved types
    Catalog,
    Category,
    Order,
    OrderItem,
    Product,
    Review,
    User,
    // Raw documents
    DocRef,
    RawOrder,
    RawProduct,
    RawRating,
    RawReview,
    UNUSABLE_RATING,
};
