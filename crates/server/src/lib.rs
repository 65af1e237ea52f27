//! Server crate for the storefront recommendation engine.
//!
//! This crate contains [`StorefrontService`], which wires a document store
//! to the co-purchase recommender and the review analytics pass and gives
//! the HTTP layer JSON-ready responses.

pub mod config;
pub mod error;
pub mod response;
pub mod service;
pub mod snapshot;

pub use config::ServiceConfig;
pub use error::{Result, ServiceError};
pub use response::{BoughtTogetherResponse, ProductSummary};
pub use service::StorefrontService;
pub use snapshot::SnapshotStore;
