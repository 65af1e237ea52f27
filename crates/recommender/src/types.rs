//! Types shared by the recommendation sources.

use catalog::ProductId;
use serde::Serialize;

/// Where a recommendation list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    /// Products bought in the same orders as the seed
    CoPurchase,
    /// Products sharing the seed's category, used when there is no co-purchase signal
    CategoryFallback,
}

/// A product that appeared alongside the seed, with how many orders it shared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoPurchase {
    pub product_id: ProductId,
    pub orders: u32,
}

impl CoPurchase {
    pub fn new(product_id: impl Into<ProductId>, orders: u32) -> Self {
        Self {
            product_id: product_id.into(),
            orders,
        }
    }
}
