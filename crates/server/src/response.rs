//! JSON payloads returned by the request handlers.

use catalog::{CategoryId, Product, ProductId};
use recommender::RecommendationSource;
use serde::Serialize;

/// The fields a product card needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: Option<CategoryId>,
    pub price: f64,
    pub rating: f64,
    pub num_reviews: u32,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            category: product.category.clone(),
            price: product.price,
            rating: product.rating,
            num_reviews: product.num_reviews,
        }
    }
}

/// Response of the frequently-bought-together handler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoughtTogetherResponse {
    pub success: bool,
    pub products: Vec<ProductSummary>,
    /// Whether `products` came from order history or the category fallback
    pub source: RecommendationSource,
}

impl BoughtTogetherResponse {
    pub fn new(products: Vec<ProductSummary>, source: RecommendationSource) -> Self {
        Self {
            success: true,
            products,
            source,
        }
    }
}
