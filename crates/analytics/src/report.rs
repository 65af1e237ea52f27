//! The analytics payload handed back to the HTTP layer.
//!
//! Every type serializes to camelCase JSON. Maps are `BTreeMap`s and lists
//! are explicitly sorted so the same input always serializes identically.

use crate::rating::{Average, BUCKETS};
use catalog::{CategoryId, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals over every counted review
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_reviews: u32,
    pub average_rating: Average,
    /// `ratingDistribution[r - 1]` counts reviews rated `r`
    pub rating_distribution: [u32; BUCKETS],
    /// Reviews dropped for carrying a rating outside `[1, 5]`
    pub skipped_reviews: u32,
}

/// Sum, count and average for one category or tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAnalytics {
    pub total_rating: i64,
    pub count: u32,
    pub average_rating: Average,
}

/// Finalized popularity record of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPopularity {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: Option<CategoryId>,
    pub tags: Vec<String>,
    pub price: f64,
    pub total_rating: i64,
    pub review_count: u32,
    pub average_rating: Average,
    pub positive_reviews: u32,
    pub neutral_reviews: u32,
    pub negative_reviews: u32,
}

/// One entry of a user's preferred categories or tags
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    /// Category id or tag
    pub key: String,
    pub count: u32,
    pub average_rating: Average,
}

/// A product in a user's review history
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedProduct {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: Option<CategoryId>,
    pub tags: Vec<String>,
    pub rating: i32,
    pub date: Option<DateTime<Utc>>,
}

/// A product recommended to a user, with the score that ranked it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: Option<CategoryId>,
    pub tags: Vec<String>,
    pub price: f64,
    pub average_rating: Average,
    pub review_count: u32,
    pub match_score: f64,
}

/// Everything derived about one reviewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    pub user_id: UserId,
    pub total_reviews: u32,
    pub total_rating: i64,
    pub average_rating: Average,
    pub high_ratings: u32,
    pub low_ratings: u32,
    pub preferred_categories: Vec<Preference>,
    pub preferred_tags: Vec<Preference>,
    pub reviewed_products: Vec<ReviewedProduct>,
    pub recommended_products: Vec<RecommendedProduct>,
}

/// A reviewer ranked by how often they rate positively
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositiveReviewer {
    pub user_id: UserId,
    pub total_reviews: u32,
    pub positive_reviews: u32,
    pub positive_ratio: f64,
}

/// Two categories that appear together in several users' preferences.
///
/// `categories` is sorted, so `(A, B)` and `(B, A)` are the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPair {
    pub categories: [CategoryId; 2],
    pub count: u32,
}

/// Composite review analytics payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub global_stats: GlobalStats,
    pub category_analytics: BTreeMap<CategoryId, RatingAnalytics>,
    pub tag_analytics: BTreeMap<String, RatingAnalytics>,
    pub user_analytics: Vec<UserAnalytics>,
    pub positive_reviewers: Vec<PositiveReviewer>,
    pub product_popularity: Vec<ProductPopularity>,
    pub popular_category_pairs: Vec<CategoryPair>,
}

impl AnalyticsReport {
    pub fn user(&self, user_id: &str) -> Option<&UserAnalytics> {
        self.user_analytics
            .binary_search_by(|u| u.user_id.as_str().cmp(user_id))
            .ok()
            .map(|idx| &self.user_analytics[idx])
    }
}
