//! Match score used to rank a user's recommended products.
//!
//! ```text
//! score = 5 × user's average for the product's category  (if a top category)
//!       + 2 × user's average for each product tag         (summed over top tags)
//!       + 2 × product's own average
//! ```
//!
//! Every term uses one-decimal averages, and every weight is positive, so the
//! score never decreases when any of the three averages grows.

use crate::profile::UserProfile;
use crate::report::ProductPopularity;

pub const CATEGORY_WEIGHT: f64 = 5.0;
pub const TAG_WEIGHT: f64 = 2.0;
pub const RATING_WEIGHT: f64 = 2.0;

/// Weighted category/tag/rating scorer
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer {
    category_weight: f64,
    tag_weight: f64,
    rating_weight: f64,
}

impl MatchScorer {
    pub fn new() -> Self {
        Self {
            category_weight: CATEGORY_WEIGHT,
            tag_weight: TAG_WEIGHT,
            rating_weight: RATING_WEIGHT,
        }
    }

    pub fn score(&self, product: &ProductPopularity, profile: &UserProfile) -> f64 {
        let category_affinity = product
            .category
            .as_deref()
            .and_then(|category| profile.category_preference(category))
            .map(|pref| pref.average_rating.value())
            .unwrap_or(0.0);

        let mut seen: Vec<&str> = Vec::with_capacity(product.tags.len());
        let tag_affinity: f64 = product
            .tags
            .iter()
            .filter(|tag| {
                let fresh = !seen.contains(&tag.as_str());
                seen.push(tag.as_str());
                fresh
            })
            .filter_map(|tag| profile.tag_preference(tag))
            .map(|pref| pref.average_rating.value())
            .sum();

        self.category_weight * category_affinity
            + self.tag_weight * tag_affinity
            + self.rating_weight * product.average_rating.value()
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::Average;
    use crate::report::Preference;

    fn popularity(
        id: &str,
        category: Option<&str>,
        tags: &[&str],
        avg: (i64, u32),
    ) -> ProductPopularity {
        ProductPopularity {
            product_id: id.to_string(),
            name: id.to_string(),
            slug: id.to_string(),
            category: category.map(str::to_string),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            price: 10.0,
            total_rating: avg.0,
            review_count: avg.1,
            average_rating: Average::of(avg.0, avg.1),
            positive_reviews: 0,
            neutral_reviews: 0,
            negative_reviews: 0,
        }
    }

    fn pref(key: &str, sum: i64, count: u32) -> Preference {
        Preference {
            key: key.to_string(),
            count,
            average_rating: Average::of(sum, count),
        }
    }

    fn profile() -> UserProfile {
        let mut profile = UserProfile::new("u1");
        profile.top_categories = vec![pref("A", 9, 2)];
        profile.top_tags = vec![pref("x", 5, 1), pref("y", 4, 1)];
        profile
    }

    #[test]
    fn test_all_terms() {
        // 5 × 4.5 + 2 × (5.0 + 4.0) + 2 × 4.0
        let product = popularity("p", Some("A"), &["x", "y", "z"], (8, 2));
        let score = MatchScorer::new().score(&product, &profile());
        assert!((score - 48.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_match_contributes_zero() {
        let product = popularity("p", Some("B"), &["z"], (9, 2));
        let score = MatchScorer::new().score(&product, &profile());
        assert!((score - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_category_and_tags() {
        let product = popularity("p", None, &[], (4, 1));
        let score = MatchScorer::new().score(&product, &profile());
        assert!((score - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_tags_scored_once() {
        let once = popularity("p", None, &["x"], (4, 1));
        let twice = popularity("p", None, &["x", "x"], (4, 1));
        let scorer = MatchScorer::new();
        assert_eq!(scorer.score(&once, &profile()), scorer.score(&twice, &profile()));
    }

    #[test]
    fn test_higher_product_rating_never_lowers_score() {
        let scorer = MatchScorer::new();
        let mut previous = f64::MIN;
        for sum in 4..=10 {
            let product = popularity("p", Some("A"), &["x"], (sum, 2));
            let score = scorer.score(&product, &profile());
            assert!(score >= previous);
            previous = score;
        }
    }
}
