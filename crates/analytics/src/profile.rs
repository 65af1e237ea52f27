//! Per-user preference profiles.
//!
//! Turns a [`UserAccumulator`] into the user's preferred categories and
//! tags and the set of products they have already reviewed. The
//! recommendation filters and the match scorer work off this profile.

use crate::accumulator::UserAccumulator;
use crate::rating::RatingTally;
use crate::report::{Preference, ReviewedProduct};
use catalog::{ProductId, UserId};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// What the recommender needs to know about one user
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub user_id: UserId,
    pub reviewed: HashSet<ProductId>,
    pub top_categories: Vec<Preference>,
    pub top_tags: Vec<Preference>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn category_preference(&self, category: &str) -> Option<&Preference> {
        self.top_categories.iter().find(|p| p.key == category)
    }

    pub fn tag_preference(&self, tag: &str) -> Option<&Preference> {
        self.top_tags.iter().find(|p| p.key == tag)
    }
}

/// Build a user's profile from their accumulated reviews.
pub fn build_user_profile(
    user_id: &str,
    acc: &UserAccumulator<'_>,
    top_categories: usize,
    top_tags: usize,
) -> UserProfile {
    UserProfile {
        user_id: user_id.to_string(),
        reviewed: acc
            .history
            .iter()
            .map(|entry| entry.product.id.clone())
            .collect(),
        top_categories: top_preferences(&acc.categories, top_categories),
        top_tags: top_preferences(&acc.tags, top_tags),
    }
}

/// The `n` strongest preferences: count descending, then average rating
/// descending, then key ascending.
pub fn top_preferences(tallies: &HashMap<&str, RatingTally>, n: usize) -> Vec<Preference> {
    let mut preferences: Vec<Preference> = tallies
        .iter()
        .map(|(&key, tally)| Preference {
            key: key.to_string(),
            count: tally.count,
            average_rating: tally.average(),
        })
        .collect();

    preferences.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| {
                b.average_rating
                    .partial_cmp(&a.average_rating)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.key.cmp(&b.key))
    });
    preferences.truncate(n);
    preferences
}

/// A user's review history, oldest first (undated reviews first), ties by
/// product id.
pub fn review_history(acc: &UserAccumulator<'_>) -> Vec<ReviewedProduct> {
    let mut history: Vec<ReviewedProduct> = acc
        .history
        .iter()
        .map(|entry| ReviewedProduct {
            product_id: entry.product.id.clone(),
            name: entry.product.name.clone(),
            slug: entry.product.slug.clone(),
            category: entry.product.category.clone(),
            tags: entry.product.tags.clone(),
            rating: entry.rating,
            date: entry.date,
        })
        .collect();

    history.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.product_id.cmp(&b.product_id))
            .then_with(|| a.rating.cmp(&b.rating))
    });
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(ratings: &[i32]) -> RatingTally {
        let mut t = RatingTally::default();
        for &r in ratings {
            t.add(r);
        }
        t
    }

    #[test]
    fn test_count_dominates_average() {
        // A: two reviews averaging 4.5, B: one review at 5.0
        let mut tallies = HashMap::new();
        tallies.insert("A", tally(&[5, 4]));
        tallies.insert("B", tally(&[5]));

        let top = top_preferences(&tallies, 3);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].key, "A");
        assert_eq!(top[0].count, 2);
        assert_eq!(top[0].average_rating.value(), 4.5);
        assert_eq!(top[1].key, "B");
        assert_eq!(top[1].average_rating.value(), 5.0);
    }

    #[test]
    fn test_average_breaks_count_ties_then_key() {
        let mut tallies = HashMap::new();
        tallies.insert("low", tally(&[4]));
        tallies.insert("high", tally(&[5]));
        tallies.insert("also-high", tally(&[5]));

        let top = top_preferences(&tallies, 2);
        let keys: Vec<&str> = top.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["also-high", "high"]);
    }

    #[test]
    fn test_truncates_to_n() {
        let mut tallies = HashMap::new();
        for key in ["a", "b", "c", "d", "e", "f", "g"] {
            tallies.insert(key, tally(&[4]));
        }
        assert_eq!(top_preferences(&tallies, 5).len(), 5);
        assert!(top_preferences(&tallies, 0).is_empty());
    }
}
