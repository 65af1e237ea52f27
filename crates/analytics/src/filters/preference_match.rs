//! Filter to keep only products matching the user's preferences.

use crate::profile::UserProfile;
use crate::report::ProductPopularity;
use crate::traits::CandidateFilter;
use anyhow::Result;

/// Keeps candidates in one of the user's top categories or carrying one of
/// the user's top tags.
///
/// A product without a category or tags can only match on the dimension it
/// has; a user without preferences matches nothing.
pub struct PreferenceMatchFilter;

impl PreferenceMatchFilter {
    fn matches(candidate: &ProductPopularity, profile: &UserProfile) -> bool {
        let category_match = candidate
            .category
            .as_deref()
            .is_some_and(|category| profile.category_preference(category).is_some());

        category_match
            || candidate
                .tags
                .iter()
                .any(|tag| profile.tag_preference(tag).is_some())
    }
}

impl CandidateFilter for PreferenceMatchFilter {
    fn name(&self) -> &str {
        "PreferenceMatchFilter"
    }

    fn apply<'a>(
        &self,
        candidates: Vec<&'a ProductPopularity>,
        profile: &UserProfile,
    ) -> Result<Vec<&'a ProductPopularity>> {
        let filtered = candidates
            .into_iter()
            .filter(|candidate| Self::matches(candidate, profile))
            .collect();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::candidate;
    use crate::rating::Average;
    use crate::report::Preference;

    fn profile() -> UserProfile {
        let mut profile = UserProfile::new("u1");
        profile.top_categories = vec![Preference {
            key: "desks".to_string(),
            count: 2,
            average_rating: Average::of(9, 2),
        }];
        profile.top_tags = vec![Preference {
            key: "oak".to_string(),
            count: 1,
            average_rating: Average::of(5, 1),
        }];
        profile
    }

    #[test]
    fn test_matches_category_or_tag() {
        let by_category = candidate("p1", Some("desks"), &["metal"], 4.5);
        let by_tag = candidate("p2", Some("chairs"), &["oak"], 4.5);
        let neither = candidate("p3", Some("chairs"), &["metal"], 4.5);
        let bare = candidate("p4", None, &[], 4.5);

        let filtered = PreferenceMatchFilter
            .apply(vec![&by_category, &by_tag, &neither, &bare], &profile())
            .unwrap();

        let ids: Vec<&str> = filtered.iter().map(|c| c.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn test_user_without_preferences_matches_nothing() {
        let product = candidate("p1", Some("desks"), &["oak"], 5.0);
        let filtered = PreferenceMatchFilter
            .apply(vec![&product], &UserProfile::new("u2"))
            .unwrap();
        assert!(filtered.is_empty());
    }
}
