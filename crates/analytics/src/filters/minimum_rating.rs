//! Filter to ensure a minimum quality threshold.

use crate::profile::UserProfile;
use crate::report::ProductPopularity;
use crate::traits::CandidateFilter;
use anyhow::Result;

/// Removes candidates whose one-decimal average is below `min_rating`.
pub struct MinimumRatingFilter {
    min_rating: f64,
}

impl MinimumRatingFilter {
    /// * `min_rating` - Minimum average rating (typically 4.0)
    pub fn new(min_rating: f64) -> Self {
        Self { min_rating }
    }
}

impl CandidateFilter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply<'a>(
        &self,
        candidates: Vec<&'a ProductPopularity>,
        _profile: &UserProfile,
    ) -> Result<Vec<&'a ProductPopularity>> {
        let filtered = candidates
            .into_iter()
            .filter(|candidate| candidate.average_rating.value() >= self.min_rating)
            .collect();
        Ok(filtered)
    }
}
