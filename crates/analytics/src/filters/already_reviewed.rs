//! Filter to remove products the user has already reviewed.
//!
//! This is typically the first filter in the pipeline, as there's no
//! point in recommending something the user has already rated.

use crate::profile::UserProfile;
use crate::report::ProductPopularity;
use crate::traits::CandidateFilter;
use anyhow::Result;

/// Removes candidates present in the user's review history.
pub struct AlreadyReviewedFilter;

impl CandidateFilter for AlreadyReviewedFilter {
    fn name(&self) -> &str {
        "AlreadyReviewedFilter"
    }

    fn apply<'a>(
        &self,
        candidates: Vec<&'a ProductPopularity>,
        profile: &UserProfile,
    ) -> Result<Vec<&'a ProductPopularity>> {
        let filtered = candidates
            .into_iter()
            .filter(|candidate| !profile.reviewed.contains(&candidate.product_id))
            .collect();
        Ok(filtered)
    }
}
