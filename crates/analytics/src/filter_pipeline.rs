//! Chains candidate filters together.

use crate::profile::UserProfile;
use crate::report::ProductPopularity;
use crate::traits::CandidateFilter;
use anyhow::Result;

/// Applies a sequence of [`CandidateFilter`]s in order.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyReviewedFilter)
///     .add_filter(MinimumRatingFilter::new(4.0))
///     .add_filter(PreferenceMatchFilter);
///
/// let candidates = pipeline.apply(all_products, &profile)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn CandidateFilter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl CandidateFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply all filters in sequence to the candidates.
    pub fn apply<'a>(
        &self,
        candidates: Vec<&'a ProductPopularity>,
        profile: &UserProfile,
    ) -> Result<Vec<&'a ProductPopularity>> {
        let mut current = candidates;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current, profile)?;
            tracing::trace!(
                "{} kept {}/{} candidates for user {}",
                filter.name(),
                current.len(),
                before,
                profile.user_id
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
