//! Core trait for the recommendation candidate pipeline.
//!
//! Every product with a popularity record starts out as a candidate for
//! every user; filters narrow that down before scoring.

use crate::profile::UserProfile;
use crate::report::ProductPopularity;
use anyhow::Result;

/// Narrows a user's recommendation candidates.
///
/// `Send + Sync` so one pipeline can serve users finalized in parallel.
/// Candidates are borrowed from the report's product records and passed by
/// value, so a filter can drop entries without cloning any.
pub trait CandidateFilter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    fn apply<'a>(
        &self,
        candidates: Vec<&'a ProductPopularity>,
        profile: &UserProfile,
    ) -> Result<Vec<&'a ProductPopularity>>;
}
