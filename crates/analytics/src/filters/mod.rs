//! Candidate filters for per-user recommendations.
//!
//! The default pipeline runs them in this order:
//! 1. [`AlreadyReviewedFilter`] drops products the user has reviewed
//! 2. [`MinimumRatingFilter`] drops products averaging below 4.0
//! 3. [`PreferenceMatchFilter`] keeps products matching a top category or tag

pub mod already_reviewed;
pub mod minimum_rating;
pub mod preference_match;

pub use already_reviewed::AlreadyReviewedFilter;
pub use minimum_rating::MinimumRatingFilter;
pub use preference_match::PreferenceMatchFilter;
