//! Review analytics for the storefront.
//!
//! This crate provides:
//! - A mergeable [`ReviewAccumulator`] that folds product reviews into totals
//! - [`ReviewAnalytics`], which turns those totals into an [`AnalyticsReport`]
//! - The [`CandidateFilter`] trait and [`FilterPipeline`] used to pick each
//!   user's recommendation candidates, ranked by [`MatchScorer`]
//!
//! ## Architecture
//! A report is built in stages:
//! 1. Reviews are tallied globally and per category, tag, product and user
//! 2. Tallies are averaged to one decimal place
//! 3. Each user is finalized: preferred categories/tags, review history and
//!    recommendations (filters narrow candidates, the scorer ranks them)
//! 4. Positive reviewers, product popularity and category pairs are ranked
//!
//! ## Example Usage
//! ```ignore
//! use analytics::{AnalyticsConfig, ReviewAnalytics, ReviewScope};
//!
//! let analytics = ReviewAnalytics::new(
//!     AnalyticsConfig::default().with_review_scope(ReviewScope::ApprovedOnly),
//! );
//! let report = analytics.compute(&products)?;
//! println!("{}", report.global_stats.average_rating);
//! ```

pub mod accumulator;
pub mod aggregator;
pub mod config;
pub mod filter_pipeline;
pub mod filters;
pub mod profile;
pub mod rating;
pub mod report;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use accumulator::ReviewAccumulator;
pub use aggregator::ReviewAnalytics;
pub use config::{AnalyticsConfig, ReviewScope};
pub use filter_pipeline::FilterPipeline;
pub use profile::UserProfile;
pub use rating::{Average, RatingTally};
pub use report::{
    AnalyticsReport, CategoryPair, GlobalStats, PositiveReviewer, Preference, ProductPopularity,
    RatingAnalytics, RecommendedProduct, ReviewedProduct, UserAnalytics,
};
pub use scoring::MatchScorer;
pub use traits::CandidateFilter;
