//! The review analytics pass.
//!
//! ## Algorithm
//! 1. Fold every product into a [`ReviewAccumulator`] (parallel fold, then
//!    reduce by merging partial accumulators)
//! 2. Average every category, tag and product tally
//! 3. Finalize each user in parallel: preferences, history and
//!    recommendations drawn from the full product popularity list
//! 4. Derive the cross-cutting rankings from the finalized users
//!
//! Every map in the output is ordered and every list has an explicit total
//! order, so the same snapshot always yields the same report.

use crate::accumulator::{ReviewAccumulator, UserAccumulator};
use crate::config::AnalyticsConfig;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadyReviewedFilter, MinimumRatingFilter, PreferenceMatchFilter};
use crate::profile::{UserProfile, build_user_profile, review_history};
use crate::rating::RatingTally;
use crate::report::{
    AnalyticsReport, CategoryPair, GlobalStats, PositiveReviewer, ProductPopularity,
    RatingAnalytics, RecommendedProduct, UserAnalytics,
};
use crate::scoring::MatchScorer;
use anyhow::{Context, Result};
use catalog::{CategoryId, Product};
use rayon::prelude::*;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// Builds [`AnalyticsReport`]s from reviewed products.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct ReviewAnalytics {
    config: AnalyticsConfig,
    scorer: MatchScorer,
    pipeline: FilterPipeline,
}

impl ReviewAnalytics {
    pub fn new(config: AnalyticsConfig) -> Self {
        let pipeline = FilterPipeline::new()
            .add_filter(AlreadyReviewedFilter)
            .add_filter(MinimumRatingFilter::new(config.min_recommendation_rating))
            .add_filter(PreferenceMatchFilter);

        Self {
            config,
            scorer: MatchScorer::new(),
            pipeline,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// An empty accumulator scoped the way this instance counts reviews.
    ///
    /// Feed it with [`ReviewAccumulator::ingest_product`] (or merge several
    /// of them) and hand it to [`ReviewAnalytics::finish`].
    pub fn accumulator<'a>(&self) -> ReviewAccumulator<'a> {
        ReviewAccumulator::new(self.config.review_scope)
    }

    /// Run the whole analytics pass over `products`.
    #[instrument(skip_all, fields(products = products.len()))]
    pub fn compute<P>(&self, products: &[P]) -> Result<AnalyticsReport>
    where
        P: Borrow<Product> + Sync,
    {
        let acc = self.accumulate(products);
        self.finish(acc)
    }

    /// One user's record, or `None` when the user has no counted reviews.
    ///
    /// Recommendations still draw on every product, so the whole collection
    /// is accumulated; only the requested user is finalized.
    #[instrument(skip(self, products), fields(products = products.len()))]
    pub fn user_report<P>(&self, products: &[P], user_id: &str) -> Result<Option<UserAnalytics>>
    where
        P: Borrow<Product> + Sync,
    {
        let acc = self.accumulate(products);
        let Some(user) = acc.users.get(user_id) else {
            debug!("User {} has no counted reviews", user_id);
            return Ok(None);
        };

        let popularity = popularity_list(&acc);
        self.finalize_user(user_id, user, &popularity).map(Some)
    }

    /// Turn accumulated totals into the report.
    pub fn finish(&self, acc: ReviewAccumulator<'_>) -> Result<AnalyticsReport> {
        let global_stats = GlobalStats {
            total_reviews: acc.total.count,
            average_rating: acc.total.average(),
            rating_distribution: acc.distribution,
            skipped_reviews: acc.skipped,
        };

        let category_analytics = rating_analytics(&acc.categories);
        let tag_analytics = rating_analytics(&acc.tags);

        let mut popularity = popularity_list(&acc);

        let mut users: Vec<(&str, &UserAccumulator<'_>)> =
            acc.users.iter().map(|(&id, user)| (id, user)).collect();
        users.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let user_analytics = users
            .par_iter()
            .map(|&(id, user)| self.finalize_user(id, user, &popularity))
            .collect::<Result<Vec<_>>>()?;

        let positive_reviewers = self.positive_reviewers(&user_analytics);
        let popular_category_pairs = self.category_pairs(&user_analytics);
        popularity.truncate(self.config.popular_products_limit);

        info!(
            "Analytics: {} reviews ({} skipped), {} categories, {} tags, {} users",
            global_stats.total_reviews,
            global_stats.skipped_reviews,
            category_analytics.len(),
            tag_analytics.len(),
            user_analytics.len()
        );

        Ok(AnalyticsReport {
            global_stats,
            category_analytics,
            tag_analytics,
            user_analytics,
            positive_reviewers,
            product_popularity: popularity,
            popular_category_pairs,
        })
    }

    fn accumulate<'a, P>(&self, products: &'a [P]) -> ReviewAccumulator<'a>
    where
        P: Borrow<Product> + Sync,
    {
        let scope = self.config.review_scope;
        products
            .par_iter()
            .map(<P as Borrow<Product>>::borrow)
            .fold(
                || ReviewAccumulator::new(scope),
                |mut acc, product| {
                    acc.ingest_product(product);
                    acc
                },
            )
            .reduce(|| ReviewAccumulator::new(scope), ReviewAccumulator::merge)
    }

    fn finalize_user(
        &self,
        user_id: &str,
        user: &UserAccumulator<'_>,
        popularity: &[ProductPopularity],
    ) -> Result<UserAnalytics> {
        let profile = build_user_profile(
            user_id,
            user,
            self.config.top_categories,
            self.config.top_tags,
        );
        let recommended_products = self
            .recommend(&profile, popularity)
            .with_context(|| format!("Failed to build recommendations for user {}", user_id))?;

        Ok(UserAnalytics {
            user_id: user_id.to_string(),
            total_reviews: user.tally.count,
            total_rating: user.tally.sum,
            average_rating: user.tally.average(),
            high_ratings: user.high,
            low_ratings: user.low,
            preferred_categories: profile.top_categories,
            preferred_tags: profile.top_tags,
            reviewed_products: review_history(user),
            recommended_products,
        })
    }

    fn recommend(
        &self,
        profile: &UserProfile,
        popularity: &[ProductPopularity],
    ) -> Result<Vec<RecommendedProduct>> {
        let candidates = self.pipeline.apply(popularity.iter().collect(), profile)?;

        let mut scored: Vec<(f64, &ProductPopularity)> = candidates
            .into_iter()
            .map(|product| (self.scorer.score(product, profile), product))
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.product_id.cmp(&b.1.product_id))
        });
        scored.truncate(self.config.recommendation_limit);

        Ok(scored
            .into_iter()
            .map(|(match_score, product)| RecommendedProduct {
                product_id: product.product_id.clone(),
                name: product.name.clone(),
                slug: product.slug.clone(),
                category: product.category.clone(),
                tags: product.tags.clone(),
                price: product.price,
                average_rating: product.average_rating,
                review_count: product.review_count,
                match_score,
            })
            .collect())
    }

    /// Users with enough reviews, by share of positive ratings
    fn positive_reviewers(&self, users: &[UserAnalytics]) -> Vec<PositiveReviewer> {
        let mut reviewers: Vec<PositiveReviewer> = users
            .iter()
            .filter(|user| user.total_reviews >= self.config.positive_reviewer_min_reviews)
            .filter(|user| user.total_reviews > 0)
            .map(|user| PositiveReviewer {
                user_id: user.user_id.clone(),
                total_reviews: user.total_reviews,
                positive_reviews: user.high_ratings,
                positive_ratio: f64::from(user.high_ratings) / f64::from(user.total_reviews),
            })
            .collect();

        reviewers.sort_by(|a, b| {
            b.positive_ratio
                .partial_cmp(&a.positive_ratio)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.total_reviews.cmp(&a.total_reviews))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        reviewers.truncate(self.config.positive_reviewers_limit);
        reviewers
    }

    /// Category pairs shared by several users' preferred categories.
    ///
    /// Pairs are canonicalized by sorting, so `(A, B)` and `(B, A)` tally
    /// together. A user contributes at most once per pair.
    fn category_pairs(&self, users: &[UserAnalytics]) -> Vec<CategoryPair> {
        let mut shared: BTreeMap<[&str; 2], u32> = BTreeMap::new();

        for user in users {
            let mut keys: Vec<&str> = user
                .preferred_categories
                .iter()
                .map(|pref| pref.key.as_str())
                .collect();
            keys.sort_unstable();
            keys.dedup();

            for (i, &first) in keys.iter().enumerate() {
                for &second in &keys[i + 1..] {
                    *shared.entry([first, second]).or_insert(0) += 1;
                }
            }
        }

        let mut pairs: Vec<CategoryPair> = shared
            .into_iter()
            .filter(|&(_, count)| count >= self.config.category_pair_min_users)
            .map(|([first, second], count)| CategoryPair {
                categories: [first.to_string(), second.to_string()],
                count,
            })
            .collect();

        pairs.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.categories.cmp(&b.categories))
        });
        pairs.truncate(self.config.category_pairs_limit);
        pairs
    }
}

impl Default for ReviewAnalytics {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

fn rating_analytics(tallies: &HashMap<&str, RatingTally>) -> BTreeMap<CategoryId, RatingAnalytics> {
    tallies
        .iter()
        .map(|(&key, tally)| {
            (
                key.to_string(),
                RatingAnalytics {
                    total_rating: tally.sum,
                    count: tally.count,
                    average_rating: tally.average(),
                },
            )
        })
        .collect()
}

/// Every tracked product, best average first (ties: more reviews, then id)
fn popularity_list(acc: &ReviewAccumulator<'_>) -> Vec<ProductPopularity> {
    let mut products: Vec<ProductPopularity> = acc
        .products
        .values()
        .map(|record| ProductPopularity {
            product_id: record.product.id.clone(),
            name: record.product.name.clone(),
            slug: record.product.slug.clone(),
            category: record.product.category.clone(),
            tags: record.product.tags.clone(),
            price: record.product.price,
            total_rating: record.tally.sum,
            review_count: record.tally.count,
            average_rating: record.tally.average(),
            positive_reviews: record.positive,
            neutral_reviews: record.neutral,
            negative_reviews: record.negative,
        })
        .collect();

    products.sort_by(|a, b| {
        b.average_rating
            .partial_cmp(&a.average_rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.review_count.cmp(&a.review_count))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    products
}
