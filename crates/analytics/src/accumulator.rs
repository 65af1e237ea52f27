//! Mergeable running totals for the review analytics pass.
//!
//! A [`ReviewAccumulator`] borrows from the products it ingests and only
//! holds sums and counts, so two accumulators built over disjoint product
//! batches can be merged in any order and produce the same totals. That is
//! what lets the aggregator fold products in parallel and lets callers feed
//! a large collection in batches.

use crate::config::ReviewScope;
use crate::rating::{BUCKETS, HIGH_RATING, LOW_RATING, RatingTally, Sentiment, bucket};
use catalog::{Product, Review};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Per-product running totals
#[derive(Debug, Clone)]
pub struct PopularityRecord<'a> {
    pub product: &'a Product,
    pub tally: RatingTally,
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl<'a> PopularityRecord<'a> {
    fn new(product: &'a Product) -> Self {
        Self {
            product,
            tally: RatingTally::default(),
            positive: 0,
            neutral: 0,
            negative: 0,
        }
    }

    fn add(&mut self, rating: i32) {
        self.tally.add(rating);
        match Sentiment::of(rating) {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    fn merge(&mut self, other: PopularityRecord<'a>) {
        self.tally.merge(other.tally);
        self.positive += other.positive;
        self.neutral += other.neutral;
        self.negative += other.negative;
    }
}

/// One entry of a user's review history
#[derive(Debug, Clone)]
pub struct HistoryEntry<'a> {
    pub product: &'a Product,
    pub rating: i32,
    pub date: Option<DateTime<Utc>>,
}

/// Per-user running totals
#[derive(Debug, Clone, Default)]
pub struct UserAccumulator<'a> {
    pub tally: RatingTally,
    pub high: u32,
    pub low: u32,
    /// Only fed by high ratings
    pub categories: HashMap<&'a str, RatingTally>,
    /// Only fed by high ratings
    pub tags: HashMap<&'a str, RatingTally>,
    pub history: Vec<HistoryEntry<'a>>,
}

impl<'a> UserAccumulator<'a> {
    fn add(&mut self, product: &'a Product, tags: &[&'a str], review: &Review) {
        let rating = review.rating;
        self.tally.add(rating);
        if rating >= HIGH_RATING {
            self.high += 1;
            if let Some(category) = product.category.as_deref() {
                self.categories.entry(category).or_default().add(rating);
            }
            for &tag in tags {
                self.tags.entry(tag).or_default().add(rating);
            }
        } else if rating <= LOW_RATING {
            self.low += 1;
        }
        self.history.push(HistoryEntry {
            product,
            rating,
            date: review.date,
        });
    }

    fn merge(&mut self, other: UserAccumulator<'a>) {
        self.tally.merge(other.tally);
        self.high += other.high;
        self.low += other.low;
        merge_tallies(&mut self.categories, other.categories);
        merge_tallies(&mut self.tags, other.tags);
        self.history.extend(other.history);
    }
}

/// Running totals for a whole analytics pass
#[derive(Debug, Clone, Default)]
pub struct ReviewAccumulator<'a> {
    scope: ReviewScope,
    pub total: RatingTally,
    pub distribution: [u32; BUCKETS],
    pub skipped: u32,
    pub categories: HashMap<&'a str, RatingTally>,
    pub tags: HashMap<&'a str, RatingTally>,
    pub products: HashMap<&'a str, PopularityRecord<'a>>,
    pub users: HashMap<&'a str, UserAccumulator<'a>>,
}

impl<'a> ReviewAccumulator<'a> {
    pub fn new(scope: ReviewScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn scope(&self) -> ReviewScope {
        self.scope
    }

    /// Fold every in-scope review of `product` into the totals.
    ///
    /// Products with no in-scope, in-range reviews are ignored entirely.
    pub fn ingest_product(&mut self, product: &'a Product) {
        let scope = self.scope;
        let mut reviews = product
            .reviews
            .iter()
            .filter(|review| scope.admits(review.approved))
            .peekable();
        if reviews.peek().is_none() {
            return;
        }

        let tags = distinct_tags(product);

        for review in reviews {
            let Some(idx) = bucket(review.rating) else {
                debug!(
                    "Skipping review on product {} with out-of-range rating {}",
                    product.id, review.rating
                );
                self.skipped += 1;
                continue;
            };
            let rating = review.rating;

            self.total.add(rating);
            self.distribution[idx] += 1;

            if let Some(category) = product.category.as_deref() {
                self.categories.entry(category).or_default().add(rating);
            }
            for &tag in &tags {
                self.tags.entry(tag).or_default().add(rating);
            }

            self.products
                .entry(product.id.as_str())
                .or_insert_with(|| PopularityRecord::new(product))
                .add(rating);

            if let Some(user) = review.user.as_deref() {
                self.users
                    .entry(user)
                    .or_default()
                    .add(product, &tags, review);
            }
        }
    }

    /// Combine two accumulators built over disjoint sets of products.
    pub fn merge(mut self, other: ReviewAccumulator<'a>) -> Self {
        self.total.merge(other.total);
        for (mine, theirs) in self.distribution.iter_mut().zip(other.distribution) {
            *mine += theirs;
        }
        self.skipped += other.skipped;
        merge_tallies(&mut self.categories, other.categories);
        merge_tallies(&mut self.tags, other.tags);

        for (id, record) in other.products {
            match self.products.get_mut(id) {
                Some(existing) => existing.merge(record),
                None => {
                    self.products.insert(id, record);
                }
            }
        }
        for (id, user) in other.users {
            self.users.entry(id).or_default().merge(user);
        }
        self
    }
}

fn merge_tallies<'a>(
    into: &mut HashMap<&'a str, RatingTally>,
    from: HashMap<&'a str, RatingTally>,
) {
    for (key, tally) in from {
        into.entry(key).or_default().merge(tally);
    }
}

/// Product tags with duplicates removed, first occurrence wins
fn distinct_tags(product: &Product) -> Vec<&str> {
    let mut tags: Vec<&str> = Vec::with_capacity(product.tags.len());
    for tag in &product.tags {
        if !tags.contains(&tag.as_str()) {
            tags.push(tag);
        }
    }
    tags
}
