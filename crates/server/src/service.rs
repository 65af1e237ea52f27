//! # Storefront Service
//!
//! Request handlers over an injected [`DocumentStore`]:
//! 1. `bought_together` - co-purchase recommendations with category fallback
//! 2. `review_analytics` - the full review analytics report
//! 3. `user_analytics` - one reviewer's slice of that report
//!
//! Handlers fetch what they need from the store, then run the CPU-bound
//! work on tokio's blocking pool under the configured request timeout.
//! Every request builds its own accumulators; the store is shared
//! read-only.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info, instrument, warn};

use analytics::{AnalyticsReport, ReviewAnalytics, UserAnalytics};
use catalog::{DocumentStore, Product};
use recommender::{BoughtTogether, CategoryFallback, RecommendationSource};

use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::response::{BoughtTogetherResponse, ProductSummary};

/// Entry point for the storefront's recommendation endpoints
pub struct StorefrontService<S> {
    store: Arc<S>,
    analytics: Arc<ReviewAnalytics>,
    config: ServiceConfig,
}

impl<S> Clone for StorefrontService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            analytics: Arc::clone(&self.analytics),
            config: self.config.clone(),
        }
    }
}

impl<S: DocumentStore + 'static> StorefrontService<S> {
    /// Create a service over `store`.
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        let counts = store.counts();
        info!(
            "Storefront service ready on {} store ({} products, {} orders, {} users)",
            store.name(),
            counts.products,
            counts.orders,
            counts.users
        );

        let analytics = Arc::new(ReviewAnalytics::new(config.analytics.clone()));
        Self {
            store,
            analytics,
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Products frequently bought with `product_id`.
    ///
    /// Falls back to the best-rated products of the seed's category when the
    /// seed was never bought alongside anything. `limit` defaults to the
    /// configured value.
    #[instrument(skip(self))]
    pub async fn bought_together(
        &self,
        product_id: &str,
        limit: Option<usize>,
    ) -> Result<BoughtTogetherResponse> {
        let limit = limit.unwrap_or(self.config.bought_together_limit);
        let store = Arc::clone(&self.store);
        let product_id = product_id.to_string();

        self.run_blocking("bought_together", move || {
            bought_together(store.as_ref(), &product_id, limit)
        })
        .await
    }

    /// Review analytics over every reviewed product in the store.
    ///
    /// A timeout answers the caller early but the aggregation itself runs to
    /// completion on the blocking pool.
    #[instrument(skip(self))]
    pub async fn review_analytics(&self) -> Result<AnalyticsReport> {
        let store = Arc::clone(&self.store);
        let analytics = Arc::clone(&self.analytics);

        self.run_blocking("review_analytics", move || {
            let products = store.find_reviewed_products();
            debug!("Aggregating reviews of {} products", products.len());
            analytics
                .compute(&products)
                .context("Failed to compute review analytics")
                .map_err(ServiceError::from)
        })
        .await
    }

    /// One reviewer's analytics record.
    ///
    /// Unknown users and users without counted reviews are both not found.
    #[instrument(skip(self))]
    pub async fn user_analytics(&self, user_id: &str) -> Result<UserAnalytics> {
        let store = Arc::clone(&self.store);
        let analytics = Arc::clone(&self.analytics);
        let user_id = user_id.to_string();

        self.run_blocking("user_analytics", move || {
            let products = store.find_reviewed_products();
            analytics
                .user_report(&products, &user_id)
                .with_context(|| format!("Failed to compute analytics for user {}", user_id))?
                .ok_or_else(|| ServiceError::not_found("user", user_id))
        })
        .await
    }

    /// Stop serving and release the store.
    ///
    /// The store is only dropped here if no other handle still holds it.
    pub fn shutdown(self) {
        let name = self.store.name().to_string();
        drop(self.analytics);

        match Arc::try_unwrap(self.store) {
            Ok(store) => {
                drop(store);
                info!("Storefront service stopped, {} store released", name);
            }
            Err(shared) => {
                warn!(
                    "Storefront service stopped, {} store still held by {} other handle(s)",
                    name,
                    Arc::strong_count(&shared) - 1
                );
            }
        }
    }

    /// Run `work` on the blocking pool, bounded by the request timeout.
    ///
    /// The timeout only bounds how long the caller waits. Blocking tasks
    /// cannot be aborted, so `work` keeps its thread and its store handle
    /// until it returns on its own; its result is then discarded.
    async fn run_blocking<T, F>(&self, operation: &'static str, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let start = Instant::now();
        let timeout = self.config.request_timeout;

        let joined = tokio::time::timeout(timeout, tokio::task::spawn_blocking(work))
            .await
            .map_err(|_| {
                warn!("{} exceeded the {:?} request timeout", operation, timeout);
                ServiceError::Timeout(timeout)
            })?;
        let result = joined.with_context(|| format!("{} task panicked", operation))?;

        info!("{} finished in {:.2?}", operation, start.elapsed());
        result
    }
}

/// Synchronous body of the bought-together handler
fn bought_together<S: DocumentStore + ?Sized>(
    store: &S,
    product_id: &str,
    limit: usize,
) -> Result<BoughtTogetherResponse> {
    let seed = store
        .find_product(product_id)
        .ok_or_else(|| ServiceError::not_found("product", product_id))?;

    let orders = store.find_orders_containing(&seed.id);
    let ids = BoughtTogether::new()
        .with_limit(limit)
        .get_products(seed, &orders);

    if !ids.is_empty() {
        let products: Vec<ProductSummary> = ids
            .iter()
            .filter_map(|id| {
                let product = store.find_product(id);
                if product.is_none() {
                    debug!("Co-purchased product {} is not in the catalog", id);
                }
                product
            })
            .map(ProductSummary::from)
            .collect();
        return Ok(BoughtTogetherResponse::new(
            products,
            RecommendationSource::CoPurchase,
        ));
    }

    debug!(
        "No co-purchases for {} across {} orders, using category fallback",
        seed.id,
        orders.len()
    );
    let same_category: Vec<&Product> = seed
        .category
        .as_deref()
        .map(|category| store.find_products_by_category(category))
        .unwrap_or_default();
    let products = CategoryFallback::new()
        .with_limit(limit)
        .get_products(seed, &same_category)
        .into_iter()
        .map(ProductSummary::from)
        .collect();

    Ok(BoughtTogetherResponse::new(
        products,
        RecommendationSource::CategoryFallback,
    ))
}
