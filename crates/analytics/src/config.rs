//! Tunables for the review analytics report.

/// Which reviews feed the aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewScope {
    /// Every supplied review, approved or not
    #[default]
    All,
    /// Only reviews an administrator has approved
    ApprovedOnly,
}

impl ReviewScope {
    pub fn admits(self, approved: bool) -> bool {
        match self {
            ReviewScope::All => true,
            ReviewScope::ApprovedOnly => approved,
        }
    }
}

/// Limits and thresholds used while building an [`crate::AnalyticsReport`]
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    pub review_scope: ReviewScope,
    /// Preferred categories kept per user
    pub top_categories: usize,
    /// Preferred tags kept per user
    pub top_tags: usize,
    /// Recommendations kept per user
    pub recommendation_limit: usize,
    /// Minimum product average for a recommendation candidate
    pub min_recommendation_rating: f64,
    /// Reviews a user needs before being ranked as a positive reviewer
    pub positive_reviewer_min_reviews: u32,
    pub positive_reviewers_limit: usize,
    /// Users that must share a category pair for it to be reported
    pub category_pair_min_users: u32,
    pub category_pairs_limit: usize,
    pub popular_products_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            review_scope: ReviewScope::All,
            top_categories: 3,
            top_tags: 5,
            recommendation_limit: 5,
            min_recommendation_rating: 4.0,
            positive_reviewer_min_reviews: 3,
            positive_reviewers_limit: 10,
            category_pair_min_users: 2,
            category_pairs_limit: 5,
            popular_products_limit: 20,
        }
    }
}

impl AnalyticsConfig {
    pub fn with_review_scope(mut self, scope: ReviewScope) -> Self {
        self.review_scope = scope;
        self
    }

    /// Configure preferred categories kept per user (default: 3)
    pub fn with_top_categories(mut self, n: usize) -> Self {
        self.top_categories = n;
        self
    }

    /// Configure preferred tags kept per user (default: 5)
    pub fn with_top_tags(mut self, n: usize) -> Self {
        self.top_tags = n;
        self
    }

    /// Configure recommendations kept per user (default: 5)
    pub fn with_recommendation_limit(mut self, n: usize) -> Self {
        self.recommendation_limit = n;
        self
    }

    /// Configure the minimum average rating of a recommended product (default: 4.0)
    pub fn with_min_recommendation_rating(mut self, rating: f64) -> Self {
        self.min_recommendation_rating = rating;
        self
    }

    /// Configure how many reviews make a user eligible as a positive reviewer (default: 3)
    pub fn with_positive_reviewer_min_reviews(mut self, n: u32) -> Self {
        self.positive_reviewer_min_reviews = n;
        self
    }

    /// Configure the size of the product popularity list (default: 20)
    pub fn with_popular_products_limit(mut self, n: usize) -> Self {
        self.popular_products_limit = n;
        self
    }
}
