//! Service configuration.

use analytics::AnalyticsConfig;
use recommender::DEFAULT_LIMIT;
use std::time::Duration;

/// Default budget for a single request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Upper bound on the CPU work of one request
    pub request_timeout: Duration,
    /// Products returned by `bought_together` when the caller gives no limit
    pub bought_together_limit: usize,
    pub analytics: AnalyticsConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            bought_together_limit: DEFAULT_LIMIT,
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Configure the per-request timeout (default: 30s)
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Configure the default co-purchase limit (default: 3)
    pub fn with_bought_together_limit(mut self, limit: usize) -> Self {
        self.bought_together_limit = limit;
        self
    }

    pub fn with_analytics(mut self, analytics: AnalyticsConfig) -> Self {
        self.analytics = analytics;
        self
    }
}
