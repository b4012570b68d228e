use std::sync::Arc;

use axum::body::Body;
use governor::middleware::NoOpMiddleware;
use serde::{Deserialize, Serialize};
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Per-client-IP token bucket for the HTTP API.
///
/// Tokens are replenished at `max_requests` per `time_window_seconds`; a client
/// may spend up to `burst_size` of them at once.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RateLimiterConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_time_window_seconds")]
    pub time_window_seconds: u64,

    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Defaults to `max_requests`.
    #[serde(default)]
    pub burst_size: Option<u32>,
}

fn default_enabled() -> bool {
    true
}

fn default_time_window_seconds() -> u64 {
    1
}

fn default_max_requests() -> u32 {
    50
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            time_window_seconds: default_time_window_seconds(),
            max_requests: default_max_requests(),
            burst_size: None,
        }
    }
}

impl RateLimiterConfig {
    pub(crate) fn effective_burst_size(&self) -> u32 {
        self.burst_size.unwrap_or(self.max_requests)
    }

    /// Milliseconds between two replenished tokens, at least one.
    fn replenish_interval_ms(&self) -> u64 {
        ((self.time_window_seconds * 1000) / u64::from(self.max_requests.max(1))).max(1)
    }

    /// Build the rate limiter layer.
    ///
    /// Returns `None` if rate limiting is disabled or the limits are unusable.
    pub(crate) fn build_layer(
        &self,
    ) -> Option<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware, Body>> {
        if !self.enabled {
            return None;
        }
        if self.max_requests == 0 || self.effective_burst_size() == 0 {
            tracing::warn!("Rate limiter configured with zero requests, leaving it disabled");
            return None;
        }

        let config = GovernorConfigBuilder::default()
            .per_millisecond(self.replenish_interval_ms())
            .burst_size(self.effective_burst_size())
            .finish()?;

        Some(GovernorLayer::new(Arc::new(config)))
    }
}
