use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::error::AppError;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Outcome of one rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the oldest counted request leaves the window
    pub retry_after: Duration,
}

impl RateLimitDecision {
    /// Whole seconds for the `Retry-After` header, at least 1
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.retry_after.as_secs();
        let rounded = if self.retry_after.subsec_nanos() > 0 { secs + 1 } else { secs };
        rounded.max(1)
    }
}

/// Per-client rolling-window limiter.
///
/// Each client keeps the instants of its requests inside the window; a
/// request is admitted while fewer than `limit` remain.
pub struct RateLimiter {
    config: RateLimitConfig,
    trust_proxy: bool,
    clients: DashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            trust_proxy: false,
            clients: DashMap::new(),
        }
    }

    /// Identify clients by the first `X-Forwarded-For` entry
    #[must_use]
    pub const fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    pub const fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Count a request from `client` and decide whether it may proceed
    pub fn check(&self, client: &str) -> RateLimitDecision {
        let limit = self.config.limit;
        let window = self.config.window;
        let now = Instant::now();

        let mut hits = self.clients.entry(client.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|&t| now.duration_since(t) >= window)
        {
            hits.pop_front();
        }

        let count = u32::try_from(hits.len()).unwrap_or(u32::MAX);
        if count >= limit {
            let retry_after = hits
                .front()
                .map_or(window, |&oldest| window.saturating_sub(now.duration_since(oldest)));

            return RateLimitDecision {
                allowed: false,
                limit,
                remaining: 0,
                retry_after,
            };
        }

        hits.push_back(now);
        RateLimitDecision {
            allowed: true,
            limit,
            remaining: limit - count - 1,
            retry_after: Duration::ZERO,
        }
    }

    /// Drop clients with no request inside the window; returns how many went
    pub fn purge_idle(&self) -> usize {
        let window = self.config.window;
        let now = Instant::now();
        let before = self.clients.len();

        self.clients.retain(|_, hits| {
            hits.back()
                .is_some_and(|&last| now.duration_since(last) < window)
        });

        before.saturating_sub(self.clients.len())
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    /// Client identity for `request`
    fn client_key(&self, request: &Request) -> String {
        if self.trust_proxy
            && let Some(forwarded) = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| "unknown".to_string(), |info| info.0.ip().to_string())
    }
}

/// Middleware applying the limiter to the routes it wraps
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.config().enabled() {
        return next.run(request).await;
    }

    let client = limiter.client_key(&request);
    let decision = limiter.check(&client);

    if !decision.allowed {
        debug!(client = %client, "Rate limit exceeded");
        return AppError::RateLimited {
            retry_after: decision.retry_after_secs(),
        }
        .into_response();
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(
        X_RATELIMIT_REMAINING,
        HeaderValue::from(decision.remaining),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(limit: u32, window_secs: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            limit,
            window: Duration::from_secs(window_secs),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_admits_up_to_limit() {
        let limiter = limiter(3, 60);

        let remaining: Vec<u32> = (0..3).map(|_| limiter.check("1.2.3.4").remaining).collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let denied = limiter.check("1.2.3.4");
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clients_are_independent() {
        let limiter = limiter(1, 60);

        assert!(limiter.check("10.0.0.1").allowed);
        assert!(!limiter.check("10.0.0.1").allowed);
        assert!(limiter.check("10.0.0.2").allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_rolls() {
        let limiter = limiter(2, 60);

        assert!(limiter.check("c").allowed);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(limiter.check("c").allowed);
        assert!(!limiter.check("c").allowed);

        // First request leaves the window, second is still counted
        tokio::time::advance(Duration::from_secs(31)).await;
        let decision = limiter.check("c");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 0);

        let denied = limiter.check("c");
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after_secs(), 29);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_idle_clients() {
        let limiter = limiter(5, 10);

        limiter.check("idle");
        tokio::time::advance(Duration::from_secs(8)).await;
        limiter.check("active");
        tokio::time::advance(Duration::from_secs(3)).await;

        assert_eq!(limiter.purge_idle(), 1);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let decision = RateLimitDecision {
            allowed: false,
            limit: 1,
            remaining: 0,
            retry_after: Duration::from_millis(1500),
        };
        assert_eq!(decision.retry_after_secs(), 2);

        let decision = RateLimitDecision {
            retry_after: Duration::ZERO,
            ..decision
        };
        assert_eq!(decision.retry_after_secs(), 1);
    }
}
