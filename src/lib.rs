//! Movie metadata proxy.
//!
//! Fronts one upstream movie database (TMDB or OMDB), normalizes its payloads
//! into a single movie model and serves them over a cached, rate-limited REST
//! API.

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod middleware;
pub mod movies;
pub mod routes;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::RateLimiter;
use crate::movies::{MovieCache, MovieProvider, MovieService};

/// Shared application state available to all handlers via `State<Ctx>`
#[derive(Clone)]
pub struct Ctx {
    pub movies: Arc<MovieService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<AppConfig>,
}

impl Ctx {
    /// Build state around the provider selected by `config`
    pub fn new(config: AppConfig) -> movies::Result<Self> {
        let provider = movies::create_provider(&config.provider)?;
        Ok(Self::with_provider(config, provider))
    }

    /// Build state around an already constructed provider
    pub fn with_provider(config: AppConfig, provider: Arc<dyn MovieProvider>) -> Self {
        let cache = MovieCache::with_config(config.cache.clone());
        let rate_limiter = RateLimiter::new(config.rate_limit)
            .with_trust_proxy(config.server.trust_proxy);

        Self {
            movies: Arc::new(MovieService::new(provider, cache)),
            rate_limiter: Arc::new(rate_limiter),
            config: Arc::new(config),
        }
    }
}
