use std::sync::Arc;

use axum::{Router, middleware};

use crate::{Ctx, middleware::RateLimiter};

pub mod health;
pub mod movies;

/// Mount all API routes. Only the movie routes are rate limited.
pub fn mount(rate_limiter: Arc<RateLimiter>) -> Router<Ctx> {
    Router::new().merge(health::mount()).merge(
        movies::mount().route_layer(middleware::from_fn_with_state(
            rate_limiter,
            crate::middleware::rate_limit,
        )),
    )
}
