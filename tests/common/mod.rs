#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use nextflix::Ctx;
use nextflix::app::build_router;
use nextflix::config::AppConfig;

/// Build an `AppConfig` pointing the TMDB provider at `base_url`.
///
/// `overrides` are applied last, keyed like the environment variables.
pub fn test_config(base_url: &str, overrides: &[(&str, &str)]) -> AppConfig {
    let mut builder = config::Config::builder()
        .set_override("movie_provider", "tmdb")
        .unwrap()
        .set_override("tmdb_api_key", "test-key")
        .unwrap()
        .set_override("tmdb_base_url", base_url)
        .unwrap()
        .set_override("upstream_timeout_secs", "2")
        .unwrap();

    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }

    AppConfig::from_config(&builder.build().unwrap()).unwrap()
}

/// Build the full application router, the same one `main.rs` serves
pub fn build_test_app(config: AppConfig) -> Router {
    let ctx = Ctx::new(config).unwrap();
    build_router(ctx)
}

/// Send a GET request to the app
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
