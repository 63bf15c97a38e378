use crate::movies::{
    Result,
    cache::{CacheKey, MovieCache},
    params::{DiscoverParams, MovieId, PageParams, SearchParams, TrendingParams},
    provider::MovieProvider,
    types::{Genre, MovieDetail, MovieSearchResult},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Serialize)]
struct DetailKey {
    id: String,
}

/// Movie operations, served from the cache and falling back to the provider.
///
/// Cache keys include the provider id, so switching providers never serves
/// another provider's payloads.
#[derive(Clone)]
pub struct MovieService {
    provider: Arc<dyn MovieProvider>,
    cache: MovieCache,
}

impl MovieService {
    pub fn new(provider: Arc<dyn MovieProvider>, cache: MovieCache) -> Self {
        Self { provider, cache }
    }

    /// Active provider id
    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    pub async fn search_movies(&self, params: &SearchParams) -> Result<MovieSearchResult> {
        info!("Searching movies: {:?} (page {})", params.query, params.page);

        let key = CacheKey::new(self.provider.id(), "search", params)?;
        self.cache
            .get_or_compute(&key, || self.provider.search_movies(params))
            .await
    }

    pub async fn get_movie_by_id(&self, id: &MovieId) -> Result<MovieDetail> {
        info!("Getting movie {}", id);

        let key = CacheKey::new(
            self.provider.id(),
            "detail",
            &DetailKey { id: id.to_string() },
        )?;
        self.cache
            .get_or_compute(&key, || self.provider.get_movie_by_id(id))
            .await
    }

    pub async fn get_popular_movies(&self, params: &PageParams) -> Result<MovieSearchResult> {
        info!("Getting popular movies (page {})", params.page);

        let key = CacheKey::new(self.provider.id(), "popular", params)?;
        self.cache
            .get_or_compute(&key, || self.provider.get_popular_movies(params))
            .await
    }

    pub async fn get_genres(&self) -> Result<Vec<Genre>> {
        info!("Getting genres");

        let key = CacheKey::operation(self.provider.id(), "genres");
        self.cache
            .get_or_compute(&key, || self.provider.get_genres())
            .await
    }

    pub async fn get_trending_movies(&self, params: &TrendingParams) -> Result<MovieSearchResult> {
        info!(
            "Getting trending movies ({}, page {})",
            params.time_window.as_str(),
            params.page
        );

        let key = CacheKey::new(self.provider.id(), "trending", params)?;
        self.cache
            .get_or_compute(&key, || self.provider.get_trending_movies(params))
            .await
    }

    pub async fn get_movies(&self, params: &DiscoverParams) -> Result<MovieSearchResult> {
        info!("Discovering movies: {:?}", params);

        let key = CacheKey::new(self.provider.id(), "discover", params)?;
        self.cache
            .get_or_compute(&key, || self.provider.get_movies(params))
            .await
    }
}
