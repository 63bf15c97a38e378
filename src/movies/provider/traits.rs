use crate::movies::{
    Result,
    params::{DiscoverParams, MovieId, PageParams, SearchParams, TrendingParams},
    types::{Genre, MovieDetail, MovieSearchResult},
};
use async_trait::async_trait;

/// Core trait for upstream movie databases.
///
/// Every implementation normalizes its upstream payloads into the shared
/// movie model. IDs are only meaningful within one provider.
#[async_trait]
pub trait MovieProvider: Send + Sync {
    /// Provider identifier (e.g., "tmdb", "omdb")
    fn id(&self) -> &'static str;

    /// Human-readable provider name
    fn name(&self) -> &'static str;

    /// Free-text search
    async fn search_movies(&self, params: &SearchParams) -> Result<MovieSearchResult>;

    /// Full details for one movie
    async fn get_movie_by_id(&self, id: &MovieId) -> Result<MovieDetail>;

    /// Popular movies
    async fn get_popular_movies(&self, params: &PageParams) -> Result<MovieSearchResult>;

    /// All known genres
    async fn get_genres(&self) -> Result<Vec<Genre>>;

    /// Trending movies for a time window
    async fn get_trending_movies(&self, params: &TrendingParams) -> Result<MovieSearchResult>;

    /// Filtered discovery
    async fn get_movies(&self, params: &DiscoverParams) -> Result<MovieSearchResult>;
}
