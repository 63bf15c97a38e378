use super::api_types::{FindResponse, GenreList, MovieDetails, MovieResult, PageResponse};
use super::normalize;
use crate::movies::{
    MovieError, Result,
    params::{DiscoverParams, MovieId, PageParams, SearchParams, TrendingParams},
    provider::{HttpClient, MovieProvider, ProviderConfig},
    types::{Genre, MovieDetail, MovieSearchResult},
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

pub struct TmdbProvider {
    client: HttpClient,
}

impl TmdbProvider {
    /// Create a provider authenticating with `config.api_key` as a bearer token
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.require_api_key("TMDB_API_KEY")?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| MovieError::Config("TMDB_API_KEY contains invalid characters".into()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let base_url = config.base_url.as_deref().unwrap_or(TMDB_BASE_URL);
        let client = HttpClient::with_headers(base_url, config.timeout, headers)?;

        Ok(Self { client })
    }

    async fn listing(
        &self,
        endpoint: &str,
        page: u32,
        mut params: Vec<(&str, String)>,
    ) -> Result<MovieSearchResult> {
        params.push(("page", page.to_string()));
        let response: PageResponse<MovieResult> = self.client.get_json(endpoint, &params).await?;
        Ok(normalize::to_listing(response, page))
    }

    /// Resolve an IMDb ID to the TMDB numeric ID
    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<i64> {
        let endpoint = format!("/find/{imdb_id}");
        let response: FindResponse = self
            .client
            .get_json(&endpoint, &[("external_source", "imdb_id".to_string())])
            .await?;

        response
            .movie_results
            .first()
            .map(|m| m.id)
            .ok_or_else(|| MovieError::NotFound(format!("No TMDB movie for {imdb_id}")))
    }
}

#[async_trait]
impl MovieProvider for TmdbProvider {
    fn id(&self) -> &'static str {
        "tmdb"
    }

    fn name(&self) -> &'static str {
        "The Movie Database"
    }

    async fn search_movies(&self, params: &SearchParams) -> Result<MovieSearchResult> {
        self.listing(
            "/search/movie",
            params.page,
            vec![("query", params.query.clone())],
        )
        .await
    }

    async fn get_movie_by_id(&self, id: &MovieId) -> Result<MovieDetail> {
        let tmdb_id = match id {
            MovieId::Numeric(n) => i64::try_from(*n)
                .map_err(|_| MovieError::NotFound(format!("Movie with ID {id} not found")))?,
            MovieId::Imdb(imdb_id) => {
                let resolved = self
                    .find_by_imdb_id(imdb_id)
                    .await
                    .map_err(|e| e.not_found_as(format!("Movie with ID {id} not found")))?;
                debug!("Resolved {} to TMDB ID {}", imdb_id, resolved);
                resolved
            }
        };

        let endpoint = format!("/movie/{tmdb_id}");
        let details: MovieDetails = self
            .client
            .get_json(&endpoint, &[])
            .await
            .map_err(|e| e.not_found_as(format!("Movie with ID {id} not found")))?;

        Ok(normalize::to_detail(details))
    }

    async fn get_popular_movies(&self, params: &PageParams) -> Result<MovieSearchResult> {
        self.listing("/movie/popular", params.page, Vec::new()).await
    }

    async fn get_genres(&self) -> Result<Vec<Genre>> {
        let list: GenreList = self.client.get_json("/genre/movie/list", &[]).await?;
        Ok(normalize::to_genres(list.genres))
    }

    async fn get_trending_movies(&self, params: &TrendingParams) -> Result<MovieSearchResult> {
        let endpoint = format!("/trending/movie/{}", params.time_window.as_str());
        self.listing(&endpoint, params.page, Vec::new()).await
    }

    async fn get_movies(&self, params: &DiscoverParams) -> Result<MovieSearchResult> {
        let mut query = Vec::new();

        if let Some(sort_by) = params.sort_by {
            query.push(("sort_by", sort_by.as_str().to_string()));
        }
        if let Some(genres) = params.with_genres.as_ref().filter(|g| !g.is_empty()) {
            let joined = genres
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            query.push(("with_genres", joined));
        }
        if let Some(year) = params.year {
            query.push(("year", year.to_string()));
        }
        if let Some(min) = params.vote_average_gte {
            query.push(("vote_average.gte", min.to_string()));
        }

        self.listing("/discover/movie", params.page, query).await
    }
}
