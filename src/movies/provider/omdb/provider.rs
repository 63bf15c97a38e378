use super::api_types::{MovieDetails, SearchResponse};
use super::normalize;
use crate::movies::{
    MovieError, Result,
    params::{DiscoverParams, MovieId, PageParams, SearchParams, SortBy, TrendingParams},
    provider::{HttpClient, MovieProvider, ProviderConfig},
    types::{Genre, MovieDetail, MovieSearchResult},
};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tracing::debug;

const OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// OMDB's genre vocabulary. OMDB has no genre endpoint.
const GENRES: [&str; 22] = [
    "Action",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film-Noir",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Sport",
    "Thriller",
    "War",
    "Western",
];

pub struct OmdbProvider {
    client: HttpClient,
    api_key: String,
    seed_query: String,
}

impl OmdbProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config.require_api_key("OMDB_API_KEY")?.to_string();
        let base_url = config.base_url.as_deref().unwrap_or(OMDB_BASE_URL);

        Ok(Self {
            client: HttpClient::new(base_url, config.timeout)?,
            api_key,
            seed_query: config.seed_query.clone(),
        })
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        mut params: Vec<(&str, String)>,
    ) -> Result<T> {
        params.push(("apikey", self.api_key.clone()));
        self.client.get_json("/", &params).await
    }

    async fn search(&self, query: &str, page: u32, year: Option<i32>) -> Result<MovieSearchResult> {
        let mut params = vec![
            ("s", query.to_string()),
            ("page", page.to_string()),
            ("type", "movie".to_string()),
        ];
        if let Some(year) = year {
            params.push(("y", year.to_string()));
        }

        let response: SearchResponse = self.request(params).await?;
        check_response(response.response.as_deref(), response.error.as_deref())?;

        Ok(normalize::to_listing(response, page))
    }
}

/// Classify OMDB's in-body failure signal (`"Response": "False"`)
fn check_response(response: Option<&str>, error: Option<&str>) -> Result<()> {
    if !response.is_some_and(|r| r.eq_ignore_ascii_case("false")) {
        return Ok(());
    }

    let message = error.unwrap_or("OMDB request failed").to_string();

    if message.to_lowercase().contains("not found") {
        return Err(MovieError::NotFound(message));
    }

    let status = if message == "Too many results." { 400 } else { 502 };
    Err(MovieError::Upstream { status, message })
}

#[async_trait]
impl MovieProvider for OmdbProvider {
    fn id(&self) -> &'static str {
        "omdb"
    }

    fn name(&self) -> &'static str {
        "Open Movie Database"
    }

    async fn search_movies(&self, params: &SearchParams) -> Result<MovieSearchResult> {
        self.search(&params.query, params.page, None).await
    }

    async fn get_movie_by_id(&self, id: &MovieId) -> Result<MovieDetail> {
        let imdb_id = match id {
            MovieId::Numeric(n) => format!("tt{n:07}"),
            MovieId::Imdb(imdb_id) => imdb_id.clone(),
        };

        let message = format!("Movie with ID {id} not found");

        let details: MovieDetails = self
            .request(vec![("i", imdb_id), ("plot", "full".to_string())])
            .await
            .map_err(|e| e.not_found_as(message.clone()))?;

        // Any in-body failure on a lookup means the id resolved to nothing
        if details
            .response
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("false"))
        {
            debug!(
                error = details.error.as_deref().unwrap_or_default(),
                "OMDB lookup for {id} failed"
            );
            return Err(MovieError::NotFound(message));
        }

        Ok(normalize::to_detail(details))
    }

    async fn get_popular_movies(&self, params: &PageParams) -> Result<MovieSearchResult> {
        self.search(&self.seed_query, params.page, None).await
    }

    async fn get_genres(&self) -> Result<Vec<Genre>> {
        Ok(normalize::to_genres(GENRES))
    }

    async fn get_trending_movies(&self, params: &TrendingParams) -> Result<MovieSearchResult> {
        // No trending feed; approximate with this year's releases
        let year = Utc::now().year();
        self.search(&self.seed_query, params.page, Some(year)).await
    }

    async fn get_movies(&self, params: &DiscoverParams) -> Result<MovieSearchResult> {
        if params.with_genres.is_some() || params.vote_average_gte.is_some() {
            debug!("OMDB search results carry no genres or ratings; ignoring those filters");
        }

        let mut listing = self.search(&self.seed_query, params.page, params.year).await?;

        match params.sort_by {
            Some(SortBy::ReleaseDateAsc) => listing
                .results
                .sort_by(|a, b| a.release_date.cmp(&b.release_date)),
            Some(SortBy::ReleaseDateDesc) => listing
                .results
                .sort_by(|a, b| b.release_date.cmp(&a.release_date)),
            _ => {}
        }

        Ok(listing)
    }
}
