use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    Ctx,
    error::{AppError, AppResult},
    extract::ValidQuery,
    movies::{
        DiscoverParams, Genre, MovieDetail, MovieId, MovieSearchResult, PageParams, SearchParams,
        SortBy, TimeWindow, TrendingParams,
    },
};

const fn first_page() -> u32 {
    1
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("not_blank");
        err.message = Some("query should not be empty".into());
        return Err(err);
    }
    Ok(())
}

fn genre_ids(value: &str) -> Result<(), ValidationError> {
    let valid = value.split(',').map(str::trim).all(|id| {
        !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) && id.parse::<i64>().is_ok()
    });

    if !valid {
        let mut err = ValidationError::new("genre_ids");
        err.message = Some("withGenres must be a comma-separated list of genre ids".into());
        return Err(err);
    }
    Ok(())
}

/// NaN and infinities compare false against any bound
fn finite(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        let mut err = ValidationError::new("finite");
        err.message = Some("voteAverageGte must be a finite number".into());
        return Err(err);
    }
    Ok(())
}

/// GET /movies/search
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SearchQuery {
    #[validate(custom(function = "not_blank"))]
    pub query: String,
    #[serde(default = "first_page")]
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: u32,
}

/// GET /movies/popular
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: u32,
}

/// GET /movies/trending
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TrendingQuery {
    #[serde(default = "first_page")]
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: u32,
    #[serde(default)]
    pub time_window: TimeWindow,
}

/// GET /movies
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DiscoverQuery {
    #[serde(default = "first_page")]
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: u32,
    pub sort_by: Option<SortBy>,
    /// Comma-separated genre ids
    #[validate(custom(function = "genre_ids"))]
    pub with_genres: Option<String>,
    #[validate(range(min = 1900, message = "year must not be less than 1900"))]
    pub year: Option<i32>,
    #[validate(
        custom(function = "finite"),
        range(min = 0.0, message = "voteAverageGte must not be less than 0")
    )]
    pub vote_average_gte: Option<f64>,
}

impl From<DiscoverQuery> for DiscoverParams {
    fn from(query: DiscoverQuery) -> Self {
        let with_genres = query.with_genres.map(|genres| {
            genres
                .split(',')
                .filter_map(|g| g.trim().parse().ok())
                .collect()
        });

        Self {
            page: query.page,
            sort_by: query.sort_by,
            with_genres,
            year: query.year,
            vote_average_gte: query.vote_average_gte,
        }
    }
}

// ============ Handlers ============

async fn search_movies(
    State(ctx): State<Ctx>,
    ValidQuery(query): ValidQuery<SearchQuery>,
) -> AppResult<Json<MovieSearchResult>> {
    let params = SearchParams {
        query: query.query.trim().to_string(),
        page: query.page,
    };

    Ok(Json(ctx.movies.search_movies(&params).await?))
}

async fn get_popular_movies(
    State(ctx): State<Ctx>,
    ValidQuery(query): ValidQuery<PageQuery>,
) -> AppResult<Json<MovieSearchResult>> {
    let params = PageParams { page: query.page };
    Ok(Json(ctx.movies.get_popular_movies(&params).await?))
}

async fn get_movies(
    State(ctx): State<Ctx>,
    ValidQuery(query): ValidQuery<DiscoverQuery>,
) -> AppResult<Json<MovieSearchResult>> {
    let params = DiscoverParams::from(query);
    Ok(Json(ctx.movies.get_movies(&params).await?))
}

async fn get_genres(State(ctx): State<Ctx>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(ctx.movies.get_genres().await?))
}

async fn get_trending_movies(
    State(ctx): State<Ctx>,
    ValidQuery(query): ValidQuery<TrendingQuery>,
) -> AppResult<Json<MovieSearchResult>> {
    let params = TrendingParams {
        page: query.page,
        time_window: query.time_window,
    };
    Ok(Json(ctx.movies.get_trending_movies(&params).await?))
}

async fn get_movie_by_id(
    State(ctx): State<Ctx>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieDetail>> {
    let id: MovieId = id.parse().map_err(AppError::Validation)?;
    Ok(Json(ctx.movies.get_movie_by_id(&id).await?))
}

/// Movie routes, relative to the API prefix
pub fn mount() -> Router<Ctx> {
    Router::new()
        .route("/movies", get(get_movies))
        .route("/movies/search", get(search_movies))
        .route("/movies/popular", get(get_popular_movies))
        .route("/movies/genres", get(get_genres))
        .route("/movies/trending", get(get_trending_movies))
        .route("/movies/{id}", get(get_movie_by_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Query, rejection::QueryRejection};
    use axum::http::Uri;

    fn parse<T: serde::de::DeserializeOwned>(query: &str) -> Result<T, QueryRejection> {
        let uri: Uri = format!("/movies?{query}").parse().unwrap();
        Query::try_from_uri(&uri).map(|Query(value)| value)
    }

    #[test]
    fn test_search_query_defaults_page() {
        let query: SearchQuery = parse("query=The+Matrix").unwrap();
        assert_eq!(query.query, "The Matrix");
        assert_eq!(query.page, 1);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_search_query_rejects_blank_and_zero_page() {
        let query: SearchQuery = parse("query=%20%20&page=0").unwrap();
        let err = AppError::from(query.validate().unwrap_err());

        assert_eq!(
            err.to_string(),
            "page must not be less than 1, query should not be empty"
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(parse::<PageQuery>("page=1&foo=bar").is_err());
        assert!(parse::<SearchQuery>("page=1").is_err());
    }

    #[test]
    fn test_discover_query() {
        let query: DiscoverQuery =
            parse("sortBy=vote_average.desc&withGenres=28,%2012&year=1999&voteAverageGte=7.5")
                .unwrap();
        assert!(query.validate().is_ok());

        let params = DiscoverParams::from(query);
        assert_eq!(params.sort_by, Some(SortBy::VoteAverageDesc));
        assert_eq!(params.with_genres, Some(vec![28, 12]));
        assert_eq!(params.year, Some(1999));
        assert_eq!(params.vote_average_gte, Some(7.5));
    }

    #[test]
    fn test_discover_query_bounds() {
        assert!(parse::<DiscoverQuery>("sortBy=title.asc").is_err());

        let query: DiscoverQuery = parse("year=1899").unwrap();
        assert!(query.validate().is_err());

        let query: DiscoverQuery = parse("voteAverageGte=-1").unwrap();
        assert!(query.validate().is_err());

        let query: DiscoverQuery = parse("withGenres=action").unwrap();
        assert!(query.validate().is_err());

        let query: DiscoverQuery = parse("withGenres=28,,12").unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_genre_ids_must_fit() {
        let query: DiscoverQuery = parse("withGenres=99999999999999999999").unwrap();
        let err = AppError::from(query.validate().unwrap_err());
        assert_eq!(
            err.to_string(),
            "withGenres must be a comma-separated list of genre ids"
        );

        let query: DiscoverQuery = parse("withGenres=%2B28").unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_vote_average_must_be_finite() {
        for value in ["NaN", "inf", "-inf"] {
            let query: DiscoverQuery = parse(&format!("voteAverageGte={value}")).unwrap();
            assert!(query.validate().is_err(), "{value}");
        }

        let query: DiscoverQuery = parse("voteAverageGte=0").unwrap();
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_trending_query() {
        let query: TrendingQuery = parse("").unwrap();
        assert_eq!(query.time_window, TimeWindow::Day);

        let query: TrendingQuery = parse("timeWindow=week&page=3").unwrap();
        assert_eq!(query.time_window, TimeWindow::Week);
        assert_eq!(query.page, 3);

        assert!(parse::<TrendingQuery>("timeWindow=month").is_err());
    }
}
