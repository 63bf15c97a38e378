//! Mapping from TMDB payloads to the shared movie model.
//!
//! TMDB already speaks structured JSON, so this is mostly a field rename with
//! defaults for anything the upstream left out.

use super::api_types::{self, MovieDetails, MovieResult, PageResponse};
use crate::movies::types::{
    Genre, Movie, MovieDetail, MovieSearchResult, ProductionCompany, ProductionCountry,
    SpokenLanguage,
};

pub fn to_movie(movie: MovieResult) -> Movie {
    Movie {
        id: movie.id,
        title: movie.title.unwrap_or_default(),
        overview: movie.overview.unwrap_or_default(),
        release_date: movie.release_date.unwrap_or_default(),
        poster_path: movie.poster_path,
        backdrop_path: movie.backdrop_path,
        vote_average: movie.vote_average.unwrap_or_default(),
        vote_count: movie.vote_count.unwrap_or_default(),
        popularity: movie.popularity.unwrap_or_default(),
        original_language: movie.original_language.unwrap_or_default(),
        original_title: movie.original_title.unwrap_or_default(),
        genre_ids: movie.genre_ids.unwrap_or_default(),
        adult: movie.adult.unwrap_or(false),
        video: movie.video.unwrap_or(false),
    }
}

/// Convert one page, falling back to `requested_page` when TMDB omits it
pub fn to_listing(response: PageResponse<MovieResult>, requested_page: u32) -> MovieSearchResult {
    MovieSearchResult {
        page: response.page.unwrap_or(requested_page).max(1),
        results: response.results.into_iter().map(to_movie).collect(),
        total_pages: response.total_pages.unwrap_or_default(),
        total_results: response.total_results.unwrap_or_default(),
    }
}

pub fn to_genres(genres: Vec<api_types::Genre>) -> Vec<Genre> {
    genres
        .into_iter()
        .map(|g| Genre {
            id: g.id,
            name: g.name.unwrap_or_default(),
        })
        .collect()
}

pub fn to_detail(details: MovieDetails) -> MovieDetail {
    let genres = to_genres(details.genres.unwrap_or_default());

    let movie = Movie {
        id: details.id,
        title: details.title.unwrap_or_default(),
        overview: details.overview.unwrap_or_default(),
        release_date: details.release_date.unwrap_or_default(),
        poster_path: details.poster_path,
        backdrop_path: details.backdrop_path,
        vote_average: details.vote_average.unwrap_or_default(),
        vote_count: details.vote_count.unwrap_or_default(),
        popularity: details.popularity.unwrap_or_default(),
        original_language: details.original_language.unwrap_or_default(),
        original_title: details.original_title.unwrap_or_default(),
        // The detail payload carries full genres rather than genre_ids
        genre_ids: genres.iter().map(|g| g.id).collect(),
        adult: details.adult.unwrap_or(false),
        video: details.video.unwrap_or(false),
    };

    MovieDetail {
        movie,
        genres,
        runtime: details.runtime,
        budget: details.budget.unwrap_or_default(),
        revenue: details.revenue.unwrap_or_default(),
        homepage: details.homepage,
        imdb_id: details.imdb_id,
        production_companies: details
            .production_companies
            .unwrap_or_default()
            .into_iter()
            .map(|c| ProductionCompany {
                id: c.id,
                name: c.name.unwrap_or_default(),
                logo_path: c.logo_path,
                origin_country: c.origin_country.unwrap_or_default(),
            })
            .collect(),
        production_countries: details
            .production_countries
            .unwrap_or_default()
            .into_iter()
            .map(|c| ProductionCountry {
                iso_3166_1: c.iso_3166_1.unwrap_or_default(),
                name: c.name.unwrap_or_default(),
            })
            .collect(),
        spoken_languages: details
            .spoken_languages
            .unwrap_or_default()
            .into_iter()
            .map(|l| SpokenLanguage {
                iso_639_1: l.iso_639_1.unwrap_or_default(),
                name: l.name.unwrap_or_default(),
            })
            .collect(),
        status: details.status.unwrap_or_default(),
        tagline: details.tagline,
    }
}
