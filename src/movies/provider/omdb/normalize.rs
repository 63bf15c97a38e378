//! Mapping from OMDB's flat, stringly-typed payloads to the shared movie model.
//!
//! OMDB exposes no genre, company or country ids, so ids are synthesized from
//! list positions. They are stable for one payload only.

use super::api_types::{MovieDetails, SearchItem, SearchResponse};
use crate::movies::types::{
    Genre, Movie, MovieDetail, MovieSearchResult, ProductionCompany, ProductionCountry,
    SpokenLanguage,
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Results per OMDB search page
pub const PAGE_SIZE: u64 = 10;

static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("Invalid leading integer regex"));

/// Treat OMDB's "N/A" placeholder and blank strings as absent
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != "N/A")
}

fn owned(value: Option<&String>) -> Option<String> {
    present(value.map(String::as_str)).map(str::to_string)
}

/// `tt3896198` -> 3896198; anything unparsable -> 0
pub fn parse_imdb_id(imdb_id: Option<&str>) -> i64 {
    present(imdb_id)
        .and_then(|id| id.get(2..))
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// `136 min` -> 136
pub fn parse_runtime(runtime: Option<&str>) -> Option<u32> {
    let runtime = present(runtime)?;
    LEADING_INT
        .captures(runtime)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `$463,517,383` -> 463517383
pub fn parse_revenue(box_office: Option<&str>) -> u64 {
    digits(box_office)
}

/// `1,234,567` -> 1234567
pub fn parse_vote_count(votes: Option<&str>) -> u64 {
    digits(votes)
}

fn digits(value: Option<&str>) -> u64 {
    present(value)
        .map(|v| v.chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|d| d.parse().ok())
        .unwrap_or(0)
}

/// imdbRating, else Metascore scaled to 0-10, else 0
pub fn parse_vote_average(imdb_rating: Option<&str>, metascore: Option<&str>) -> f64 {
    if let Some(rating) = present(imdb_rating).and_then(|r| r.parse::<f64>().ok()) {
        return rating;
    }

    present(metascore)
        .and_then(|m| m.parse::<f64>().ok())
        .map_or(0.0, |m| m / 10.0)
}

/// Split a comma-joined list, trimming and dropping empty tokens
pub fn split_list(value: Option<&str>) -> Vec<String> {
    present(value)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// `31 Mar 1999` -> `1999-03-31`, falling back to the year text
pub fn release_date(released: Option<&str>, year: Option<&str>) -> String {
    present(released)
        .and_then(|r| NaiveDate::parse_from_str(r, "%d %b %Y").ok())
        .map(|d| d.format("%Y-%m-%d").to_string())
        .or_else(|| present(year).map(str::to_string))
        .unwrap_or_default()
}

fn position_id(index: usize) -> i64 {
    i64::try_from(index + 1).unwrap_or(i64::MAX)
}

pub fn to_genres<I, S>(names: I) -> Vec<Genre>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| Genre {
            id: position_id(i),
            name: name.into(),
        })
        .collect()
}

pub fn to_movie(item: SearchItem) -> Movie {
    let title = owned(item.title.as_ref()).unwrap_or_default();
    let mut movie = Movie::new(parse_imdb_id(item.imdb_id.as_deref()), title);
    movie.release_date = present(item.year.as_deref()).unwrap_or_default().to_string();
    movie.poster_path = owned(item.poster.as_ref());
    movie
}

pub fn to_listing(response: SearchResponse, page: u32) -> MovieSearchResult {
    let total_results = parse_vote_count(response.total_results.as_deref());
    let total_pages = u32::try_from(total_results.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX);

    MovieSearchResult {
        page: page.max(1),
        results: response
            .search
            .unwrap_or_default()
            .into_iter()
            .map(to_movie)
            .collect(),
        total_pages,
        total_results,
    }
}

pub fn to_detail(details: MovieDetails) -> MovieDetail {
    let genres = to_genres(split_list(details.genre.as_deref()));
    let vote_average =
        parse_vote_average(details.imdb_rating.as_deref(), details.metascore.as_deref());
    let vote_count = parse_vote_count(details.imdb_votes.as_deref());

    let title = owned(details.title.as_ref()).unwrap_or_default();
    let mut movie = Movie::new(parse_imdb_id(details.imdb_id.as_deref()), title);
    movie.overview = owned(details.plot.as_ref()).unwrap_or_default();
    movie.release_date = release_date(details.released.as_deref(), details.year.as_deref());
    movie.poster_path = owned(details.poster.as_ref());
    movie.vote_average = vote_average;
    movie.vote_count = vote_count;
    // OMDB has no popularity score
    movie.popularity = vote_average * vote_count as f64;
    movie.genre_ids = genres.iter().map(|g| g.id).collect();

    MovieDetail {
        movie,
        genres,
        runtime: parse_runtime(details.runtime.as_deref()),
        budget: 0,
        revenue: parse_revenue(details.box_office.as_deref()),
        homepage: owned(details.website.as_ref()),
        imdb_id: owned(details.imdb_id.as_ref()),
        production_companies: split_list(details.production.as_deref())
            .into_iter()
            .enumerate()
            .map(|(i, name)| ProductionCompany {
                id: position_id(i),
                name,
                logo_path: None,
                origin_country: String::new(),
            })
            .collect(),
        production_countries: split_list(details.country.as_deref())
            .into_iter()
            .map(|name| ProductionCountry {
                iso_3166_1: String::new(),
                name,
            })
            .collect(),
        spoken_languages: split_list(details.language.as_deref())
            .into_iter()
            .map(|name| SpokenLanguage {
                iso_639_1: String::new(),
                name,
            })
            .collect(),
        status: "Released".to_string(),
        tagline: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_imdb_id() {
        assert_eq!(parse_imdb_id(Some("tt3896198")), 3_896_198);
        assert_eq!(parse_imdb_id(Some("tt0133093")), 133_093);
        assert_eq!(parse_imdb_id(Some("abc")), 0);
        assert_eq!(parse_imdb_id(Some("N/A")), 0);
        assert_eq!(parse_imdb_id(None), 0);
    }

    #[test]
    fn test_parse_runtime() {
        assert_eq!(parse_runtime(Some("136 min")), Some(136));
        assert_eq!(parse_runtime(Some("N/A")), None);
        assert_eq!(parse_runtime(Some("")), None);
        assert_eq!(parse_runtime(Some("about an hour")), None);
    }

    #[test]
    fn test_parse_money_and_votes() {
        assert_eq!(parse_revenue(Some("$463,517,383")), 463_517_383);
        assert_eq!(parse_revenue(Some("N/A")), 0);
        assert_eq!(parse_vote_count(Some("2,041,453")), 2_041_453);
        assert_eq!(parse_vote_count(None), 0);
    }

    #[test]
    fn test_vote_average_falls_back_to_metascore() {
        assert_eq!(parse_vote_average(Some("8.7"), Some("73")), 8.7);
        assert_eq!(parse_vote_average(Some("N/A"), Some("73")), 7.3);
        assert_eq!(parse_vote_average(None, Some("N/A")), 0.0);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(Some("Action, Sci-Fi,, ")),
            vec!["Action".to_string(), "Sci-Fi".to_string()]
        );
        assert!(split_list(Some("N/A")).is_empty());
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_release_date() {
        assert_eq!(release_date(Some("31 Mar 1999"), Some("1999")), "1999-03-31");
        assert_eq!(release_date(Some("N/A"), Some("1999")), "1999");
        assert_eq!(release_date(None, None), "");
    }

    #[test]
    fn test_detail_mapping() {
        let payload = json!({
            "Title": "Guardians of the Galaxy Vol. 2",
            "Year": "2017",
            "Released": "05 May 2017",
            "Runtime": "136 min",
            "Genre": "Action, Adventure, Comedy",
            "Plot": "The Guardians struggle to keep together as a team.",
            "Language": "English",
            "Country": "United States",
            "Poster": "https://m.media-amazon.com/images/M/poster.jpg",
            "Metascore": "67",
            "imdbRating": "7.6",
            "imdbVotes": "1,000",
            "imdbID": "tt3896198",
            "Type": "movie",
            "BoxOffice": "$389,813,101",
            "Production": "Marvel Studios, Walt Disney Pictures",
            "Website": "N/A",
            "Response": "True"
        });

        let details: MovieDetails = serde_json::from_value(payload).unwrap();
        let detail = to_detail(details);

        assert_eq!(detail.movie.id, 3_896_198);
        assert_eq!(detail.movie.release_date, "2017-05-05");
        assert_eq!(detail.movie.vote_average, 7.6);
        assert_eq!(detail.movie.vote_count, 1000);
        assert!((detail.movie.popularity - 7600.0).abs() < 1e-6);
        assert_eq!(detail.movie.genre_ids, vec![1, 2, 3]);
        assert_eq!(detail.genres[2].name, "Comedy");
        assert_eq!(detail.runtime, Some(136));
        assert_eq!(detail.budget, 0);
        assert_eq!(detail.revenue, 389_813_101);
        assert!(detail.homepage.is_none());
        assert_eq!(detail.imdb_id.as_deref(), Some("tt3896198"));
        assert_eq!(detail.production_companies[1].id, 2);
        assert_eq!(detail.production_countries[0].name, "United States");
        assert_eq!(detail.production_countries[0].iso_3166_1, "");
        assert_eq!(detail.spoken_languages[0].iso_639_1, "");
        assert_eq!(detail.status, "Released");
        assert!(detail.tagline.is_none());
        assert!(detail.movie.backdrop_path.is_none());
    }

    #[test]
    fn test_sparse_detail_is_total() {
        let details: MovieDetails =
            serde_json::from_value(json!({"Title": "Obscure", "Response": "True"})).unwrap();
        let detail = to_detail(details);

        assert_eq!(detail.movie.id, 0);
        assert!(detail.genres.is_empty());
        assert!(detail.runtime.is_none());
        assert_eq!(detail.revenue, 0);
        assert_eq!(detail.movie.vote_average, 0.0);
        assert_eq!(detail.movie.release_date, "");
    }

    #[test]
    fn test_listing_pages() {
        let payload = json!({
            "Search": [
                {"Title": "The Matrix", "Year": "1999", "imdbID": "tt0133093", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "21",
            "Response": "True"
        });

        let response: SearchResponse = serde_json::from_value(payload).unwrap();
        let listing = to_listing(response, 1);

        assert_eq!(listing.total_results, 21);
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.results[0].id, 133_093);
        assert_eq!(listing.results[0].release_date, "1999");
        assert!(listing.results[0].poster_path.is_none());
    }
}
