use serde::Deserialize;

// Paginated listings (search, popular, trending, discover)
#[derive(Debug, Deserialize)]
pub struct PageResponse<T> {
    #[serde(default)]
    pub results: Vec<T>,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieResult {
    pub id: i64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub popularity: Option<f64>,
    pub original_language: Option<String>,
    pub genre_ids: Option<Vec<i64>>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
}

// Detail response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    pub id: i64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub popularity: Option<f64>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub adult: Option<bool>,
    pub video: Option<bool>,
    pub genres: Option<Vec<Genre>>,
    pub production_companies: Option<Vec<Company>>,
    pub production_countries: Option<Vec<Country>>,
    pub spoken_languages: Option<Vec<Language>>,
}

// Common types
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Genre {
    pub id: i64,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Company {
    pub id: i64,
    pub name: Option<String>,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Country {
    pub iso_3166_1: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Language {
    pub iso_639_1: Option<String>,
    pub name: Option<String>,
}

// Find by external ID
#[derive(Debug, Deserialize)]
pub struct FindResponse {
    #[serde(default)]
    pub movie_results: Vec<MovieResult>,
}
