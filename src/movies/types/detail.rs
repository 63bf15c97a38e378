use super::{Genre, Movie};
use serde::{Deserialize, Serialize};

/// Complete details for a single movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    /// Listing fields, serialized at the same level
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    /// Runtime in minutes
    pub runtime: Option<u32>,
    pub budget: u64,
    pub revenue: u64,
    pub homepage: Option<String>,
    pub imdb_id: Option<String>,
    pub production_companies: Vec<ProductionCompany>,
    pub production_countries: Vec<ProductionCountry>,
    pub spoken_languages: Vec<SpokenLanguage>,
    /// Lifecycle status (e.g., "Released", "In Production")
    pub status: String,
    pub tagline: Option<String>,
}

/// Production company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

/// Production country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 code, empty when the provider has none
    #[serde(rename = "iso31661")]
    pub iso_3166_1: String,
    pub name: String,
}

/// Spoken language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenLanguage {
    /// ISO 639-1 code, empty when the provider has none
    #[serde(rename = "iso6391")]
    pub iso_639_1: String,
    pub name: String,
}
