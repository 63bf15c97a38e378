use serde::{Deserialize, Serialize};

/// A movie as it appears in listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Provider-assigned ID, not comparable across providers
    pub id: i64,
    pub title: String,
    pub overview: String,
    /// Release date (YYYY-MM-DD)
    pub release_date: String,
    /// Poster path or URL
    pub poster_path: Option<String>,
    /// Backdrop path or URL
    pub backdrop_path: Option<String>,
    /// Rating (0-10 scale)
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
    /// Original language code (ISO 639-1)
    pub original_language: String,
    pub original_title: String,
    pub genre_ids: Vec<i64>,
    pub adult: bool,
    pub video: bool,
}

impl Movie {
    /// Create a movie with the given ID and title and every other field empty
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id,
            original_title: title.clone(),
            title,
            overview: String::new(),
            release_date: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            original_language: String::new(),
            genre_ids: Vec::new(),
            adult: false,
            video: false,
        }
    }
}

/// Genre as exposed by the active provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

/// One page of a paginated movie listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSearchResult {
    /// Page number (1-indexed)
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}
