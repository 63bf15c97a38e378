use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier accepted by the detail lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovieId {
    /// Numeric provider ID (>= 1)
    Numeric(u64),
    /// IMDb ID such as `tt3896198`
    Imdb(String),
}

impl FromStr for MovieId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let is_digits = |v: &str| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit());

        if is_digits(s) {
            return match s.parse::<u64>() {
                Ok(0) => Err("id must not be less than 1".to_string()),
                Ok(id) => Ok(Self::Numeric(id)),
                Err(_) => Err(format!("id {s} is out of range")),
            };
        }

        match s.strip_prefix("tt") {
            Some(rest) if is_digits(rest) => Ok(Self::Imdb(s.to_string())),
            _ => Err(format!(
                "id must be a positive integer or an IMDb id (tt1234567), got '{s}'"
            )),
        }
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Imdb(id) => f.write_str(id),
        }
    }
}

/// Sort orders supported by discovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "popularity.asc")]
    PopularityAsc,
    #[serde(rename = "popularity.desc")]
    PopularityDesc,
    #[serde(rename = "release_date.asc")]
    ReleaseDateAsc,
    #[serde(rename = "release_date.desc")]
    ReleaseDateDesc,
    #[serde(rename = "vote_average.asc")]
    VoteAverageAsc,
    #[serde(rename = "vote_average.desc")]
    VoteAverageDesc,
    #[serde(rename = "vote_count.asc")]
    VoteCountAsc,
    #[serde(rename = "vote_count.desc")]
    VoteCountDesc,
}

impl SortBy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PopularityAsc => "popularity.asc",
            Self::PopularityDesc => "popularity.desc",
            Self::ReleaseDateAsc => "release_date.asc",
            Self::ReleaseDateDesc => "release_date.desc",
            Self::VoteAverageAsc => "vote_average.asc",
            Self::VoteAverageDesc => "vote_average.desc",
            Self::VoteCountAsc => "vote_count.asc",
            Self::VoteCountDesc => "vote_count.desc",
        }
    }
}

/// Trending time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

/// Free-text search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParams {
    pub query: String,
    pub page: u32,
}

/// Plain paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageParams {
    pub page: u32,
}

/// Trending listing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingParams {
    pub page: u32,
    pub time_window: TimeWindow,
}

/// Filtered discovery
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverParams {
    pub page: u32,
    pub sort_by: Option<SortBy>,
    pub with_genres: Option<Vec<i64>>,
    pub year: Option<i32>,
    pub vote_average_gte: Option<f64>,
}

impl DiscoverParams {
    /// Discovery with no filters
    pub const fn page(page: u32) -> Self {
        Self {
            page,
            sort_by: None,
            with_genres: None,
            year: None,
            vote_average_gte: None,
        }
    }
}
