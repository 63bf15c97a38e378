mod http;
pub mod omdb;
pub mod tmdb;
mod traits;

pub use http::HttpClient;
pub use omdb::OmdbProvider;
pub use tmdb::TmdbProvider;
pub use traits::MovieProvider;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Upstream movie database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Tmdb,
    Omdb,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tmdb" => Ok(Self::Tmdb),
            "omdb" => Ok(Self::Omdb),
            other => Err(format!("unknown movie provider '{other}' (expected tmdb or omdb)")),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tmdb => write!(f, "tmdb"),
            Self::Omdb => write!(f, "omdb"),
        }
    }
}

/// Provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Which upstream to talk to
    pub kind: ProviderKind,
    /// API key, required by every provider
    pub api_key: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Upstream request timeout
    pub timeout: Duration,
    /// Search term backing listings the provider cannot serve natively
    pub seed_query: String,
}

impl ProviderConfig {
    /// Create new configuration
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: None,
            base_url: None,
            timeout: Duration::from_secs(10),
            seed_query: "movie".to_string(),
        }
    }

    /// Set API key
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The API key, or a configuration error naming `variable`
    pub(crate) fn require_api_key(&self, variable: &str) -> crate::movies::Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| crate::movies::MovieError::Config(format!("{variable} is required")))
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(ProviderKind::default())
    }
}
