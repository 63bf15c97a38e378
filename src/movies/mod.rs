mod cache;
mod params;
mod provider;
mod service;
mod types;


pub use cache::{CacheConfig, CacheKey, MovieCache};
pub use params::{DiscoverParams, MovieId, PageParams, SearchParams, SortBy, TimeWindow, TrendingParams};
pub use provider::{
    HttpClient, MovieProvider, OmdbProvider, ProviderConfig, ProviderKind, TmdbProvider,
};
pub use service::MovieService;
pub use types::{
    Genre, Movie, MovieDetail, MovieSearchResult, ProductionCompany, ProductionCountry,
    SpokenLanguage,
};

use std::sync::Arc;

/// Movie module result type
pub type Result<T> = std::result::Result<T, MovieError>;

/// Errors raised while talking to the upstream provider.
///
/// Cloneable so that requests coalesced on a single cache miss can all
/// receive the same failure.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MovieError {
    #[error("{0}")]
    NotFound(String),

    #[error("Upstream API error: {status} - {message}")]
    Upstream { status: u16, message: String },

    #[error("Upstream unavailable: {message}")]
    Unavailable { message: String, timed_out: bool },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MovieError {
    /// Replace the message of a `NotFound` error, leaving other kinds untouched.
    #[must_use]
    pub fn not_found_as(self, message: impl Into<String>) -> Self {
        match self {
            Self::NotFound(_) => Self::NotFound(message.into()),
            other => other,
        }
    }
}

/// Build the provider selected by configuration.
///
/// Fails when the provider's API key is missing.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn MovieProvider>> {
    let provider: Arc<dyn MovieProvider> = match config.kind {
        ProviderKind::Tmdb => Arc::new(TmdbProvider::new(config)?),
        ProviderKind::Omdb => Arc::new(OmdbProvider::new(config)?),
    };

    tracing::info!(provider = provider.id(), "Using {}", provider.name());
    Ok(provider)
}
