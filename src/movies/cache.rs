use crate::movies::{
    MovieError, Result,
    types::{Genre, MovieDetail, MovieSearchResult},
};
use moka::{future::Cache, policy::EvictionPolicy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Cache key derived from the operation name and its full parameter set.
///
/// Parameters are serialized as a JSON object with sorted keys, so two
/// logically identical requests always produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key for an operation taking parameters
    pub fn new<P: Serialize>(provider: &str, operation: &str, params: &P) -> Result<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| MovieError::Cache(format!("Unable to serialize cache key: {e}")))?;

        let canonical = match value {
            serde_json::Value::Object(map) => {
                let sorted: BTreeMap<String, serde_json::Value> = map.into_iter().collect();
                serde_json::to_string(&sorted)
            }
            other => serde_json::to_string(&other),
        }
        .map_err(|e| MovieError::Cache(format!("Unable to serialize cache key: {e}")))?;

        Ok(Self(format!("movies:{provider}:{operation}:{canonical}")))
    }

    /// Build a key for an operation without parameters
    pub fn operation(provider: &str, operation: &str) -> Self {
        Self(format!("movies:{provider}:{operation}:{{}}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored value
#[derive(Debug, Clone)]
pub enum CachedEntry {
    Listing(Arc<MovieSearchResult>),
    Detail(Arc<MovieDetail>),
    Genres(Arc<Vec<Genre>>),
}

/// Values that can live in the movie cache
pub trait Cacheable: Clone + Send + Sync + 'static {
    fn into_entry(self) -> CachedEntry;
    fn from_entry(entry: &CachedEntry) -> Option<Self>;
}

impl Cacheable for MovieSearchResult {
    fn into_entry(self) -> CachedEntry {
        CachedEntry::Listing(Arc::new(self))
    }

    fn from_entry(entry: &CachedEntry) -> Option<Self> {
        match entry {
            CachedEntry::Listing(v) => Some((**v).clone()),
            _ => None,
        }
    }
}

impl Cacheable for MovieDetail {
    fn into_entry(self) -> CachedEntry {
        CachedEntry::Detail(Arc::new(self))
    }

    fn from_entry(entry: &CachedEntry) -> Option<Self> {
        match entry {
            CachedEntry::Detail(v) => Some((**v).clone()),
            _ => None,
        }
    }
}

impl Cacheable for Vec<Genre> {
    fn into_entry(self) -> CachedEntry {
        CachedEntry::Genres(Arc::new(self))
    }

    fn from_entry(entry: &CachedEntry) -> Option<Self> {
        match entry {
            CachedEntry::Genres(v) => Some((**v).clone()),
            _ => None,
        }
    }
}

/// Read-through cache for normalized provider responses
#[derive(Clone)]
pub struct MovieCache {
    entries: Cache<String, CachedEntry>,
}

impl MovieCache {
    /// Create a new cache with default settings
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a new cache with custom configuration
    pub fn with_config(config: CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self { entries }
    }

    /// Return the cached value for `key`, or run `compute`, store and return its result.
    ///
    /// Concurrent misses on the same key share one `compute` call. Errors are
    /// returned to every waiter and never stored.
    pub async fn get_or_compute<T, F, Fut>(&self, key: &CacheKey, compute: F) -> Result<T>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(entry) = self.entries.get(key.as_str()).await
            && let Some(value) = T::from_entry(&entry)
        {
            debug!("Cache hit: {}", key);
            return Ok(value);
        }

        debug!("Cache miss: {}", key);
        let entry = self
            .entries
            .try_get_with(key.as_str().to_string(), async move {
                compute().await.map(Cacheable::into_entry)
            })
            .await
            .map_err(Arc::unwrap_or_clone)?;

        T::from_entry(&entry)
            .ok_or_else(|| MovieError::Cache(format!("Unexpected entry type for key {key}")))
    }

    /// Number of live entries, after pending maintenance has run
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for MovieCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: u64,
    /// Time to live for every entry
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}
