use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::movies::{CacheConfig, ProviderConfig, ProviderKind};

/// Flat view of every recognised key, as read from `config.toml` and the
/// environment (environment wins). Keys are the lowercased variable names.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    movie_provider: String,
    tmdb_api_key: Option<String>,
    omdb_api_key: Option<String>,
    tmdb_base_url: Option<String>,
    omdb_base_url: Option<String>,
    omdb_seed_query: String,
    upstream_timeout_secs: u64,
    api_prefix: String,
    host: String,
    port: u16,
    cache_ttl: u64,
    cache_max_entries: u64,
    throttle_ttl: u64,
    throttle_limit: u32,
    trust_proxy: bool,
    log_level: String,
    log_format: String,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            movie_provider: "tmdb".to_string(),
            tmdb_api_key: None,
            omdb_api_key: None,
            tmdb_base_url: None,
            omdb_base_url: None,
            omdb_seed_query: "movie".to_string(),
            upstream_timeout_secs: 10,
            api_prefix: "api".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            cache_ttl: 300,
            cache_max_entries: 1000,
            throttle_ttl: 60,
            throttle_limit: 20,
            trust_proxy: false,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route prefix without surrounding slashes; empty mounts at the root
    pub api_prefix: String,
    /// Identify clients by the first `X-Forwarded-For` entry
    pub trust_proxy: bool,
}

impl ServerConfig {
    /// `/api`, or `` when no prefix is configured
    pub fn base_path(&self) -> String {
        if self.api_prefix.is_empty() {
            String::new()
        } else {
            format!("/{}", self.api_prefix)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests allowed per window; 0 disables limiting
    pub limit: u32,
    pub window: Duration,
}

impl RateLimitConfig {
    pub const fn enabled(&self) -> bool {
        self.limit > 0 && !self.window.is_zero()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl AppConfig {
    /// Load from an optional `config.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        Self::from_config(&source)
    }

    pub fn from_config(source: &Config) -> Result<Self, ConfigError> {
        let raw: RawConfig = source.clone().try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let kind: ProviderKind = raw.movie_provider.parse().map_err(ConfigError::Message)?;

        let (api_key, base_url) = match kind {
            ProviderKind::Tmdb => (raw.tmdb_api_key, raw.tmdb_base_url),
            ProviderKind::Omdb => (raw.omdb_api_key, raw.omdb_base_url),
        };

        let mut provider = ProviderConfig::new(kind)
            .with_timeout(Duration::from_secs(raw.upstream_timeout_secs));
        provider.api_key = api_key.filter(|k| !k.trim().is_empty());
        provider.base_url = base_url.filter(|u| !u.trim().is_empty());
        if !raw.omdb_seed_query.trim().is_empty() {
            provider.seed_query = raw.omdb_seed_query.trim().to_string();
        }

        let format = match raw.log_format.trim().to_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Message(format!(
                    "unknown LOG_FORMAT '{other}' (expected pretty or json)"
                )));
            }
        };

        if raw.cache_max_entries == 0 {
            return Err(ConfigError::Message(
                "CACHE_MAX_ENTRIES must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            server: ServerConfig {
                host: raw.host,
                port: raw.port,
                api_prefix: raw.api_prefix.trim().trim_matches('/').to_string(),
                trust_proxy: raw.trust_proxy,
            },
            provider,
            cache: CacheConfig {
                max_entries: raw.cache_max_entries,
                ttl: Duration::from_secs(raw.cache_ttl),
            },
            rate_limit: RateLimitConfig {
                limit: raw.throttle_limit,
                window: Duration::from_secs(raw.throttle_ttl),
            },
            log: LogConfig {
                level: raw.log_level,
                format,
            },
        })
    }
}
