use serde::Deserialize;

use crate::services::recommendations::RecommendOptions;

/// Where cached catalog responses live
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map with lazy expiry
    #[default]
    Memory,
    /// Shared Redis instance
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite connection URL for the favorites table
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Cache backend selection
    #[serde(default)]
    pub cache_backend: CacheBackend,

    /// Redis connection URL, only read when `cache_backend` is `redis`
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Lifetime of cached catalog responses
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// TMDB v3 API key
    #[serde(alias = "tmdb_key")]
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Country whose streaming providers are reported with title details
    #[serde(default = "default_watch_region")]
    pub watch_region: String,

    /// Upstream pages fetched in parallel per recommendation page
    #[serde(default = "default_recommend_fanout")]
    pub recommend_fanout: u32,

    /// Upper bound for the random page picked when the client sends none
    #[serde(default = "default_random_page_max")]
    pub random_page_max: u32,

    /// Minimum vote count for discover results
    #[serde(default = "default_min_vote_count")]
    pub min_vote_count: u32,

    /// `k` in the ranking score `vote_average * ln(vote_count + k)`
    #[serde(default = "default_score_k")]
    pub score_k: f64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_database_url() -> String {
    "sqlite://favorites.db".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_watch_region() -> String {
    "IN".to_string()
}

fn default_recommend_fanout() -> u32 {
    3
}

fn default_random_page_max() -> u32 {
    20
}

fn default_min_vote_count() -> u32 {
    100
}

fn default_score_k() -> f64 {
    1.0
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();
        // TMDB_KEY only applies when TMDB_API_KEY is unset
        let has_primary_key = vars
            .iter()
            .any(|(name, _)| name.eq_ignore_ascii_case("tmdb_api_key"));
        let vars = vars
            .into_iter()
            .filter(|(name, _)| !(has_primary_key && name.eq_ignore_ascii_case("tmdb_key")));

        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if config.tmdb_api_key.trim().is_empty() {
            anyhow::bail!("Failed to load config: TMDB_API_KEY is empty");
        }
        if config.recommend_fanout == 0 {
            anyhow::bail!("Failed to load config: RECOMMEND_FANOUT must be at least 1");
        }

        Ok(config)
    }

    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            fanout: self.recommend_fanout,
            random_page_max: self.random_page_max.max(1),
            min_vote_count: self.min_vote_count,
            score_k: self.score_k,
        }
    }
}
