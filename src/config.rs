use serde::Deserialize;

/// Deployment environment, controls how much error detail reaches clients
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    #[default]
    Production,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Language requested from TMDB
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Google generative AI key; recommendations and feedback analysis are disabled without it
    #[serde(default)]
    pub google_ai_key: Option<String>,

    /// Generative model endpoint
    #[serde(default = "default_google_ai_url")]
    pub google_ai_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub app_env: AppEnv,

    /// Lifetime of cached search results, in seconds
    #[serde(default = "default_search_cache_ttl")]
    pub search_cache_ttl_secs: u64,

    /// Lifetime of cached detail records, in seconds
    #[serde(default = "default_details_cache_ttl")]
    pub details_cache_ttl_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_google_ai_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_search_cache_ttl() -> u64 {
    300
}

fn default_details_cache_ttl() -> u64 {
    1800
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Whether internal error details may be echoed to clients
    pub fn expose_error_details(&self) -> bool {
        self.app_env == AppEnv::Development
    }
}
