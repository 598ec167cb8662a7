//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Posting configuration.
    #[serde(default)]
    pub posting: PostingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Posting subsystem configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// TTL for the chart-of-accounts lookup cache, in seconds.
    ///
    /// Kept short: a stale "disabled" flag gates financial correctness.
    #[serde(default = "default_account_cache_ttl_secs")]
    pub account_cache_ttl_secs: u64,
    /// Prefix for generated journal numbers (e.g. "JRN-2026-000123").
    #[serde(default = "default_journal_number_prefix")]
    pub journal_number_prefix: String,
}

fn default_account_cache_ttl_secs() -> u64 {
    5
}

fn default_journal_number_prefix() -> String {
    "JRN".to_string()
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            account_cache_ttl_secs: default_account_cache_ttl_secs(),
            journal_number_prefix: default_journal_number_prefix(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KEEL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
