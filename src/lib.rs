//! Living-Wage: a polite scraper for per-area cost-of-living tables
//!
//! This crate discovers every county and metro area listed on a state index
//! page, fetches each area's detail page through a persistent fetch cache,
//! parses the positional wage and expense tables into complete household
//! grids, and stores the result in SQLite for later queries.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod storage;

use thiserror::Error;

/// Main error type for Living-Wage operations
#[derive(Debug, Error)]
pub enum LivingWageError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Extraction error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LivingWageError {
    /// Returns true if the error came from obtaining a page body
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::HttpStatus { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Living-Wage operations
pub type Result<T> = std::result::Result<T, LivingWageError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::FetchCache;
pub use config::Config;
pub use crawler::{AreaIndex, Coordinator, PoliteFetcher};
pub use model::{
    AreaExpenseProfile, AreaKind, AreaWageProfile, ChildCount, Currency, HouseholdComposition,
    ResolvedArea,
};
