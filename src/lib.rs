//! Listing-Harvester: a focused listing crawler
//!
//! This crate implements a bounded web crawler that discovers listing pages
//! through glob-filtered link following, classifies detail pages by URL shape,
//! and extracts structured records through prioritized strategy chains.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod frontier;
pub mod sink;
pub mod url;

use thiserror::Error;

/// Main error type for Listing-Harvester operations
#[derive(Debug, Error)]
pub enum HarvesterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Error raised by a single extraction strategy
///
/// These never escape the extraction engine: a failing strategy is logged
/// as a warning and the chain moves on to the next one.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Errors raised by a record sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write record: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Listing-Harvester operations
pub type Result<T> = std::result::Result<T, HarvesterError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{ExtractedRecord, Extractor};
pub use frontier::{CrawlRequest, Frontier};
pub use url::{is_detail_page, normalize_url, GlobSet};
