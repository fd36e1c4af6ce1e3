//! Configuration module for Listing-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every field has a default, so a crawl can also run entirely without
//! a configuration file.
//!
//! # Example
//!
//! ```no_run
//! use listing_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Request budget: {}", config.crawler.max_requests_per_crawl);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, ProxyConfig, SinkFormat, UserAgentConfig, DEFAULT_GLOBS,
    DEFAULT_SEED_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

// Re-export validation for callers constructing configs in code
pub use validation::validate;
