//! Crawler module for page fetching and processing
//!
//! This module contains the crawling machinery:
//! - HTTP fetching through a rotating proxy pool
//! - The queryable page document and link discovery
//! - Crawl orchestration over a bounded worker pool

mod coordinator;
mod fetcher;
mod page;
mod proxy;

pub use coordinator::{Coordinator, CrawlStats};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use page::PageDocument;
pub use proxy::ProxyPool;

use crate::config::Config;
use crate::sink::build_sink;
use crate::HarvesterError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the record sink named by the output configuration
/// 2. Compile glob rules and build the proxy pool
/// 3. Seed the frontier with the configured start URLs
/// 4. Process the frontier with a bounded worker pool until it drains or
///    the request budget is spent
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(())` - Crawl completed (possibly with per-page failures, which are
///   logged and do not fail the crawl)
/// * `Err(HarvesterError)` - Startup failed before any fetching began
pub async fn crawl(config: Config) -> Result<(), HarvesterError> {
    let sink = build_sink(&config.output)?;
    let coordinator = Coordinator::new(config, sink)?;
    coordinator.run().await
}
