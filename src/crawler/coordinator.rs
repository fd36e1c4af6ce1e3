//! Crawl coordinator - main orchestration logic
//!
//! The coordinator drives the fetch → classify → extract-or-skip →
//! enqueue-links loop over a bounded pool of worker tasks. Each worker runs
//! the full state machine for one request to completion; failures are
//! isolated per page and the crawl ends only when the frontier is empty and
//! no workers are in flight.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::crawler::page::PageDocument;
use crate::crawler::proxy::ProxyPool;
use crate::extract::Extractor;
use crate::frontier::{CrawlRequest, Frontier};
use crate::sink::RecordSink;
use crate::url::{is_detail_page, GlobSet};
use crate::HarvesterError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Counters tracked across the whole crawl
///
/// Workers bump these with relaxed atomics; the values are observability
/// only and never influence control flow.
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    pages_failed: AtomicU64,
    detail_pages: AtomicU64,
    records_emitted: AtomicU64,
    sink_errors: AtomicU64,
    links_discovered: AtomicU64,
    links_enqueued: AtomicU64,
}

impl CrawlStats {
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    pub fn pages_failed(&self) -> u64 {
        self.pages_failed.load(Ordering::Relaxed)
    }

    pub fn detail_pages(&self) -> u64 {
        self.detail_pages.load(Ordering::Relaxed)
    }

    pub fn records_emitted(&self) -> u64 {
        self.records_emitted.load(Ordering::Relaxed)
    }

    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    pub fn links_discovered(&self) -> u64 {
        self.links_discovered.load(Ordering::Relaxed)
    }

    pub fn links_enqueued(&self) -> u64 {
        self.links_enqueued.load(Ordering::Relaxed)
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Shared, read-mostly crawl state handed to every worker
///
/// The frontier is the only member with interior mutability; everything else
/// is immutable after crawl start.
struct CrawlContext {
    frontier: Frontier,
    globs: GlobSet,
    proxies: ProxyPool,
    extractor: Extractor,
    sink: Arc<dyn RecordSink>,
    stats: CrawlStats,
}

/// Main crawl coordinator
pub struct Coordinator {
    context: Arc<CrawlContext>,
    max_concurrency: usize,
}

impl Coordinator {
    /// Creates a coordinator and seeds the frontier
    ///
    /// Compiles the glob set and builds the proxy pool up front so every
    /// configuration problem surfaces here, before the first fetch.
    pub fn new(config: Config, sink: Arc<dyn RecordSink>) -> Result<Self, HarvesterError> {
        validate(&config)?;

        let globs = GlobSet::compile(&config.crawler.globs)?;
        let proxies = ProxyPool::new(
            &config.proxy,
            &config.user_agent,
            config.crawler.request_timeout_secs,
        )?;

        let frontier = Frontier::new(config.crawler.max_requests_per_crawl);
        for seed in &config.crawler.start_urls {
            if !frontier.enqueue(seed, None) {
                tracing::warn!(seed = seed.as_str(), "Seed URL rejected by the frontier");
            }
        }

        Ok(Self {
            context: Arc::new(CrawlContext {
                frontier,
                globs,
                proxies,
                extractor: Extractor::new(),
                sink,
                stats: CrawlStats::default(),
            }),
            max_concurrency: config.crawler.max_concurrency as usize,
        })
    }

    /// Crawl statistics, live while the crawl runs
    pub fn stats(&self) -> &CrawlStats {
        &self.context.stats
    }

    /// Runs the crawl to completion
    ///
    /// Keeps up to `max_concurrency` workers in flight, topping the pool up
    /// from the frontier after every completion. Terminates when the
    /// frontier is empty and no worker remains in flight; budget exhaustion
    /// reaches the same condition by draining what was already admitted.
    pub async fn run(&self) -> Result<(), HarvesterError> {
        let start_time = Instant::now();
        tracing::info!(
            budget = self.context.frontier.max_requests(),
            concurrency = self.max_concurrency,
            proxies = self.context.proxies.len(),
            "Starting crawl"
        );

        let mut in_flight: JoinSet<()> = JoinSet::new();

        loop {
            while in_flight.len() < self.max_concurrency {
                match self.context.frontier.dequeue() {
                    Some(request) => {
                        let context = Arc::clone(&self.context);
                        in_flight.spawn(async move {
                            process_request(context, request).await;
                        });
                    }
                    None => break,
                }
            }

            // Frontier empty and nothing running: the crawl is done
            if in_flight.is_empty() {
                break;
            }

            if let Some(Err(e)) = in_flight.join_next().await {
                tracing::error!(error = %e, "Worker task aborted");
            }
        }

        let stats = &self.context.stats;
        tracing::info!(
            pages_fetched = stats.pages_fetched(),
            pages_failed = stats.pages_failed(),
            detail_pages = stats.detail_pages(),
            records_emitted = stats.records_emitted(),
            links_discovered = stats.links_discovered(),
            links_enqueued = stats.links_enqueued(),
            elapsed = ?start_time.elapsed(),
            "Crawl completed"
        );

        Ok(())
    }
}

/// Runs the full per-request state machine for one frontier entry
///
/// Queued → Fetching → {Detail, Other} → LinksDiscovered → Done, with
/// Failed terminal on fetch errors. Nothing here propagates an error: every
/// failure is logged and the worker returns, leaving the rest of the crawl
/// untouched.
async fn process_request(context: Arc<CrawlContext>, request: CrawlRequest) {
    let url = request.url.as_str();
    tracing::info!(url, "Processing");

    let client = context.proxies.client();
    let outcome = fetch_page(client, url).await;

    let (final_url, body) = match outcome {
        FetchOutcome::Success {
            final_url, body, ..
        } => (final_url, body),
        FetchOutcome::HttpError { status_code } => {
            tracing::warn!(url, status_code, "Fetch failed with HTTP error");
            CrawlStats::bump(&context.stats.pages_failed);
            return;
        }
        FetchOutcome::ContentMismatch { content_type } => {
            tracing::warn!(url, content_type = content_type.as_str(), "Skipping non-HTML response");
            CrawlStats::bump(&context.stats.pages_failed);
            return;
        }
        FetchOutcome::NetworkError { error } => {
            tracing::warn!(url, error = error.as_str(), "Fetch failed with network error");
            CrawlStats::bump(&context.stats.pages_failed);
            return;
        }
    };

    CrawlStats::bump(&context.stats.pages_fetched);

    // The parsed document must not cross an await point, so everything that
    // touches it happens in this synchronous block.
    let base_url = Url::parse(&final_url).unwrap_or_else(|_| request.url.clone());
    let loaded_url = base_url.to_string();
    let (record, links) = {
        let document = PageDocument::parse(&body, base_url);

        let record = if is_detail_page(&loaded_url) {
            Some(context.extractor.extract(&document, &loaded_url))
        } else {
            None
        };

        (record, document.links())
    };

    match record {
        Some(record) => {
            CrawlStats::bump(&context.stats.detail_pages);
            tracing::info!(
                url = loaded_url.as_str(),
                address = record.address.as_str(),
                price = record.price.as_str(),
                zpid = record.zpid.as_str(),
                "Extracted (partial)"
            );

            match context.sink.push(&record) {
                Ok(()) => CrawlStats::bump(&context.stats.records_emitted),
                Err(e) => {
                    tracing::warn!(url = loaded_url.as_str(), error = %e, "Failed to push record");
                    CrawlStats::bump(&context.stats.sink_errors);
                }
            }
        }
        None => {
            tracing::debug!(
                url = loaded_url.as_str(),
                "Not a detail page; skipping structured extraction"
            );
        }
    }

    // Link discovery runs regardless of classification
    for link in links {
        CrawlStats::bump(&context.stats.links_discovered);

        if !context.globs.matches_url(&link) {
            continue;
        }
        if context.frontier.enqueue(link.as_str(), Some(&request.url)) {
            CrawlStats::bump(&context.stats.links_enqueued);
        }
    }
}
