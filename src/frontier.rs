//! Request frontier: the queue of not-yet-visited URLs driving the crawl
//!
//! The frontier owns the only mutable state shared between workers: the FIFO
//! queue of pending requests, the visited set of normalized URLs, and the
//! crawl budget counter. All three are guarded by a single mutex so that
//! dedup and budget accounting happen as one atomic check-and-mutate; the
//! lock is held only for that instant and never across I/O.

use crate::url::normalize_url;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use url::Url;

/// A single pending crawl request
///
/// Owned exclusively by the frontier until dequeued, then by the worker
/// processing it.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// The normalized URL to fetch
    pub url: Url,

    /// The page this URL was discovered on, if any (seeds have none)
    pub discovered_from: Option<Url>,
}

#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<CrawlRequest>,
    visited: HashSet<String>,
    issued: u32,
}

/// Bounded FIFO work queue with built-in dedup and budget enforcement
///
/// URLs are dequeued in discovery order. `enqueue` refuses a URL if it fails
/// normalization, was already marked, or would exceed the request budget;
/// the issued counter therefore never exceeds `max_requests`, which bounds
/// the number of requests that can ever be dequeued. Budget exhaustion is a
/// soft stop: already-queued requests still drain, no new ones are accepted.
#[derive(Debug)]
pub struct Frontier {
    max_requests: u32,
    inner: Mutex<FrontierInner>,
}

impl Frontier {
    /// Creates an empty frontier with the given request budget
    pub fn new(max_requests: u32) -> Self {
        Self {
            max_requests,
            inner: Mutex::new(FrontierInner::default()),
        }
    }

    /// Attempts to admit a URL into the frontier
    ///
    /// The URL is normalized first; unparseable URLs are rejected without
    /// being marked. Dedup check, budget check, and insertion happen under
    /// one lock: no two callers can both receive `true` for the same
    /// canonical URL, and at most `max_requests` URLs are ever admitted.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was unseen, within budget, and is now queued
    /// * `false` - Rejected (malformed, duplicate, or budget exhausted)
    pub fn enqueue(&self, url: &str, discovered_from: Option<&Url>) -> bool {
        let normalized = match normalize_url(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        let mut inner = self.inner.lock().unwrap();

        if inner.visited.contains(normalized.as_str()) {
            return false;
        }
        if inner.issued >= self.max_requests {
            return false;
        }

        inner.visited.insert(normalized.as_str().to_string());
        inner.issued += 1;
        inner.queue.push_back(CrawlRequest {
            url: normalized,
            discovered_from: discovered_from.cloned(),
        });
        true
    }

    /// Takes the oldest pending request, if any
    pub fn dequeue(&self) -> Option<CrawlRequest> {
        self.inner.lock().unwrap().queue.pop_front()
    }

    /// Number of requests admitted so far (never exceeds the budget)
    pub fn issued(&self) -> u32 {
        self.inner.lock().unwrap().issued
    }

    /// Number of requests waiting in the queue
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().queue.is_empty()
    }

    /// Returns whether the budget has been fully allocated
    pub fn budget_exhausted(&self) -> bool {
        self.inner.lock().unwrap().issued >= self.max_requests
    }

    /// The configured request budget
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}
