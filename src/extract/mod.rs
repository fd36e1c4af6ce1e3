//! Extraction engine for listing detail pages
//!
//! For each record field an ordered chain of strategies runs against the
//! page document; the first strategy yielding a non-empty trimmed string
//! wins. A strategy failure is logged with the page URL and skipped, so
//! extraction itself never fails: whatever fields were resolved go into the
//! record and the rest stay empty. The `zpid` field is the exception and is
//! derived from the URL rather than the document.

mod strategies;

use crate::crawler::PageDocument;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strategies::Strategy;

/// Identifier patterns tried in order against the page URL
const ZPID_PATTERNS: &[&str] = &[r"/(\d+)_zpid", r"homedetails/[^/]+/(\d+)_zpid"];

/// A structured record extracted from one detail page
///
/// `url` is always present and non-empty. Every other field defaults to the
/// empty string when no strategy yields a value; a record is emitted even
/// when only partial data was recovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub address: String,
    pub price: String,
    pub beds: String,
    pub baths: String,
    pub area: String,
    pub zpid: String,
    pub url: String,
}

/// The extraction engine
///
/// Holds the compiled zpid URL patterns; the per-field strategy chains are
/// static data shared by all instances.
pub struct Extractor {
    zpid_patterns: Vec<Regex>,
}

impl Extractor {
    /// Creates an extractor with the built-in strategy chains
    pub fn new() -> Self {
        let zpid_patterns = ZPID_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("hardcoded zpid pattern is valid"))
            .collect();
        Self { zpid_patterns }
    }

    /// Extracts a record from a classified detail page
    ///
    /// Never fails and has no side effects beyond logging: running it twice
    /// on the same document yields identical records. `baths` currently has
    /// no extraction strategy and is always empty; the source markup for
    /// that field is unverified, so no selector is guessed.
    pub fn extract(&self, document: &PageDocument, url: &str) -> ExtractedRecord {
        ExtractedRecord {
            address: resolve_field(document, url, "address", strategies::ADDRESS_STRATEGIES),
            price: resolve_field(document, url, "price", strategies::PRICE_STRATEGIES),
            beds: resolve_field(document, url, "beds", strategies::BEDS_STRATEGIES),
            baths: String::new(),
            area: resolve_field(document, url, "area", strategies::AREA_STRATEGIES),
            zpid: self.zpid_from_url(url),
            url: url.to_string(),
        }
    }

    /// Derives the zpid by pattern-matching the URL itself
    ///
    /// The first pattern with a successful capture wins; no match yields an
    /// empty string.
    fn zpid_from_url(&self, url: &str) -> String {
        for pattern in &self.zpid_patterns {
            if let Some(capture) = pattern.captures(url).and_then(|c| c.get(1)) {
                return capture.as_str().to_string();
            }
        }
        String::new()
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one field's strategy chain, first non-empty result wins
///
/// Strategy errors are caught here: logged as a warning with the URL and
/// error detail, then skipped, so one broken strategy can never discard the
/// page or abort the crawl.
fn resolve_field(
    document: &PageDocument,
    url: &str,
    field: &'static str,
    chain: &[(&'static str, Strategy)],
) -> String {
    for (name, strategy) in chain {
        match strategy(document) {
            Ok(Some(value)) => return value,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(
                    url,
                    field,
                    strategy = name,
                    error = %e,
                    "Extraction strategy failed"
                );
            }
        }
    }
    String::new()
}
