use regex::Regex;
use std::sync::OnceLock;

/// Structural indicators of a detail page, checked as one alternation:
/// the `homedetails` path marker, the `/b/` building sub-path, or a numeric
/// identifier segment after `/homes/`.
const DETAIL_INDICATORS: &str = r"homedetails|/b/|/homes/\d+";

fn detail_regex() -> &'static Regex {
    static DETAIL_RE: OnceLock<Regex> = OnceLock::new();
    DETAIL_RE.get_or_init(|| {
        Regex::new(DETAIL_INDICATORS).expect("hardcoded detail-page pattern is valid")
    })
}

/// Decides whether a URL looks like a listing detail page
///
/// This is a heuristic over the URL's shape, not an exact grammar: a URL is a
/// detail page if it matches any structural indicator, or contains the
/// `/homedetails/` literal. The conditions overlap by construction and the
/// redundancy is kept deliberately; false positives and negatives are
/// acceptable and never crash the pipeline. Anything that matches nothing,
/// including malformed input, classifies as not-a-detail-page.
///
/// # Examples
///
/// ```
/// use listing_harvester::url::is_detail_page;
///
/// assert!(is_detail_page(
///     "https://example.com/homedetails/123-main-st/456_zpid/"
/// ));
/// assert!(!is_detail_page("https://example.com/homes/for_sale"));
/// ```
pub fn is_detail_page(url: &str) -> bool {
    detail_regex().is_match(url) || url.contains("/homedetails/")
}
