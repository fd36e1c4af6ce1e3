//! Queryable page document
//!
//! This module wraps the HTML parser behind the small capability the rest of
//! the crawler consumes: text queries by CSS selector and candidate-link
//! discovery. A `PageDocument` is scoped to the processing of one fetched
//! page and is dropped as soon as that page is handled; it is not `Send` and
//! must never be held across an await point.

use crate::ExtractError;
use scraper::{Html, Selector};
use url::Url;

/// An opaque queryable structure for one fetched page
pub struct PageDocument {
    html: Html,
    base_url: Url,
}

impl PageDocument {
    /// Parses a fetched HTML body
    ///
    /// Parsing is lenient: malformed markup produces a best-effort tree, it
    /// never fails.
    ///
    /// # Arguments
    ///
    /// * `body` - The HTML content
    /// * `base_url` - The URL the body was loaded from, used to resolve
    ///   relative links
    pub fn parse(body: &str, base_url: Url) -> Self {
        Self {
            html: Html::parse_document(body),
            base_url,
        }
    }

    /// Returns the trimmed text of the first element matching the selector
    ///
    /// # Returns
    ///
    /// * `Ok(Some(text))` - First match, with surrounding whitespace trimmed
    /// * `Ok(None)` - No element matched, or the match had only whitespace
    /// * `Err(ExtractError)` - The selector itself is invalid
    pub fn query_text(&self, selector: &str) -> Result<Option<String>, ExtractError> {
        let parsed = parse_selector(selector)?;

        Ok(self
            .html
            .select(&parsed)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty()))
    }

    /// Returns the trimmed text of every element matching the selector
    pub fn query_all_text(&self, selector: &str) -> Result<Vec<String>, ExtractError> {
        let parsed = parse_selector(selector)?;

        Ok(self
            .html
            .select(&parsed)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect())
    }

    /// Returns all candidate links found on the page, as absolute URLs
    ///
    /// # Link Extraction Rules
    ///
    /// **Include:** `<a href="...">` anywhere in the document, with relative
    /// hrefs resolved against the page's base URL.
    ///
    /// **Exclude:**
    /// - `javascript:`, `mailto:`, `tel:` links and data URIs
    /// - Fragment-only hrefs (same-page anchors)
    /// - `<a href="..." download>` links
    /// - Anything that resolves to a non-HTTP(S) URL
    pub fn links(&self) -> Vec<Url> {
        let mut links = Vec::new();

        if let Ok(a_selector) = Selector::parse("a[href]") {
            for element in self.html.select(&a_selector) {
                if element.value().attr("download").is_some() {
                    continue;
                }

                if let Some(href) = element.value().attr("href") {
                    if let Some(absolute_url) = self.resolve_link(href) {
                        links.push(absolute_url);
                    }
                }
            }
        }

        links
    }

    /// Resolves a link href to an absolute URL and validates it
    fn resolve_link(&self, href: &str) -> Option<Url> {
        let href = href.trim();

        if href.is_empty() {
            return None;
        }

        if href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("data:")
        {
            return None;
        }

        // Same-page anchors
        if href.starts_with('#') {
            return None;
        }

        match self.base_url.join(href) {
            Ok(absolute_url) => {
                if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                    Some(absolute_url)
                } else {
                    None
                }
            }
            Err(_) => None,
        }
    }
}

/// Parses a CSS selector, mapping failure to an extraction error
fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> PageDocument {
        PageDocument::parse(body, Url::parse("https://example.com/page").unwrap())
    }

    #[test]
    fn test_query_text_first_match() {
        let doc = document("<html><body><h1>First</h1><h1>Second</h1></body></html>");
        assert_eq!(doc.query_text("h1").unwrap(), Some("First".to_string()));
    }

    #[test]
    fn test_query_text_trims_whitespace() {
        let doc = document("<html><body><h1>  123 Main St  </h1></body></html>");
        assert_eq!(
            doc.query_text("h1").unwrap(),
            Some("123 Main St".to_string())
        );
    }

    #[test]
    fn test_query_text_absent_selector() {
        let doc = document("<html><body><p>text</p></body></html>");
        assert_eq!(doc.query_text("h1").unwrap(), None);
    }

    #[test]
    fn test_query_text_whitespace_only_is_none() {
        let doc = document("<html><body><h1>   </h1></body></html>");
        assert_eq!(doc.query_text("h1").unwrap(), None);
    }

    #[test]
    fn test_query_text_attribute_selector() {
        let doc =
            document(r#"<html><body><span data-testid="price">$450,000</span></body></html>"#);
        assert_eq!(
            doc.query_text(r#"[data-testid="price"]"#).unwrap(),
            Some("$450,000".to_string())
        );
    }

    #[test]
    fn test_query_text_invalid_selector() {
        let doc = document("<html><body></body></html>");
        let result = doc.query_text("h1[[[");
        assert!(matches!(
            result.unwrap_err(),
            ExtractError::Selector { .. }
        ));
    }

    #[test]
    fn test_query_all_text() {
        let doc = document(
            r#"<html><body>
            <span class="fact">3 beds</span>
            <span class="fact">2 baths</span>
            <span class="fact">1,500 sqft</span>
            </body></html>"#,
        );
        let facts = doc.query_all_text("span.fact").unwrap();
        assert_eq!(facts, vec!["3 beds", "2 baths", "1,500 sqft"]);
    }

    #[test]
    fn test_extract_absolute_link() {
        let doc = document(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        let links = doc.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://other.com/page");
    }

    #[test]
    fn test_extract_relative_link() {
        let doc = document(r#"<html><body><a href="/homedetails/x/1_zpid/">Link</a></body></html>"#);
        let links = doc.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].as_str(), "https://example.com/homedetails/x/1_zpid/");
    }

    #[test]
    fn test_skip_special_schemes() {
        let doc = document(
            r#"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>x</h1>">Data</a>
            </body></html>"#,
        );
        assert!(doc.links().is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let doc = document(r##"<html><body><a href="#map">Jump</a></body></html>"##);
        assert!(doc.links().is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let doc = document(r#"<html><body><a href="/file.pdf" download>PDF</a></body></html>"#);
        assert!(doc.links().is_empty());
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let doc = document(
            r#"<html><body>
            <a href="/homes/for_sale/">Valid</a>
            <a href="javascript:alert('no')">Invalid</a>
            <a href="/b/some-building/">Valid</a>
            </body></html>"#,
        );
        assert_eq!(doc.links().len(), 2);
    }

    #[test]
    fn test_malformed_html_still_parses() {
        let doc = document("<html><body><h1>Unclosed<a href='/next'>link");
        assert!(doc.query_text("h1").unwrap().is_some());
        assert_eq!(doc.links().len(), 1);
    }
}
