//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building HTTP clients with a proper user agent and optional proxy
//! - GET requests to fetch page content
//! - Error classification into the outcomes the orchestrator acts on
//!
//! There is no retry logic at this layer; a failed request is reported once
//! and the orchestrator moves on.

use reqwest::{Client, Proxy};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-success HTTP response
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client for the crawl
///
/// # Arguments
///
/// * `user_agent` - Full User-Agent header value
/// * `timeout_secs` - Per-request timeout
/// * `proxy_url` - Optional egress proxy for every request this client sends
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client or parse the proxy URL
pub fn build_http_client(
    user_agent: &str,
    timeout_secs: u64,
    proxy_url: Option<&str>,
) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(proxy_url) = proxy_url {
        builder = builder.proxy(Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// Fetches a URL and classifies the result
///
/// # Outcome mapping
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx with HTML body | Success |
/// | 2xx with non-HTML Content-Type | ContentMismatch |
/// | Non-success status | HttpError |
/// | Timeout / connect / body error | NetworkError |
///
/// Redirects are followed by the client (default policy); `final_url` is the
/// URL the body was actually loaded from.
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => return classify_request_error(e),
    };

    let status = response.status();
    let final_url = response.url().to_string();

    if !status.is_success() {
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // An absent Content-Type is given the benefit of the doubt
    if !content_type.is_empty() && !content_type.contains("text/html") {
        return FetchOutcome::ContentMismatch { content_type };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchOutcome::NetworkError {
            error: format!("Failed to read body: {}", e),
        },
    }
}

/// Classifies a reqwest transport error into a fetch outcome
fn classify_request_error(e: reqwest::Error) -> FetchOutcome {
    if e.is_timeout() {
        FetchOutcome::NetworkError {
            error: "Request timeout".to_string(),
        }
    } else if e.is_connect() {
        FetchOutcome::NetworkError {
            error: format!("Connection failed: {}", e),
        }
    } else if let Some(status) = e.status() {
        FetchOutcome::HttpError {
            status_code: status.as_u16(),
        }
    } else {
        FetchOutcome::NetworkError {
            error: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("TestBot/1.0", 30, None);
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        let client = build_http_client("TestBot/1.0", 30, Some("http://127.0.0.1:8080"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_http_client_with_invalid_proxy() {
        let client = build_http_client("TestBot/1.0", 30, Some("::not-a-proxy::"));
        assert!(client.is_err());
    }

    // Fetch behavior against live responses is covered by the wiremock
    // integration tests in tests/crawl_tests.rs
}
