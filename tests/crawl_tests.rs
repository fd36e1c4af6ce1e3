//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use listing_harvester::config::{Config, SinkFormat};
use listing_harvester::crawler::{crawl, Coordinator};
use listing_harvester::extract::ExtractedRecord;
use listing_harvester::sink::{MemorySink, RecordSink};
use listing_harvester::SinkError;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given seeds and request budget
fn create_test_config(seeds: Vec<String>, budget: u32) -> Config {
    let mut config = Config::default();
    config.crawler.start_urls = seeds;
    config.crawler.max_requests_per_crawl = budget;
    config.crawler.max_concurrency = 4;
    config.crawler.request_timeout_secs = 5;
    config
}

fn html_response(body: String) -> ResponseTemplate {
    // set_body_raw is required here: wiremock derives the content-type header
    // from the body setter, so an insert_header("content-type", ...) after
    // set_body_string is overridden with text/plain
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// A detail page carrying every field the extraction chains look for
fn detail_body(address: &str, price: &str, beds: &str, area: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body>
        <h1>{}</h1>
        <span data-testid="price">{}</span>
        <ul data-testid="bed-bath-beyond"><li>{}</li></ul>
        <span class="ds-home-fact-value">{}</span>
        </body></html>"#,
        address, address, price, beds, area
    )
}

#[tokio::test]
async fn test_full_crawl_extracts_detail_records() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Search results page linking to two detail pages, a duplicate of the
    // first, and one link outside the glob rules
    Mock::given(method("GET"))
        .and(path("/homes/for_sale"))
        .respond_with(html_response(format!(
            r#"<html><head><title>Search</title></head><body>
            <a href="{0}/homedetails/123-main-st/111_zpid/">123 Main St</a>
            <a href="{0}/homedetails/456-oak-ave/222_zpid/">456 Oak Ave</a>
            <a href="{0}/homedetails/123-main-st/111_zpid/">123 Main St again</a>
            <a href="{0}/about">About us</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homedetails/123-main-st/111_zpid"))
        .respond_with(html_response(detail_body(
            "123 Main St, Springfield",
            "$450,000",
            "3 bd",
            "1,500 sqft",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homedetails/456-oak-ave/222_zpid"))
        .respond_with(html_response(detail_body(
            "456 Oak Ave, Springfield",
            "$525,000",
            "4 bd",
            "2,100 sqft",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Outside the glob rules, never fetched
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_response("<html><body>About</body></html>".to_string()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/homes/for_sale/", base_url)], 10);
    let sink = Arc::new(MemorySink::new());
    let coordinator = Coordinator::new(config, sink.clone()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    assert_eq!(coordinator.stats().pages_fetched(), 3);
    assert_eq!(coordinator.stats().detail_pages(), 2);

    let records = sink.records();
    assert_eq!(records.len(), 2);

    let first: &ExtractedRecord = records
        .iter()
        .find(|r| r.zpid == "111")
        .expect("Record for zpid 111 missing");
    assert_eq!(first.address, "123 Main St, Springfield");
    assert_eq!(first.price, "$450,000");
    assert_eq!(first.beds, "3 bd");
    assert_eq!(first.baths, "");
    assert_eq!(first.area, "1,500 sqft");
    assert!(first.url.contains("111_zpid"));

    let second = records
        .iter()
        .find(|r| r.zpid == "222")
        .expect("Record for zpid 222 missing");
    assert_eq!(second.address, "456 Oak Ave, Springfield");
}

#[tokio::test]
async fn test_request_budget_limits_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Search results page with far more qualifying links than the budget
    let links: String = (0..20)
        .map(|i| {
            format!(
                r#"<a href="{}/homedetails/listing-{}/{}_zpid/">Listing {}</a>"#,
                base_url, i, i, i
            )
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/homes/for_sale"))
        .respond_with(html_response(format!(
            "<html><body>{}</body></html>",
            links
        )))
        .mount(&mock_server)
        .await;

    // Catch-all for the detail pages
    Mock::given(method("GET"))
        .respond_with(html_response(detail_body(
            "1 Some St",
            "$100,000",
            "2 bd",
            "900 sqft",
        )))
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/homes/for_sale/", base_url)], 3);
    let sink = Arc::new(MemorySink::new());
    let coordinator = Coordinator::new(config, sink.clone()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // Budget of 3 covers the seed plus two detail pages, no matter how many
    // links were discovered
    assert_eq!(coordinator.stats().pages_fetched(), 3);
    assert_eq!(coordinator.stats().links_enqueued(), 2);
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn test_budget_of_one_fetches_only_the_seed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/homes/for_sale"))
        .respond_with(html_response(format!(
            r#"<html><body><a href="{}/homedetails/x/1_zpid/">Listing</a></body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homedetails/x/1_zpid"))
        .respond_with(html_response(detail_body("1 X St", "$1", "1 bd", "1 sqft")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/homes/for_sale/", base_url)], 1);
    let sink = Arc::new(MemorySink::new());
    let coordinator = Coordinator::new(config, sink.clone()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // The seed is not a detail page, so one fetch and no records
    assert_eq!(coordinator.stats().pages_fetched(), 1);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/homes/for_sale"))
        .respond_with(html_response(format!(
            r#"<html><body>
            <a href="{0}/homedetails/broken/1_zpid/">Broken</a>
            <a href="{0}/homedetails/working/2_zpid/">Working</a>
            </body></html>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homedetails/broken/1_zpid"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homedetails/working/2_zpid"))
        .respond_with(html_response(detail_body(
            "789 Pine Rd",
            "$300,000",
            "2 bd",
            "1,100 sqft",
        )))
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/homes/for_sale/", base_url)], 10);
    let sink = Arc::new(MemorySink::new());
    let coordinator = Coordinator::new(config, sink.clone()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // The 500 response is isolated to its page
    assert_eq!(coordinator.stats().pages_failed(), 1);
    assert_eq!(coordinator.stats().pages_fetched(), 2);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].zpid, "2");
    assert_eq!(records[0].address, "789 Pine Rd");
}

/// Sink whose every push fails, as if the storage target went away mid-crawl
struct FailingSink;

impl RecordSink for FailingSink {
    fn push(&self, _record: &ExtractedRecord) -> Result<(), SinkError> {
        Err(SinkError::Write("no space left on device".to_string()))
    }
}

#[tokio::test]
async fn test_sink_failure_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/homes/for_sale"))
        .respond_with(html_response(format!(
            r#"<html><body>
            <a href="{0}/homedetails/first/1_zpid/">First</a>
            <a href="{0}/homedetails/second/2_zpid/">Second</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homedetails/first/1_zpid"))
        .respond_with(html_response(detail_body(
            "1 First St",
            "$200,000",
            "2 bd",
            "1,000 sqft",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homedetails/second/2_zpid"))
        .respond_with(html_response(detail_body(
            "2 Second St",
            "$250,000",
            "3 bd",
            "1,200 sqft",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/homes/for_sale/", base_url)], 10);
    let coordinator =
        Coordinator::new(config, Arc::new(FailingSink)).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // Every push failed, yet every page was still fetched and classified
    assert_eq!(coordinator.stats().pages_fetched(), 3);
    assert_eq!(coordinator.stats().detail_pages(), 2);
    assert_eq!(coordinator.stats().sink_errors(), 2);
    assert_eq!(coordinator.stats().records_emitted(), 0);
    assert_eq!(coordinator.stats().pages_failed(), 0);
}

#[tokio::test]
async fn test_non_html_response_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/homes/for_sale"))
        .respond_with(html_response(format!(
            r#"<html><body><a href="{}/homes/brochure">Brochure</a></body></html>"#,
            base_url
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/homes/brochure"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46]) // %PDF
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(vec![format!("{}/homes/for_sale/", base_url)], 10);
    let sink = Arc::new(MemorySink::new());
    let coordinator = Coordinator::new(config, sink.clone()).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    assert_eq!(coordinator.stats().pages_fetched(), 1);
    assert_eq!(coordinator.stats().pages_failed(), 1);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_crawl_writes_jsonl_records() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Seed directly on a detail page
    Mock::given(method("GET"))
        .and(path("/homedetails/789-pine-rd/333_zpid"))
        .respond_with(html_response(detail_body(
            "789 Pine Rd, Shelbyville",
            "$615,000",
            "5 bd",
            "2,800 sqft",
        )))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("records.jsonl");

    let mut config = create_test_config(
        vec![format!("{}/homedetails/789-pine-rd/333_zpid/", base_url)],
        5,
    );
    config.output.format = SinkFormat::Jsonl;
    config.output.path = output_path.display().to_string();

    crawl(config).await.expect("Crawl failed");

    let content = std::fs::read_to_string(&output_path).expect("Sink file missing");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1);

    let record: ExtractedRecord = serde_json::from_str(lines[0]).expect("Invalid record JSON");
    assert_eq!(record.address, "789 Pine Rd, Shelbyville");
    assert_eq!(record.price, "$615,000");
    assert_eq!(record.zpid, "333");
    assert_eq!(record.baths, "");
}
