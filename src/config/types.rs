use serde::Deserialize;

/// Seed URL used when the configuration does not name any start URLs
pub const DEFAULT_SEED_URL: &str = "https://www.zillow.com/homes/for_sale/";

/// Link-follow globs used when the configuration does not name any
pub const DEFAULT_GLOBS: &[&str] = &[
    "**/homedetails/**",
    "**/homes/*",
    "**/b/*",
    "**/for_sale/**",
    "**/homes/for_sale/**",
];

/// Main configuration structure for Listing-Harvester
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from
    #[serde(rename = "start-urls", default = "default_start_urls")]
    pub start_urls: Vec<String>,

    /// Global request budget: the maximum number of pages fetched in one run
    #[serde(rename = "max-requests-per-crawl", default = "default_max_requests")]
    pub max_requests_per_crawl: u32,

    /// Maximum number of pages fetched concurrently
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Glob patterns a discovered link must match to be followed
    #[serde(default = "default_globs")]
    pub globs: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_urls: default_start_urls(),
            max_requests_per_crawl: default_max_requests(),
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_timeout_secs(),
            globs: default_globs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version of the crawler
    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl UserAgentConfig {
    /// Formats the full User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

/// Rotating egress proxy configuration
///
/// An empty list means all requests go out directly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProxyConfig {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Record sink configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Sink format for extracted records
    #[serde(default)]
    pub format: SinkFormat,

    /// Path of the sink file
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: SinkFormat::default(),
            path: default_output_path(),
        }
    }
}

/// Supported record sink formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    /// Newline-delimited JSON, appended per record
    #[default]
    Jsonl,
    /// SQLite database with one row per record
    Sqlite,
}

fn default_start_urls() -> Vec<String> {
    vec![DEFAULT_SEED_URL.to_string()]
}

fn default_max_requests() -> u32 {
    100
}

fn default_max_concurrency() -> u32 {
    8
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_globs() -> Vec<String> {
    DEFAULT_GLOBS.iter().map(|g| g.to_string()).collect()
}

fn default_agent_name() -> String {
    "listing-harvester".to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_output_path() -> String {
    "./records.jsonl".to_string()
}
