use serde::Deserialize;
use std::time::Duration;

/// Default cap on the number of URLs admitted to the frontier in one run
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Default number of pages processed concurrently
pub const DEFAULT_MAX_CONCURRENT_PAGES: u32 = 8;

/// Timeout for a single ingestion POST
pub const DEFAULT_INGESTION_TIMEOUT_SECS: u64 = 10;

/// Timeout for a single page fetch
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// User agent sent with page fetches unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = concat!("web-connector/", env!("CARGO_PKG_VERSION"));

/// Validated, immutable configuration for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Start of the crawl window (epoch millis)
    pub timestamp: i64,

    /// Identifier of the datasource every record is filed under
    pub datasource_id: String,

    /// Endpoint receiving ingestion records
    pub ingestion_url: String,

    /// Hosts whose links may be followed (empty = any host)
    pub allowed_domains: Vec<String>,

    /// Seed URLs, fetched in order
    pub start_urls: Vec<String>,

    /// Regexes a discovered link must match to be fetched (empty = any link)
    pub allowed_paths: Vec<String>,

    /// Regexes marking pages that are traversed but never ingested
    pub excluded_paths: Vec<String>,

    /// Whether outbound links are followed
    pub follow: bool,

    /// Maximum number of characters of page content sent downstream
    pub max_content_length: usize,

    /// Traversal limits and HTTP settings
    pub crawler: CrawlerLimits,
}

/// Bounds and HTTP settings of the crawl driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerLimits {
    /// Maximum number of URLs admitted to the frontier, seeds included
    pub max_pages: u32,

    /// Maximum link distance from a seed (None = unbounded)
    pub max_depth: Option<u32>,

    /// Maximum number of pages processed at the same time
    pub max_concurrent_pages: u32,

    /// Timeout for each ingestion POST
    pub ingestion_timeout: Duration,

    /// Timeout for each page fetch
    pub fetch_timeout: Duration,

    /// User agent for page fetches
    pub user_agent: String,
}

impl Default for CrawlerLimits {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: None,
            max_concurrent_pages: DEFAULT_MAX_CONCURRENT_PAGES,
            ingestion_timeout: Duration::from_secs(DEFAULT_INGESTION_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Run configuration as it appears in the TOML file
///
/// Scalar and list fields accept both native TOML values and the serialized
/// string forms handed over by schedulers (`"['a', 'b']"`, `"true"`, `"500"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfigFile {
    pub timestamp: TextOrNumber,
    pub datasource_id: TextOrNumber,
    pub ingestion_url: String,
    #[serde(default)]
    pub allowed_domains: Option<ListValue>,
    pub start_urls: ListValue,
    #[serde(default)]
    pub allowed_paths: Option<ListValue>,
    #[serde(default)]
    pub excluded_paths: Option<ListValue>,
    pub follow: FlagValue,
    pub max_length: TextOrNumber,
    #[serde(default)]
    pub crawler: CrawlerSection,
}

/// Optional `[crawler]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerSection {
    pub max_pages: Option<u32>,
    pub max_depth: Option<u32>,
    pub max_concurrent_pages: Option<u32>,
    pub ingestion_timeout_secs: Option<u64>,
    pub fetch_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// An integer given either natively or as a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextOrNumber {
    Number(i64),
    Text(String),
}

/// A list of strings given either natively or serialized into one string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    List(Vec<String>),
    Serialized(String),
}

/// A boolean given either natively or as a truthy/falsy token
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}
