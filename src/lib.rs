//! web-connector: a bounded web crawler that feeds an ingestion endpoint
//!
//! This crate crawls a configured set of domains from seed URLs, extracts the
//! title, paragraph text and favicon of each page, and posts one ingestion
//! record per page to a downstream sink.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod ingest;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for connector operations
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
///
/// All of these are fatal at start-up: the run aborts before any page is fetched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// A page could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// A fetched page could not be turned into a document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Expected HTML from {url}, got '{content_type}'")]
    NotHtml { url: String, content_type: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Delivery of an ingestion record failed
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Ingestion endpoint {url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{source} during request at url: {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to serialize ingestion payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// An outbound link could not be resolved into a crawlable URL
#[derive(Debug, Error)]
pub enum FollowError {
    #[error("Cannot resolve '{href}': {message}")]
    Malformed { href: String, message: String },

    #[error("Unsupported scheme in '{href}'")]
    UnsupportedScheme { href: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for connector operations
pub type Result<T> = std::result::Result<T, ConnectorError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{run_crawl, Coordinator};
pub use extract::{extract, ExtractedDocument};
pub use ingest::{content_id, Dispatcher, IngestionRecord};
pub use output::CrawlReport;
pub use state::PageState;
pub use url::{normalize_url, UrlFilter};
