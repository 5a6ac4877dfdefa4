//! Per-run URL filter
//!
//! Decides which discovered links are fetched and which fetched pages are
//! kept out of ingestion. Patterns are compiled once when the run starts.

use crate::config::CrawlConfig;
use crate::url::domain::extract_domain;
use crate::url::matcher::matches_domain;
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Compiled allow/deny rules of one crawl run
#[derive(Debug, Clone)]
pub struct UrlFilter {
    allowed_domains: Vec<String>,
    allowed_paths: Vec<Regex>,
    excluded_paths: Vec<Regex>,
}

impl UrlFilter {
    /// Compiles a filter from raw domain and pattern lists
    ///
    /// # Returns
    ///
    /// * `Ok(UrlFilter)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - A pattern is not a valid regex
    pub fn new(
        allowed_domains: &[String],
        allowed_paths: &[String],
        excluded_paths: &[String],
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            allowed_domains: allowed_domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .collect(),
            allowed_paths: compile_patterns(allowed_paths)?,
            excluded_paths: compile_patterns(excluded_paths)?,
        })
    }

    /// Compiles the filter described by a run configuration
    pub fn from_config(config: &CrawlConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.allowed_domains,
            &config.allowed_paths,
            &config.excluded_paths,
        )
    }

    /// Returns true if a discovered link may be fetched
    ///
    /// The URL must contain a match for at least one allowed-path pattern
    /// anywhere in it (search, not full match). With no allowed-path patterns
    /// every URL is accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use web_connector::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new(&[], &["/blog/.*".to_string()], &[]).unwrap();
    /// assert!(filter.should_fetch("https://x.com/blog/post1"));
    /// assert!(!filter.should_fetch("https://x.com/about"));
    /// ```
    pub fn should_fetch(&self, url: &str) -> bool {
        self.allowed_paths.is_empty() || self.allowed_paths.iter().any(|p| p.is_match(url))
    }

    /// Returns true if a fetched page must not be ingested
    ///
    /// Excluded pages are still traversed for links.
    pub fn should_exclude_from_ingestion(&self, url: &str) -> bool {
        self.excluded_paths.iter().any(|p| p.is_match(url))
    }

    /// Returns true if the URL's host is within the allowed domains
    ///
    /// With no allowed domains every host is accepted.
    pub fn is_domain_allowed(&self, url: &Url) -> bool {
        if self.allowed_domains.is_empty() {
            return true;
        }

        match extract_domain(url) {
            Some(host) => self
                .allowed_domains
                .iter()
                .any(|domain| matches_domain(domain, &host)),
            None => false,
        }
    }

    /// Returns true if a discovered link passes both the domain and path rules
    pub fn accepts_link(&self, url: &Url) -> bool {
        self.is_domain_allowed(url) && self.should_fetch(url.as_str())
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p)
                .map_err(|e| ConfigError::InvalidPattern(format!("Invalid pattern '{}': {}", p, e)))
        })
        .collect()
}
