//! Configuration module for the connector
//!
//! This module loads a run configuration from TOML, converts the loosely typed
//! values schedulers hand over (serialized lists, truthy strings, numeric
//! strings) into a `CrawlConfig`, and validates it.
//!
//! # Example
//!
//! ```no_run
//! use web_connector::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Following links: {}", config.follow);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    CrawlConfig, CrawlerLimits, CrawlerSection, FlagValue, ListValue, RunConfigFile,
    TextOrNumber, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_INGESTION_TIMEOUT_SECS,
    DEFAULT_MAX_CONCURRENT_PAGES, DEFAULT_MAX_PAGES, DEFAULT_USER_AGENT,
};

pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, parse_string_list,
    str_to_bool,
};
pub use validation::validate;
