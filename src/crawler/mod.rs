//! Crawler module for web page fetching and processing
//!
//! This module contains the crawl driver, including:
//! - HTTP fetching and error classification
//! - The frontier with its visited set and limits
//! - Overall crawl coordination with a bounded worker pool

mod coordinator;
mod fetcher;
mod frontier;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, failure_state, fetch_page, is_html_content_type, FetchOutcome, FetchedPage,
};
pub use frontier::{Admission, Frontier, QueuedUrl};
