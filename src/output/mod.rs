//! Output module for crawl reports
//!
//! This module handles:
//! - Collecting per-page outcomes into a `CrawlReport`
//! - Printing the report to stdout
//! - Writing it as a markdown summary

mod markdown;
mod report;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use report::{print_report, CrawlReport, PageFailure};
