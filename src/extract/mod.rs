//! Content extraction
//!
//! Turns the HTML of a fetched page into an `ExtractedDocument`: title,
//! flattened paragraph text cut to the run's maximum length, and favicon URL.
//! The same parse also yields the page's outbound links for the crawler.

mod document;
mod parser;
mod text;

pub use document::{extract, ExtractedDocument, UNKNOWN_TITLE};
pub use parser::{parse_html, resolve_link, ParsedPage};
pub use text::{normalize_text, truncate_chars};
