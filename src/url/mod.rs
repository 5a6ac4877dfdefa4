//! URL handling module
//!
//! This module provides the per-run URL filter, visited-set normalization,
//! allowed-domain matching and small host helpers.

mod domain;
mod filter;
mod matcher;
mod normalize;

pub use domain::{default_favicon, extract_domain};
pub use filter::UrlFilter;
pub use matcher::matches_domain;
pub use normalize::normalize_url;
