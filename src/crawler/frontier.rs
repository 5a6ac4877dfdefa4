//! Crawl frontier and visited set
//!
//! This module handles:
//! - FIFO queue of URLs waiting to be fetched
//! - Deduplication by normalized URL
//! - The per-run page cap and optional depth limit

use crate::config::CrawlerLimits;
use crate::url::normalize_url;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch, as it was discovered
    pub url: Url,

    /// Link distance from the seed it was reached from (seeds are 0)
    pub depth: u32,
}

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Queued for fetching
    Admitted,

    /// Normalizes to a URL already admitted in this run
    AlreadySeen,

    /// Deeper than the configured maximum depth
    TooDeep,

    /// The run already admitted its maximum number of pages
    LimitReached,

    /// Cannot be normalized (bad scheme, no host)
    Invalid,
}

/// Frontier owned by the coordinator
///
/// Workers never see it: they report links back and the coordinator offers
/// them here. Every admitted URL is added to the visited set at admission time,
/// so a URL is fetched at most once per run even while its first visit is
/// still in flight.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<QueuedUrl>,
    visited: HashSet<String>,
    max_pages: u32,
    max_depth: Option<u32>,
}

impl Frontier {
    /// Creates an empty frontier bounded by the given limits
    pub fn new(limits: &CrawlerLimits) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            max_pages: limits.max_pages,
            max_depth: limits.max_depth,
        }
    }

    /// Offers a URL for fetching
    ///
    /// # Admission Rules
    ///
    /// 1. Depth must not exceed `max_depth`
    /// 2. The URL must normalize (HTTP(S) with a host)
    /// 3. Its normalized form must not have been admitted before
    /// 4. Fewer than `max_pages` URLs may have been admitted so far
    ///
    /// Domain and path rules are applied by the caller beforehand.
    pub fn offer(&mut self, url: Url, depth: u32) -> Admission {
        if self.max_depth.is_some_and(|max| depth > max) {
            return Admission::TooDeep;
        }

        let key = match normalize_url(url.as_str()) {
            Ok(normalized) => normalized.to_string(),
            Err(e) => {
                tracing::debug!("Failed to normalize URL {}: {}", url, e);
                return Admission::Invalid;
            }
        };

        if self.visited.contains(&key) {
            return Admission::AlreadySeen;
        }

        if self.visited.len() >= self.max_pages as usize {
            return Admission::LimitReached;
        }

        self.visited.insert(key);
        self.queue.push_back(QueuedUrl { url, depth });
        Admission::Admitted
    }

    /// Takes the next URL to fetch, oldest first
    pub fn pop(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    /// Returns the number of URLs waiting in the frontier
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns how many URLs were admitted so far, including those already fetched
    pub fn admitted(&self) -> usize {
        self.visited.len()
    }
}
