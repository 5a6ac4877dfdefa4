//! Run report built up while the crawl progresses
//!
//! The coordinator records the outcome of every page here. Per-page failures
//! never abort a run; they end up in `failures` instead.

use crate::state::PageState;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

/// A page that did not end in a success state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    /// The URL that failed
    pub url: String,

    /// The error state
    pub state: PageState,

    /// Error message
    pub message: String,
}

/// Statistics and failures of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Datasource the run ingested into
    pub datasource_id: String,

    /// Hash of the configuration file, when loaded from one
    pub config_hash: Option<String>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of pages a worker finished with, whatever the outcome
    pub pages_visited: u64,

    /// Count of pages by final state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Count of visited pages by link distance from their seed
    pub pages_by_depth: BTreeMap<u32, u64>,

    /// Links found on visited pages, before filtering
    pub links_discovered: u64,

    /// Links admitted to the frontier
    pub links_admitted: u64,

    /// Pages that failed, in the order they finished
    pub failures: Vec<PageFailure>,
}

impl CrawlReport {
    /// Starts an empty report for a run beginning now
    pub fn new(datasource_id: impl Into<String>) -> Self {
        Self {
            datasource_id: datasource_id.into(),
            config_hash: None,
            started_at: Utc::now(),
            finished_at: None,
            pages_visited: 0,
            pages_by_state: HashMap::new(),
            pages_by_depth: BTreeMap::new(),
            links_discovered: 0,
            links_admitted: 0,
            failures: Vec::new(),
        }
    }

    /// Records the final state of a visited page
    ///
    /// Error states are also kept in `failures`, labelled with the state when
    /// no message is given.
    pub fn record_page(
        &mut self,
        url: &str,
        depth: u32,
        state: PageState,
        message: Option<String>,
    ) {
        self.pages_visited += 1;
        *self.pages_by_state.entry(state).or_insert(0) += 1;
        *self.pages_by_depth.entry(depth).or_insert(0) += 1;

        if state.is_error() {
            self.failures.push(PageFailure {
                url: url.to_string(),
                state,
                message: message.unwrap_or_else(|| state.to_string()),
            });
        }
    }

    /// Marks the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Returns the number of pages in the given state
    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Returns the number of records accepted by the ingestion endpoint
    pub fn ingested(&self) -> u64 {
        self.count(PageState::Ingested)
    }

    /// Returns the number of pages kept out of ingestion by excluded paths
    pub fn excluded(&self) -> u64 {
        self.count(PageState::Excluded)
    }

    /// Returns the number of pages that failed to fetch, parse or dispatch
    pub fn failed(&self) -> u64 {
        self.failures.len() as u64
    }

    /// Share of visited pages that ended in a success state, in percent
    pub fn success_rate(&self) -> f64 {
        if self.pages_visited == 0 {
            return 0.0;
        }
        let successes = self.ingested() + self.excluded();
        (successes as f64 / self.pages_visited as f64) * 100.0
    }

    /// Returns the run duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints the report to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Overview:");
    println!("  Datasource: {}", report.datasource_id);
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {} seconds", duration);
    }
    println!("  Pages visited: {}", report.pages_visited);
    println!("  Records ingested: {}", report.ingested());
    println!("  Pages excluded: {}", report.excluded());
    println!(
        "  Links discovered: {} ({} admitted)",
        report.links_discovered, report.links_admitted
    );
    println!();

    println!("Pages by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = report.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (state, count) in state_counts {
        let percentage = if report.pages_visited > 0 {
            (*count as f64 / report.pages_visited as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
    println!();

    if !report.failures.is_empty() {
        println!("Failures ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  - [{}] {}: {}", failure.state, failure.url, failure.message);
        }
        println!();
    }

    println!(
        "Success Rate: {:.1}% ({} / {} pages)",
        report.success_rate(),
        report.ingested() + report.excluded(),
        report.pages_visited
    );
}
