//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from the start URLs
//! - Running up to `max_concurrent_pages` page workers at a time
//! - Fetching, extracting and dispatching each page inside its worker
//! - Filtering discovered links and admitting them to the frontier
//! - Building the run report

use crate::config::{validate, CrawlConfig};
use crate::crawler::fetcher::{build_http_client, failure_state, fetch_page, FetchOutcome};
use crate::crawler::frontier::{Admission, Frontier, QueuedUrl};
use crate::extract::{parse_html, ExtractedDocument, ParsedPage};
use crate::ingest::{Dispatcher, IngestionRecord};
use crate::output::CrawlReport;
use crate::state::PageState;
use crate::url::UrlFilter;
use crate::DispatchError;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// What a page worker hands back to the coordinator
#[derive(Debug)]
struct PageOutcome {
    url: Url,
    depth: u32,
    state: PageState,
    links: Vec<String>,
    redirect: Option<Url>,
    error: Option<String>,
}

impl PageOutcome {
    fn failed(queued: QueuedUrl, state: PageState, error: String) -> Self {
        Self {
            url: queued.url,
            depth: queued.depth,
            state,
            links: Vec::new(),
            redirect: None,
            error: Some(error),
        }
    }

    fn redirected(queued: QueuedUrl, location: Url) -> Self {
        Self {
            url: queued.url,
            depth: queued.depth,
            state: PageState::Redirected,
            links: Vec::new(),
            redirect: Some(location),
            error: None,
        }
    }
}

/// Read-only state shared by all page workers of a run
#[derive(Debug, Clone)]
struct PageContext {
    config: Arc<CrawlConfig>,
    filter: Arc<UrlFilter>,
    client: Client,
    dispatcher: Dispatcher,
    parsing_date: i64,
}

impl PageContext {
    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches the page
    /// 2. Parses HTML and extracts links
    /// 3. Extracts and dispatches the document, unless the page is excluded
    /// 4. Returns the links to follow when `follow` is set
    async fn visit_page(self, queued: QueuedUrl) -> PageOutcome {
        tracing::info!("Crawling of page with url: {}", queued.url);

        let page = match fetch_page(&self.client, &queued.url).await {
            Ok(FetchOutcome::Page(page)) => page,
            Ok(FetchOutcome::Redirect { location }) => {
                tracing::debug!("Redirecting ({}) from {}", location, queued.url);
                return PageOutcome::redirected(queued, location);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", queued.url, e);
                let state = failure_state(&e);
                return PageOutcome::failed(queued, state, e.to_string());
            }
        };

        let mut parsed = parse_html(&page.body, &page.url);
        let page_url = page.url.as_str();

        let (state, error) = if self.filter.should_exclude_from_ingestion(page_url) {
            tracing::info!("{} excluded", page_url);
            (PageState::Excluded, None)
        } else {
            match self.ingest(&page.url, &parsed).await {
                Ok(()) => {
                    tracing::info!("Page with url: {} ingested", page_url);
                    (PageState::Ingested, None)
                }
                Err(e) => (PageState::DispatchFailed, Some(e.to_string())),
            }
        };

        let links = if self.config.follow {
            std::mem::take(&mut parsed.links)
        } else {
            Vec::new()
        };

        PageOutcome {
            url: queued.url,
            depth: queued.depth,
            state,
            links,
            redirect: None,
            error,
        }
    }

    /// Extracts the document of a parsed page and delivers its record
    async fn ingest(&self, url: &Url, parsed: &ParsedPage) -> Result<(), DispatchError> {
        let document = ExtractedDocument::from_parsed(url, parsed, self.config.max_content_length);
        let record = IngestionRecord::new(&self.config.datasource_id, self.parsing_date, &document)?;
        self.dispatcher.dispatch(&record).await
    }
}

/// Main crawler coordinator structure
///
/// Owns the frontier and the report. Page workers only ever see a
/// `PageContext` and report back through their join handle.
pub struct Coordinator {
    context: PageContext,
    frontier: Frontier,
    report: CrawlReport,
    limit_logged: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Validates the configuration, compiles the URL filter, builds the HTTP
    /// clients and seeds the frontier with the start URLs. Seeds are not
    /// subject to the domain and path rules.
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ConnectorError)` - Invalid configuration or client setup failure
    pub fn new(config: CrawlConfig) -> crate::Result<Self> {
        validate(&config)?;

        let filter = UrlFilter::from_config(&config)?;
        let client = build_http_client(&config.crawler)?;
        let dispatcher = Dispatcher::new(
            config.ingestion_url.as_str(),
            config.crawler.ingestion_timeout,
        )?;

        tracing::info!("Getting pages from {}", format_window_start(config.timestamp));

        let mut frontier = Frontier::new(&config.crawler);
        for seed in &config.start_urls {
            let url = Url::parse(seed)?;
            match frontier.offer(url, 0) {
                Admission::Admitted => {}
                other => tracing::warn!("Start URL {} not queued: {:?}", seed, other),
            }
        }

        let report = CrawlReport::new(config.datasource_id.as_str());

        Ok(Self {
            context: PageContext {
                config: Arc::new(config),
                filter: Arc::new(filter),
                client,
                dispatcher,
                parsing_date: Utc::now().timestamp_millis(),
            },
            frontier,
            report,
            limit_logged: false,
        })
    }

    /// Attaches the configuration file hash to the run report
    pub fn set_config_hash(&mut self, hash: impl Into<String>) {
        self.report.config_hash = Some(hash.into());
    }

    /// Parsing date stamped on every record of this run (epoch millis)
    pub fn parsing_date(&self) -> i64 {
        self.context.parsing_date
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Fills the worker pool from the frontier
    /// 2. Waits for the next worker to finish
    /// 3. Records its outcome in the report
    /// 4. Offers its links to the frontier
    ///
    /// The loop ends when the frontier is empty and no worker is in flight.
    /// Per-page failures are recorded in the report and never end the run.
    pub async fn run(mut self) -> CrawlReport {
        tracing::info!(
            "Starting crawl for datasource {} with {} start URL(s)",
            self.context.config.datasource_id,
            self.frontier.len()
        );

        let max_workers = self.context.config.crawler.max_concurrent_pages.max(1) as usize;
        let mut workers: JoinSet<PageOutcome> = JoinSet::new();
        let start_time = std::time::Instant::now();

        loop {
            while workers.len() < max_workers {
                let Some(queued) = self.frontier.pop() else {
                    break;
                };
                workers.spawn(run_worker(self.context.clone(), queued));
            }

            let Some(joined) = workers.join_next().await else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            match joined {
                Ok(outcome) => self.handle_outcome(outcome),
                Err(e) => tracing::error!("Page worker could not be joined: {}", e),
            }

            // Progress reporting every 10 pages
            if self.report.pages_visited > 0 && self.report.pages_visited % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = self.report.pages_visited as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} in flight, {:.2} pages/sec",
                    self.report.pages_visited,
                    self.frontier.len(),
                    workers.len(),
                    rate
                );
            }
        }

        self.report.finish();

        tracing::info!(
            "Crawl completed: {} pages visited, {} ingested, {} failed in {:?}",
            self.report.pages_visited,
            self.report.ingested(),
            self.report.failed(),
            start_time.elapsed()
        );

        self.report
    }

    fn handle_outcome(&mut self, outcome: PageOutcome) {
        self.report.record_page(
            outcome.url.as_str(),
            outcome.depth,
            outcome.state,
            outcome.error,
        );

        if let Some(location) = outcome.redirect {
            self.handle_redirect(&outcome.url, location, outcome.depth);
        }

        if outcome.state.has_links() && !outcome.links.is_empty() {
            self.handle_discovered_links(&outcome.links, outcome.depth + 1);
        }
    }

    /// Queues a redirect target at the depth of the redirecting page
    ///
    /// The target goes through the same visited set as any link, so a page
    /// reached both directly and through a redirect is fetched once. Path
    /// rules apply to extracted links only.
    fn handle_redirect(&mut self, from: &Url, location: Url, depth: u32) {
        if !self.context.filter.is_domain_allowed(&location) {
            tracing::debug!("Redirect from {} leaves the allowed domains", from);
            return;
        }

        match self.frontier.offer(location, depth) {
            Admission::Admitted => {}
            Admission::LimitReached => self.log_limit_reached(),
            other => tracing::debug!("Redirect target of {} not queued: {:?}", from, other),
        }
    }

    fn log_limit_reached(&mut self) {
        if !self.limit_logged {
            tracing::warn!(
                "Page limit of {} reached, no more URLs will be queued",
                self.context.config.crawler.max_pages
            );
            self.limit_logged = true;
        }
    }

    /// Handles discovered links from a page
    ///
    /// This method:
    /// 1. Checks the allowed domains and paths
    /// 2. Offers the URL to the frontier (dedup, depth and page limits)
    fn handle_discovered_links(&mut self, links: &[String], depth: u32) {
        for link in links {
            self.report.links_discovered += 1;

            let url = match Url::parse(link) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Failed to parse URL {}: {}", link, e);
                    continue;
                }
            };

            if !self.context.filter.accepts_link(&url) {
                tracing::debug!("Link {} is outside the allowed domains or paths", link);
                continue;
            }

            match self.frontier.offer(url, depth) {
                Admission::Admitted => self.report.links_admitted += 1,
                Admission::LimitReached => self.log_limit_reached(),
                Admission::TooDeep => tracing::debug!("Link {} exceeds max depth", link),
                Admission::AlreadySeen | Admission::Invalid => {}
            }
        }
    }
}

/// Runs one page visit in its own task so a panic is reported against its URL
async fn run_worker(context: PageContext, queued: QueuedUrl) -> PageOutcome {
    let fallback = queued.clone();

    match tokio::spawn(context.visit_page(queued)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Worker for {} failed: {}", fallback.url, e);
            PageOutcome::failed(fallback, PageState::Failed, format!("Worker failed: {}", e))
        }
    }
}

/// Formats the crawl window start as `dd-Mon-YYYY`
fn format_window_start(timestamp_millis: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|start| start.format("%d-%b-%Y").to_string())
        .unwrap_or_else(|| timestamp_millis.to_string())
}

/// Runs a complete crawl operation
///
/// # Arguments
///
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished; per-page failures are in the report
/// * `Err(ConnectorError)` - The run could not start
///
/// # Example
///
/// ```no_run
/// use web_connector::config::load_config;
/// use web_connector::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("{} pages ingested", report.ingested());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: CrawlConfig) -> crate::Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
