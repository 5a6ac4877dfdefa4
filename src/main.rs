//! web-connector main entry point
//!
//! This is the command-line interface that runs one crawl-and-ingest pass.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web_connector::config::{load_config_with_hash, CrawlConfig};
use web_connector::crawler::Coordinator;
use web_connector::output::{print_report, write_markdown_report};

/// web-connector: crawl a set of domains and feed an ingestion endpoint
///
/// Crawls from the configured start URLs, extracts title, paragraph text and
/// favicon of every accepted page, and posts one ingestion record per page.
#[derive(Parser, Debug)]
#[command(name = "web-connector")]
#[command(version)]
#[command(about = "Crawl web pages into an ingestion endpoint", long_about = None)]
struct Cli {
    /// Path to TOML run configuration
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Also write the run report as markdown to this path
    #[arg(long, value_name = "PATH", conflicts_with = "dry_run")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            cli.config.display()
        )
    })?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let mut coordinator = Coordinator::new(config).context("Failed to start crawl")?;
    coordinator.set_config_hash(config_hash);

    let report = coordinator.run().await;

    if !cli.quiet {
        print_report(&report);
    }

    if let Some(path) = &cli.summary {
        write_markdown_report(&report, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "web_connector=info,warn",
            1 => "web_connector=debug,info",
            2 => "web_connector=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &CrawlConfig) {
    println!("=== web-connector Dry Run ===\n");

    println!("Run:");
    println!("  Datasource: {}", config.datasource_id);
    println!("  Window start: {}", config.timestamp);
    println!("  Ingestion URL: {}", config.ingestion_url);
    println!("  Follow links: {}", config.follow);
    println!("  Max content length: {}", config.max_content_length);

    println!("\nCrawler Limits:");
    println!("  Max pages: {}", config.crawler.max_pages);
    match config.crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unbounded"),
    }
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages
    );
    println!("  Fetch timeout: {:?}", config.crawler.fetch_timeout);
    println!("  Ingestion timeout: {:?}", config.crawler.ingestion_timeout);
    println!("  User agent: {}", config.crawler.user_agent);

    print_list("Start URLs", &config.start_urls, "(none)");
    print_list("Allowed Domains", &config.allowed_domains, "(any)");
    print_list("Allowed Paths", &config.allowed_paths, "(any)");
    print_list("Excluded Paths", &config.excluded_paths, "(none)");

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        config.start_urls.len()
    );
}

fn print_list(title: &str, items: &[String], empty_label: &str) {
    print!("{}", format_list(title, items, empty_label));
}

/// Renders one dry-run list; `empty_label` says what an empty list means
fn format_list(title: &str, items: &[String], empty_label: &str) -> String {
    let mut out = format!("\n{} ({}):\n", title, items.len());
    if items.is_empty() {
        out.push_str(&format!("  {}\n", empty_label));
    }
    for item in items {
        out.push_str(&format!("  - {}\n", item));
    }
    out
}
