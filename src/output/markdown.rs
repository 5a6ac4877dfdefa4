//! Markdown report generation
//!
//! This module renders a finished run report as a markdown document, for
//! schedulers that archive one summary file per run.

use crate::output::report::CrawlReport;
use crate::state::PageState;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of failures listed individually before the rest are counted
const MAX_LISTED_FAILURES: usize = 50;

/// Writes the markdown rendering of a report to a file
///
/// # Arguments
///
/// * `report` - The run report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(std::io::Error)` - Failed to create or write the file
pub fn write_markdown_report(report: &CrawlReport, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_report(report: &CrawlReport) -> String {
    let mut md = String::new();

    md.push_str("# Web Connector Crawl Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Datasource**: {}\n", report.datasource_id));
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    if let Some(finished) = &report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", report.pages_visited));
    md.push_str(&format!("- **Records Ingested**: {}\n", report.ingested()));
    md.push_str(&format!("- **Pages Excluded**: {}\n", report.excluded()));
    md.push_str(&format!("- **Failures**: {}\n", report.failed()));
    md.push_str(&format!(
        "- **Links Discovered**: {}\n",
        report.links_discovered
    ));
    md.push_str(&format!("- **Links Admitted**: {}\n", report.links_admitted));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    // State breakdown, in declaration order so reports diff cleanly
    md.push_str("## Page State Breakdown\n\n");
    md.push_str("| State | Count |\n");
    md.push_str("|-------|-------|\n");
    for state in PageState::all_states() {
        md.push_str(&format!("| {} | {} |\n", state, report.count(state)));
    }
    md.push('\n');

    if !report.pages_by_depth.is_empty() {
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");

        for (depth, count) in &report.pages_by_depth {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    if !report.failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | State | Message |\n");
        md.push_str("|-----|-------|---------|\n");

        for failure in report.failures.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                failure.url,
                failure.state,
                failure.message.replace('|', "\\|")
            ));
        }
        if report.failures.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "\n... and {} more\n",
                report.failures.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    md
}
