//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of crawl results,
//! including per-seed counts, the page type breakdown and failed pages.

use crate::output::stats::CrawlSummary;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Most failed pages listed in the report
const MAX_LISTED_FAILURES: usize = 50;

/// Writes a markdown summary to `output_path`
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(std::io::Error)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> std::io::Result<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Gleaner Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds()
    ));
    md.push_str(&format!(
        "- **Status**: {}\n",
        if summary.was_cancelled() {
            "cancelled"
        } else {
            "completed"
        }
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Visited**: {}\n", summary.total_visited()));
    md.push_str(&format!("- **Unique**: {}\n", summary.total_unique()));
    md.push_str(&format!(
        "- **Failed**: {} ({:.2}%)\n",
        summary.total_failed(),
        summary.failure_rate()
    ));
    md.push_str(&format!("- **Records**: {}\n", summary.total_records()));
    md.push_str(&format!(
        "- **Content-bearing**: {}\n\n",
        summary.total_content_bearing()
    ));

    md.push_str("## Seeds\n\n");
    md.push_str("| Seed | Visited | Failed | Records | Content-bearing |\n");
    md.push_str("|------|---------|--------|---------|-----------------|\n");
    for seed in &summary.seeds {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            seed.seed, seed.visited, seed.failed, seed.records, seed.content_bearing
        ));
    }
    md.push('\n');

    if !summary.page_types.is_empty() {
        md.push_str("## Page Type Breakdown\n\n");
        md.push_str("| Page Type | Pages |\n");
        md.push_str("|-----------|-------|\n");
        for (page_type, count) in &summary.page_types {
            md.push_str(&format!("| {} | {} |\n", page_type, count));
        }
        md.push('\n');
    }

    if !summary.failures.is_empty() {
        md.push_str("## Failed Pages\n\n");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            md.push_str(&format!(
                "- `{}` (depth {}): {}\n",
                failure.url, failure.depth, failure.error
            ));
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            md.push_str(&format!(
                "- ... and {} more\n",
                summary.failures.len() - MAX_LISTED_FAILURES
            ));
        }
        md.push('\n');
    }

    md
}
