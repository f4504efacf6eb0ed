//! Crawl statistics and console reporting
//!
//! This module turns finished result sets into a `CrawlSummary` and prints it, and
//! prints the per-page-type counts stored in the database.

use crate::classify::PageType;
use crate::crawler::{CrawlResultSet, FailedPage};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Counts for one seed's crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub seed: String,

    /// URLs selected for fetching
    pub visited: usize,

    /// Distinct URLs selected for fetching
    pub unique: usize,

    pub failed: usize,

    /// Records produced by the crawl
    pub records: usize,

    /// Records left after post-processing
    pub content_bearing: usize,

    pub cancelled: bool,
}

impl SeedSummary {
    /// Summarizes a seed from its raw and post-processed result sets
    pub fn from_results(raw: &CrawlResultSet, processed: &CrawlResultSet) -> Self {
        Self {
            seed: raw.seed.clone(),
            visited: raw.visited_count(),
            unique: raw.unique_count(),
            failed: raw.failed_count(),
            records: raw.record_count(),
            content_bearing: processed.record_count(),
            cancelled: raw.cancelled,
        }
    }
}

/// Summary of a whole invocation across all seeds
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: String,
    pub seeds: Vec<SeedSummary>,

    /// Post-processed record counts per page type
    pub page_types: BTreeMap<PageType, usize>,

    pub failures: Vec<FailedPage>,
}

impl CrawlSummary {
    /// Builds the summary from raw and post-processed result sets, paired by seed order
    pub fn new(
        config_hash: impl Into<String>,
        started_at: DateTime<Utc>,
        raw: &[CrawlResultSet],
        processed: &[CrawlResultSet],
    ) -> Self {
        let seeds = raw
            .iter()
            .zip(processed)
            .map(|(raw, processed)| SeedSummary::from_results(raw, processed))
            .collect();

        let mut page_types = BTreeMap::new();
        for results in processed {
            for (page_type, count) in results.page_type_counts() {
                *page_types.entry(page_type).or_insert(0) += count;
            }
        }

        let failures = raw.iter().flat_map(|r| r.failures.iter().cloned()).collect();

        Self {
            started_at,
            finished_at: Utc::now(),
            config_hash: config_hash.into(),
            seeds,
            page_types,
            failures,
        }
    }

    pub fn total_visited(&self) -> usize {
        self.seeds.iter().map(|s| s.visited).sum()
    }

    pub fn total_unique(&self) -> usize {
        self.seeds.iter().map(|s| s.unique).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.seeds.iter().map(|s| s.failed).sum()
    }

    pub fn total_records(&self) -> usize {
        self.seeds.iter().map(|s| s.records).sum()
    }

    pub fn total_content_bearing(&self) -> usize {
        self.seeds.iter().map(|s| s.content_bearing).sum()
    }

    pub fn was_cancelled(&self) -> bool {
        self.seeds.iter().any(|s| s.cancelled)
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of visited pages that failed
    pub fn failure_rate(&self) -> f64 {
        let visited = self.total_visited();
        if visited == 0 {
            0.0
        } else {
            (self.total_failed() as f64 / visited as f64) * 100.0
        }
    }
}

/// Prints a crawl summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    for seed in &summary.seeds {
        println!("Seed: {}", seed.seed);
        println!("  Total websites: {}", seed.visited);
        println!("  Unique websites: {}", seed.unique);
        println!("  Failed: {}", seed.failed);
        println!("  Records: {}", seed.records);
        println!("  Working websites: {}", seed.content_bearing);
        if seed.cancelled {
            println!("  (cancelled before completion)");
        }
        println!();
    }

    println!("Totals:");
    println!("  Visited: {}", summary.total_visited());
    println!("  Unique: {}", summary.total_unique());
    println!(
        "  Failed: {} ({:.1}%)",
        summary.total_failed(),
        summary.failure_rate()
    );
    println!("  Records: {}", summary.total_records());
    println!("  Content-bearing: {}", summary.total_content_bearing());
    println!("  Duration: {}s", summary.duration_seconds());
    println!();

    if !summary.page_types.is_empty() {
        println!("Pages by Type:");
        for (page_type, count) in &summary.page_types {
            println!("  {}: {}", page_type, count);
        }
    }
}

/// Prints stored page counts per type, sorted by count (descending)
pub fn print_page_type_counts(counts: &BTreeMap<PageType, u64>) {
    println!("=== Stored Pages ===\n");

    let total: u64 = counts.values().sum();
    println!("Total pages: {}", total);
    println!();

    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1));

    for (page_type, count) in sorted {
        let percentage = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", page_type, count, percentage);
    }
}
