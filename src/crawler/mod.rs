//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Transport` trait
//! - HTML parsing and content extraction
//! - Depth-first crawl coordination for a single seed
//! - Concurrent crawling of several seeds

mod coordinator;
mod fetcher;
mod parser;
mod results;

pub use coordinator::{Coordinator, CrawlSettings};
pub use fetcher::{build_http_client, FetchResponse, HttpTransport, Transport};
pub use parser::{ensure_html, extract, parse_document, ExtractedPage, UNKNOWN_TITLE};
pub use results::{CrawlResultSet, FailedPage};

use crate::config::SeedEntry;
use crate::GleanerError;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Crawls several seeds, each as an independent crawl
///
/// Every seed gets its own visited set and result set. At most `max_concurrent` seeds
/// are crawled at the same time; all of them share the coordinator's transport, sinks
/// and cancellation token.
///
/// # Arguments
///
/// * `coordinator` - The coordinator to drive every seed with
/// * `seeds` - Seeds to crawl
/// * `max_concurrent` - Upper bound on simultaneously running seed crawls
///
/// # Returns
///
/// * `Ok(Vec<CrawlResultSet>)` - One result set per seed, in seed order
/// * `Err(GleanerError)` - A crawl task panicked
pub async fn crawl_seeds(
    coordinator: &Coordinator,
    seeds: &[SeedEntry],
    max_concurrent: usize,
) -> Result<Vec<CrawlResultSet>, GleanerError> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let tasks: Vec<_> = seeds
        .iter()
        .cloned()
        .map(|seed| {
            let permit = semaphore.clone().acquire_owned();
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                // The semaphore is never closed
                let _permit = permit.await;
                coordinator.crawl(&seed).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        results.push(task.await?);
    }

    Ok(results)
}
